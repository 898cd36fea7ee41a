// SPDX-License-Identifier: GPL-3.0-only

//! Capability dispatch
//!
//! [`CapabilityShape::of`] is the one place that says how a raw value for a
//! given capability should be read. Every id maps to exactly one shape;
//! anything not listed is a [`CapabilityShape::Flag`].

use super::decoders::{
    decode_bframe_ref_mode, decode_field_encoding, decode_flag, decode_integer,
    decode_me_only_mode, decode_percentage, decode_preproc_flags, decode_rate_control_modes,
    decode_throughput,
};
use super::levels::level_name;
use super::{CapabilityId, CodecId};
use serde::Serialize;

/// How a capability's raw integer is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityShape {
    /// 0/1 support flag, other values verbatim (catch-all)
    Flag,
    /// Bound or count, verbatim
    Integer,
    /// Rate-control mode bitmask
    RateControl,
    /// Field encoding enum
    FieldEncoding,
    /// B-frame reference mode enum
    BFrameRefMode,
    /// ME-only mode enum
    MeOnlyMode,
    /// Pre-processing flag bitmask
    Preprocessing,
    /// Codec level code
    Level,
    /// Percentage
    Percentage,
    /// Macroblocks per second
    Throughput,
}

impl CapabilityShape {
    /// Shape of a capability id
    pub fn of(id: CapabilityId) -> Self {
        match id {
            CapabilityId::SUPPORTED_RATECONTROL_MODES => Self::RateControl,
            CapabilityId::SUPPORT_FIELD_ENCODING => Self::FieldEncoding,
            CapabilityId::SUPPORT_BFRAME_REF_MODE => Self::BFrameRefMode,
            CapabilityId::SUPPORT_MEONLY_MODE => Self::MeOnlyMode,
            CapabilityId::PREPROC_SUPPORT => Self::Preprocessing,
            CapabilityId::LEVEL_MAX | CapabilityId::LEVEL_MIN => Self::Level,
            CapabilityId::DYNAMIC_QUERY_ENCODER_CAPACITY => Self::Percentage,
            CapabilityId::MB_PER_SEC_MAX => Self::Throughput,
            CapabilityId::NUM_MAX_BFRAMES
            | CapabilityId::NUM_MAX_TEMPORAL_LAYERS
            | CapabilityId::WIDTH_MAX
            | CapabilityId::HEIGHT_MAX
            | CapabilityId::WIDTH_MIN
            | CapabilityId::HEIGHT_MIN
            | CapabilityId::MB_NUM_MAX
            | CapabilityId::NUM_MAX_LTR_FRAMES
            | CapabilityId::NUM_ENCODER_ENGINES => Self::Integer,
            _ => Self::Flag,
        }
    }

    /// Short label used by the catalog listing
    pub fn label(&self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Integer => "integer",
            Self::RateControl => "rate-control mask",
            Self::FieldEncoding => "field encoding",
            Self::BFrameRefMode => "b-ref mode",
            Self::MeOnlyMode => "me-only mode",
            Self::Preprocessing => "preproc mask",
            Self::Level => "level",
            Self::Percentage => "percent",
            Self::Throughput => "MB/s",
        }
    }
}

/// Decode one raw capability value for display
pub fn decode(codec: CodecId, id: CapabilityId, raw: i32) -> String {
    match CapabilityShape::of(id) {
        CapabilityShape::Flag => decode_flag(raw),
        CapabilityShape::Integer => decode_integer(raw),
        CapabilityShape::RateControl => decode_rate_control_modes(raw),
        CapabilityShape::FieldEncoding => decode_field_encoding(raw).to_string(),
        CapabilityShape::BFrameRefMode => decode_bframe_ref_mode(raw).to_string(),
        CapabilityShape::MeOnlyMode => decode_me_only_mode(raw).to_string(),
        CapabilityShape::Preprocessing => {
            format!("{} (0x{:x})", decode_preproc_flags(raw), raw)
        }
        CapabilityShape::Level => level_name(codec, raw),
        CapabilityShape::Percentage => decode_percentage(raw),
        CapabilityShape::Throughput => decode_throughput(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caps::catalog;

    #[test]
    fn test_flag_is_catch_all() {
        assert_eq!(CapabilityShape::of(CapabilityId::SUPPORT_CABAC), CapabilityShape::Flag);
        assert_eq!(CapabilityShape::of(CapabilityId(999)), CapabilityShape::Flag);
    }

    #[test]
    fn test_flag_capabilities_decode_as_flags() {
        for (id, _) in catalog::entries() {
            if CapabilityShape::of(id) != CapabilityShape::Flag {
                continue;
            }
            assert_eq!(decode(CodecId::H264, id, 0), "Not supported");
            assert_eq!(decode(CodecId::H264, id, 1), "Supported");
            assert_eq!(decode(CodecId::H264, id, 2), "2");
        }
    }

    #[test]
    fn test_integer_capabilities_are_verbatim() {
        assert_eq!(decode(CodecId::Hevc, CapabilityId::WIDTH_MAX, 8192), "8192");
        // Counts of 0/1 must not turn into "Supported"
        assert_eq!(decode(CodecId::Hevc, CapabilityId::NUM_ENCODER_ENGINES, 1), "1");
        assert_eq!(decode(CodecId::Hevc, CapabilityId::NUM_MAX_BFRAMES, 0), "0");
    }

    #[test]
    fn test_level_uses_codec_table() {
        assert_eq!(decode(CodecId::H264, CapabilityId::LEVEL_MAX, 51), "5.1 (51)");
        assert_eq!(decode(CodecId::Hevc, CapabilityId::LEVEL_MIN, 30), "1.0 (30)");
        assert_eq!(decode(CodecId::Av1, CapabilityId::LEVEL_MAX, 19), "6.3 (19)");
    }

    #[test]
    fn test_preprocessing_appends_raw_hex() {
        assert_eq!(
            decode(CodecId::H264, CapabilityId::PREPROC_SUPPORT, 0x11),
            "Denoise, Color Conversion (0x11)"
        );
        assert_eq!(
            decode(CodecId::H264, CapabilityId::PREPROC_SUPPORT, 0),
            "None (0x0)"
        );
    }

    #[test]
    fn test_special_shapes() {
        assert_eq!(
            decode(CodecId::H264, CapabilityId::SUPPORTED_RATECONTROL_MODES, 0b111),
            "CONSTQP, VBR, CBR"
        );
        assert_eq!(
            decode(CodecId::H264, CapabilityId::DYNAMIC_QUERY_ENCODER_CAPACITY, 100),
            "100%"
        );
        assert_eq!(
            decode(CodecId::H264, CapabilityId::MB_PER_SEC_MAX, 100_000),
            "100000 MB/s (~25.60 Mpix/s)"
        );
        assert_eq!(
            decode(CodecId::H264, CapabilityId::SUPPORT_MEONLY_MODE, 1),
            "Supported for I and P"
        );
    }
}
