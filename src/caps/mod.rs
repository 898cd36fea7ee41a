// SPDX-License-Identifier: GPL-3.0-only

//! Capability decoding
//!
//! Turns a raw `(codec, capability, value)` triple read from the encoder
//! into display text.
//!
//! - [`catalog`]: capability id to display name
//! - [`decoders`]: one pure decoder per value shape
//! - [`levels`]: per-codec level tables
//! - [`dispatch`]: picks the decoder for a capability id

pub mod catalog;
pub mod codec;
pub mod decoders;
pub mod dispatch;
pub mod levels;

pub use codec::CodecId;
pub use dispatch::{CapabilityShape, decode};
pub use levels::level_name;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one queryable encoder property
///
/// Values mirror `NV_ENC_CAPS` from `nvEncodeAPI.h`. Any integer is
/// representable; ids outside the known set still decode (as flags) and
/// get a synthesized name from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapabilityId(pub i32);

impl CapabilityId {
    pub const NUM_MAX_BFRAMES: Self = Self(0);
    pub const SUPPORTED_RATECONTROL_MODES: Self = Self(1);
    pub const SUPPORT_FIELD_ENCODING: Self = Self(2);
    pub const SUPPORT_MONOCHROME: Self = Self(3);
    pub const SUPPORT_FMO: Self = Self(4);
    pub const SUPPORT_QPELMV: Self = Self(5);
    pub const SUPPORT_BDIRECT_MODE: Self = Self(6);
    pub const SUPPORT_CABAC: Self = Self(7);
    pub const SUPPORT_ADAPTIVE_TRANSFORM: Self = Self(8);
    pub const SUPPORT_STEREO_MVC: Self = Self(9);
    pub const NUM_MAX_TEMPORAL_LAYERS: Self = Self(10);
    pub const SUPPORT_HIERARCHICAL_PFRAMES: Self = Self(11);
    pub const SUPPORT_HIERARCHICAL_BFRAMES: Self = Self(12);
    pub const LEVEL_MAX: Self = Self(13);
    pub const LEVEL_MIN: Self = Self(14);
    pub const SEPARATE_COLOUR_PLANE: Self = Self(15);
    pub const WIDTH_MAX: Self = Self(16);
    pub const HEIGHT_MAX: Self = Self(17);
    pub const SUPPORT_TEMPORAL_SVC: Self = Self(18);
    pub const SUPPORT_DYN_RES_CHANGE: Self = Self(19);
    pub const SUPPORT_DYN_BITRATE_CHANGE: Self = Self(20);
    pub const SUPPORT_DYN_FORCE_CONSTQP: Self = Self(21);
    pub const SUPPORT_DYN_RCMODE_CHANGE: Self = Self(22);
    pub const SUPPORT_SUBFRAME_READBACK: Self = Self(23);
    pub const SUPPORT_CONSTRAINED_ENCODING: Self = Self(24);
    pub const SUPPORT_INTRA_REFRESH: Self = Self(25);
    pub const SUPPORT_CUSTOM_VBV_BUF_SIZE: Self = Self(26);
    pub const SUPPORT_DYNAMIC_SLICE_MODE: Self = Self(27);
    pub const SUPPORT_REF_PIC_INVALIDATION: Self = Self(28);
    pub const PREPROC_SUPPORT: Self = Self(29);
    pub const ASYNC_ENCODE_SUPPORT: Self = Self(30);
    pub const MB_NUM_MAX: Self = Self(31);
    pub const MB_PER_SEC_MAX: Self = Self(32);
    pub const SUPPORT_YUV444_ENCODE: Self = Self(33);
    pub const SUPPORT_LOSSLESS_ENCODE: Self = Self(34);
    pub const SUPPORT_SAO: Self = Self(35);
    pub const SUPPORT_MEONLY_MODE: Self = Self(36);
    pub const SUPPORT_LOOKAHEAD: Self = Self(37);
    pub const SUPPORT_TEMPORAL_AQ: Self = Self(38);
    pub const SUPPORT_10BIT_ENCODE: Self = Self(39);
    pub const NUM_MAX_LTR_FRAMES: Self = Self(40);
    pub const SUPPORT_WEIGHTED_PREDICTION: Self = Self(41);
    pub const DYNAMIC_QUERY_ENCODER_CAPACITY: Self = Self(42);
    pub const SUPPORT_BFRAME_REF_MODE: Self = Self(43);
    pub const SUPPORT_EMPHASIS_LEVEL_MAP: Self = Self(44);
    pub const WIDTH_MIN: Self = Self(45);
    pub const HEIGHT_MIN: Self = Self(46);
    pub const SUPPORT_MULTIPLE_REF_FRAMES: Self = Self(47);
    pub const SUPPORT_ALPHA_LAYER_ENCODING: Self = Self(48);
    pub const NUM_ENCODER_ENGINES: Self = Self(49);
    pub const SINGLE_SLICE_INTRA_REFRESH: Self = Self(50);
    pub const DISABLE_ENC_STATE_ADVANCE: Self = Self(51);
    pub const OUTPUT_RECON_SURFACE: Self = Self(52);
    pub const OUTPUT_BLOCK_STATS: Self = Self(53);
    pub const OUTPUT_ROW_STATS: Self = Self(54);

    /// Raw integer passed to the driver
    pub const fn raw(self) -> i32 {
        self.0
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CapabilityId {
    fn from(raw: i32) -> Self {
        Self(raw)
    }
}
