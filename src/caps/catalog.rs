// SPDX-License-Identifier: GPL-3.0-only

//! Capability catalog: id to display name
//!
//! The table is sorted by id. That order is also the order in which a
//! codec's capabilities are queried and printed.

use super::CapabilityId;
use std::borrow::Cow;

static CATALOG: [(CapabilityId, &str); 55] = [
    (CapabilityId::NUM_MAX_BFRAMES, "Max B-Frames"),
    (CapabilityId::SUPPORTED_RATECONTROL_MODES, "Supported Rate Control Modes"),
    (CapabilityId::SUPPORT_FIELD_ENCODING, "Field Encoding"),
    (CapabilityId::SUPPORT_MONOCHROME, "Monochrome Encode"),
    (CapabilityId::SUPPORT_FMO, "FMO"),
    (CapabilityId::SUPPORT_QPELMV, "Quarter-Pel ME"),
    (CapabilityId::SUPPORT_BDIRECT_MODE, "BDirect Mode (H.264)"),
    (CapabilityId::SUPPORT_CABAC, "CABAC (H.264)"),
    (CapabilityId::SUPPORT_ADAPTIVE_TRANSFORM, "Adaptive Transform"),
    (CapabilityId::SUPPORT_STEREO_MVC, "Stereo MVC"),
    (CapabilityId::NUM_MAX_TEMPORAL_LAYERS, "Max Temporal Layers (or support flag)"),
    (CapabilityId::SUPPORT_HIERARCHICAL_PFRAMES, "Hierarchical P-Frames"),
    (CapabilityId::SUPPORT_HIERARCHICAL_BFRAMES, "Hierarchical B-Frames"),
    (CapabilityId::LEVEL_MAX, "Max Level"),
    (CapabilityId::LEVEL_MIN, "Min Level"),
    (CapabilityId::SEPARATE_COLOUR_PLANE, "Separate Color Plane"),
    (CapabilityId::WIDTH_MAX, "Max Width"),
    (CapabilityId::HEIGHT_MAX, "Max Height"),
    (CapabilityId::SUPPORT_TEMPORAL_SVC, "Temporal SVC"),
    (CapabilityId::SUPPORT_DYN_RES_CHANGE, "Dynamic Resolution Change"),
    (CapabilityId::SUPPORT_DYN_BITRATE_CHANGE, "Dynamic Bitrate Change"),
    (CapabilityId::SUPPORT_DYN_FORCE_CONSTQP, "Dynamic Force CONSTQP"),
    (CapabilityId::SUPPORT_DYN_RCMODE_CHANGE, "Dynamic RC Mode Change"),
    (CapabilityId::SUPPORT_SUBFRAME_READBACK, "Subframe Readback"),
    (CapabilityId::SUPPORT_CONSTRAINED_ENCODING, "Constrained Encoding"),
    (CapabilityId::SUPPORT_INTRA_REFRESH, "Intra Refresh"),
    (CapabilityId::SUPPORT_CUSTOM_VBV_BUF_SIZE, "Custom VBV Buffer Size"),
    (CapabilityId::SUPPORT_DYNAMIC_SLICE_MODE, "Dynamic Slice Mode"),
    (CapabilityId::SUPPORT_REF_PIC_INVALIDATION, "Reference Picture Invalidation"),
    (CapabilityId::PREPROC_SUPPORT, "Pre-Processing (bitmask)"),
    (CapabilityId::ASYNC_ENCODE_SUPPORT, "Async Encode"),
    (CapabilityId::MB_NUM_MAX, "Max Macroblocks per Frame"),
    (CapabilityId::MB_PER_SEC_MAX, "Max Macroblocks per Second"),
    (CapabilityId::SUPPORT_YUV444_ENCODE, "YUV444 Encode"),
    (CapabilityId::SUPPORT_LOSSLESS_ENCODE, "Lossless Encode"),
    (CapabilityId::SUPPORT_SAO, "Sample Adaptive Offset (HEVC)"),
    (CapabilityId::SUPPORT_MEONLY_MODE, "ME Only Mode"),
    (CapabilityId::SUPPORT_LOOKAHEAD, "Lookahead"),
    (CapabilityId::SUPPORT_TEMPORAL_AQ, "Temporal AQ"),
    (CapabilityId::SUPPORT_10BIT_ENCODE, "10-bit Encode"),
    (CapabilityId::NUM_MAX_LTR_FRAMES, "Max LTR Frames"),
    (CapabilityId::SUPPORT_WEIGHTED_PREDICTION, "Weighted Prediction"),
    (CapabilityId::DYNAMIC_QUERY_ENCODER_CAPACITY, "Dynamic Encoder Capacity (%)"),
    (CapabilityId::SUPPORT_BFRAME_REF_MODE, "B-frame as Reference"),
    (CapabilityId::SUPPORT_EMPHASIS_LEVEL_MAP, "Emphasis Level Map"),
    (CapabilityId::WIDTH_MIN, "Min Width"),
    (CapabilityId::HEIGHT_MIN, "Min Height"),
    (CapabilityId::SUPPORT_MULTIPLE_REF_FRAMES, "Multiple Reference Frames"),
    (CapabilityId::SUPPORT_ALPHA_LAYER_ENCODING, "HEVC Alpha Layer Encode"),
    (CapabilityId::NUM_ENCODER_ENGINES, "Number of Encoder Engines"),
    (CapabilityId::SINGLE_SLICE_INTRA_REFRESH, "Single Slice Intra Refresh"),
    (CapabilityId::DISABLE_ENC_STATE_ADVANCE, "Disable Encoder State Advance"),
    (CapabilityId::OUTPUT_RECON_SURFACE, "Reconstructed Frame Output"),
    (CapabilityId::OUTPUT_BLOCK_STATS, "Output Block Stats"),
    (CapabilityId::OUTPUT_ROW_STATS, "Output Row Stats"),
];

/// Display name for a capability id
///
/// Never fails: ids outside the catalog get a synthesized `CAP_<id>` name.
pub fn name_of(id: CapabilityId) -> Cow<'static, str> {
    match lookup(id) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("CAP_{}", id.raw())),
    }
}

/// Catalog name for a known id
pub fn lookup(id: CapabilityId) -> Option<&'static str> {
    CATALOG
        .binary_search_by_key(&id, |(known, _)| *known)
        .ok()
        .map(|index| CATALOG[index].1)
}

/// Whether the id is part of the compiled-in catalog
pub fn is_known(id: CapabilityId) -> bool {
    lookup(id).is_some()
}

/// All catalog entries in catalog order
pub fn entries() -> impl Iterator<Item = (CapabilityId, &'static str)> {
    CATALOG.iter().copied()
}

/// Number of known capabilities
pub fn len() -> usize {
    CATALOG.len()
}

/// Ids to query for one codec
///
/// The full catalog, followed by `extra` further ids past the last known
/// one. Drivers newer than the catalog expose additional capabilities;
/// those show up under their synthesized names.
pub fn sweep_ids(extra: u32) -> impl Iterator<Item = CapabilityId> {
    let next = CATALOG[CATALOG.len() - 1].0.raw() + 1;
    let extra = i32::try_from(extra).unwrap_or(i32::MAX - next);
    entries()
        .map(|(id, _)| id)
        .chain((next..next.saturating_add(extra)).map(CapabilityId))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_is_sorted_and_dense() {
        for (index, (id, _)) in entries().enumerate() {
            assert_eq!(id.raw(), index as i32);
        }
    }

    #[test]
    fn test_known_name() {
        assert_eq!(name_of(CapabilityId::WIDTH_MAX), "Max Width");
        assert_eq!(name_of(CapabilityId::OUTPUT_ROW_STATS), "Output Row Stats");
    }

    #[test]
    fn test_unknown_name_is_synthesized() {
        assert_eq!(name_of(CapabilityId(55)), "CAP_55");
        assert_eq!(name_of(CapabilityId(-3)), "CAP_-3");
        assert!(!is_known(CapabilityId(1000)));
    }

    #[test]
    fn test_sweep_ids_extends_past_catalog() {
        let ids: Vec<_> = sweep_ids(3).collect();
        assert_eq!(ids.len(), len() + 3);
        assert_eq!(ids[len()], CapabilityId(55));
        assert_eq!(ids[len() + 2], CapabilityId(57));

        assert_eq!(sweep_ids(0).count(), len());
    }
}
