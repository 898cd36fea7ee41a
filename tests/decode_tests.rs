// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for capability decoding

use nvenc_caps::caps::decoders::{
    PREPROC_FLAGS, decode_preproc_flags, decode_rate_control_modes, decode_throughput,
};
use nvenc_caps::caps::{CapabilityId, CapabilityShape, CodecId, catalog, decode, level_name};

#[test]
fn test_generic_capabilities_decode_as_flags() {
    for codec in CodecId::ALL {
        for id in (0..80).map(CapabilityId) {
            if CapabilityShape::of(id) != CapabilityShape::Flag {
                continue;
            }
            assert_eq!(decode(codec, id, 0), "Not supported", "id {}", id);
            assert_eq!(decode(codec, id, 1), "Supported", "id {}", id);
            assert_eq!(decode(codec, id, 2), "2", "id {}", id);
        }
    }
}

#[test]
fn test_rate_control_modes() {
    assert_eq!(decode_rate_control_modes(0), "None");
    assert_eq!(decode_rate_control_modes(0b100), "CBR");
    assert_eq!(decode_rate_control_modes(0b011), "CONSTQP, VBR");
    // Unknown high bits are ignored
    assert_eq!(decode_rate_control_modes(0b110 | 0x100), "VBR, CBR");
}

#[test]
fn test_level_names() {
    assert_eq!(level_name(CodecId::H264, 41), "4.1 (41)");
    assert_eq!(level_name(CodecId::Hevc, 63), "2.1 (63)");
    assert_eq!(level_name(CodecId::Av1, 0), "2.0 (0)");
    assert_eq!(level_name(CodecId::H264, 999), "Unknown(999) (999)");
    assert_eq!(level_name(CodecId::Av1, -1), "Unknown(-1) (-1)");
    assert_eq!(level_name(CodecId::Av1, 24), "Unknown(24) (24)");
}

#[test]
fn test_throughput() {
    assert_eq!(decode_throughput(100_000), "100000 MB/s (~25.60 Mpix/s)");
    assert_eq!(decode_throughput(0), "0 MB/s (~0.00 Mpix/s)");
    // No overflow at the top of the range
    assert!(decode_throughput(i32::MAX).starts_with("2147483647 MB/s (~549755.81"));
}

#[test]
fn test_preprocessing_flags() {
    assert_eq!(decode_preproc_flags(0b10001), "Denoise, Color Conversion");
    assert_eq!(decode_preproc_flags(0x80), "Other(0x80)");
    assert_eq!(decode_preproc_flags(0), "None");
    assert_eq!(decode_preproc_flags(0b11 | 0x40), "Denoise, Resize, Other(0x40)");
}

#[test]
fn test_preprocessing_table_covers_low_five_bits() {
    // Bit names are an approximation that varies by SDK release; only the
    // bit positions are fixed here.
    let bits: Vec<u32> = PREPROC_FLAGS.iter().map(|(bit, _)| *bit).collect();
    assert_eq!(bits, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_every_catalog_entry_decodes() {
    for codec in CodecId::ALL {
        for (id, _) in catalog::entries() {
            for raw in [-1, 0, 1, 2, 255, i32::MAX] {
                assert!(!decode(codec, id, raw).is_empty());
            }
        }
    }
}

#[test]
fn test_unknown_ids_get_synthesized_names() {
    assert_eq!(catalog::name_of(CapabilityId(55)), "CAP_55");
    assert_eq!(catalog::name_of(CapabilityId(-3)), "CAP_-3");
    assert_eq!(catalog::name_of(CapabilityId::WIDTH_MAX), "Max Width");
}
