// SPDX-License-Identifier: GPL-3.0-only

//! Value decoders
//!
//! One pure function per capability shape. None of them can fail: values
//! outside a decoder's known range come back as "Unknown" or verbatim.

use crate::constants::MACROBLOCK_PIXELS;

// NV_ENC_PARAMS_RC_MODE values; the caps bitmask sets bit (1 << mode)
const RC_CONSTQP: u32 = 0x0;
const RC_VBR: u32 = 0x1;
const RC_CBR: u32 = 0x2;

const RATE_CONTROL_MODES: [(i32, &str); 3] = [
    (1 << RC_CONSTQP, "CONSTQP"),
    (1 << RC_VBR, "VBR"),
    (1 << RC_CBR, "CBR"),
];

/// Pre-processing flag names by bit position
///
/// An approximation: the meaning of these bits has moved between Video
/// Codec SDK releases, bit 3 in particular. Treat the names as a reading
/// aid, not as the authoritative SDK definition.
pub const PREPROC_FLAGS: [(u32, &str); 5] = [
    (0, "Denoise"),
    (1, "Resize"),
    (2, "Deinterlace"),
    (3, "Adaptive Transform/EdgeEnhance"),
    (4, "Color Conversion"),
];

/// 0/1 flag; any other value is printed as-is
pub fn decode_flag(value: i32) -> String {
    match value {
        0 => "Not supported".to_string(),
        1 => "Supported".to_string(),
        other => other.to_string(),
    }
}

/// Plain bound or count
pub fn decode_integer(value: i32) -> String {
    value.to_string()
}

/// Supported rate-control modes, in CONSTQP, VBR, CBR order
///
/// Bits other than the three known modes are ignored.
pub fn decode_rate_control_modes(mask: i32) -> String {
    let names: Vec<&str> = RATE_CONTROL_MODES
        .iter()
        .filter(|(bit, _)| mask & bit != 0)
        .map(|(_, name)| *name)
        .collect();

    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}

/// Interlaced (field) encoding support level
pub fn decode_field_encoding(value: i32) -> &'static str {
    match value {
        0 => "Interlaced: not supported",
        1 => "Interlaced field: supported",
        2 => "Interlaced frame + field: supported",
        _ => "Unknown",
    }
}

/// B-frames as reference support level
pub fn decode_bframe_ref_mode(value: i32) -> &'static str {
    match value {
        0 => "Not supported",
        1 => "Each B-frame can be reference",
        2 => "Only middle B-frame as reference",
        _ => "Unknown",
    }
}

/// Motion-estimation-only mode support level
pub fn decode_me_only_mode(value: i32) -> &'static str {
    match value {
        0 => "Not supported",
        1 => "Supported for I and P",
        2 => "Supported for I, P and B",
        _ => "Unknown",
    }
}

/// Pre-processing flags
///
/// Known bits are named in bit order; any remaining bits are collected
/// into a single `Other(0x..)` term. See [`PREPROC_FLAGS`] for the caveat
/// on the bit names.
pub fn decode_preproc_flags(mask: i32) -> String {
    if mask == 0 {
        return "None".to_string();
    }

    let mut parts: Vec<String> = PREPROC_FLAGS
        .iter()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .map(|(_, name)| name.to_string())
        .collect();

    let known = PREPROC_FLAGS
        .iter()
        .fold(0i32, |acc, (bit, _)| acc | (1 << bit));
    let unknown = mask & !known;
    if unknown != 0 {
        parts.push(format!("Other(0x{:x})", unknown));
    }

    parts.join(", ")
}

/// Percentage value
pub fn decode_percentage(value: i32) -> String {
    format!("{}%", value)
}

/// Approximate pixel rate in millions of pixels per second
pub fn megapixels_per_second(macroblocks_per_second: i32) -> f64 {
    (i64::from(macroblocks_per_second) * MACROBLOCK_PIXELS) as f64 / 1e6
}

/// Macroblock throughput with the derived pixel rate
pub fn decode_throughput(macroblocks_per_second: i32) -> String {
    format!(
        "{} MB/s (~{:.2} Mpix/s)",
        macroblocks_per_second,
        megapixels_per_second(macroblocks_per_second)
    )
}
