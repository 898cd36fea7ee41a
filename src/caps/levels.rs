// SPDX-License-Identifier: GPL-3.0-only

//! Codec level tables
//!
//! Maps the integer level codes reported for `LEVEL_MAX`/`LEVEL_MIN` to the
//! version strings used by each standard. H.264 and HEVC use sparse codes
//! (`level * 10` and `level * 30` respectively); AV1 uses a dense
//! zero-based enum with four sub-levels per major level.

use super::CodecId;
use std::borrow::Cow;

const H264_LEVELS: &[(i32, &str)] = &[
    (9, "1b"),
    (10, "1.0"),
    (11, "1.1"),
    (12, "1.2"),
    (13, "1.3"),
    (20, "2.0"),
    (21, "2.1"),
    (22, "2.2"),
    (30, "3.0"),
    (31, "3.1"),
    (32, "3.2"),
    (40, "4.0"),
    (41, "4.1"),
    (42, "4.2"),
    (50, "5.0"),
    (51, "5.1"),
    (52, "5.2"),
    (60, "6.0"),
    (61, "6.1"),
    (62, "6.2"),
];

const HEVC_LEVELS: &[(i32, &str)] = &[
    (30, "1.0"),
    (60, "2.0"),
    (63, "2.1"),
    (90, "3.0"),
    (93, "3.1"),
    (120, "4.0"),
    (123, "4.1"),
    (150, "5.0"),
    (153, "5.1"),
    (156, "5.2"),
    (180, "6.0"),
    (183, "6.1"),
    (186, "6.2"),
];

const AV1_LEVELS: &[&str] = &[
    "2.0", "2.1", "2.2", "2.3", //
    "3.0", "3.1", "3.2", "3.3", //
    "4.0", "4.1", "4.2", "4.3", //
    "5.0", "5.1", "5.2", "5.3", //
    "6.0", "6.1", "6.2", "6.3", //
    "7.0", "7.1", "7.2", "7.3",
];

/// Level lookup table for one codec
#[derive(Debug, Clone, Copy)]
pub enum LevelTable {
    /// Explicit `(code, version)` pairs
    Sparse(&'static [(i32, &'static str)]),
    /// Version at index `code`
    Dense(&'static [&'static str]),
}

impl LevelTable {
    /// Version string for a level code, if the table has one
    pub fn lookup(&self, code: i32) -> Option<&'static str> {
        match self {
            LevelTable::Sparse(pairs) => pairs
                .iter()
                .find(|(known, _)| *known == code)
                .map(|(_, version)| *version),
            LevelTable::Dense(versions) => usize::try_from(code)
                .ok()
                .and_then(|index| versions.get(index))
                .copied(),
        }
    }
}

/// Level table owned by a codec
pub fn level_table(codec: CodecId) -> Option<LevelTable> {
    match codec {
        CodecId::H264 => Some(LevelTable::Sparse(H264_LEVELS)),
        CodecId::Hevc => Some(LevelTable::Sparse(HEVC_LEVELS)),
        CodecId::Av1 => Some(LevelTable::Dense(AV1_LEVELS)),
    }
}

/// Version string for a level code, `Unknown(<code>)` when unmatched
pub fn level_version(codec: CodecId, code: i32) -> Cow<'static, str> {
    match level_table(codec).and_then(|table| table.lookup(code)) {
        Some(version) => Cow::Borrowed(version),
        None => Cow::Owned(format!("Unknown({})", code)),
    }
}

/// Level for display: the version followed by the raw code, e.g. `4.1 (41)`
pub fn level_name(codec: CodecId, code: i32) -> String {
    format!("{} ({})", level_version(codec, code), code)
}
