// SPDX-License-Identifier: GPL-3.0-only

//! Encoder codec identifiers

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Encoding standard the accelerator may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CodecId {
    /// H.264/AVC
    #[serde(rename = "h264", alias = "H.264", alias = "H.264/AVC", alias = "avc")]
    H264,
    /// H.265/HEVC
    #[serde(rename = "hevc", alias = "HEVC", alias = "HEVC/H.265", alias = "h265")]
    Hevc,
    /// AV1
    #[serde(rename = "av1", alias = "AV1")]
    Av1,
}

impl CodecId {
    /// Candidate codecs in probe order
    pub const ALL: [CodecId; 3] = [CodecId::H264, CodecId::Hevc, CodecId::Av1];

    /// Name used in report headers
    pub fn display_name(&self) -> &'static str {
        match self {
            CodecId::H264 => "H.264/AVC",
            CodecId::Hevc => "HEVC/H.265",
            CodecId::Av1 => "AV1",
        }
    }

    /// Short lowercase identifier (CLI, config and JSON)
    pub fn short_name(&self) -> &'static str {
        match self {
            CodecId::H264 => "h264",
            CodecId::Hevc => "hevc",
            CodecId::Av1 => "av1",
        }
    }

    /// Parse a codec from any of its common spellings
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "h264" | "h.264" | "h.264/avc" | "avc" => Some(CodecId::H264),
            "hevc" | "h265" | "h.265" | "hevc/h.265" => Some(CodecId::Hevc),
            "av1" => Some(CodecId::Av1),
            _ => None,
        }
    }
}

impl fmt::Display for CodecId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for CodecId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CodecId::from_name(s).ok_or_else(|| format!("unknown codec '{}' (expected h264, hevc or av1)", s))
    }
}
