// SPDX-License-Identifier: GPL-3.0-only

//! Probe results and their text/JSON rendering

use crate::caps::{CapabilityId, CodecId};
use crate::constants::NO_SUPPORTED_CODEC;
use serde::Serialize;
use std::fmt::Write;

/// One decoded capability
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityLine {
    pub id: CapabilityId,
    pub name: String,
    pub raw: i32,
    pub decoded: String,
}

/// Decoded capabilities of one supported codec, in query order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodecReport {
    pub codec: CodecId,
    pub capabilities: Vec<CapabilityLine>,
}

impl CodecReport {
    /// Section header line
    pub fn header(&self) -> String {
        format!("=== Codec: {} ===", self.codec.display_name())
    }

    /// Capability lines with the name column padded to `name_width`
    pub fn lines(&self, name_width: usize) -> impl Iterator<Item = String> + '_ {
        self.capabilities.iter().map(move |line| {
            format!("  - {:<width$} : {}", line.name, line.decoded, width = name_width)
        })
    }
}

/// Device the capabilities were read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    /// GPU name as reported by the driver
    pub name: String,
    /// CUDA driver version (e.g. 12040 for 12.4)
    pub driver_version: i32,
}

/// Full probe result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceReport {
    pub device: Option<DeviceInfo>,
    pub codecs: Vec<CodecReport>,
}

impl DeviceReport {
    /// True when no probed codec is supported
    pub fn is_empty(&self) -> bool {
        self.codecs.is_empty()
    }

    /// Human-readable report
    ///
    /// Each codec section starts with a blank line and a header. A device
    /// with no supported codec renders as the single line
    /// `No supported codec`.
    pub fn render_text(&self, name_width: usize) -> String {
        let mut out = String::new();

        if let Some(device) = &self.device {
            let _ = writeln!(
                out,
                "GPU: {} | CUDA driver: {}",
                device.name, device.driver_version
            );
        }

        if self.codecs.is_empty() {
            let _ = writeln!(out, "{}", NO_SUPPORTED_CODEC);
            return out;
        }

        for codec in &self.codecs {
            let _ = writeln!(out);
            let _ = writeln!(out, "{}", codec.header());
            for line in codec.lines(name_width) {
                let _ = writeln!(out, "{}", line);
            }
        }

        out
    }

    /// Pretty-printed JSON report
    ///
    /// A device with no supported codec also carries
    /// `"result": "No supported codec"`.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonReport {
            report: self,
            result: self.is_empty().then_some(NO_SUPPORTED_CODEC),
        })
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    report: &'a DeviceReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_codec() -> CodecReport {
        CodecReport {
            codec: CodecId::H264,
            capabilities: vec![CapabilityLine {
                id: CapabilityId::WIDTH_MAX,
                name: "Max Width".to_string(),
                raw: 4096,
                decoded: "4096".to_string(),
            }],
        }
    }

    #[test]
    fn test_line_format() {
        let codec = sample_codec();
        let lines: Vec<String> = codec.lines(12).collect();
        assert_eq!(lines, vec!["  - Max Width    : 4096".to_string()]);
    }

    #[test]
    fn test_render_with_device_header() {
        let report = DeviceReport {
            device: Some(DeviceInfo {
                name: "Quadro P400".to_string(),
                driver_version: 12040,
            }),
            codecs: vec![sample_codec()],
        };
        let text = report.render_text(38);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "GPU: Quadro P400 | CUDA driver: 12040");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "=== Codec: H.264/AVC ===");
        assert!(lines[3].starts_with("  - Max Width"));
        assert!(lines[3].ends_with(" : 4096"));
    }

    #[test]
    fn test_render_empty() {
        let report = DeviceReport {
            device: None,
            codecs: Vec::new(),
        };
        assert_eq!(report.render_text(38), "No supported codec\n");
    }

    #[test]
    fn test_json_shape() {
        let report = DeviceReport {
            device: None,
            codecs: vec![sample_codec()],
        };
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["device"], serde_json::Value::Null);
        assert_eq!(value["codecs"][0]["codec"], "h264");
        assert_eq!(value["codecs"][0]["capabilities"][0]["id"], 16);
        assert_eq!(value["codecs"][0]["capabilities"][0]["raw"], 4096);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_json_empty_report_states_result() {
        let report = DeviceReport {
            device: None,
            codecs: Vec::new(),
        };
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["result"], "No supported codec");
        assert_eq!(value["codecs"], serde_json::json!([]));
    }
}
