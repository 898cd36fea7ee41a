// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for codec probing

use nvenc_caps::caps::{CapabilityId, CodecId, catalog};
use nvenc_caps::probe::{LITMUS_CAPABILITY, probe_device};
use nvenc_caps::{CapabilityQuery, DeviceReport, ProbeOptions, QueryError};
use std::collections::HashSet;

/// Mock device that records every query it receives
struct RecordingDevice {
    unsupported: HashSet<CodecId>,
    not_applicable: HashSet<CapabilityId>,
    fatal_on: Option<CapabilityId>,
    calls: Vec<(CodecId, CapabilityId)>,
}

impl RecordingDevice {
    fn new() -> Self {
        Self {
            unsupported: HashSet::new(),
            not_applicable: HashSet::new(),
            fatal_on: None,
            calls: Vec::new(),
        }
    }

    fn without(mut self, codec: CodecId) -> Self {
        self.unsupported.insert(codec);
        self
    }

    fn calls_for(&self, codec: CodecId) -> Vec<CapabilityId> {
        self.calls
            .iter()
            .filter(|(c, _)| *c == codec)
            .map(|(_, id)| *id)
            .collect()
    }
}

impl CapabilityQuery for RecordingDevice {
    fn query(&mut self, codec: CodecId, cap: CapabilityId) -> Result<i32, QueryError> {
        self.calls.push((codec, cap));
        if self.unsupported.contains(&codec) || self.not_applicable.contains(&cap) {
            return Err(QueryError::NotApplicable);
        }
        if self.fatal_on == Some(cap) {
            return Err(QueryError::Fatal("GPU fell off the bus".to_string()));
        }
        Ok(1)
    }
}

#[test]
fn test_unsupported_codec_gets_only_the_litmus_query() {
    let mut device = RecordingDevice::new().without(CodecId::Hevc);
    let reports = probe_device(&mut device, &ProbeOptions::default()).unwrap();

    let codecs: Vec<CodecId> = reports.iter().map(|r| r.codec).collect();
    assert_eq!(codecs, vec![CodecId::H264, CodecId::Av1]);
    assert_eq!(device.calls_for(CodecId::Hevc), vec![LITMUS_CAPABILITY]);
}

#[test]
fn test_supported_codec_has_one_line_per_catalog_entry() {
    let mut device = RecordingDevice::new();
    let options = ProbeOptions {
        codecs: vec![CodecId::Av1],
        ..ProbeOptions::default()
    };
    let reports = probe_device(&mut device, &options).unwrap();
    assert_eq!(reports.len(), 1);

    let ids: Vec<CapabilityId> = reports[0].capabilities.iter().map(|l| l.id).collect();
    let expected: Vec<CapabilityId> = catalog::entries().map(|(id, _)| id).collect();
    assert_eq!(ids, expected);

    let names: Vec<&str> = reports[0]
        .capabilities
        .iter()
        .map(|l| l.name.as_str())
        .collect();
    let expected_names: Vec<&str> = catalog::entries().map(|(_, name)| name).collect();
    assert_eq!(names, expected_names);
}

#[test]
fn test_not_applicable_capability_is_skipped() {
    let mut device = RecordingDevice::new();
    device.not_applicable.insert(CapabilityId::SUPPORT_CABAC);
    let options = ProbeOptions {
        codecs: vec![CodecId::Hevc],
        ..ProbeOptions::default()
    };
    let reports = probe_device(&mut device, &options).unwrap();
    assert_eq!(reports[0].capabilities.len(), catalog::len() - 1);
}

#[test]
fn test_extra_ids_are_swept_after_catalog() {
    let mut device = RecordingDevice::new();
    let options = ProbeOptions {
        codecs: vec![CodecId::H264],
        extra_capability_ids: 2,
    };
    let reports = probe_device(&mut device, &options).unwrap();
    let lines = &reports[0].capabilities;
    assert_eq!(lines.len(), catalog::len() + 2);
    assert_eq!(lines[lines.len() - 2].name, "CAP_55");
    assert_eq!(lines[lines.len() - 1].name, "CAP_56");
    assert_eq!(lines[lines.len() - 1].decoded, "Supported");
}

#[test]
fn test_no_supported_codec_report() {
    let mut device = RecordingDevice::new()
        .without(CodecId::H264)
        .without(CodecId::Hevc)
        .without(CodecId::Av1);
    let codecs = probe_device(&mut device, &ProbeOptions::default()).unwrap();
    assert_eq!(device.calls.len(), 3);

    let report = DeviceReport {
        device: None,
        codecs,
    };
    assert!(report.is_empty());
    assert_eq!(report.render_text(38), "No supported codec\n");
}

#[test]
fn test_fatal_sweep_error_stops_probing() {
    let mut device = RecordingDevice::new();
    device.fatal_on = Some(CapabilityId::SUPPORT_10BIT_ENCODE);
    let err = probe_device(&mut device, &ProbeOptions::default()).unwrap_err();
    assert_eq!(err, QueryError::Fatal("GPU fell off the bus".to_string()));
    // Nothing is asked of later codecs once the device has failed
    assert!(device.calls_for(CodecId::Hevc).is_empty());
    assert!(device.calls_for(CodecId::Av1).is_empty());
}

#[test]
fn test_report_text_layout() {
    let mut device = |codec: CodecId, cap: CapabilityId| match (codec, cap) {
        (CodecId::H264, CapabilityId::WIDTH_MAX) => Ok(4096),
        (CodecId::H264, CapabilityId::LEVEL_MAX) => Ok(51),
        _ => Err(QueryError::NotApplicable),
    };
    let codecs = probe_device(&mut device, &ProbeOptions::default()).unwrap();
    let report = DeviceReport {
        device: None,
        codecs,
    };

    let expected = format!(
        "\n=== Codec: H.264/AVC ===\n  - {:<38} : 5.1 (51)\n  - {:<38} : 4096\n",
        "Max Level", "Max Width"
    );
    assert_eq!(report.render_text(38), expected);
}
