// SPDX-License-Identifier: GPL-3.0-only

//! Fixture backend
//!
//! Replays a JSON capability dump so reports can be produced without an
//! NVIDIA GPU:
//!
//! ```json
//! {
//!   "device": "NVIDIA RTX A2000",
//!   "driver_version": 12040,
//!   "codecs": {
//!     "h264": { "16": 4096, "17": 4096, "28": 1 },
//!     "hevc": { "16": 8192 }
//!   }
//! }
//! ```
//!
//! A codec or capability missing from the dump is not applicable. Setting
//! `"fatal"` makes every query fail with that message instead.

use super::CapabilityBackend;
use crate::caps::{CapabilityId, CodecId};
use crate::errors::{BackendError, QueryError};
use crate::probe::{CapabilityQuery, DeviceInfo};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::{debug, trace};

#[derive(Debug, Deserialize)]
struct FixtureFile {
    device: Option<String>,
    #[serde(default)]
    driver_version: i32,
    fatal: Option<String>,
    #[serde(default)]
    codecs: BTreeMap<String, BTreeMap<String, i32>>,
}

/// Capability values read from a JSON dump
#[derive(Debug, Clone)]
pub struct FixtureBackend {
    device: Option<DeviceInfo>,
    fatal: Option<String>,
    values: HashMap<(CodecId, CapabilityId), i32>,
}

impl FixtureBackend {
    /// Read a fixture file
    pub fn from_path(path: &Path) -> Result<Self, BackendError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| BackendError::Fixture(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
            .map_err(|e| BackendError::Fixture(format!("{}: {}", path.display(), e)))
    }

    /// Parse fixture JSON
    pub fn from_json(text: &str) -> Result<Self, String> {
        let file: FixtureFile = serde_json::from_str(text).map_err(|e| e.to_string())?;

        let mut values = HashMap::new();
        for (codec_name, caps) in &file.codecs {
            let codec = CodecId::from_name(codec_name)
                .ok_or_else(|| format!("unknown codec '{}'", codec_name))?;
            for (id, &raw) in caps {
                let id: i32 = id
                    .trim()
                    .parse()
                    .map_err(|_| format!("invalid capability id '{}' for {}", id, codec_name))?;
                values.insert((codec, CapabilityId(id)), raw);
            }
        }

        debug!(
            entries = values.len(),
            device = file.device.as_deref().unwrap_or("<none>"),
            "Loaded fixture"
        );

        Ok(Self {
            device: file.device.map(|name| DeviceInfo {
                name,
                driver_version: file.driver_version,
            }),
            fatal: file.fatal,
            values,
        })
    }
}

impl CapabilityQuery for FixtureBackend {
    fn query(&mut self, codec: CodecId, cap: CapabilityId) -> Result<i32, QueryError> {
        if let Some(msg) = &self.fatal {
            return Err(QueryError::Fatal(msg.clone()));
        }
        let value = self.values.get(&(codec, cap)).copied();
        trace!(codec = %codec, capability = cap.raw(), ?value, "Fixture query");
        value.ok_or(QueryError::NotApplicable)
    }
}

impl CapabilityBackend for FixtureBackend {
    fn device_info(&self) -> Option<DeviceInfo> {
        self.device.clone()
    }
}
