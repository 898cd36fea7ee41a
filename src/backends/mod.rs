// SPDX-License-Identifier: GPL-3.0-only

//! Capability backends
//!
//! A backend answers raw capability queries for the prober.
//!
//! ```text
//! ┌─────────────────────┐
//! │  probe_device()     │
//! └──────────┬──────────┘
//!            │ CapabilityQuery
//!            ▼
//! ┌─────────────────────┐
//! │ CapabilityBackend   │
//! └──────────┬──────────┘
//!       ┌────┴─────┐
//!       ▼          ▼
//!   ┌───────┐  ┌────────┐
//!   │ NVENC │  │Fixture │
//!   └───────┘  └────────┘
//! ```

pub mod fixture;
pub mod nvenc;

pub use fixture::FixtureBackend;
pub use nvenc::NvencBackend;

use crate::config::Config;
use crate::errors::{BackendError, QueryError};
use crate::probe::{CapabilityQuery, DeviceInfo, DeviceReport, ProbeOptions, probe_device};
use std::path::PathBuf;
use tracing::info;

/// Capability source that can also describe the device behind it
pub trait CapabilityBackend: CapabilityQuery {
    /// Device name and driver version, if known
    fn device_info(&self) -> Option<DeviceInfo>;
}

/// Where capability values come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSource {
    /// Live NVENC session on a CUDA device
    Hardware { device: usize },
    /// JSON capability dump
    Fixture(PathBuf),
}

impl BackendSource {
    /// Fixture if one is given, otherwise the configured hardware device
    pub fn select(fixture: Option<PathBuf>, device: Option<usize>, config: &Config) -> Self {
        match fixture {
            Some(path) => BackendSource::Fixture(path),
            None => BackendSource::Hardware {
                device: device.unwrap_or(config.device),
            },
        }
    }
}

/// Open the backend for a source
pub fn open_backend(
    source: &BackendSource,
    config: &Config,
) -> Result<Box<dyn CapabilityBackend>, BackendError> {
    match source {
        BackendSource::Hardware { device } => {
            info!(device, "Opening NVENC backend");
            let backend = NvencBackend::open(
                *device,
                config.cuda_library.as_deref(),
                config.nvenc_library.as_deref(),
            )?;
            Ok(Box::new(backend))
        }
        BackendSource::Fixture(path) => {
            info!(path = %path.display(), "Opening fixture backend");
            Ok(Box::new(FixtureBackend::from_path(path)?))
        }
    }
}

/// Probe a backend and attach its device description
pub fn probe_backend(
    backend: &mut dyn CapabilityBackend,
    options: &ProbeOptions,
) -> Result<DeviceReport, QueryError> {
    let codecs = probe_device(backend, options)?;
    Ok(DeviceReport {
        device: backend.device_info(),
        codecs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_takes_precedence() {
        let config = Config::default();
        let source = BackendSource::select(Some(PathBuf::from("caps.json")), Some(3), &config);
        assert_eq!(source, BackendSource::Fixture(PathBuf::from("caps.json")));
    }

    #[test]
    fn test_device_falls_back_to_config() {
        let config = Config {
            device: 2,
            ..Config::default()
        };
        assert_eq!(
            BackendSource::select(None, None, &config),
            BackendSource::Hardware { device: 2 }
        );
        assert_eq!(
            BackendSource::select(None, Some(0), &config),
            BackendSource::Hardware { device: 0 }
        );
    }

    #[test]
    fn test_probe_backend_attaches_device() {
        let mut backend = FixtureBackend::from_json(
            r#"{ "device": "Test GPU", "driver_version": 12020, "codecs": { "av1": { "16": 8192 } } }"#,
        )
        .unwrap();
        let report = probe_backend(&mut backend, &ProbeOptions::default()).unwrap();
        assert_eq!(report.device.unwrap().name, "Test GPU");
        assert_eq!(report.codecs.len(), 1);
        assert_eq!(report.codecs[0].codec, crate::caps::CodecId::Av1);
        assert_eq!(report.codecs[0].capabilities.len(), 1);
    }
}
