// SPDX-License-Identifier: GPL-3.0-only

//! Codec support probing
//!
//! A codec is reported only if it answers a single litmus query
//! ([`LITMUS_CAPABILITY`]). Supported codecs then have every catalog entry
//! read and decoded.
//!
//! Failure handling is split by kind. [`QueryError::NotApplicable`] skips
//! one codec (during the litmus probe) or one capability (during the sweep).
//! [`QueryError::Fatal`] stops probing and is returned to the caller.

pub mod report;

pub use report::{CapabilityLine, CodecReport, DeviceInfo, DeviceReport};

use crate::caps::{CapabilityId, CodecId, catalog, decode};
use crate::errors::QueryError;
use tracing::{debug, info, warn};

/// Capability queried to decide whether a codec is supported at all
pub const LITMUS_CAPABILITY: CapabilityId = CapabilityId::WIDTH_MAX;

/// Source of raw capability values
///
/// Implemented by the hardware and fixture backends. Closures of the same
/// shape also implement it, which keeps tests small.
pub trait CapabilityQuery {
    /// Read the raw value of one capability for one codec
    fn query(&mut self, codec: CodecId, cap: CapabilityId) -> Result<i32, QueryError>;
}

impl<F> CapabilityQuery for F
where
    F: FnMut(CodecId, CapabilityId) -> Result<i32, QueryError>,
{
    fn query(&mut self, codec: CodecId, cap: CapabilityId) -> Result<i32, QueryError> {
        self(codec, cap)
    }
}

/// What to probe and how far to sweep
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    /// Candidate codecs, in report order
    pub codecs: Vec<CodecId>,
    /// Ids past the end of the catalog to query as well
    pub extra_capability_ids: u32,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            codecs: CodecId::ALL.to_vec(),
            extra_capability_ids: 0,
        }
    }
}

/// Run the litmus probe for one codec
///
/// `Ok(false)` means the device does not support the codec.
pub fn is_codec_supported<Q>(query: &mut Q, codec: CodecId) -> Result<bool, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    match query.query(codec, LITMUS_CAPABILITY) {
        Ok(_) => Ok(true),
        Err(e) if e.is_not_applicable() => {
            debug!(codec = %codec, "Codec not supported on this device");
            Ok(false)
        }
        Err(e) => {
            warn!(codec = %codec, error = %e, "Litmus probe failed");
            Err(e)
        }
    }
}

/// Candidate codecs that pass the litmus probe, in candidate order
pub fn supported_codecs<Q>(query: &mut Q, candidates: &[CodecId]) -> Result<Vec<CodecId>, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    let mut supported = Vec::new();
    for &codec in candidates {
        if is_codec_supported(query, codec)? {
            supported.push(codec);
        }
    }
    Ok(supported)
}

/// Query and decode every capability in `ids` for one codec
///
/// Capabilities that do not apply to the codec are left out of the report.
pub fn sweep_codec<Q, I>(query: &mut Q, codec: CodecId, ids: I) -> Result<CodecReport, QueryError>
where
    Q: CapabilityQuery + ?Sized,
    I: IntoIterator<Item = CapabilityId>,
{
    let mut capabilities = Vec::new();

    for id in ids {
        match query.query(codec, id) {
            Ok(raw) => capabilities.push(CapabilityLine {
                id,
                name: catalog::name_of(id).into_owned(),
                raw,
                decoded: decode(codec, id, raw),
            }),
            Err(e) if e.is_not_applicable() => {
                debug!(codec = %codec, capability = id.raw(), "Capability does not apply");
            }
            Err(e) => {
                warn!(codec = %codec, capability = id.raw(), error = %e, "Capability query failed");
                return Err(e);
            }
        }
    }

    Ok(CodecReport {
        codec,
        capabilities,
    })
}

/// Probe every candidate codec and sweep the supported ones
///
/// Each codec is probed and, if supported, swept before the next codec is
/// probed. Unsupported codecs receive exactly one query.
///
/// Returns the per-codec reports only; a plain query has no device to
/// describe. `backends::probe_backend` pairs them with the backend's
/// [`DeviceInfo`] into a [`DeviceReport`].
pub fn probe_device<Q>(query: &mut Q, options: &ProbeOptions) -> Result<Vec<CodecReport>, QueryError>
where
    Q: CapabilityQuery + ?Sized,
{
    let mut reports = Vec::new();

    for &codec in &options.codecs {
        if !is_codec_supported(query, codec)? {
            continue;
        }
        let ids = catalog::sweep_ids(options.extra_capability_ids);
        reports.push(sweep_codec(query, codec, ids)?);
    }

    info!("Found {} supported codec(s)", reports.len());
    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_implements_query() {
        let mut query =
            |_codec: CodecId, cap: CapabilityId| -> Result<i32, QueryError> { Ok(cap.raw()) };
        assert_eq!(query.query(CodecId::Av1, CapabilityId(7)), Ok(7));
    }

    #[test]
    fn test_litmus_not_applicable_excludes_codec() {
        let mut query = |codec: CodecId, _cap: CapabilityId| match codec {
            CodecId::Hevc => Err(QueryError::NotApplicable),
            _ => Ok(4096),
        };
        let codecs = supported_codecs(&mut query, &CodecId::ALL).unwrap();
        assert_eq!(codecs, vec![CodecId::H264, CodecId::Av1]);
    }

    #[test]
    fn test_litmus_fatal_propagates() {
        let mut query = |_codec: CodecId, _cap: CapabilityId| -> Result<i32, QueryError> {
            Err(QueryError::Fatal("device lost".into()))
        };
        let err = supported_codecs(&mut query, &CodecId::ALL).unwrap_err();
        assert_eq!(err, QueryError::Fatal("device lost".into()));
    }

    #[test]
    fn test_sweep_skips_not_applicable() {
        let mut query = |_codec: CodecId, cap: CapabilityId| {
            if cap == CapabilityId::SUPPORT_CABAC {
                Err(QueryError::NotApplicable)
            } else {
                Ok(1)
            }
        };
        let report = sweep_codec(&mut query, CodecId::Hevc, catalog::sweep_ids(0)).unwrap();
        assert_eq!(report.capabilities.len(), catalog::len() - 1);
        assert!(
            report
                .capabilities
                .iter()
                .all(|line| line.id != CapabilityId::SUPPORT_CABAC)
        );
    }

    #[test]
    fn test_sweep_fatal_is_not_swallowed() {
        let mut query = |_codec: CodecId, cap: CapabilityId| {
            if cap == CapabilityId::LEVEL_MAX {
                Err(QueryError::Fatal("driver reset".into()))
            } else {
                Ok(0)
            }
        };
        let result = sweep_codec(&mut query, CodecId::H264, catalog::sweep_ids(0));
        assert_eq!(result.unwrap_err(), QueryError::Fatal("driver reset".into()));
    }

    #[test]
    fn test_default_options_probe_all_codecs() {
        let options = ProbeOptions::default();
        assert_eq!(options.codecs, CodecId::ALL.to_vec());
        assert_eq!(options.extra_capability_ids, 0);
    }
}
