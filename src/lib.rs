// SPDX-License-Identifier: GPL-3.0-only

//! nvenc-caps - NVIDIA hardware encoder capability reporter
//!
//! Asks the NVENC engine which codecs it supports and what each supported
//! codec can do, then decodes every raw capability value into readable
//! text.
//!
//! # Architecture
//!
//! - [`caps`]: Capability catalog, value decoders, level tables and dispatch
//! - [`probe`]: Codec support probing and report building
//! - [`backends`]: Capability sources (NVENC hardware, JSON fixtures)
//! - [`config`]: User configuration handling
//!
//! # Example
//!
//! ```
//! use nvenc_caps::caps::{CapabilityId, CodecId, decode};
//!
//! assert_eq!(decode(CodecId::H264, CapabilityId::LEVEL_MAX, 51), "5.1 (51)");
//! ```

pub mod backends;
pub mod caps;
pub mod config;
pub mod constants;
pub mod errors;
pub mod probe;

// Re-export commonly used types
pub use backends::{BackendSource, CapabilityBackend, open_backend, probe_backend};
pub use caps::{CapabilityId, CodecId};
pub use config::{Config, OutputFormat};
pub use errors::{AppError, AppResult, BackendError, QueryError};
pub use probe::{CapabilityQuery, DeviceReport, ProbeOptions, probe_device};
