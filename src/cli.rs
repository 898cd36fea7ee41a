// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Dumping the full capability report
//! - Listing supported codecs
//! - Printing the capability catalog
//! - Decoding a single raw value

use crate::{DumpArgs, SourceArgs};
use nvenc_caps::backends::{BackendSource, CapabilityBackend, open_backend, probe_backend};
use nvenc_caps::caps::{CapabilityId, CapabilityShape, CodecId, catalog, decode};
use nvenc_caps::constants::{NAME_COLUMN_WIDTH, NO_SUPPORTED_CODEC};
use nvenc_caps::probe::supported_codecs;
use nvenc_caps::{AppResult, Config, OutputFormat, ProbeOptions};
use tracing::{debug, warn};

fn open(config: &Config, source: &SourceArgs) -> AppResult<Box<dyn CapabilityBackend>> {
    let source = BackendSource::select(source.fixture.clone(), source.device, config);
    Ok(open_backend(&source, config)?)
}

fn probe_options(config: &Config, source: &SourceArgs, extra_caps: Option<u32>) -> ProbeOptions {
    let mut options = config.probe_options();
    if !source.codecs.is_empty() {
        options.codecs = source.codecs.clone();
    }
    if let Some(extra) = extra_caps {
        options.extra_capability_ids = extra;
    }
    options
}

/// Probe the device and print every capability of every supported codec
pub fn dump_capabilities(config: &Config, args: DumpArgs) -> AppResult<()> {
    let options = probe_options(config, &args.source, args.extra_caps);
    debug!(?options, "Dumping capabilities");

    let mut backend = open(config, &args.source)?;
    let report = probe_backend(backend.as_mut(), &options)?;

    let json = args.json || config.output == OutputFormat::Json;
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", report.render_text(config.name_width));
    }

    Ok(())
}

/// Print the codecs that pass the litmus probe
pub fn list_codecs(config: &Config, source: SourceArgs) -> AppResult<()> {
    let options = probe_options(config, &source, None);
    let mut backend = open(config, &source)?;

    if let Some(device) = backend.device_info() {
        println!("GPU: {} | CUDA driver: {}", device.name, device.driver_version);
    }

    let codecs = supported_codecs(backend.as_mut(), &options.codecs)?;
    if codecs.is_empty() {
        println!("{}", NO_SUPPORTED_CODEC);
        return Ok(());
    }

    println!("Supported codecs:");
    for codec in codecs {
        println!("  {:<6} {}", codec.short_name(), codec.display_name());
    }

    Ok(())
}

/// Print the capability catalog
pub fn print_catalog() -> AppResult<()> {
    for (id, name) in catalog::entries() {
        println!(
            "{:>3}  {:<width$}  {}",
            id.raw(),
            name,
            CapabilityShape::of(id).label(),
            width = NAME_COLUMN_WIDTH
        );
    }
    Ok(())
}

/// Decode one raw value as it would appear in a report
pub fn decode_value(codec: CodecId, capability: i32, value: i32) -> AppResult<()> {
    let id = CapabilityId(capability);
    if !catalog::is_known(id) {
        warn!(capability, "Capability id is not in the catalog, decoding it as a flag");
    }
    println!(
        "{} ({}): {}",
        catalog::name_of(id),
        codec.display_name(),
        decode(codec, id, value)
    );
    Ok(())
}
