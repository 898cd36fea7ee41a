// SPDX-License-Identifier: GPL-3.0-only

use clap::{Args, Parser, Subcommand};
use nvenc_caps::caps::CodecId;
use nvenc_caps::{AppResult, Config};
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;

#[derive(Parser)]
#[command(name = "nvenc-caps")]
#[command(about = "Report the capabilities of the NVIDIA hardware video encoder")]
#[command(version = env!("GIT_VERSION"))]
#[command(subcommand_required = false)]
struct Cli {
    /// Config file (default: ~/.config/nvenc-caps/config.json)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Where to read capabilities from
#[derive(Args, Debug, Default)]
pub struct SourceArgs {
    /// CUDA device ordinal
    #[arg(short, long)]
    pub device: Option<usize>,

    /// Read capabilities from a JSON fixture instead of the GPU
    #[arg(short, long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,

    /// Codec to probe (repeatable, default: all)
    #[arg(short, long = "codec", value_name = "CODEC")]
    pub codecs: Vec<CodecId>,
}

#[derive(Args, Debug, Default)]
pub struct DumpArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Also query this many capability ids past the known set
    #[arg(long, value_name = "N")]
    pub extra_caps: Option<u32>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every capability of every supported codec (default)
    Dump(DumpArgs),

    /// List the codecs the encoder supports
    Codecs(SourceArgs),

    /// List the known capabilities without touching the GPU
    Catalog,

    /// Decode a single raw capability value
    #[command(allow_negative_numbers = true)]
    Decode {
        /// Codec (h264, hevc or av1)
        codec: CodecId,

        /// Capability id (NV_ENC_CAPS value)
        capability: i32,

        /// Raw value returned by the driver
        value: i32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    // RUST_LOG takes precedence, e.g. RUST_LOG=nvenc_caps=trace
    let fallback = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(hint) = e.hint() {
                eprintln!("{}", hint);
            }
            ExitCode::from(e.exit_code())
        }
    }
}

fn run(cli: Cli) -> AppResult<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    match cli.command {
        Some(Commands::Dump(args)) => cli::dump_capabilities(&config, args),
        Some(Commands::Codecs(source)) => cli::list_codecs(&config, source),
        Some(Commands::Catalog) => cli::print_catalog(),
        Some(Commands::Decode {
            codec,
            capability,
            value,
        }) => cli::decode_value(codec, capability, value),
        None => cli::dump_capabilities(&config, DumpArgs::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_comes_from_build_script() {
        let version = Cli::command().get_version().map(str::to_string);
        assert_eq!(version.as_deref(), Some(env!("GIT_VERSION")));
        assert!(!env!("GIT_VERSION").is_empty());
        assert!(!env!("GIT_VERSION").starts_with('v'));
    }

    #[test]
    fn test_decode_accepts_negative_values() {
        let cli = Cli::try_parse_from(["nvenc-caps", "decode", "av1", "13", "-1"]).unwrap();
        match cli.command {
            Some(Commands::Decode {
                codec,
                capability,
                value,
            }) => {
                assert_eq!(codec, CodecId::Av1);
                assert_eq!(capability, 13);
                assert_eq!(value, -1);
            }
            _ => panic!("expected decode subcommand"),
        }
    }
}
