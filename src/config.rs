// SPDX-License-Identifier: GPL-3.0-only

use crate::caps::CodecId;
use crate::constants::{APP_DIR_NAME, CONFIG_FILE_NAME, NAME_COLUMN_WIDTH};
use crate::errors::{AppError, AppResult};
use crate::probe::ProbeOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Report output format
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// CUDA device ordinal to open
    pub device: usize,
    /// Width of the capability name column in text output
    pub name_width: usize,
    /// Codecs to probe, in report order
    pub codecs: Vec<CodecId>,
    /// Extra capability ids past the catalog to query (newer drivers)
    pub extra_capability_ids: u32,
    /// Report output format
    pub output: OutputFormat,
    /// Explicit path to the NVENC library
    pub nvenc_library: Option<PathBuf>,
    /// Explicit path to the CUDA driver library
    pub cuda_library: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            device: 0,
            name_width: NAME_COLUMN_WIDTH,
            codecs: CodecId::ALL.to_vec(),
            extra_capability_ids: 0,
            output: OutputFormat::default(), // Text
            nvenc_library: None,
            cuda_library: None,
        }
    }
}

impl Config {
    /// Default config file location (`~/.config/nvenc-caps/config.json` on Linux)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load configuration from `path`
    ///
    /// A missing file yields the defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from the default location, or defaults if there is none
    pub fn load_default() -> AppResult<Self> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => Ok(Self::default()),
        }
    }

    /// Probe settings derived from this config
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            codecs: self.codecs.clone(),
            extra_capability_ids: self.extra_capability_ids,
        }
    }
}
