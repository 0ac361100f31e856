//! Staging configuration.
//!
//! Handles loading and validating an optional `imgstage.toml`. Every key has a
//! default, so a config file only needs the values it wants to change.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! # temp_dir = "/var/tmp/uploads"  # Staging directory (omit for the system temp dir)
//! chunk_size = 32768               # Copy buffer size in bytes
//! remove_origin = false            # Delete the input after a successful finish
//! max_pixels = 100000000           # Largest resize target (width x height)
//!
//! [quality]
//! jpeg = 100                       # JPEG quality (1-100)
//! png = "default"                  # PNG compression: "default", "fast" or "best"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{PngCompression, Quality, QualityMap};
use crate::staging::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default resize budget: 100 megapixels.
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Staging configuration loaded from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StageConfig {
    /// Directory for staged copies. `None` means the system temp dir.
    pub temp_dir: Option<PathBuf>,
    /// Copy buffer size in bytes.
    pub chunk_size: usize,
    /// Delete the original input once the result is published.
    pub remove_origin: bool,
    /// Upper bound on `width * height` of any resize target or intermediate.
    pub max_pixels: u64,
    /// Default encoding settings.
    pub quality: QualityConfig,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            remove_origin: false,
            max_pixels: DEFAULT_MAX_PIXELS,
            quality: QualityConfig::default(),
        }
    }
}

/// Default encoding settings per format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityConfig {
    /// JPEG quality (1-100).
    pub jpeg: u8,
    /// PNG compression effort.
    pub png: PngCompression,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            jpeg: Quality::default().value(),
            png: PngCompression::default(),
        }
    }
}

impl StageConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chunk_size == 0 {
            return Err(ConfigError::Validation(
                "chunk_size must be greater than 0".into(),
            ));
        }
        if self.max_pixels == 0 {
            return Err(ConfigError::Validation(
                "max_pixels must be greater than 0".into(),
            ));
        }
        if !(1..=100).contains(&self.quality.jpeg) {
            return Err(ConfigError::Validation(
                "quality.jpeg must be 1-100".into(),
            ));
        }
        Ok(())
    }

    /// Directory staged copies are written to.
    pub fn staging_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Starting quality map for a new handle.
    pub fn quality_map(&self) -> QualityMap {
        QualityMap {
            jpeg: Quality::new(self.quality.jpeg),
            png: self.quality.png,
        }
    }
}

/// Parse and validate a config from TOML text.
pub fn parse_config(content: &str) -> Result<StageConfig, ConfigError> {
    let config: StageConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file.
pub fn load_config(path: &Path) -> Result<StageConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Returns a fully-commented stock config with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgstage configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory where inputs are staged before resizing. Omit to use the
# system temp directory.
# temp_dir = "/var/tmp/imgstage"

# Copy buffer size in bytes. Inputs no larger than this are copied with a
# single read; larger inputs stream through a buffer of this size.
chunk_size = 32768

# Delete the original input after the result has been published.
remove_origin = false

# Largest allowed resize target, as width x height. Requests above this fail
# instead of allocating the pixel buffer.
max_pixels = 100000000

# ---------------------------------------------------------------------------
# Encoding
# ---------------------------------------------------------------------------
[quality]
# JPEG quality (1 = smallest file, 100 = best quality).
jpeg = 100

# PNG compression effort: "default", "fast" or "best". PNG is lossless, so
# this trades encode time for file size only.
png = "default"
"##
}
