//! Tiling configuration.
//!
//! Every knob of a run lives in one immutable [`TileConfig`] value that is
//! threaded through the pyramid builder, tile emitter and metadata writer.
//! Values are layered, later layers winning:
//!
//! ```text
//! stock defaults  →  --config file.toml  →  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! tile_size = 256           # Tile edge length in pixels
//! format = "png"            # "png" or "jpg"
//! jpeg_quality = 95         # JPEG quality (1-100)
//! png_compression = 3       # PNG compression effort (0-9)
//! rotation = "none"         # "none", "clockwise" or "counter-clockwise"
//! downsample = "area"       # "area" or "blur"
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Downsample, EncodeParams, PngCompression, Quality, Rotation, TileFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration for one tiling run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TileConfig {
    /// Maximum tile edge length in pixels.
    pub tile_size: u32,
    /// Output image format; also the tile file extension.
    pub format: TileFormat,
    /// JPEG quality, 1–100. Ignored for PNG.
    pub jpeg_quality: u32,
    /// PNG compression effort, 0–9. Ignored for JPEG.
    pub png_compression: u32,
    /// Quarter-turn applied to the source before tiling.
    pub rotation: Rotation,
    /// Strategy used for every halving step.
    pub downsample: Downsample,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            tile_size: 256,
            format: TileFormat::default(),
            jpeg_quality: u32::from(Quality::default().value()),
            png_compression: u32::from(PngCompression::default().value()),
            rotation: Rotation::default(),
            downsample: Downsample::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl TileConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_size == 0 {
            return Err(ConfigError::Validation("tile_size must be at least 1".into()));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Validation("jpeg_quality must be 1-100".into()));
        }
        if self.png_compression > 9 {
            return Err(ConfigError::Validation("png_compression must be 0-9".into()));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Encoder settings derived from this config.
    pub fn encode_params(&self) -> EncodeParams {
        EncodeParams {
            format: self.format,
            quality: Quality::new(self.jpeg_quality),
            compression: PngCompression::new(self.png_compression),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel tile-encoding workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging file and command-line overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(TileConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Merge overlays onto a base value in order, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<TileConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: TileConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config: stock defaults, then the optional file, then
/// `overrides` (typically built from command-line flags).
pub fn load_config(file: Option<&Path>, overrides: toml::Table) -> Result<TileConfig, ConfigError> {
    let mut overlays = Vec::new();
    if let Some(path) = file {
        overlays.push(load_raw_config(path)?);
    }
    overlays.push(toml::Value::Table(overrides));
    resolve_config(stock_defaults_value(), overlays)
}
