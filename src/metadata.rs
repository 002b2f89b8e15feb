//! The `size.json` descriptor written next to the tile tree.
//!
//! Viewers need the image extent without listing directories. The descriptor
//! stores the base image size divided by the pixel span of one coarsest tile
//! (`tile_size << (level_count - 1)`), so at level `l` the image is
//! `width * 2^l` tiles wide:
//!
//! ```json
//! {"width":0.5859375,"height":0.5859375,"tileSize":256}
//! ```

use crate::imaging::coarsest_tile_span;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Descriptor file name inside the destination directory.
pub const DESCRIPTOR_FILE: &str = "size.json";

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{}: failed to write size descriptor: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: failed to read size descriptor: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: invalid size descriptor: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Image extent in coarsest-tile units plus the tile size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeDescriptor {
    pub width: f64,
    pub height: f64,
    #[serde(rename = "tileSize")]
    pub tile_size: u32,
}

impl SizeDescriptor {
    pub fn new(base_width: u32, base_height: u32, tile_size: u32, level_count: usize) -> Self {
        let span = coarsest_tile_span(tile_size, level_count) as f64;
        Self {
            width: f64::from(base_width) / span,
            height: f64::from(base_height) / span,
            tile_size,
        }
    }

    /// Image extent at `level`, in tiles.
    pub fn span_at_level(&self, level: usize) -> (f64, f64) {
        let scale = 2f64.powi(level as i32);
        (self.width * scale, self.height * scale)
    }

    /// Read the descriptor from a destination directory.
    pub fn read(destination: &Path) -> Result<Self, MetadataError> {
        let path = destination.join(DESCRIPTOR_FILE);
        let content = fs::read_to_string(&path).map_err(|source| MetadataError::Read {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| MetadataError::Json { path, source })
    }
}

/// Write `size.json` into `destination` and return what was written.
///
/// The record is a single line of JSON followed by a newline.
pub fn write_metadata(
    base_width: u32,
    base_height: u32,
    tile_size: u32,
    level_count: usize,
    destination: &Path,
) -> Result<SizeDescriptor, MetadataError> {
    let descriptor = SizeDescriptor::new(base_width, base_height, tile_size, level_count);
    let path = destination.join(DESCRIPTOR_FILE);
    let mut line = serde_json::to_string(&descriptor).map_err(|source| MetadataError::Json {
        path: path.clone(),
        source,
    })?;
    line.push('\n');
    fs::write(&path, line).map_err(|source| MetadataError::Write { path, source })?;
    Ok(descriptor)
}
