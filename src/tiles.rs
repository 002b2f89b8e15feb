//! Tile emission: cutting one pyramid level into a grid and writing it.
//!
//! ## Output Structure
//!
//! ```text
//! <destination>/
//! ├── size.json
//! ├── 0/                 # level (0 = coarsest)
//! │   └── 0/             # column x
//! │       └── 0.png      # row y
//! └── 1/
//!     ├── 0/
//!     │   ├── 0.png
//!     │   └── 1.png
//!     └── 1/
//!         ├── 0.png
//!         └── 1.png      # clipped to the remaining pixels
//! ```
//!
//! ## Parallel Processing
//!
//! Columns of a level are written in parallel using [rayon](https://docs.rs/rayon).
//! Each column directory and every tile inside it belong to exactly one
//! worker, so no two workers ever touch the same path. A failure stops
//! further columns from starting. Columns already in flight finish their
//! current tile, so when several columns fail at once the error returned
//! is one of the failing tiles, not necessarily the earliest in grid order.
//! Anything already written stays on disk.

use crate::config::TileConfig;
use crate::imaging::{CodecError, EncodeParams, TileCodec, TileFormat, column_rects, grid_size};
use image::DynamicImage;
use rayon::prelude::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileError {
    #[error("{}: failed to create directory: {source}", .path.display())]
    Directory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{}: failed to save tile: {source}", .path.display())]
    Encode { path: PathBuf, source: CodecError },
}

/// Maps `(level, x, y)` addresses to paths under the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    root: PathBuf,
    extension: &'static str,
}

impl TileLayout {
    pub fn new(root: impl Into<PathBuf>, format: TileFormat) -> Self {
        Self {
            root: root.into(),
            extension: format.extension(),
        }
    }

    /// `<root>/<level>`
    pub fn level_dir(&self, level: usize) -> PathBuf {
        self.root.join(level.to_string())
    }

    /// `<root>/<level>/<x>`
    pub fn column_dir(&self, level: usize, x: u32) -> PathBuf {
        self.level_dir(level).join(x.to_string())
    }

    /// `<root>/<level>/<x>/<y>.<ext>`
    pub fn tile_path(&self, level: usize, x: u32, y: u32) -> PathBuf {
        self.column_dir(level, x)
            .join(format!("{}.{}", y, self.extension))
    }
}

/// Create a single directory.
///
/// An existing directory is accepted; any other entry at `path` (or a
/// missing parent) is a [`TileError::Directory`].
pub fn create_directory(path: &Path) -> Result<(), TileError> {
    match fs::create_dir(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists && path.is_dir() => Ok(()),
        Err(source) => Err(TileError::Directory {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// What was written for one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSummary {
    pub level: usize,
    pub width: u32,
    pub height: u32,
    pub columns: u32,
    pub rows: u32,
    pub tiles: u32,
}

/// Cut `image` into tiles and write them under `layout` as `level`.
pub fn emit_level(
    image: &DynamicImage,
    level: usize,
    config: &TileConfig,
    layout: &TileLayout,
    codec: &impl TileCodec,
) -> Result<LevelSummary, TileError> {
    let (width, height) = (image.width(), image.height());
    let (columns, rows) = grid_size(width, height, config.tile_size);
    let params = config.encode_params();

    create_directory(&layout.level_dir(level))?;

    (0..columns)
        .into_par_iter()
        .try_for_each(|x| {
            emit_column(image, level, x, config.tile_size, &params, layout, codec)
        })?;

    Ok(LevelSummary {
        level,
        width,
        height,
        columns,
        rows,
        tiles: columns * rows,
    })
}

fn emit_column(
    image: &DynamicImage,
    level: usize,
    x: u32,
    tile_size: u32,
    params: &EncodeParams,
    layout: &TileLayout,
    codec: &impl TileCodec,
) -> Result<(), TileError> {
    create_directory(&layout.column_dir(level, x))?;

    for rect in column_rects(x, image.width(), image.height(), tile_size) {
        let tile = image.crop_imm(rect.left, rect.top, rect.width, rect.height);
        let path = layout.tile_path(level, rect.x, rect.y);
        codec
            .encode(&tile, &path, params)
            .map_err(|source| TileError::Encode { path, source })?;
    }
    Ok(())
}
