//! Pyramid generation: the end-to-end pipeline.
//!
//! ```text
//! decode → rotate → create destination → build pyramid → create level dirs
//!        → emit levels 0..n (coarsest first) → write size.json
//! ```
//!
//! Every stage is fail-fast: the first error aborts the run and is returned
//! with the offending path. Nothing already written is rolled back.
//!
//! All level directories are created before the first tile is encoded, so a
//! destination that cannot hold the tree is rejected before any tile exists.
//! `size.json` is written last, only after every tile succeeded; its presence
//! marks a complete pyramid.
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel so the
//! CLI can print while the library stays free of terminal output.

use crate::config::TileConfig;
use crate::imaging::{CodecError, Rotation, RustCodec, TileCodec};
use crate::metadata::{DESCRIPTOR_FILE, MetadataError, SizeDescriptor, write_metadata};
use crate::pyramid::{Pyramid, PyramidError};
use crate::tiles::{LevelSummary, TileError, TileLayout, create_directory, emit_level};
use image::DynamicImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("{}: can't load image: {source}", .path.display())]
    Input { path: PathBuf, source: CodecError },
    #[error("invalid source image: {0}")]
    Pyramid(#[from] PyramidError),
    #[error(transparent)]
    Tile(#[from] TileError),
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Progress notifications, in pipeline order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    SourceLoaded {
        path: String,
        width: u32,
        height: u32,
    },
    Rotated {
        rotation: Rotation,
        width: u32,
        height: u32,
    },
    /// Level dimensions, coarsest first.
    PyramidBuilt { dimensions: Vec<(u32, u32)> },
    LevelEmitted(LevelSummary),
    MetadataWritten {
        path: String,
        descriptor: SizeDescriptor,
        level_count: usize,
    },
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateResult {
    /// One entry per level, coarsest first.
    pub levels: Vec<LevelSummary>,
    pub descriptor: SizeDescriptor,
}

impl GenerateResult {
    pub fn tile_count(&self) -> u32 {
        self.levels.iter().map(|l| l.tiles).sum()
    }
}

fn notify(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        let _ = tx.send(event);
    }
}

/// Tile the image at `input` into `destination` using the pure Rust codec.
pub fn generate(
    input: &Path,
    destination: &Path,
    config: &TileConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<GenerateResult, GenerateError> {
    generate_with_codec(&RustCodec::new(), input, destination, config, events)
}

/// Tile the image at `input` using a specific codec (allows testing with mock).
pub fn generate_with_codec(
    codec: &impl TileCodec,
    input: &Path,
    destination: &Path,
    config: &TileConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let source = codec.decode(input).map_err(|source| GenerateError::Input {
        path: input.to_path_buf(),
        source,
    })?;
    notify(
        &events,
        ProcessEvent::SourceLoaded {
            path: input.display().to_string(),
            width: source.width(),
            height: source.height(),
        },
    );
    generate_from_image(codec, source, destination, config, events)
}

/// Tile an already decoded image.
pub fn generate_from_image(
    codec: &impl TileCodec,
    image: DynamicImage,
    destination: &Path,
    config: &TileConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<GenerateResult, GenerateError> {
    let image = config.rotation.apply(image);
    if config.rotation != Rotation::None {
        notify(
            &events,
            ProcessEvent::Rotated {
                rotation: config.rotation,
                width: image.width(),
                height: image.height(),
            },
        );
    }

    fs::create_dir_all(destination).map_err(|source| TileError::Directory {
        path: destination.to_path_buf(),
        source,
    })?;

    let pyramid = Pyramid::build(image, config.tile_size, config.downsample)?;
    notify(
        &events,
        ProcessEvent::PyramidBuilt {
            dimensions: pyramid.dimensions(),
        },
    );

    let layout = TileLayout::new(destination, config.format);
    for (level, _) in pyramid.levels() {
        create_directory(&layout.level_dir(level))?;
    }

    let mut levels = Vec::with_capacity(pyramid.level_count());
    for (level, image) in pyramid.levels() {
        let summary = emit_level(image, level, config, &layout, codec)?;
        notify(&events, ProcessEvent::LevelEmitted(summary));
        levels.push(summary);
    }

    let base = pyramid.base();
    let descriptor = write_metadata(
        base.width(),
        base.height(),
        config.tile_size,
        pyramid.level_count(),
        destination,
    )?;
    notify(
        &events,
        ProcessEvent::MetadataWritten {
            path: destination.join(DESCRIPTOR_FILE).display().to_string(),
            descriptor,
            level_count: pyramid.level_count(),
        },
    );

    Ok(GenerateResult { levels, descriptor })
}
