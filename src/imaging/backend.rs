//! Image codec trait and shared error type.
//!
//! The [`TileCodec`] trait defines the two operations the pipeline needs from
//! the outside world: decode the source image and encode one tile to disk.
//! Everything in between (rotation, halving, cropping) happens in memory on
//! [`DynamicImage`] values.
//!
//! The production implementation is
//! [`RustCodec`](super::rust_backend::RustCodec), pure Rust and statically
//! linked through the `image` crate.

use super::params::EncodeParams;
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Decode failed: {0}")]
    Decode(String),
    #[error("Encode failed: {0}")]
    Encode(String),
}

/// Trait for image codecs.
///
/// `Sync` because tiles of one level are encoded from several rayon workers
/// at once.
pub trait TileCodec: Sync {
    /// Load and decode an image from disk.
    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError>;

    /// Encode `image` and write it to `path`.
    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        params: &EncodeParams,
    ) -> Result<(), CodecError>;
}
