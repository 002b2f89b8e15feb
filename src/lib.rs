//! # tilegen
//!
//! Cuts one large raster image into a multi-resolution tile pyramid for
//! zoomable viewers. The source is repeatedly halved until it fits in a
//! single tile; every level is then cut into a grid of square tiles and
//! written as `<dest>/<level>/<x>/<y>.<ext>`, with level 0 the coarsest.
//! A `size.json` descriptor next to the tree tells viewers the image extent.
//!
//! # Pipeline
//!
//! ```text
//! decode → rotate → halve until ≤ tile_size → emit levels → size.json
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Layered `TileConfig`: stock defaults, optional TOML file, CLI flags |
//! | [`imaging`] | Codec trait, pure-Rust PNG/JPEG codec, resampling, rotation, grid math |
//! | [`pyramid`] | Builds the chain of halved images, finest first |
//! | [`tiles`] | Directory layout and parallel per-column tile emission |
//! | [`metadata`] | The `size.json` descriptor |
//! | [`process`] | End-to-end pipeline with progress events |
//! | [`output`] | CLI formatting of progress events |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, resampling and encoding all use the `image` crate. There are no
//! system libraries to install, and the codec sits behind
//! [`imaging::TileCodec`] so pipeline tests run against a recording mock
//! instead of touching encoders.
//!
//! ## Level Numbering
//!
//! Level 0 is the smallest image (fits in one tile); each following level
//! doubles the resolution up to the source. Viewers can start at level 0
//! without knowing how deep the pyramid goes.
//!
//! ## Fail Fast, No Rollback
//!
//! The first error ends the run. Tiles already written are left in place and
//! `size.json` is only written after every tile succeeded, so its presence
//! marks a complete tree.

pub mod config;
pub mod imaging;
pub mod metadata;
pub mod output;
pub mod process;
pub mod pyramid;
pub mod tiles;

#[cfg(test)]
pub(crate) mod test_helpers;
