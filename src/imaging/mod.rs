//! Image handling in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` |
//! | **Rotate** | `DynamicImage::rotate90` / `rotate270` |
//! | **Halve** | custom area-average or Gaussian-then-decimate on `Rgba32F` |
//! | **Encode** | `image` PNG / JPEG encoders |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for pyramid and grid geometry (unit testable)
//! - **Parameters**: Data structures describing how tiles are encoded
//! - **Transform**: Rotation and the [`Downsample`] strategies
//! - **Backend**: [`TileCodec`] trait + [`RustCodec`]

pub mod backend;
mod calculations;
mod params;
pub mod rust_backend;
mod transform;

pub use backend::{CodecError, TileCodec};
pub use calculations::{
    TileRect, coarsest_tile_span, column_rects, fits_in_tile, grid_size, halved_dimensions,
    pyramid_dimensions, tile_rect,
};
pub use params::{EncodeParams, PngCompression, Quality, TileFormat};
pub use rust_backend::RustCodec;
pub use transform::{Downsample, Rotation};
