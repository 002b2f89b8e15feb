//! Pure Rust codec: everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with format guessed from content |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (adaptive row filter) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` at the configured quality |

use super::backend::{CodecError, TileCodec};
use super::params::{EncodeParams, PngCompression, Quality, TileFormat};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ColorType, DynamicImage, ImageReader};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Pure Rust codec using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustCodec;

impl RustCodec {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustCodec {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a zlib-style 0–9 level onto the encoder's three effort presets.
fn png_compression_type(level: PngCompression) -> CompressionType {
    match level.value() {
        0..=2 => CompressionType::Fast,
        3..=6 => CompressionType::Default,
        _ => CompressionType::Best,
    }
}

/// PNG cannot store float samples; widen them to 16-bit instead.
fn png_compatible(image: &DynamicImage) -> Option<DynamicImage> {
    match image.color() {
        ColorType::Rgb32F => Some(DynamicImage::ImageRgb16(image.to_rgb16())),
        ColorType::Rgba32F => Some(DynamicImage::ImageRgba16(image.to_rgba16())),
        _ => None,
    }
}

/// JPEG has no alpha channel and only 8-bit samples.
fn jpeg_compatible(image: &DynamicImage) -> Option<DynamicImage> {
    match image.color() {
        ColorType::L8 | ColorType::Rgb8 => None,
        ColorType::L16 => Some(DynamicImage::ImageLuma8(image.to_luma8())),
        _ => Some(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

fn save_png(image: &DynamicImage, path: &Path, level: PngCompression) -> Result<(), CodecError> {
    let converted = png_compatible(image);
    let image = converted.as_ref().unwrap_or(image);
    let writer = BufWriter::new(File::create(path)?);
    let encoder =
        PngEncoder::new_with_quality(writer, png_compression_type(level), FilterType::Adaptive);
    image
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("PNG encode failed: {e}")))
}

fn save_jpeg(image: &DynamicImage, path: &Path, quality: Quality) -> Result<(), CodecError> {
    let converted = jpeg_compatible(image);
    let image = converted.as_ref().unwrap_or(image);
    let writer = BufWriter::new(File::create(path)?);
    let encoder = JpegEncoder::new_with_quality(writer, quality.value());
    image
        .write_with_encoder(encoder)
        .map_err(|e| CodecError::Encode(format!("JPEG encode failed: {e}")))
}

impl TileCodec for RustCodec {
    fn decode(&self, path: &Path) -> Result<DynamicImage, CodecError> {
        ImageReader::open(path)?
            .with_guessed_format()?
            .decode()
            .map_err(|e| CodecError::Decode(format!("{}: {}", path.display(), e)))
    }

    fn encode(
        &self,
        image: &DynamicImage,
        path: &Path,
        params: &EncodeParams,
    ) -> Result<(), CodecError> {
        match params.format {
            TileFormat::Png => save_png(image, path, params.compression),
            TileFormat::Jpg => save_jpeg(image, path, params.quality),
        }
    }
}
