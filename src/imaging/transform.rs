//! Whole-image transforms applied before tiling: 90° rotation and the two
//! halving strategies used to build each pyramid step.
//!
//! | Strategy | Algorithm |
//! |---|---|
//! | [`Downsample::Area`] | separable area average onto a `floor(w/2) × floor(h/2)` grid |
//! | [`Downsample::Blur`] | separable 5-tap Gaussian `[1,4,6,4,1]/16`, then keep every even pixel |
//!
//! Both strategies run on the image's own subpixel type (8-bit, 16-bit or
//! float), one output row at a time: source rows are blended into a single
//! `f32` row accumulator, which is then resampled horizontally and rounded
//! back into the output buffer. Besides the output image, only that one row
//! is allocated, and the colour type never changes down the pyramid.

use super::calculations::halved_dimensions;
use image::{DynamicImage, ImageBuffer, Pixel};
use serde::{Deserialize, Serialize};

/// How each pyramid step halves the previous image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Downsample {
    /// Coverage-weighted mean of the source pixels under each output pixel.
    #[default]
    Area,
    /// Gaussian pre-smoothing followed by 2× decimation.
    Blur,
}

impl Downsample {
    /// Produce an image at half the linear resolution (floor on each axis).
    pub fn halve(self, image: &DynamicImage) -> DynamicImage {
        let (src_w, src_h) = (image.width(), image.height());
        let (dst_w, dst_h) = halved_dimensions(src_w, src_h);
        let cols = self.taps(src_w, dst_w);
        let rows = self.taps(src_h, dst_h);
        let (cols, rows) = (cols.as_slice(), rows.as_slice());

        match image {
            DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(resample(buf, cols, rows)),
            DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(resample(buf, cols, rows)),
            DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(resample(buf, cols, rows)),
            DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(resample(buf, cols, rows)),
            DynamicImage::ImageLuma16(buf) => DynamicImage::ImageLuma16(resample(buf, cols, rows)),
            DynamicImage::ImageLumaA16(buf) => {
                DynamicImage::ImageLumaA16(resample(buf, cols, rows))
            }
            DynamicImage::ImageRgb16(buf) => DynamicImage::ImageRgb16(resample(buf, cols, rows)),
            DynamicImage::ImageRgba16(buf) => DynamicImage::ImageRgba16(resample(buf, cols, rows)),
            DynamicImage::ImageRgb32F(buf) => DynamicImage::ImageRgb32F(resample(buf, cols, rows)),
            DynamicImage::ImageRgba32F(buf) => {
                DynamicImage::ImageRgba32F(resample(buf, cols, rows))
            }
            other => DynamicImage::ImageRgba8(resample(&other.to_rgba8(), cols, rows)),
        }
    }

    /// Per-output-sample taps along one axis of length `src_len`.
    fn taps(self, src_len: u32, dst_len: u32) -> Vec<Taps> {
        match self {
            Downsample::Area => area_taps(src_len, dst_len),
            Downsample::Blur => (0..dst_len).map(|d| gauss_taps(d * 2, src_len)).collect(),
        }
    }
}

/// Quarter-turn applied to the source before the pyramid is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rotation {
    #[default]
    None,
    /// 90° to the right.
    Clockwise,
    /// 90° to the left.
    CounterClockwise,
}

impl Rotation {
    /// Resolve the `-r` / `-R` command-line flags.
    ///
    /// Clockwise wins when both are set.
    pub fn from_flags(clockwise: bool, counter_clockwise: bool) -> Self {
        match (clockwise, counter_clockwise) {
            (true, _) => Rotation::Clockwise,
            (false, true) => Rotation::CounterClockwise,
            (false, false) => Rotation::None,
        }
    }

    pub fn apply(self, image: DynamicImage) -> DynamicImage {
        match self {
            Rotation::None => image,
            Rotation::Clockwise => image.rotate90(),
            Rotation::CounterClockwise => image.rotate270(),
        }
    }
}

/// Source taps and weights contributing to one output sample along an axis.
type Taps = Vec<(u32, f32)>;

/// Area-average weights for resampling `src_len` samples onto `dst_len`.
///
/// Output sample `d` covers `[d * scale, (d + 1) * scale)` in source space;
/// every source sample it overlaps contributes in proportion to the overlap.
fn area_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    let scale = f64::from(src_len) / f64::from(dst_len);
    (0..dst_len)
        .map(|d| {
            let start = f64::from(d) * scale;
            let end = start + scale;
            let first = start.floor() as u32;
            let last = (end.ceil() as u32).min(src_len);
            (first..last)
                .filter_map(|s| {
                    let overlap = end.min(f64::from(s + 1)) - start.max(f64::from(s));
                    (overlap > 0.0).then(|| (s, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}

const GAUSS5: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Gaussian taps centred on `center`, with borders replicated.
fn gauss_taps(center: u32, len: u32) -> Taps {
    GAUSS5
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let pos = (i64::from(center) + i as i64 - 2).clamp(0, i64::from(len) - 1);
            (pos as u32, w)
        })
        .collect()
}

/// Subpixel types the resampler reads and writes without conversion.
trait Sample: Copy {
    fn widen(self) -> f32;
    fn narrow(value: f32) -> Self;
}

impl Sample for u8 {
    fn widen(self) -> f32 {
        f32::from(self)
    }

    fn narrow(value: f32) -> Self {
        value.round().clamp(0.0, f32::from(u8::MAX)) as u8
    }
}

impl Sample for u16 {
    fn widen(self) -> f32 {
        f32::from(self)
    }

    fn narrow(value: f32) -> Self {
        value.round().clamp(0.0, f32::from(u16::MAX)) as u16
    }
}

impl Sample for f32 {
    fn widen(self) -> f32 {
        self
    }

    fn narrow(value: f32) -> Self {
        value
    }
}

/// Resample `src` onto a `cols.len() × rows.len()` grid.
///
/// Rows are blended first into one `f32` accumulator row, which is then
/// resampled along x straight into the output buffer.
fn resample<P>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    cols: &[Taps],
    rows: &[Taps],
) -> ImageBuffer<P, Vec<P::Subpixel>>
where
    P: Pixel,
    P::Subpixel: Sample,
{
    let (dst_w, dst_h) = (cols.len() as u32, rows.len() as u32);
    let mut dst = ImageBuffer::<P, Vec<P::Subpixel>>::new(dst_w, dst_h);
    if dst_w == 0 || dst_h == 0 {
        return dst;
    }

    let channels = usize::from(P::CHANNEL_COUNT);
    let src_row_len = src.width() as usize * channels;
    let dst_row_len = dst_w as usize * channels;
    let raw = src.as_raw();
    let mut acc = vec![0.0f32; src_row_len];

    for (out_row, row_taps) in dst.chunks_exact_mut(dst_row_len).zip(rows) {
        acc.fill(0.0);
        for &(sy, weight) in row_taps {
            let start = sy as usize * src_row_len;
            for (a, &s) in acc.iter_mut().zip(&raw[start..start + src_row_len]) {
                *a += s.widen() * weight;
            }
        }

        for (out_px, col_taps) in out_row.chunks_exact_mut(channels).zip(cols) {
            for (c, out) in out_px.iter_mut().enumerate() {
                let value: f32 = col_taps
                    .iter()
                    .map(|&(sx, weight)| acc[sx as usize * channels + c] * weight)
                    .sum();
                *out = <P::Subpixel as Sample>::narrow(value);
            }
        }
    }
    dst
}
