//! Pyramid construction.
//!
//! A pyramid is the source image followed by successively halved copies,
//! stopping at the first image that fits in a single tile. Images are stored
//! in construction order (finest first) but addressed by *level*, where
//! level 0 is the coarsest image:
//!
//! ```text
//! storage index   0          1          2
//! image           600x600    300x300    150x150
//! level           2          1          0
//! ```
//!
//! Level numbers double as directory names in the output tree, so a viewer
//! can always start from `0/0/0` and zoom in.

use crate::imaging::{Downsample, pyramid_dimensions};
use image::DynamicImage;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PyramidError {
    #[error("tile size must be at least 1")]
    ZeroTileSize,
    #[error("image has a zero dimension ({width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
}

/// Ordered set of progressively halved images.
#[derive(Debug, Clone)]
pub struct Pyramid {
    /// Finest first. Never empty.
    images: Vec<DynamicImage>,
}

impl Pyramid {
    /// Build the pyramid for `image`.
    ///
    /// Halves with `downsample` while either axis exceeds `tile_size`. The
    /// dimension chain is checked before any pixel is resampled, so a source
    /// that would collapse to a zero-length axis fails up front.
    pub fn build(
        image: DynamicImage,
        tile_size: u32,
        downsample: Downsample,
    ) -> Result<Self, PyramidError> {
        if tile_size == 0 {
            return Err(PyramidError::ZeroTileSize);
        }
        let chain = pyramid_dimensions(image.width(), image.height(), tile_size);
        if let Some(&(width, height)) = chain.last().filter(|(w, h)| *w == 0 || *h == 0) {
            return Err(PyramidError::ZeroDimension { width, height });
        }

        let mut images = Vec::with_capacity(chain.len());
        images.push(image);
        for _ in 1..chain.len() {
            let next = downsample.halve(&images[images.len() - 1]);
            images.push(next);
        }

        Ok(Self { images })
    }

    pub fn level_count(&self) -> usize {
        self.images.len()
    }

    /// Image at `level` (0 = coarsest).
    pub fn level(&self, level: usize) -> Option<&DynamicImage> {
        let index = self.images.len().checked_sub(level + 1)?;
        self.images.get(index)
    }

    /// `(level, image)` pairs, coarsest first.
    pub fn levels(&self) -> impl DoubleEndedIterator<Item = (usize, &DynamicImage)> {
        self.images.iter().rev().enumerate()
    }

    /// The full-resolution image (highest level).
    pub fn base(&self) -> &DynamicImage {
        &self.images[0]
    }

    /// Level dimensions, coarsest first.
    pub fn dimensions(&self) -> Vec<(u32, u32)> {
        self.levels()
            .map(|(_, img)| (img.width(), img.height()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::halved_dimensions;
    use crate::test_helpers::gradient_rgb;

    #[test]
    fn source_that_fits_gives_single_level() {
        let pyramid = Pyramid::build(gradient_rgb(200, 150), 256, Downsample::Area).unwrap();
        assert_eq!(pyramid.level_count(), 1);
        assert_eq!(pyramid.dimensions(), vec![(200, 150)]);
        assert_eq!(pyramid.level(0), Some(pyramid.base()));
    }

    #[test]
    fn square_600_at_256_has_three_levels() {
        let pyramid = Pyramid::build(gradient_rgb(600, 600), 256, Downsample::Area).unwrap();
        assert_eq!(pyramid.level_count(), 3);
        assert_eq!(
            pyramid.dimensions(),
            vec![(150, 150), (300, 300), (600, 600)]
        );
    }

    #[test]
    fn wide_source_halves_until_both_axes_fit() {
        let pyramid = Pyramid::build(gradient_rgb(300, 150), 256, Downsample::Area).unwrap();
        assert_eq!(pyramid.dimensions(), vec![(150, 75), (300, 150)]);
    }

    #[test]
    fn levels_are_addressed_coarsest_first() {
        let pyramid = Pyramid::build(gradient_rgb(100, 60), 20, Downsample::Area).unwrap();
        let count = pyramid.level_count();

        assert_eq!(pyramid.level(count - 1).unwrap().width(), 100);
        assert!(pyramid.level(count).is_none());

        let levels: Vec<usize> = pyramid.levels().map(|(l, _)| l).collect();
        assert_eq!(levels, (0..count).collect::<Vec<_>>());

        // each level is about twice its coarser neighbour
        for (coarse, fine) in pyramid.dimensions().windows(2).map(|w| (w[0], w[1])) {
            assert_eq!(coarse, halved_dimensions(fine.0, fine.1));
        }
    }

    #[test]
    fn builder_matches_predicted_chain() {
        for strategy in [Downsample::Area, Downsample::Blur] {
            let pyramid = Pyramid::build(gradient_rgb(517, 203), 64, strategy).unwrap();
            let mut predicted = pyramid_dimensions(517, 203, 64);
            predicted.reverse();
            assert_eq!(pyramid.dimensions(), predicted);
        }
    }

    #[test]
    fn zero_tile_size_rejected() {
        let result = Pyramid::build(gradient_rgb(10, 10), 0, Downsample::Area);
        assert_eq!(result.unwrap_err(), PyramidError::ZeroTileSize);
    }

    #[test]
    fn zero_size_source_rejected() {
        let result = Pyramid::build(DynamicImage::new_rgb8(0, 10), 256, Downsample::Area);
        assert_eq!(
            result.unwrap_err(),
            PyramidError::ZeroDimension {
                width: 0,
                height: 10
            }
        );
    }

    #[test]
    fn halving_to_zero_is_an_error() {
        // a 1px tall strip collapses before its width fits
        let result = Pyramid::build(gradient_rgb(1000, 1), 256, Downsample::Blur);
        assert_eq!(
            result.unwrap_err(),
            PyramidError::ZeroDimension {
                width: 500,
                height: 0
            }
        );
    }

    #[test]
    fn tile_size_one_reaches_single_pixel() {
        let pyramid = Pyramid::build(gradient_rgb(8, 8), 1, Downsample::Area).unwrap();
        assert_eq!(pyramid.level_count(), 4);
        assert_eq!(pyramid.dimensions()[0], (1, 1));
    }
}
