//! Pure calculation functions for pyramid and tile-grid geometry.
//!
//! All functions here are pure and testable without any I/O or images.

/// Dimensions after one pyramid step: each axis halved with floor semantics.
///
/// # Examples
/// ```
/// # use tilegen::imaging::halved_dimensions;
/// assert_eq!(halved_dimensions(600, 600), (300, 300));
/// assert_eq!(halved_dimensions(301, 75), (150, 37));
/// ```
pub fn halved_dimensions(width: u32, height: u32) -> (u32, u32) {
    (width / 2, height / 2)
}

/// Whether an image of the given size fits in a single tile.
pub fn fits_in_tile(width: u32, height: u32, tile_size: u32) -> bool {
    width <= tile_size && height <= tile_size
}

/// Predict the dimension chain of a pyramid, finest first.
///
/// The first entry is the source size. Halving continues while either axis
/// exceeds `tile_size`. The chain stops early if a halving produces a zero
/// axis; that last entry is included so callers can report it.
pub fn pyramid_dimensions(width: u32, height: u32, tile_size: u32) -> Vec<(u32, u32)> {
    let mut chain = vec![(width, height)];
    let (mut w, mut h) = (width, height);
    while w > 0 && h > 0 && !fits_in_tile(w, h, tile_size) {
        (w, h) = halved_dimensions(w, h);
        chain.push((w, h));
    }
    chain
}

/// Number of tile columns and rows covering an image.
pub fn grid_size(width: u32, height: u32, tile_size: u32) -> (u32, u32) {
    (width.div_ceil(tile_size), height.div_ceil(tile_size))
}

/// A single tile's grid address and pixel rectangle within its level image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    /// Grid column.
    pub x: u32,
    /// Grid row.
    pub y: u32,
    /// Left edge in level pixels.
    pub left: u32,
    /// Top edge in level pixels.
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

/// Compute the rectangle of tile `(x, y)`.
///
/// Interior tiles are `tile_size` square; the last column and row are
/// clipped to the remaining pixels. Callers must only ask for tiles that
/// start inside the image (`x * tile_size < width`, same for `y`).
pub fn tile_rect(x: u32, y: u32, width: u32, height: u32, tile_size: u32) -> TileRect {
    let left = x * tile_size;
    let top = y * tile_size;
    debug_assert!(left < width && top < height);
    TileRect {
        x,
        y,
        left,
        top,
        width: tile_size.min(width - left),
        height: tile_size.min(height - top),
    }
}

/// All tiles of one column, top to bottom.
pub fn column_rects(x: u32, width: u32, height: u32, tile_size: u32) -> Vec<TileRect> {
    let (_, rows) = grid_size(width, height, tile_size);
    (0..rows)
        .map(|y| tile_rect(x, y, width, height, tile_size))
        .collect()
}

/// Pixel span of one coarsest-level tile measured in base-image pixels.
///
/// This is `tile_size << (level_count - 1)`, widened to `u64` so deep
/// pyramids of large tiles cannot overflow.
pub fn coarsest_tile_span(tile_size: u32, level_count: usize) -> u64 {
    let shift = level_count.saturating_sub(1) as u32;
    u64::from(tile_size) << shift
}
