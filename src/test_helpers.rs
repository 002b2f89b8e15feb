//! Shared test utilities for the tilegen test suite.
//!
//! Provides synthetic source images and helpers for inspecting generated
//! tile trees, so pipeline tests never depend on checked-in fixture files.

use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;
use walkdir::WalkDir;

// =========================================================================
// Synthetic images
// =========================================================================

/// RGB image whose pixels encode their own coordinates.
///
/// Red follows x, green follows y, blue is constant, so any crop can be
/// checked against the region it was cut from.
pub fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    }))
}

/// Write [`gradient_rgb`] to `path` as PNG.
pub fn write_gradient_png(path: &Path, width: u32, height: u32) {
    gradient_rgb(width, height).save(path).unwrap();
}

// =========================================================================
// Output tree inspection
// =========================================================================

/// Relative paths of every file under `root`, sorted, with `/` separators.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

#[test]
fn list_files_walks_nested_directories() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("1/0")).unwrap();
    std::fs::write(tmp.path().join("1/0/1.png"), "").unwrap();
    std::fs::write(tmp.path().join("size.json"), "").unwrap();
    std::fs::create_dir(tmp.path().join("empty")).unwrap();

    assert_eq!(list_files(tmp.path()), vec!["1/0/1.png", "size.json"]);
}
