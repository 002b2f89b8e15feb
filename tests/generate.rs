//! End-to-end pipeline tests against the real PNG/JPEG codec.
//!
//! Each test writes a synthetic source image into a temp dir, runs
//! [`tilegen::process::generate`] and inspects the resulting tree on disk.

use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tilegen::config::TileConfig;
use tilegen::imaging::{Downsample, Rotation, TileFormat};
use tilegen::metadata::SizeDescriptor;
use tilegen::process::{GenerateError, generate};
use walkdir::WalkDir;

/// Red follows x, green follows y.
fn write_source(dir: &Path, width: u32, height: u32) -> PathBuf {
    let path = dir.join("source.png");
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    DynamicImage::ImageRgb8(image).save(&path).unwrap();
    path
}

/// Sorted relative file paths with `/` separators.
fn tree(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
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

fn dimensions(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

#[test]
fn square_600_tree_layout() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 600, 600);
    let dest = tmp.path().join("tiles");

    let result = generate(&input, &dest, &TileConfig::default(), None).unwrap();
    assert_eq!(result.tile_count(), 14);

    let expected = vec![
        "0/0/0.png",
        "1/0/0.png",
        "1/0/1.png",
        "1/1/0.png",
        "1/1/1.png",
        "2/0/0.png",
        "2/0/1.png",
        "2/0/2.png",
        "2/1/0.png",
        "2/1/1.png",
        "2/1/2.png",
        "2/2/0.png",
        "2/2/1.png",
        "2/2/2.png",
        "size.json",
    ];
    assert_eq!(tree(&dest), expected);

    assert_eq!(dimensions(&dest.join("0/0/0.png")), (150, 150));
    assert_eq!(dimensions(&dest.join("1/1/1.png")), (44, 44));
    assert_eq!(dimensions(&dest.join("2/0/0.png")), (256, 256));
    assert_eq!(dimensions(&dest.join("2/2/0.png")), (88, 256));
    assert_eq!(dimensions(&dest.join("2/2/2.png")), (88, 88));

    assert_eq!(
        fs::read_to_string(dest.join("size.json")).unwrap(),
        "{\"width\":0.5859375,\"height\":0.5859375,\"tileSize\":256}\n"
    );
}

#[test]
fn finest_level_tiles_are_exact_crops() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 600, 600);
    let dest = tmp.path().join("tiles");
    generate(&input, &dest, &TileConfig::default(), None).unwrap();

    let tile = image::open(dest.join("2/1/2.png")).unwrap().to_rgb8();
    // tile (1, 2) starts at source pixel (256, 512)
    assert_eq!(tile.get_pixel(0, 0), &Rgb([0, 0, 128]));
    assert_eq!(tile.get_pixel(10, 20), &Rgb([10, 20, 128]));
}

#[test]
fn single_level_image() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 200, 150);
    let dest = tmp.path().join("tiles");

    generate(&input, &dest, &TileConfig::default(), None).unwrap();

    assert_eq!(tree(&dest), vec!["0/0/0.png", "size.json"]);
    assert_eq!(dimensions(&dest.join("0/0/0.png")), (200, 150));
    let descriptor = SizeDescriptor::read(&dest).unwrap();
    assert_eq!((descriptor.width, descriptor.height), (0.78125, 0.5859375));
}

#[test]
fn repeated_runs_produce_identical_trees() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 333, 517);
    let config = TileConfig {
        tile_size: 100,
        ..TileConfig::default()
    };
    let first = tmp.path().join("first");
    let second = tmp.path().join("second");

    generate(&input, &first, &config, None).unwrap();
    generate(&input, &second, &config, None).unwrap();

    let files = tree(&first);
    assert_eq!(files, tree(&second));
    for file in &files {
        assert_eq!(
            fs::read(first.join(file)).unwrap(),
            fs::read(second.join(file)).unwrap(),
            "{file} differs between runs"
        );
    }
}

#[test]
fn rerun_into_existing_tree_overwrites() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 300, 300);
    let dest = tmp.path().join("tiles");

    generate(&input, &dest, &TileConfig::default(), None).unwrap();
    let before = fs::read(dest.join("1/0/0.png")).unwrap();
    generate(&input, &dest, &TileConfig::default(), None).unwrap();

    assert_eq!(fs::read(dest.join("1/0/0.png")).unwrap(), before);
}

#[test]
fn jpeg_tiles() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 300, 200);
    let dest = tmp.path().join("tiles");
    let config = TileConfig {
        format: TileFormat::Jpg,
        jpeg_quality: 80,
        ..TileConfig::default()
    };

    generate(&input, &dest, &config, None).unwrap();

    assert_eq!(
        tree(&dest),
        vec!["0/0/0.jpg", "1/0/0.jpg", "1/1/0.jpg", "size.json"]
    );
    assert_eq!(dimensions(&dest.join("1/1/0.jpg")), (44, 200));
    let bytes = fs::read(dest.join("0/0/0.jpg")).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
}

#[test]
fn counter_clockwise_rotation() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 300, 100);
    let dest = tmp.path().join("tiles");
    let config = TileConfig {
        rotation: Rotation::CounterClockwise,
        ..TileConfig::default()
    };

    generate(&input, &dest, &config, None).unwrap();

    assert_eq!(dimensions(&dest.join("0/0/0.png")), (50, 150));
    assert_eq!(dimensions(&dest.join("1/0/1.png")), (100, 44));
    // source top-right corner becomes the top-left corner
    let top = image::open(dest.join("1/0/0.png")).unwrap().to_rgb8();
    assert_eq!(top.get_pixel(0, 0), &Rgb([43, 0, 128]));
    // source origin becomes the bottom-left corner
    let bottom = image::open(dest.join("1/0/1.png")).unwrap().to_rgb8();
    assert_eq!(bottom.get_pixel(0, 43), &Rgb([0, 0, 128]));
}

#[test]
fn blur_downsample_keeps_layout() {
    let tmp = TempDir::new().unwrap();
    let input = write_source(tmp.path(), 600, 600);
    let area = tmp.path().join("area");
    let blur = tmp.path().join("blur");

    generate(&input, &area, &TileConfig::default(), None).unwrap();
    let config = TileConfig {
        downsample: Downsample::Blur,
        ..TileConfig::default()
    };
    generate(&input, &blur, &config, None).unwrap();

    assert_eq!(tree(&area), tree(&blur));
    assert_eq!(dimensions(&blur.join("0/0/0.png")), (150, 150));
    // the finest level is never resampled
    assert_eq!(
        fs::read(area.join("2/1/1.png")).unwrap(),
        fs::read(blur.join("2/1/1.png")).unwrap()
    );
}

#[test]
fn undecodable_input_creates_nothing() {
    let tmp = TempDir::new().unwrap();
    let input = tmp.path().join("broken.png");
    fs::write(&input, "definitely not an image").unwrap();
    let dest = tmp.path().join("tiles");

    let err = generate(&input, &dest, &TileConfig::default(), None).unwrap_err();

    assert!(matches!(err, GenerateError::Input { .. }));
    assert!(!dest.exists());
}
