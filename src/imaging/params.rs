//! Parameter types for tile encoding.
//!
//! These structs describe *what* to write, not *how* to write it. They are the
//! interface between the tile emitter (which decides what tiles exist) and the
//! [`codec`](super::backend) (which does the actual encoding). This separation
//! allows swapping codecs (e.g. for testing with a mock) without changing the
//! tiling logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG quality (1–100, default 95). Clamped on construction.
//! - [`PngCompression`]: zlib effort (0–9, default 3). Clamped on construction.
//! - [`TileFormat`]: output container, which also fixes the file extension.
//! - [`EncodeParams`]: everything the codec needs to write one tile.

use serde::{Deserialize, Serialize};

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// PNG compression effort (0 = fastest, 9 = smallest).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PngCompression(pub u8);

impl PngCompression {
    pub fn new(value: u32) -> Self {
        Self(value.min(9) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for PngCompression {
    fn default() -> Self {
        Self(3)
    }
}

/// Output image format for tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileFormat {
    #[default]
    Png,
    #[serde(alias = "jpeg")]
    Jpg,
}

impl TileFormat {
    /// File extension used in tile paths (`<y>.<ext>`).
    pub fn extension(self) -> &'static str {
        match self {
            TileFormat::Png => "png",
            TileFormat::Jpg => "jpg",
        }
    }
}

impl std::str::FromStr for TileFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(TileFormat::Png),
            "jpg" | "jpeg" => Ok(TileFormat::Jpg),
            other => Err(format!("unsupported tile format '{other}' (expected png or jpg)")),
        }
    }
}

/// Parameters for encoding one tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeParams {
    pub format: TileFormat,
    pub quality: Quality,
    pub compression: PngCompression,
}
