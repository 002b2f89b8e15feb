//! CLI output formatting for pipeline progress.
//!
//! # Output Format
//!
//! ```text
//! Source: photos/map.png (600x600)
//! Pyramid: 3 levels
//!     0  150x150
//!     1  300x300
//!     2  600x600
//! Level 0: 1x1 tiles (150x150)
//! Level 1: 2x2 tiles (300x300)
//! Level 2: 3x3 tiles (600x600)
//! Metadata: out/size.json (0.5859 x 0.5859 @ 256px)
//!     2.34 x 2.34 tiles at level 2
//! ```
//!
//! Format functions are pure (return `Vec<String>`) for testability; the CLI
//! prints them. Diagnostics for failures are not formatted here; they are
//! the error's own `Display`.

use crate::imaging::Rotation;
use crate::process::{GenerateResult, ProcessEvent};

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn rotation_label(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::None => "none",
        Rotation::Clockwise => "90° clockwise",
        Rotation::CounterClockwise => "90° counter-clockwise",
    }
}

/// Format one progress event as output lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::SourceLoaded {
            path,
            width,
            height,
        } => vec![format!("Source: {} ({}x{})", path, width, height)],
        ProcessEvent::Rotated {
            rotation,
            width,
            height,
        } => vec![format!(
            "Rotated {} → {}x{}",
            rotation_label(*rotation),
            width,
            height
        )],
        ProcessEvent::PyramidBuilt { dimensions } => {
            let noun = if dimensions.len() == 1 { "level" } else { "levels" };
            let mut lines = vec![format!("Pyramid: {} {}", dimensions.len(), noun)];
            for (level, (w, h)) in dimensions.iter().enumerate() {
                lines.push(format!("{}{}  {}x{}", indent(1), level, w, h));
            }
            lines
        }
        ProcessEvent::LevelEmitted(summary) => vec![format!(
            "Level {}: {}x{} tiles ({}x{})",
            summary.level, summary.columns, summary.rows, summary.width, summary.height
        )],
        ProcessEvent::MetadataWritten {
            path,
            descriptor,
            level_count,
        } => {
            let finest = level_count.saturating_sub(1);
            let (columns, rows) = descriptor.span_at_level(finest);
            vec![
                format!(
                    "Metadata: {} ({:.4} x {:.4} @ {}px)",
                    path, descriptor.width, descriptor.height, descriptor.tile_size
                ),
                format!(
                    "{}{:.2} x {:.2} tiles at level {}",
                    indent(1),
                    columns,
                    rows,
                    finest
                ),
            ]
        }
    }
}

/// Final one-line summary.
pub fn format_summary(result: &GenerateResult) -> String {
    let tiles = result.tile_count();
    let levels = result.levels.len();
    format!(
        "Generated {} tile{} in {} level{}",
        tiles,
        if tiles == 1 { "" } else { "s" },
        levels,
        if levels == 1 { "" } else { "s" }
    )
}
