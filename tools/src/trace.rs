//! Trace file I/O.
//!
//! Traces are plain JSON arrays read and written wholesale: the recorder
//! emits `CapturedPoint`s, the replay tool consumes `BlendedPoint`s.

use std::path::Path;

use anyhow::{Context, Result};
use robot_link::{BlendedPoint, CapturedPoint};

pub fn load_blended<P: AsRef<Path>>(path: P) -> Result<Vec<BlendedPoint>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trace file {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse trace file {}", path.display()))
}

pub fn save_captured<P: AsRef<Path>>(path: P, points: &[CapturedPoint]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(points).context("Failed to serialize trace")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write trace file {}", path.display()))
}
