use std::path::Path;
use std::process::Command;

use crate::types::{BookError, Region, Result};

use super::RegionDetector;

/// Detector backed by an external program.
///
/// The photo path is appended to `argv`; the program prints a JSON array of
/// `[x, y, width, height]` boxes on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDetector {
    argv: Vec<String>,
}

impl CommandDetector {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }
}

impl RegionDetector for CommandDetector {
    fn detect(&self, path: &Path) -> Result<Vec<Region>> {
        let (program, args) = self
            .argv
            .split_first()
            .ok_or_else(|| BookError::Detection("empty detector command".to_string()))?;

        let output = Command::new(program)
            .args(args)
            .arg(path)
            .output()
            .map_err(|e| BookError::Detection(format!("Failed to execute {}: {}", program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BookError::Detection(format!(
                "{} exited with {}: {}",
                program,
                output.status,
                stderr.trim()
            )));
        }

        parse_boxes(&output.stdout)
    }
}

fn to_pixels(v: i64) -> u32 {
    v.clamp(0, u32::MAX as i64) as u32
}

/// Parse `[[x, y, w, h], ...]`; coordinates are clipped to `[0, u32::MAX]`
pub(crate) fn parse_boxes(stdout: &[u8]) -> Result<Vec<Region>> {
    let boxes: Vec<[i64; 4]> = serde_json::from_slice(stdout).map_err(|e| {
        BookError::Detection(format!(
            "Failed to parse detector output: {} | Raw output: {}",
            e,
            String::from_utf8_lossy(stdout).trim()
        ))
    })?;

    Ok(boxes
        .into_iter()
        .filter_map(|[x, y, w, h]| {
            let (left, top) = (to_pixels(x), to_pixels(y));
            let (right, bottom) = (to_pixels(x.saturating_add(w)), to_pixels(y.saturating_add(h)));
            (right > left && bottom > top).then(|| Region::new(left, top, right - left, bottom - top))
        })
        .collect())
}
