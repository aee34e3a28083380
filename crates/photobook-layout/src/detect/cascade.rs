use std::path::Path;

use crate::constants::{
    FACE_BODY_HEIGHT_FACTOR, FACE_BODY_WIDTH_FACTOR, MIN_REGIONS_BEFORE_UPPER_BODY,
    UPPER_BODY_HEIGHT_FACTOR,
};
use crate::options::DetectionOptions;
use crate::types::{Region, Result};

use super::{CommandDetector, Detection, RegionDetector};

/// Face, then upper-body, then full-body detection.
///
/// Later stages only run while earlier ones found too few regions. Any
/// stage failing discards the whole result.
#[derive(Default)]
pub struct DetectionCascade {
    face: Option<Box<dyn RegionDetector>>,
    upper_body: Option<Box<dyn RegionDetector>>,
    full_body: Option<Box<dyn RegionDetector>>,
}

impl std::fmt::Debug for DetectionCascade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionCascade")
            .field("face", &self.face.is_some())
            .field("upper_body", &self.upper_body.is_some())
            .field("full_body", &self.full_body.is_some())
            .finish()
    }
}

impl DetectionCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_face(mut self, detector: impl RegionDetector + 'static) -> Self {
        self.face = Some(Box::new(detector));
        self
    }

    pub fn with_upper_body(mut self, detector: impl RegionDetector + 'static) -> Self {
        self.upper_body = Some(Box::new(detector));
        self
    }

    pub fn with_full_body(mut self, detector: impl RegionDetector + 'static) -> Self {
        self.full_body = Some(Box::new(detector));
        self
    }

    /// Build external command detectors for each configured stage
    pub fn from_options(options: &DetectionOptions) -> Self {
        let mut cascade = Self::new();
        if let Some(argv) = &options.face {
            cascade = cascade.with_face(CommandDetector::new(argv.clone()));
        }
        if let Some(argv) = &options.upper_body {
            cascade = cascade.with_upper_body(CommandDetector::new(argv.clone()));
        }
        if let Some(argv) = &options.full_body {
            cascade = cascade.with_full_body(CommandDetector::new(argv.clone()));
        }
        cascade
    }

    pub fn is_empty(&self) -> bool {
        self.face.is_none() && self.upper_body.is_none() && self.full_body.is_none()
    }

    /// Detect subjects in a photo of `width` x `height` pixels.
    ///
    /// Never fails: a detector error yields no regions and no faces.
    pub fn detect(&self, path: &Path, width: u32, height: u32) -> Detection {
        if self.is_empty() || width == 0 || height == 0 {
            return Detection::default();
        }
        match self.run(path, width, height) {
            Ok(detection) => {
                log::trace!(
                    "{}: {} regions, {} faces",
                    path.display(),
                    detection.regions.len(),
                    detection.face_count
                );
                detection
            }
            Err(e) => {
                log::debug!("Subject detection failed for {}: {}", path.display(), e);
                Detection::default()
            }
        }
    }

    fn run(&self, path: &Path, width: u32, height: u32) -> Result<Detection> {
        let mut regions = Vec::new();
        let mut face_count = 0;

        if let Some(face) = &self.face {
            for f in face.detect(path)? {
                if let Some(body) = body_from_face(&f, width, height) {
                    regions.push(body);
                }
                face_count += 1;
            }
        }

        if let Some(upper_body) = self.upper_body.as_ref().filter(|_| regions.len() < MIN_REGIONS_BEFORE_UPPER_BODY) {
            for candidate in upper_body.detect(path)? {
                if regions.iter().any(|r| r.intersects(&candidate)) {
                    continue;
                }
                if let Some(body) = stretch_upper_body(&candidate, width, height) {
                    regions.push(body);
                }
            }
        }

        if let Some(full_body) = self.full_body.as_ref().filter(|_| regions.is_empty()) {
            regions.extend(full_body.detect(path)?);
        }

        Ok(Detection {
            regions,
            face_count,
        })
    }
}

/// Estimated body box below a face, clamped to the image
fn body_from_face(face: &Region, width: u32, height: u32) -> Option<Region> {
    let x = (face.x as i64 - face.width as i64 / 2).max(0);
    let y = face.y as i64;
    let w = (face.width as i64 * FACE_BODY_WIDTH_FACTOR as i64).min(width as i64 - x);
    let h = (face.height as i64 * FACE_BODY_HEIGHT_FACTOR as i64).min(height as i64 - y);
    (w > 0 && h > 0).then(|| Region::new(x as u32, y as u32, w as u32, h as u32))
}

/// Upper-body box stretched downward to approximate the full body
fn stretch_upper_body(upper: &Region, width: u32, height: u32) -> Option<Region> {
    if upper.x >= width || upper.y >= height {
        return None;
    }
    let h = (upper.height as i64 * UPPER_BODY_HEIGHT_FACTOR as i64).min(height as i64 - upper.y as i64);
    (upper.width > 0 && h > 0).then(|| Region::new(upper.x, upper.y, upper.width, h as u32))
}
