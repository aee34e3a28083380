//! Subject detection
//!
//! Detectors themselves are external. This module defines the capability
//! they share and combines face, upper-body and full-body strategies into the
//! regions used for cropping.

mod cascade;
mod command;

pub use cascade::*;
pub use command::*;

use std::path::Path;

use crate::types::{Region, Result};

/// A source of subject bounding boxes for one photo
pub trait RegionDetector: Send + Sync {
    /// Boxes in source pixel coordinates; an error disables subject-aware
    /// cropping for that photo
    fn detect(&self, path: &Path) -> Result<Vec<Region>>;
}

impl<F> RegionDetector for F
where
    F: Fn(&Path) -> Result<Vec<Region>> + Send + Sync,
{
    fn detect(&self, path: &Path) -> Result<Vec<Region>> {
        self(path)
    }
}

/// Combined result of a detection cascade
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub regions: Vec<Region>,
    /// Faces found by the first stage
    pub face_count: usize,
}
