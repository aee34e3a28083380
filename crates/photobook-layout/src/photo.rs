use crate::classify::classify;
use crate::constants::{LEGACY_ADJUSTMENTS_FILE_NAME, SIMPLE_SUBJECT_LIMIT};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Metadata of one source photo.
///
/// `id` is the path relative to the photobook root with `/` separators and is
/// the key for every adjustment lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Photo {
    pub id: String,
    pub width: u32,
    pub height: u32,
    /// Faces reported by the detector
    #[serde(default)]
    pub subject_count: usize,
    /// Subject bounding boxes in source pixels
    #[serde(default)]
    pub regions: Vec<Region>,
}

impl Photo {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            subject_count: 0,
            regions: Vec::new(),
        }
    }

    pub fn with_regions(mut self, regions: Vec<Region>, subject_count: usize) -> Self {
        self.regions = regions;
        self.subject_count = subject_count;
        self
    }

    pub fn orientation(&self) -> PhotoOrientation {
        classify(self.width, self.height)
    }

    /// Width / height, or `None` for zero-sized metadata
    pub fn aspect_ratio(&self) -> Option<f64> {
        if self.width == 0 || self.height == 0 {
            None
        } else {
            Some(self.width as f64 / self.height as f64)
        }
    }

    /// At most two detected subjects
    pub fn is_simple(&self) -> bool {
        self.subject_count <= SIMPLE_SUBJECT_LIMIT
    }
}

/// What grouping and layout selection need to know about a photo
pub trait LayoutItem {
    fn slot_type(&self) -> SlotType;
    fn orientation(&self) -> PhotoOrientation;
    fn is_simple(&self) -> bool;
}

impl LayoutItem for (Photo, SlotType) {
    fn slot_type(&self) -> SlotType {
        self.1
    }

    fn orientation(&self) -> PhotoOrientation {
        self.0.orientation()
    }

    fn is_simple(&self) -> bool {
        self.0.is_simple()
    }
}

/// User adjustments keyed by photo identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Adjustments(BTreeMap<String, Adjustment>);

#[derive(Deserialize)]
struct LegacyAdjustmentsFile {
    #[serde(default, rename = "ajustes")]
    adjustments: BTreeMap<String, Adjustment>,
}

impl Adjustments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&Adjustment> {
        self.0.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, adjustment: Adjustment) {
        self.0.insert(id.into(), adjustment);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Adjustment)> {
        self.0.iter()
    }

    /// Slot type assigned to a photo, `auto` when none was stored
    pub fn slot_type(&self, id: &str) -> SlotType {
        self.get(id).map(|a| a.slot_type).unwrap_or_default()
    }

    /// Read the legacy flat adjustment file from a photobook root.
    ///
    /// A missing or unparseable file yields an empty set.
    pub async fn load_legacy(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(LEGACY_ADJUSTMENTS_FILE_NAME);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(Self::new());
        }
        let bytes = tokio::fs::read(&path).await?;
        match serde_json::from_slice::<LegacyAdjustmentsFile>(&bytes) {
            Ok(file) => Ok(Self(file.adjustments)),
            Err(e) => {
                log::warn!("Ignoring {}: {}", path.display(), e);
                Ok(Self::new())
            }
        }
    }
}

impl FromIterator<(String, Adjustment)> for Adjustments {
    fn from_iter<T: IntoIterator<Item = (String, Adjustment)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
