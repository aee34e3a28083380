//! Persisted photobook schema
//!
//! The schema is the editable plan of the book: every page with its layout
//! and the photos in slot order, plus per-photo adjustments. Rendering goes
//! through [`Schema::to_book`].

mod generate;
mod plan;
mod repaginate;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::book::PageKind;
use crate::constants::{SCHEMA_FILE_NAME, SCHEMA_VERSION};
use crate::layout::LayoutTemplate;
use crate::photo::{Adjustments, LayoutItem, Photo};
use crate::types::*;

/// A photo placed in a slot of a schema page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPhoto {
    #[serde(flatten)]
    pub photo: Photo,
    /// Index of the template box the photo occupies
    pub slot_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjustment: Option<Adjustment>,
}

impl SchemaPhoto {
    pub fn new(photo: Photo, slot_index: usize, adjustment: Option<Adjustment>) -> Self {
        Self {
            photo,
            slot_index,
            adjustment,
        }
    }

    pub fn id(&self) -> &str {
        &self.photo.id
    }
}

impl LayoutItem for SchemaPhoto {
    fn slot_type(&self) -> SlotType {
        self.adjustment.map(|a| a.slot_type).unwrap_or_default()
    }

    fn orientation(&self) -> PhotoOrientation {
        self.photo.orientation()
    }

    fn is_simple(&self) -> bool {
        self.photo.is_simple()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaPage {
    pub kind: PageKind,
    #[serde(default = "default_layout")]
    pub layout: LayoutTemplate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    /// Pre-generated page image, relative to the root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub photos: Vec<SchemaPhoto>,
}

fn default_layout() -> LayoutTemplate {
    LayoutTemplate::L1
}

impl SchemaPage {
    /// A page without photos (cover, divider or back cover)
    pub fn titled(kind: PageKind, title: Option<String>, subtitle: Option<String>) -> Self {
        Self {
            kind,
            layout: LayoutTemplate::L1,
            title,
            subtitle,
            period: None,
            image: None,
            photos: Vec::new(),
        }
    }

    pub fn content(layout: LayoutTemplate, photos: Vec<SchemaPhoto>) -> Self {
        Self {
            kind: PageKind::Content,
            layout,
            title: None,
            subtitle: None,
            period: None,
            image: None,
            photos,
        }
    }

    pub fn is_content(&self) -> bool {
        self.kind == PageKind::Content
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub version: u32,
    /// Set once the legacy adjustment file has been applied
    #[serde(default)]
    pub legacy_migrated: bool,
    pub pages: Vec<SchemaPage>,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            version: SCHEMA_VERSION,
            legacy_migrated: false,
            pages: Vec::new(),
        }
    }
}

impl Schema {
    /// Location of the schema file in a photobook root
    pub fn file_path(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(SCHEMA_FILE_NAME)
    }

    /// Load a schema from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path.as_ref()).await?;
        let schema: Schema = serde_json::from_slice(&bytes)
            .map_err(|e| BookError::Schema(format!("Failed to parse schema: {}", e)))?;
        if schema.version > SCHEMA_VERSION {
            return Err(BookError::Schema(format!(
                "Schema version {} is newer than supported version {}",
                schema.version, SCHEMA_VERSION
            )));
        }
        log::debug!("Loaded schema with {} pages from {}", schema.pages.len(), path.as_ref().display());
        Ok(schema)
    }

    /// Load the schema of a photobook root, `None` when it has none yet
    pub async fn load_from_root(root: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = Self::file_path(root);
        if !tokio::fs::try_exists(&path).await? {
            return Ok(None);
        }
        Self::load(&path).await.map(Some)
    }

    /// Save the schema as pretty JSON
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookError::Schema(format!("Failed to serialize schema: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn photos(&self) -> impl Iterator<Item = &SchemaPhoto> {
        self.pages.iter().flat_map(|p| p.photos.iter())
    }

    fn photo_mut(&mut self, id: &str) -> Option<&mut SchemaPhoto> {
        self.pages
            .iter_mut()
            .flat_map(|p| p.photos.iter_mut())
            .find(|photo| photo.id() == id)
    }

    /// Flat adjustment record keyed by photo identifier
    pub fn adjustments(&self) -> Adjustments {
        self.photos()
            .filter_map(|photo| photo.adjustment.map(|a| (photo.photo.id.clone(), a)))
            .collect()
    }

    /// Update pan, zoom or slot type of one photo.
    ///
    /// Pan is clamped to [0, 1]; zoom is clamped when the book is planned.
    pub fn update_photo(&mut self, id: &str, patch: &AdjustmentPatch) -> Result<()> {
        let photo = self
            .photo_mut(id)
            .ok_or_else(|| BookError::UnknownPhoto(id.to_string()))?;
        let adjustment = photo.adjustment.get_or_insert_with(Adjustment::default);
        patch.apply(adjustment);
        log::debug!("Updated {}: {:?}", id, adjustment);
        Ok(())
    }

    /// Apply the legacy flat adjustment file once.
    ///
    /// Returns how many photos took an adjustment; 0 when already migrated.
    pub async fn migrate_legacy(&mut self, root: impl AsRef<Path>) -> Result<usize> {
        if self.legacy_migrated {
            return Ok(0);
        }
        let legacy = Adjustments::load_legacy(root).await?;
        let mut migrated = 0;
        for photo in self.pages.iter_mut().flat_map(|p| p.photos.iter_mut()) {
            if let Some(adjustment) = legacy.get(&photo.photo.id) {
                photo.adjustment = Some(*adjustment);
                migrated += 1;
            }
        }
        self.legacy_migrated = true;
        if migrated > 0 {
            log::info!("Migrated {} legacy adjustments", migrated);
        }
        Ok(migrated)
    }
}
