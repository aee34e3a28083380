use crate::constants::{OPTIONS_FILE_NAME, mm_to_pt};
use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One section of the book, backed by a folder under the root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionSpec {
    /// Folder name, matched case-insensitively
    pub folder: String,
    /// Divider title; the folder name when absent
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

impl SectionSpec {
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            title: None,
            subtitle: None,
        }
    }
}

/// External detector commands, one argv per cascade stage
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionOptions {
    pub face: Option<Vec<String>>,
    pub upper_body: Option<Vec<String>>,
    pub full_body: Option<Vec<String>>,
}

/// Photobook configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookOptions {
    // Page
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    pub margins: PageMargins,

    // Cover text
    pub title: String,
    pub subtitle: Option<String>,
    pub period: Option<String>,
    pub back_title: Option<String>,
    pub back_subtitle: Option<String>,

    // Content
    pub sections: Vec<SectionSpec>,
    /// Folder under the root holding pre-generated cover images
    pub covers_dir: String,

    pub detection: DetectionOptions,
}

impl Default for BookOptions {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            orientation: Orientation::Landscape,
            margins: PageMargins::default(),
            title: "Photobook".to_string(),
            subtitle: None,
            period: None,
            back_title: None,
            back_subtitle: None,
            sections: Vec::new(),
            covers_dir: "covers".to_string(),
            detection: DetectionOptions::default(),
        }
    }
}

impl BookOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| BookError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| BookError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Options for a photobook root: an explicit file, else
    /// `photobook.json` in the root, else defaults
    pub async fn resolve(root: impl AsRef<Path>, explicit: Option<&Path>) -> Result<Self> {
        let options = match explicit {
            Some(path) => Self::load(path).await?,
            None => {
                let candidate = root.as_ref().join(OPTIONS_FILE_NAME);
                if tokio::fs::try_exists(&candidate).await? {
                    log::debug!("Using options from {}", candidate.display());
                    Self::load(&candidate).await?
                } else {
                    Self::default()
                }
            }
        };
        options.validate()?;
        Ok(options)
    }

    /// Page size in points with orientation applied
    pub fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = self.paper_size.dimensions_with_orientation(self.orientation);
        (mm_to_pt(w), mm_to_pt(h))
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        let (width_mm, height_mm) = self.paper_size.dimensions_mm();
        if !(width_mm > 0.0 && height_mm > 0.0) {
            return Err(BookError::Config(format!(
                "Page dimensions must be positive, got {}x{} mm",
                width_mm, height_mm
            )));
        }

        let m = &self.margins;
        if m.outer_mm < 0.0 || m.binding_mm < 0.0 || m.gap_mm < 0.0 {
            return Err(BookError::Config("Margins and gap must not be negative".to_string()));
        }

        let (w, h) = self.paper_size.dimensions_with_orientation(self.orientation);
        // narrowest cell: a 2x2 grid
        let usable_w = w - m.outer_mm - m.binding_mm;
        let usable_h = h - 2.0 * m.outer_mm;
        if usable_w <= m.gap_mm || usable_h <= m.gap_mm {
            return Err(BookError::Config(format!(
                "Margins leave no usable area on a {}x{} mm page",
                w, h
            )));
        }

        if let Some(section) = self.sections.iter().find(|s| s.folder.trim().is_empty()) {
            return Err(BookError::Config(format!(
                "Section folder name must not be empty (title {:?})",
                section.title
            )));
        }

        if self.covers_dir.trim().is_empty() {
            return Err(BookError::Config("Covers directory must not be empty".to_string()));
        }

        Ok(())
    }
}

mod serde_impls {
    use super::*;
    use crate::book::PageKind;
    use crate::layout::LayoutTemplate;
    use serde::{Deserialize, Serialize};

    impl Serialize for PaperSize {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            use serde::ser::SerializeStruct;
            match self {
                PaperSize::A3 => serializer.serialize_str("A3"),
                PaperSize::A4 => serializer.serialize_str("A4"),
                PaperSize::A5 => serializer.serialize_str("A5"),
                PaperSize::Letter => serializer.serialize_str("Letter"),
                PaperSize::Legal => serializer.serialize_str("Legal"),
                PaperSize::Tabloid => serializer.serialize_str("Tabloid"),
                PaperSize::Custom {
                    width_mm,
                    height_mm,
                } => {
                    let mut s = serializer.serialize_struct("Custom", 2)?;
                    s.serialize_field("width_mm", width_mm)?;
                    s.serialize_field("height_mm", height_mm)?;
                    s.end()
                }
            }
        }
    }

    impl<'de> Deserialize<'de> for PaperSize {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            use serde::de::{self, MapAccess, Visitor};
            use std::fmt;

            struct PaperSizeVisitor;

            impl<'de> Visitor<'de> for PaperSizeVisitor {
                type Value = PaperSize;

                fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                    formatter.write_str("a paper size")
                }

                fn visit_str<E>(self, value: &str) -> std::result::Result<PaperSize, E>
                where
                    E: de::Error,
                {
                    match value {
                        "A3" => Ok(PaperSize::A3),
                        "A4" => Ok(PaperSize::A4),
                        "A5" => Ok(PaperSize::A5),
                        "Letter" => Ok(PaperSize::Letter),
                        "Legal" => Ok(PaperSize::Legal),
                        "Tabloid" => Ok(PaperSize::Tabloid),
                        _ => Err(de::Error::unknown_variant(
                            value,
                            &["A3", "A4", "A5", "Letter", "Legal", "Tabloid", "Custom"],
                        )),
                    }
                }

                fn visit_map<M>(self, mut map: M) -> std::result::Result<PaperSize, M::Error>
                where
                    M: MapAccess<'de>,
                {
                    let mut width_mm = None;
                    let mut height_mm = None;

                    while let Some(key) = map.next_key::<String>()? {
                        match key.as_str() {
                            "width_mm" => width_mm = Some(map.next_value()?),
                            "height_mm" => height_mm = Some(map.next_value()?),
                            _ => {
                                let _: serde::de::IgnoredAny = map.next_value()?;
                            }
                        }
                    }

                    match (width_mm, height_mm) {
                        (Some(w), Some(h)) => Ok(PaperSize::Custom {
                            width_mm: w,
                            height_mm: h,
                        }),
                        (None, _) => Err(de::Error::missing_field("width_mm")),
                        (_, None) => Err(de::Error::missing_field("height_mm")),
                    }
                }
            }

            deserializer.deserialize_any(PaperSizeVisitor)
        }
    }

    impl Serialize for Orientation {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(match self {
                Orientation::Portrait => "Portrait",
                Orientation::Landscape => "Landscape",
            })
        }
    }

    impl<'de> Deserialize<'de> for Orientation {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "Portrait" => Ok(Orientation::Portrait),
                "Landscape" => Ok(Orientation::Landscape),
                _ => Err(serde::de::Error::unknown_variant(&s, &["Portrait", "Landscape"])),
            }
        }
    }

    const SLOT_TYPE_NAMES: &[&str] = &["auto", "full", "fv-l", "fv-r", "fh-t", "fh-b", "square"];

    impl Serialize for SlotType {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for SlotType {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse()
                .map_err(|_| serde::de::Error::unknown_variant(&s, SLOT_TYPE_NAMES))
        }
    }

    const LAYOUT_NAMES: &[&str] = &["L1", "L2H", "L2V", "L3A", "L3B", "L3C", "L3D", "L4"];

    impl Serialize for LayoutTemplate {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for LayoutTemplate {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            s.parse()
                .map_err(|_| serde::de::Error::unknown_variant(&s, LAYOUT_NAMES))
        }
    }

    impl Serialize for PageKind {
        fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            serializer.serialize_str(self.name())
        }
    }

    impl<'de> Deserialize<'de> for PageKind {
        fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let s = String::deserialize(deserializer)?;
            match s.as_str() {
                "cover" => Ok(PageKind::Cover),
                "divider" => Ok(PageKind::Divider),
                "content" => Ok(PageKind::Content),
                "back_cover" => Ok(PageKind::BackCover),
                _ => Err(serde::de::Error::unknown_variant(
                    &s,
                    &["cover", "divider", "content", "back_cover"],
                )),
            }
        }
    }

}
