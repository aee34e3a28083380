use thiserror::Error;

#[derive(Error, Debug)]
pub enum BookError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Schema error: {0}")]
    Schema(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: f64, height: f64 },
    #[error("Invalid layout structure: {0}")]
    Structure(String),
    #[error("Unknown layout template: {0}")]
    UnknownLayout(String),
    #[error("Unknown slot type: {0}")]
    UnknownSlotType(String),
    #[error("Unknown photo: {0}")]
    UnknownPhoto(String),
    #[error("Section folder not found: {0}")]
    MissingSection(String),
    #[error("Detection failed: {0}")]
    Detection(String),
    #[error("No photos found")]
    NoPhotos,
}

pub type Result<T> = std::result::Result<T, BookError>;

/// Paper orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    /// Portrait: height > width
    Portrait,
    /// Landscape: width > height (default for photobooks)
    #[default]
    Landscape,
}

/// Standard paper sizes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Get base dimensions (always portrait: width < height for standard sizes)
    pub fn dimensions_mm(self) -> (f32, f32) {
        match self {
            PaperSize::A3 => (297.0, 420.0),
            PaperSize::A4 => (210.0, 297.0),
            PaperSize::A5 => (148.0, 210.0),
            PaperSize::Letter => (215.9, 279.4),
            PaperSize::Legal => (215.9, 355.6),
            PaperSize::Tabloid => (279.4, 431.8),
            PaperSize::Custom {
                width_mm,
                height_mm,
            } => (width_mm, height_mm),
        }
    }

    /// Get dimensions with orientation applied
    pub fn dimensions_with_orientation(self, orientation: Orientation) -> (f32, f32) {
        let (w, h) = self.dimensions_mm();
        let (short, long) = if w <= h { (w, h) } else { (h, w) };
        match orientation {
            Orientation::Portrait => (short, long),
            Orientation::Landscape => (long, short),
        }
    }
}

/// Page margins of a photobook spread.
///
/// The binding margin sits next to the spine. Its side alternates with page
/// parity; the other three edges all use the outer margin.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PageMargins {
    /// Top, bottom and fore-edge margin
    pub outer_mm: f32,
    /// Margin on the spine side
    pub binding_mm: f32,
    /// Space between neighbouring photos on a page
    pub gap_mm: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            outer_mm: 10.0,
            binding_mm: 20.0,
            gap_mm: 5.0,
        }
    }
}

/// Orientation tag of a photo, derived from its pixel aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhotoOrientation {
    /// Width/height above 1.1
    Wide,
    /// Width/height below 0.9
    Tall,
    /// Width/height within [0.9, 1.1]
    NearSquare,
}

impl PhotoOrientation {
    /// Wide and near-square photos both fit landscape slots
    pub fn is_horizontal(self) -> bool {
        matches!(self, PhotoOrientation::Wide | PhotoOrientation::NearSquare)
    }

    pub fn name(self) -> &'static str {
        match self {
            PhotoOrientation::Wide => "wide",
            PhotoOrientation::Tall => "tall",
            PhotoOrientation::NearSquare => "near-square",
        }
    }
}

/// User-assigned tag constraining which template slot a photo may take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SlotType {
    /// No constraint
    #[default]
    Auto,
    /// Alone on a page
    Full,
    /// Left half of a side-by-side pair
    VerticalLeft,
    /// Right half of a side-by-side pair
    VerticalRight,
    /// Upper half of a stacked pair
    HorizontalTop,
    /// Lower half of a stacked pair
    HorizontalBottom,
    /// Small slot in a 3 or 4 photo page
    Square,
}

impl SlotType {
    pub const ALL: [SlotType; 7] = [
        SlotType::Auto,
        SlotType::Full,
        SlotType::VerticalLeft,
        SlotType::VerticalRight,
        SlotType::HorizontalTop,
        SlotType::HorizontalBottom,
        SlotType::Square,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SlotType::Auto => "auto",
            SlotType::Full => "full",
            SlotType::VerticalLeft => "fv-l",
            SlotType::VerticalRight => "fv-r",
            SlotType::HorizontalTop => "fh-t",
            SlotType::HorizontalBottom => "fh-b",
            SlotType::Square => "square",
        }
    }

    pub fn is_vertical_half(self) -> bool {
        matches!(self, SlotType::VerticalLeft | SlotType::VerticalRight)
    }

    pub fn is_horizontal_half(self) -> bool {
        matches!(self, SlotType::HorizontalTop | SlotType::HorizontalBottom)
    }

    /// Tags that break an auto/square run: full and the half-page pairs
    pub fn is_special(self) -> bool {
        self == SlotType::Full || self.is_vertical_half() || self.is_horizontal_half()
    }
}

impl std::str::FromStr for SlotType {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        SlotType::ALL
            .into_iter()
            .find(|slot| slot.name() == s)
            .ok_or_else(|| BookError::UnknownSlotType(s.to_string()))
    }
}

impl std::fmt::Display for SlotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Axis-aligned subject bounding box in source pixel coordinates
/// (origin top-left, y growing downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Standard rectangle intersection test; touching edges do not count
    pub fn intersects(&self, other: &Region) -> bool {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        left < right && top < bottom
    }
}

/// User pan/zoom override for one photo.
///
/// `pan_x`/`pan_y` is the focus point inside the cover-cropped image
/// (0.5/0.5 centred). `zoom` 1.0 is an exact cover fill; values below 1.0
/// reveal more of the image down to the contain scale.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Adjustment {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
    #[serde(alias = "slot_tipo")]
    pub slot_type: SlotType,
}

impl Default for Adjustment {
    fn default() -> Self {
        Self {
            pan_x: 0.5,
            pan_y: 0.5,
            zoom: 1.0,
            slot_type: SlotType::Auto,
        }
    }
}

impl Adjustment {
    /// Whether pan or zoom differ from a centred cover fill. An adjustment
    /// that only carries a slot type leaves cropping automatic.
    ///
    /// Placement follows this rule: framing adjustments go through
    /// [`crate::place_adjusted`], everything else through the subject-aware
    /// [`crate::place_auto`].
    pub fn has_framing(&self) -> bool {
        let default = Adjustment::default();
        self.pan_x != default.pan_x || self.pan_y != default.pan_y || self.zoom != default.zoom
    }

    /// Pan clamped to [0, 1]; NaN falls back to centred
    pub fn clamped_pan(&self) -> (f64, f64) {
        let clamp = |v: f64| if v.is_nan() { 0.5 } else { v.clamp(0.0, 1.0) };
        (clamp(self.pan_x), clamp(self.pan_y))
    }
}

/// Partial update of an [`Adjustment`]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdjustmentPatch {
    pub pan_x: Option<f64>,
    pub pan_y: Option<f64>,
    pub zoom: Option<f64>,
    pub slot_type: Option<SlotType>,
}

impl AdjustmentPatch {
    pub fn is_empty(&self) -> bool {
        self.pan_x.is_none() && self.pan_y.is_none() && self.zoom.is_none() && self.slot_type.is_none()
    }

    /// Merge the set fields into `adjustment`.
    ///
    /// Pan is clamped to [0, 1] with non-finite values centred; a non-finite
    /// or non-positive zoom resets to 1.0. Stored values always survive a
    /// JSON round trip.
    pub fn apply(&self, adjustment: &mut Adjustment) {
        let pan = |v: f64| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.5 };
        if let Some(pan_x) = self.pan_x {
            adjustment.pan_x = pan(pan_x);
        }
        if let Some(pan_y) = self.pan_y {
            adjustment.pan_y = pan(pan_y);
        }
        if let Some(zoom) = self.zoom {
            adjustment.zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
        }
        if let Some(slot_type) = self.slot_type {
            adjustment.slot_type = slot_type;
        }
    }
}

/// Statistics about a planned photobook
#[derive(Debug, Clone, PartialEq)]
pub struct BookStatistics {
    /// Number of photos placed on content pages
    pub photos: usize,
    /// Number of sections (one divider page each)
    pub sections: usize,
    /// Number of content pages
    pub content_pages: usize,
    /// Total page count including cover, dividers and back cover
    pub total_pages: usize,
    /// Content page count per layout template
    pub pages_per_layout: std::collections::BTreeMap<crate::LayoutTemplate, usize>,
    /// Photos with at least one detected subject region
    pub photos_with_subjects: usize,
    /// Photos carrying a user adjustment
    pub adjusted_photos: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_clamps_pan() {
        let mut adjustment = Adjustment::default();
        AdjustmentPatch {
            pan_x: Some(-3.0),
            pan_y: Some(7.0),
            ..Default::default()
        }
        .apply(&mut adjustment);
        assert_eq!((adjustment.pan_x, adjustment.pan_y), (0.0, 1.0));
    }

    #[test]
    fn test_patch_replaces_non_finite_values() {
        let mut adjustment = Adjustment::default();
        AdjustmentPatch {
            pan_x: Some(f64::NAN),
            pan_y: Some(f64::INFINITY),
            zoom: Some(f64::INFINITY),
            slot_type: None,
        }
        .apply(&mut adjustment);
        assert_eq!(adjustment, Adjustment::default());

        for zoom in [f64::NAN, 0.0, -2.0] {
            let mut adjustment = Adjustment::default();
            AdjustmentPatch {
                zoom: Some(zoom),
                ..Default::default()
            }
            .apply(&mut adjustment);
            assert_eq!(adjustment.zoom, 1.0);
        }
    }

    #[test]
    fn test_patch_keeps_valid_zoom_and_slot_type() {
        let mut adjustment = Adjustment::default();
        AdjustmentPatch {
            zoom: Some(0.6),
            slot_type: Some(SlotType::Square),
            ..Default::default()
        }
        .apply(&mut adjustment);
        assert_eq!(adjustment.zoom, 0.6);
        assert_eq!(adjustment.slot_type, SlotType::Square);
        assert!(adjustment.has_framing());
    }
}
