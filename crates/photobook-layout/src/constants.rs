//! Shared constants for photobook planning
//!
//! This module centralizes magic numbers used by classification, detection,
//! grouping and cropping.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4; // ≈ 2.83465

/// Convert millimeters to points
#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

// =============================================================================
// Classification
// =============================================================================

/// Lower bound (inclusive) of the near-square aspect ratio band
pub const NEAR_SQUARE_MIN_RATIO: f64 = 0.9;

/// Upper bound (inclusive) of the near-square aspect ratio band
pub const NEAR_SQUARE_MAX_RATIO: f64 = 1.1;

/// Photos with at most this many subjects count as "simple"
pub const SIMPLE_SUBJECT_LIMIT: usize = 2;

// =============================================================================
// Subject Detection
// =============================================================================

/// Estimated body height as a multiple of the face height
pub const FACE_BODY_HEIGHT_FACTOR: u32 = 5;

/// Estimated body width as a multiple of the face width
pub const FACE_BODY_WIDTH_FACTOR: u32 = 2;

/// Upper-body boxes are stretched downward to this multiple of their height
pub const UPPER_BODY_HEIGHT_FACTOR: u32 = 2;

/// Upper-body detection only runs while fewer regions than this were found
pub const MIN_REGIONS_BEFORE_UPPER_BODY: usize = 2;

// =============================================================================
// Grouping
// =============================================================================

/// Largest number of photos placed on one page
pub const MAX_GROUP_SIZE: usize = 4;

/// Simple-or-square photos needed among the next four for a 2x2 page
pub const QUAD_MIN_SIMPLE: usize = 3;

/// Wide or near-square photos needed among the next three for a 3 photo page
pub const TRIPLE_MIN_HORIZONTAL: usize = 2;

// =============================================================================
// Cropping
// =============================================================================

/// Margin added around the subject union box, as a fraction of its size
pub const SUBJECT_MARGIN_RATIO: f64 = 0.1;

/// Share of the usable width given to the wide column in the L3C template
pub const L3C_WIDE_COLUMN_RATIO: f32 = 0.6;

// =============================================================================
// Files
// =============================================================================

/// Schema file kept in the photobook root
pub const SCHEMA_FILE_NAME: &str = "photobook_schema.json";

/// Legacy flat adjustment file migrated into the schema once
pub const LEGACY_ADJUSTMENTS_FILE_NAME: &str = "ajustes_fotos.json";

/// Options file looked up in the photobook root
pub const OPTIONS_FILE_NAME: &str = "photobook.json";

/// Current schema format version
pub const SCHEMA_VERSION: u32 = 1;

/// Image file extensions picked up by discovery (compared lowercase)
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tif", "tiff", "webp"];

/// Approximate character width ratio for Helvetica
pub const HELVETICA_CHAR_WIDTH_RATIO: f32 = 0.5;
