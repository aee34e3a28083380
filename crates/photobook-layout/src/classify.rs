use crate::constants::{NEAR_SQUARE_MAX_RATIO, NEAR_SQUARE_MIN_RATIO};
use crate::types::PhotoOrientation;

/// Classify a photo by its pixel aspect ratio.
///
/// A zero width or height classifies as wide instead of failing.
pub fn classify(width: u32, height: u32) -> PhotoOrientation {
    if width == 0 || height == 0 {
        return PhotoOrientation::Wide;
    }
    let ratio = width as f64 / height as f64;
    if (NEAR_SQUARE_MIN_RATIO..=NEAR_SQUARE_MAX_RATIO).contains(&ratio) {
        PhotoOrientation::NearSquare
    } else if ratio > NEAR_SQUARE_MAX_RATIO {
        PhotoOrientation::Wide
    } else {
        PhotoOrientation::Tall
    }
}
