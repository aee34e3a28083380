//! Usable page area
//!
//! The binding margin goes on the spine edge: left on recto pages, right on
//! verso pages. Top, bottom and fore-edge use the outer margin.

use crate::constants::mm_to_pt;
use crate::types::PageMargins;

use super::{PageSide, Rect};

/// Rectangle left after subtracting margins from a page, in points
pub fn usable_area(page_width_pt: f32, page_height_pt: f32, margins: &PageMargins, side: PageSide) -> Rect {
    let outer = mm_to_pt(margins.outer_mm);
    let binding = mm_to_pt(margins.binding_mm);

    let (margin_left, margin_right) = match side {
        PageSide::Recto => (binding, outer),
        PageSide::Verso => (outer, binding),
    };

    Rect::new(
        margin_left,
        outer,
        page_width_pt - margin_left - margin_right,
        page_height_pt - 2.0 * outer,
    )
}
