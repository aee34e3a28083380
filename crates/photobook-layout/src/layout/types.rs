//! Layout data types for photobook pages
//!
//! Geometry is expressed in PDF points with the origin at the bottom-left
//! corner of the page, matching how the renderer draws.

use crate::types::{BookError, Result};

/// Which side of the bound book a page sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSide {
    /// Right-hand page (odd page numbers)
    /// The spine edge is on the left
    Recto,
    /// Left-hand page (even page numbers)
    /// The spine edge is on the right
    Verso,
}

impl PageSide {
    /// Side of a 1-based page number
    pub fn for_page(number: usize) -> Self {
        if number % 2 == 1 {
            PageSide::Recto
        } else {
            PageSide::Verso
        }
    }
}

/// A rectangular area in points
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// X position (left edge)
    pub x: f32,
    /// Y position (bottom edge)
    pub y: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Top edge y coordinate
    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Width / height of a non-degenerate rectangle
    pub fn aspect_ratio(&self) -> Result<f64> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(BookError::InvalidDimensions {
                width: self.width as f64,
                height: self.height as f64,
            });
        }
        Ok(self.width as f64 / self.height as f64)
    }
}

/// One of the eight fixed page grids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayoutTemplate {
    /// One photo filling the usable area
    L1,
    /// Two photos side by side
    L2H,
    /// Two photos stacked
    L2V,
    /// Two photos on top, one full-width below
    L3A,
    /// One full-width on top, two below
    L3B,
    /// Two stacked on the left, one tall on the right
    L3C,
    /// Same grid as L3B, chosen for three horizontal photos
    L3D,
    /// 2x2 grid
    L4,
}

impl LayoutTemplate {
    pub const ALL: [LayoutTemplate; 8] = [
        LayoutTemplate::L1,
        LayoutTemplate::L2H,
        LayoutTemplate::L2V,
        LayoutTemplate::L3A,
        LayoutTemplate::L3B,
        LayoutTemplate::L3C,
        LayoutTemplate::L3D,
        LayoutTemplate::L4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayoutTemplate::L1 => "L1",
            LayoutTemplate::L2H => "L2H",
            LayoutTemplate::L2V => "L2V",
            LayoutTemplate::L3A => "L3A",
            LayoutTemplate::L3B => "L3B",
            LayoutTemplate::L3C => "L3C",
            LayoutTemplate::L3D => "L3D",
            LayoutTemplate::L4 => "L4",
        }
    }

    /// Number of boxes the template produces
    pub fn slot_count(self) -> usize {
        match self {
            LayoutTemplate::L1 => 1,
            LayoutTemplate::L2H | LayoutTemplate::L2V => 2,
            LayoutTemplate::L3A | LayoutTemplate::L3B | LayoutTemplate::L3C | LayoutTemplate::L3D => 3,
            LayoutTemplate::L4 => 4,
        }
    }
}

impl std::str::FromStr for LayoutTemplate {
    type Err = BookError;

    fn from_str(s: &str) -> Result<Self> {
        LayoutTemplate::ALL
            .into_iter()
            .find(|layout| layout.name() == s)
            .ok_or_else(|| BookError::UnknownLayout(s.to_string()))
    }
}

impl std::fmt::Display for LayoutTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_side_alternates() {
        assert_eq!(PageSide::for_page(1), PageSide::Recto);
        assert_eq!(PageSide::for_page(2), PageSide::Verso);
        assert_eq!(PageSide::for_page(7), PageSide::Recto);
    }

    #[test]
    fn test_template_names_are_closed() {
        for layout in LayoutTemplate::ALL {
            assert_eq!(layout.name().parse::<LayoutTemplate>().unwrap(), layout);
        }
        assert!("L5".parse::<LayoutTemplate>().is_err());
        assert!("l1".parse::<LayoutTemplate>().is_err());
    }

    #[test]
    fn test_degenerate_rect_has_no_ratio() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).aspect_ratio().is_err());
        assert!(Rect::new(0.0, 0.0, 10.0, -1.0).aspect_ratio().is_err());
        assert_eq!(Rect::new(5.0, 5.0, 20.0, 10.0).aspect_ratio().unwrap(), 2.0);
    }
}
