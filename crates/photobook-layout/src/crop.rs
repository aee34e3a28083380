//! Crop computation
//!
//! Two modes: a subject-aware automatic crop and a user-directed pan/zoom
//! crop. Both produce a rectangle in source pixels (origin top-left) with the
//! destination box's aspect ratio.

use serde::{Deserialize, Serialize};

use crate::constants::SUBJECT_MARGIN_RATIO;
use crate::layout::Rect;
use crate::types::{Adjustment, BookError, Region, Result};

/// Rectangle of source pixels to extract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
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

    pub fn contains(&self, region: &Region) -> bool {
        region.x >= self.x
            && region.y >= self.y
            && region.right() <= self.right()
            && region.bottom() <= self.bottom()
    }
}

/// Where the cropped pixels go on the page
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub crop: CropRect,
    /// Drawing rectangle in page points; smaller than the slot box when a
    /// zoom below cover leaves empty space
    pub dest: Rect,
}

fn check_source(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(BookError::InvalidDimensions {
            width: width as f64,
            height: height as f64,
        });
    }
    Ok(())
}

fn check_ratio(box_ratio: f64) -> Result<()> {
    if !box_ratio.is_finite() || box_ratio <= 0.0 {
        return Err(BookError::InvalidDimensions {
            width: box_ratio,
            height: 1.0,
        });
    }
    Ok(())
}

/// Largest crop with aspect ratio `box_ratio` that fits in the source
pub fn cover_crop_size(width: u32, height: u32, box_ratio: f64) -> Result<(u32, u32)> {
    check_source(width, height)?;
    check_ratio(box_ratio)?;

    let image_ratio = width as f64 / height as f64;
    let size = if image_ratio >= box_ratio {
        let crop_w = (height as f64 * box_ratio).floor() as u32;
        (crop_w.clamp(1, width), height)
    } else {
        let crop_h = (width as f64 / box_ratio).floor() as u32;
        (width, crop_h.clamp(1, height))
    };
    Ok(size)
}

/// Subject-aware crop.
///
/// Without regions the cover crop is centred. Otherwise it is centred on the
/// area-weighted centroid of the regions, then slid just enough to contain
/// their padded union box. When the union is larger than the crop the crop
/// stays inside the union, as close to the centroid as possible.
pub fn auto_crop(width: u32, height: u32, box_ratio: f64, regions: &[Region]) -> Result<CropRect> {
    let (crop_w, crop_h) = cover_crop_size(width, height, box_ratio)?;

    let regions: Vec<Region> = regions
        .iter()
        .filter_map(|r| clip_region(r, width, height))
        .collect();
    let total_area: f64 = regions.iter().map(|r| r.area() as f64).sum();

    if regions.is_empty() || total_area <= 0.0 {
        return Ok(CropRect::new(
            (width - crop_w) / 2,
            (height - crop_h) / 2,
            crop_w,
            crop_h,
        ));
    }

    let mut centroid_x = 0.0;
    let mut centroid_y = 0.0;
    for r in &regions {
        let area = r.area() as f64;
        centroid_x += (r.x as f64 + r.width as f64 / 2.0) * area;
        centroid_y += (r.y as f64 + r.height as f64 / 2.0) * area;
    }
    centroid_x /= total_area;
    centroid_y /= total_area;

    let left = regions.iter().map(|r| r.x).min().unwrap_or(0);
    let top = regions.iter().map(|r| r.y).min().unwrap_or(0);
    let right = regions.iter().map(Region::right).max().unwrap_or(width);
    let bottom = regions.iter().map(Region::bottom).max().unwrap_or(height);

    let x = place_on_axis(width, crop_w, left, right, centroid_x);
    let y = place_on_axis(height, crop_h, top, bottom, centroid_y);

    Ok(CropRect::new(x, y, crop_w, crop_h))
}

/// Intersect a region with the image; `None` when nothing is left
fn clip_region(region: &Region, width: u32, height: u32) -> Option<Region> {
    let x = region.x.min(width);
    let y = region.y.min(height);
    let right = region.x.saturating_add(region.width).min(width);
    let bottom = region.y.saturating_add(region.height).min(height);
    (right > x && bottom > y).then(|| Region::new(x, y, right - x, bottom - y))
}

/// Start of a crop window of `crop` pixels along one axis of `extent`
/// pixels, given the union span `[lo, hi)` and the weighted centroid.
fn place_on_axis(extent: u32, crop: u32, lo: u32, hi: u32, centroid: f64) -> u32 {
    let extent = extent as i64;
    let crop = crop as i64;
    let (lo, hi) = (lo as i64, hi as i64);
    let span = hi - lo;
    let centred = (centroid - crop as f64 / 2.0).round() as i64;

    let start = if span <= crop {
        // margin never pushes a containable union out of the window
        let pad = ((span as f64 * SUBJECT_MARGIN_RATIO).floor() as i64).min((crop - span) / 2);
        let lo = (lo - pad).max(0);
        let hi = (hi + pad).min(extent);

        let mut start = centred;
        if lo < start {
            start = lo;
        }
        if hi > start + crop {
            start = hi - crop;
        }
        start
    } else {
        centred.clamp(lo, hi - crop)
    };

    start.clamp(0, extent - crop) as u32
}

/// Effective zoom: non-finite or non-positive input means 1.0, and the
/// result never drops below the contain scale
pub fn effective_zoom(width: u32, height: u32, box_ratio: f64, zoom: f64) -> Result<f64> {
    check_source(width, height)?;
    check_ratio(box_ratio)?;
    let image_ratio = width as f64 / height as f64;
    let min_zoom = (box_ratio / image_ratio).min(image_ratio / box_ratio);
    let zoom = if zoom.is_finite() && zoom > 0.0 { zoom } else { 1.0 };
    Ok(zoom.max(min_zoom))
}

/// User-directed crop: the cover crop divided by `zoom`, positioned by pan
pub fn pan_zoom_crop(width: u32, height: u32, box_ratio: f64, adjustment: &Adjustment) -> Result<CropRect> {
    let (base_w, base_h) = cover_crop_size(width, height, box_ratio)?;
    let zoom = effective_zoom(width, height, box_ratio, adjustment.zoom)?;
    let (pan_x, pan_y) = adjustment.clamped_pan();

    let crop_w = ((base_w as f64 / zoom).floor() as u32).clamp(1, width);
    let crop_h = ((base_h as f64 / zoom).floor() as u32).clamp(1, height);

    let max_x = width - crop_w;
    let max_y = height - crop_h;
    let x = ((pan_x * max_x as f64).floor() as u32).min(max_x);
    let y = ((pan_y * max_y as f64).floor() as u32).min(max_y);

    Ok(CropRect::new(x, y, crop_w, crop_h))
}

/// Automatic placement filling the whole slot box
pub fn place_auto(width: u32, height: u32, regions: &[Region], slot: &Rect) -> Result<Placement> {
    let crop = auto_crop(width, height, slot.aspect_ratio()?, regions)?;
    Ok(Placement { crop, dest: *slot })
}

/// Placement honouring a user adjustment.
///
/// The image is scaled by `cover * zoom`; on an axis where it ends up smaller
/// than the box, the pan positions it inside the box instead of cropping.
pub fn place_adjusted(width: u32, height: u32, adjustment: &Adjustment, slot: &Rect) -> Result<Placement> {
    let box_ratio = slot.aspect_ratio()?;
    let crop = pan_zoom_crop(width, height, box_ratio, adjustment)?;
    let zoom = effective_zoom(width, height, box_ratio, adjustment.zoom)?;
    let (pan_x, pan_y) = adjustment.clamped_pan();

    let box_w = slot.width as f64;
    let box_h = slot.height as f64;
    let cover = (box_w / width as f64).max(box_h / height as f64);
    let scale = cover * zoom;
    let display_w = width as f64 * scale;
    let display_h = height as f64 * scale;

    let (dest_x, dest_w) = if display_w < box_w {
        (slot.x as f64 + (box_w - display_w) * pan_x, display_w)
    } else {
        (slot.x as f64, box_w)
    };
    // pan_y runs top-down; page y runs bottom-up
    let (dest_y, dest_h) = if display_h < box_h {
        (slot.y as f64 + (box_h - display_h) * (1.0 - pan_y), display_h)
    } else {
        (slot.y as f64, box_h)
    };

    Ok(Placement {
        crop,
        dest: Rect::new(dest_x as f32, dest_y as f32, dest_w as f32, dest_h as f32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_within(crop: &CropRect, width: u32, height: u32) {
        assert!(crop.width > 0 && crop.height > 0);
        assert!(crop.right() <= width, "{:?} exceeds width {}", crop, width);
        assert!(crop.bottom() <= height, "{:?} exceeds height {}", crop, height);
    }

    fn ratio_of(crop: &CropRect) -> f64 {
        crop.width as f64 / crop.height as f64
    }

    #[test]
    fn test_cover_size_wide_image() {
        assert_eq!(cover_crop_size(4000, 2000, 1.0).unwrap(), (2000, 2000));
        assert_eq!(cover_crop_size(3000, 2000, 1.5).unwrap(), (3000, 2000));
    }

    #[test]
    fn test_cover_size_tall_image() {
        assert_eq!(cover_crop_size(2000, 4000, 1.0).unwrap(), (2000, 2000));
        assert_eq!(cover_crop_size(1000, 3000, 0.5).unwrap(), (1000, 2000));
    }

    #[test]
    fn test_zero_source_is_rejected() {
        assert!(matches!(
            cover_crop_size(0, 100, 1.0),
            Err(BookError::InvalidDimensions { .. })
        ));
        assert!(auto_crop(100, 0, 1.0, &[]).is_err());
        assert!(pan_zoom_crop(0, 0, 1.0, &Adjustment::default()).is_err());
    }

    #[test]
    fn test_degenerate_box_is_rejected() {
        assert!(cover_crop_size(100, 100, 0.0).is_err());
        assert!(cover_crop_size(100, 100, f64::INFINITY).is_err());
        assert!(place_auto(100, 100, &[], &Rect::new(0.0, 0.0, 0.0, 10.0)).is_err());
    }

    #[test]
    fn test_no_regions_centres_crop() {
        let crop = auto_crop(4000, 3000, 1.0, &[]).unwrap();
        assert_eq!(crop, CropRect::new(500, 0, 3000, 3000));
    }

    #[test]
    fn test_region_on_the_left_pulls_crop_left() {
        let face = Region::new(100, 1000, 400, 800);
        let crop = auto_crop(4000, 3000, 1.0, &[face]).unwrap();
        assert_eq!(crop.x, 0);
        assert!(crop.contains(&face));
    }

    #[test]
    fn test_region_on_the_right_pulls_crop_right() {
        let face = Region::new(3500, 200, 400, 800);
        let crop = auto_crop(4000, 3000, 1.0, &[face]).unwrap();
        assert_eq!(crop.right(), 4000);
        assert!(crop.contains(&face));
    }

    #[test]
    fn test_vertical_slide_in_tall_image() {
        let person = Region::new(200, 50, 600, 900);
        let crop = auto_crop(1000, 4000, 1.0, &[person]).unwrap();
        assert_eq!((crop.width, crop.height), (1000, 1000));
        assert!(crop.contains(&person));
        assert!(crop.y <= 50);
    }

    #[test]
    fn test_union_wider_than_crop_stays_inside_union() {
        let a = Region::new(0, 100, 500, 500);
        let b = Region::new(3500, 100, 500, 500);
        let crop = auto_crop(4000, 1000, 1.0, &[a, b]).unwrap();
        assert_eq!(crop.width, 1000);
        assert_within(&crop, 4000, 1000);
        assert_eq!(crop.x, 1500);
    }

    #[test]
    fn test_heavier_region_wins_when_union_does_not_fit() {
        let small = Region::new(0, 0, 100, 100);
        let large = Region::new(3000, 0, 1000, 1000);
        let crop = auto_crop(4000, 1000, 1.0, &[small, large]).unwrap();
        assert_within(&crop, 4000, 1000);
        assert!(crop.x > 2900, "crop should sit on the large region: {:?}", crop);
    }

    #[test]
    fn test_regions_outside_image_are_clipped() {
        let off = Region::new(5000, 5000, 10, 10);
        let crop = auto_crop(4000, 3000, 1.0, &[off]).unwrap();
        assert_eq!(crop, auto_crop(4000, 3000, 1.0, &[]).unwrap());

        let partial = Region::new(3900, 100, 500, 500);
        let crop = auto_crop(4000, 3000, 1.0, &[partial]).unwrap();
        assert_within(&crop, 4000, 3000);
        assert_eq!(crop.right(), 4000);
    }

    #[test]
    fn test_auto_crop_bounds_and_ratio_grid() {
        let regions = [Region::new(10, 20, 300, 200), Region::new(700, 500, 100, 400)];
        for &(w, h) in &[(1000u32, 1000u32), (1600, 900), (900, 1600), (1200, 1201), (37, 1000)] {
            for &r in &[0.5, 0.75, 1.0, 1.414, 2.0, 3.3] {
                let crop = auto_crop(w, h, r, &regions).unwrap();
                assert_within(&crop, w, h);
                let tolerance = 1.0 / crop.width.min(crop.height) as f64 + 1e-9;
                assert!(
                    (ratio_of(&crop) - r).abs() / r <= tolerance * 2.0,
                    "ratio {} vs {} for {}x{}",
                    ratio_of(&crop),
                    r,
                    w,
                    h
                );
            }
        }
    }

    #[test]
    fn test_single_containable_region_is_always_contained() {
        let (w, h) = (3000u32, 2000u32);
        for &r in &[0.6, 1.0, 1.5] {
            let (cw, ch) = cover_crop_size(w, h, r).unwrap();
            for &(x, y) in &[(0u32, 0u32), (2500, 1500), (1400, 0), (0, 1900), (2999, 1999), (700, 900)] {
                let rw = (cw / 3).min(w - x).max(1);
                let rh = (ch / 2).min(h - y).max(1);
                let region = Region::new(x, y, rw, rh);
                let crop = auto_crop(w, h, r, &[region]).unwrap();
                assert!(crop.contains(&region), "{:?} not in {:?} (ratio {})", region, crop, r);
            }
        }
    }

    #[test]
    fn test_region_filling_crop_exactly_is_contained() {
        let region = Region::new(1000, 0, 2000, 2000);
        let crop = auto_crop(4000, 2000, 1.0, &[region]).unwrap();
        assert_eq!(crop, CropRect::new(1000, 0, 2000, 2000));
    }

    #[test]
    fn test_default_adjustment_matches_centred_cover() {
        for &(w, h, r) in &[(4000u32, 3000u32, 1.0), (3001, 2000, 0.7), (1000, 3000, 1.9), (500, 500, 1.0)] {
            assert_eq!(
                pan_zoom_crop(w, h, r, &Adjustment::default()).unwrap(),
                auto_crop(w, h, r, &[]).unwrap()
            );
        }
    }

    #[test]
    fn test_zoom_magnifies_and_pan_positions() {
        let adjustment = Adjustment {
            pan_x: 0.0,
            pan_y: 1.0,
            zoom: 2.0,
            ..Default::default()
        };
        let crop = pan_zoom_crop(4000, 3000, 1.0, &adjustment).unwrap();
        assert_eq!(crop, CropRect::new(0, 1500, 1500, 1500));
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let wild = Adjustment {
            pan_x: 7.0,
            pan_y: f64::NAN,
            zoom: 0.01,
            ..Default::default()
        };
        let crop = pan_zoom_crop(4000, 2000, 1.0, &wild).unwrap();
        assert_eq!(crop, CropRect::new(0, 0, 4000, 2000));

        let nan_zoom = Adjustment {
            zoom: f64::NAN,
            ..Default::default()
        };
        assert_eq!(
            pan_zoom_crop(4000, 2000, 1.0, &nan_zoom).unwrap(),
            pan_zoom_crop(4000, 2000, 1.0, &Adjustment::default()).unwrap()
        );
    }

    #[test]
    fn test_huge_zoom_keeps_positive_crop() {
        let adjustment = Adjustment {
            zoom: 1e9,
            ..Default::default()
        };
        let crop = pan_zoom_crop(400, 300, 1.0, &adjustment).unwrap();
        assert_eq!((crop.width, crop.height), (1, 1));
        assert_within(&crop, 400, 300);
    }

    #[test]
    fn test_place_auto_fills_slot() {
        let slot = Rect::new(10.0, 20.0, 300.0, 200.0);
        let placement = place_auto(3000, 2000, &[], &slot).unwrap();
        assert_eq!(placement.dest, slot);
        assert_eq!(placement.crop, CropRect::new(0, 0, 3000, 2000));
    }

    #[test]
    fn test_place_adjusted_cover_fills_slot() {
        let slot = Rect::new(10.0, 20.0, 200.0, 200.0);
        let placement = place_adjusted(4000, 2000, &Adjustment::default(), &slot).unwrap();
        assert_eq!(placement.dest, slot);
        assert_eq!(placement.crop, CropRect::new(1000, 0, 2000, 2000));
    }

    #[test]
    fn test_place_adjusted_contain_leaves_space() {
        let slot = Rect::new(0.0, 0.0, 200.0, 200.0);
        let adjustment = Adjustment {
            pan_x: 0.5,
            pan_y: 0.0,
            zoom: 0.1,
            ..Default::default()
        };
        let placement = place_adjusted(4000, 2000, &adjustment, &slot).unwrap();
        assert_eq!(placement.crop, CropRect::new(0, 0, 4000, 2000));
        assert!((placement.dest.width - 200.0).abs() < 1e-3);
        assert!((placement.dest.height - 100.0).abs() < 1e-3);
        // pan_y 0 shows the image against the top edge
        assert!((placement.dest.top() - 200.0).abs() < 1e-3);
    }

    /// Visible source window computed from the scaled image offset
    fn placement_space_window(width: u32, height: u32, slot: &Rect, adjustment: &Adjustment) -> (f64, f64, f64, f64) {
        let (bw, bh) = (slot.width as f64, slot.height as f64);
        let zoom = effective_zoom(width, height, bw / bh, adjustment.zoom).unwrap();
        let scale = (bw / width as f64).max(bh / height as f64) * zoom;
        let (pan_x, pan_y) = adjustment.clamped_pan();
        let axis = |extent: u32, box_len: f64, pan: f64| {
            let display = extent as f64 * scale;
            let offset = -(display - box_len) * pan;
            let start = (-offset).max(0.0) / scale;
            let end = ((box_len - offset).min(display)) / scale;
            (start, end - start)
        };
        let (x, w) = axis(width, bw, pan_x);
        let (y, h) = axis(height, bh, pan_y);
        (x, y, w, h)
    }

    #[test]
    fn test_both_formulations_show_the_same_window() {
        let slot = Rect::new(0.0, 0.0, 300.0, 200.0);
        for &(pan_x, pan_y, zoom) in &[(0.5, 0.5, 1.0), (0.0, 1.0, 1.7), (0.3, 0.8, 3.0), (1.0, 0.0, 0.4)] {
            let adjustment = Adjustment {
                pan_x,
                pan_y,
                zoom,
                ..Default::default()
            };
            let crop = pan_zoom_crop(4000, 2000, 1.5, &adjustment).unwrap();
            let (x, y, w, h) = placement_space_window(4000, 2000, &slot, &adjustment);
            assert!((crop.x as f64 - x).abs() <= 1.0, "x {} vs {}", crop.x, x);
            assert!((crop.y as f64 - y).abs() <= 1.0, "y {} vs {}", crop.y, y);
            assert!((crop.width as f64 - w).abs() <= 1.0, "w {} vs {}", crop.width, w);
            assert!((crop.height as f64 - h).abs() <= 1.0, "h {} vs {}", crop.height, h);
        }
    }
}
