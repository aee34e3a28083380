//! Pixel preparation for embedding: crop, downsample, convert to RGB8

use std::path::Path;

use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use photobook_layout::{CropRect, Rect};
use printpdf::{RawImage, RawImageData, RawImageFormat};

use crate::types::Result;

/// Pixels needed to print `length_pt` points at `dpi`
pub fn target_pixels(length_pt: f32, dpi: f32) -> u32 {
    ((length_pt / 72.0 * dpi).round() as u32).max(1)
}

/// Load a photo and prepare the `crop` window for printing in `dest`
pub fn load_cropped(path: &Path, crop: &CropRect, dest: &Rect, dpi: f32) -> Result<RgbImage> {
    let image = image::open(path)?;
    Ok(crop_and_fit(&image, crop, dest, dpi))
}

/// Load a full-page image, downsampled to the page size at `dpi`
pub fn load_page_image(path: &Path, page_width_pt: f32, page_height_pt: f32, dpi: f32) -> Result<RgbImage> {
    let image = image::open(path)?;
    let whole = CropRect::new(0, 0, image.width(), image.height());
    let page = Rect::new(0.0, 0.0, page_width_pt, page_height_pt);
    Ok(crop_and_fit(&image, &whole, &page, dpi))
}

/// Cut `crop` out of `image` and shrink it to the resolution `dest` needs.
///
/// The crop is clamped to the image. Images are never upsampled.
pub fn crop_and_fit(image: &DynamicImage, crop: &CropRect, dest: &Rect, dpi: f32) -> RgbImage {
    let x = crop.x.min(image.width().saturating_sub(1));
    let y = crop.y.min(image.height().saturating_sub(1));
    let width = crop.width.min(image.width() - x).max(1);
    let height = crop.height.min(image.height() - y).max(1);
    let cropped = image.crop_imm(x, y, width, height);

    let target_w = target_pixels(dest.width, dpi);
    let target_h = target_pixels(dest.height, dpi);
    if target_w < width && target_h < height {
        log::trace!("Downsampling {}x{} to {}x{}", width, height, target_w, target_h);
        cropped.resize_exact(target_w, target_h, FilterType::Lanczos3).to_rgb8()
    } else {
        cropped.to_rgb8()
    }
}

pub fn to_raw_image(image: RgbImage) -> RawImage {
    let (width, height) = image.dimensions();
    RawImage {
        pixels: RawImageData::U8(image.into_raw()),
        width: width as usize,
        height: height as usize,
        data_format: RawImageFormat::RGB8,
        tag: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 0])
        }))
    }

    #[test]
    fn test_target_pixels() {
        assert_eq!(target_pixels(72.0, 300.0), 300);
        assert_eq!(target_pixels(36.0, 144.0), 72);
        assert_eq!(target_pixels(0.0, 300.0), 1);
    }

    #[test]
    fn test_large_crop_is_downsampled() {
        let image = gradient(2000, 1000);
        let crop = CropRect::new(500, 0, 1000, 1000);
        // one inch square at 100 dpi
        let dest = Rect::new(0.0, 0.0, 72.0, 72.0);
        let fitted = crop_and_fit(&image, &crop, &dest, 100.0);
        assert_eq!(fitted.dimensions(), (100, 100));
    }

    #[test]
    fn test_small_crop_is_not_upsampled() {
        let image = gradient(200, 100);
        let crop = CropRect::new(10, 20, 50, 40);
        let dest = Rect::new(0.0, 0.0, 500.0, 400.0);
        let fitted = crop_and_fit(&image, &crop, &dest, 300.0);
        assert_eq!(fitted.dimensions(), (50, 40));
        assert_eq!(fitted.get_pixel(0, 0).0, [10, 20, 0]);
    }

    #[test]
    fn test_crop_is_clamped_to_image() {
        let image = gradient(100, 100);
        let crop = CropRect::new(80, 90, 50, 50);
        let fitted = crop_and_fit(&image, &crop, &Rect::new(0.0, 0.0, 1000.0, 1000.0), 300.0);
        assert_eq!(fitted.dimensions(), (20, 10));
    }

    #[test]
    fn test_raw_image_is_rgb8() {
        let raw = to_raw_image(RgbImage::new(3, 2));
        assert_eq!((raw.width, raw.height), (3, 2));
        match raw.pixels {
            RawImageData::U8(bytes) => assert_eq!(bytes.len(), 3 * 2 * 3),
            _ => panic!("Expected 8-bit pixels"),
        }
    }
}
