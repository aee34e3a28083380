use std::path::Path;

use crate::book::{Book, BookPage, PageKind, PhotoPlacement};
use crate::constants::mm_to_pt;
use crate::crop::{place_adjusted, place_auto};
use crate::layout::{PageSide, usable_area};
use crate::options::BookOptions;
use crate::types::{BookError, Result};

use super::{Schema, SchemaPage};

impl Schema {
    /// Resolve every page's geometry for rendering.
    ///
    /// Boxes come from each page's stored layout inside the usable area of
    /// its side. Photos with a framing adjustment use the pan/zoom placement,
    /// the rest the subject-aware crop.
    pub fn to_book(&self, root: &Path, options: &BookOptions) -> Result<Book> {
        let (page_width_pt, page_height_pt) = options.page_size_pt();
        let gap = mm_to_pt(options.margins.gap_mm);

        let pages = self
            .pages
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let number = index + 1;
                let placements = if page.is_content() {
                    place_photos(root, page, number, page_width_pt, page_height_pt, options, gap)?
                } else {
                    Vec::new()
                };
                Ok(BookPage {
                    number,
                    kind: page.kind,
                    layout: page.is_content().then_some(page.layout),
                    title: page.title.clone(),
                    subtitle: page.subtitle.clone(),
                    period: page.period.clone(),
                    image: page.image.as_ref().map(|image| root.join(image)),
                    placements,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Book {
            page_width_pt,
            page_height_pt,
            pages,
        })
    }
}

fn place_photos(
    root: &Path,
    page: &SchemaPage,
    number: usize,
    page_width_pt: f32,
    page_height_pt: f32,
    options: &BookOptions,
    gap: f32,
) -> Result<Vec<PhotoPlacement>> {
    debug_assert_eq!(page.kind, PageKind::Content);
    if page.photos.is_empty() {
        return Err(BookError::Structure(format!("content page {} has no photos", number)));
    }

    let area = usable_area(page_width_pt, page_height_pt, &options.margins, PageSide::for_page(number));
    let boxes = page.layout.boxes(&area, gap);

    let mut placements = Vec::with_capacity(page.photos.len());
    for photo in &page.photos {
        let Some(slot) = boxes.get(photo.slot_index) else {
            log::warn!(
                "Page {}: {} has slot {} but {} has only {} boxes, skipping",
                number,
                photo.id(),
                photo.slot_index,
                page.layout,
                boxes.len()
            );
            continue;
        };
        let (width, height) = (photo.photo.width, photo.photo.height);
        if width == 0 || height == 0 {
            log::warn!("Page {}: {} has no pixel dimensions, skipping", number, photo.id());
            continue;
        }

        let placement = match photo.adjustment.filter(|a| a.has_framing()) {
            Some(adjustment) => place_adjusted(width, height, &adjustment, slot)?,
            None => place_auto(width, height, &photo.photo.regions, slot)?,
        };
        placements.push(PhotoPlacement {
            photo_id: photo.photo.id.clone(),
            path: root.join(&photo.photo.id),
            slot: *slot,
            crop: placement.crop,
            dest: placement.dest,
        });
    }
    Ok(placements)
}
