use std::ops::Range;

use crate::layout::LayoutTemplate;
use crate::types::{BookError, Result};

use super::generate::paginate;
use super::{Schema, SchemaPhoto};

impl Schema {
    /// Range of content page indices of the section holding `index`
    pub fn section_bounds(&self, index: usize) -> Result<Range<usize>> {
        self.check_content_page(index)?;

        let mut start = index;
        while start > 0 && self.pages[start - 1].is_content() {
            start -= 1;
        }
        let mut end = index + 1;
        while end < self.pages.len() && self.pages[end].is_content() {
            end += 1;
        }
        Ok(start..end)
    }

    /// Change a content page's layout.
    ///
    /// With the same slot count only the template changes; otherwise the
    /// section is repaginated from this page on.
    pub fn set_page_layout(&mut self, index: usize, layout: LayoutTemplate) -> Result<()> {
        self.check_content_page(index)?;
        let page = &mut self.pages[index];
        if page.photos.len() == layout.slot_count() {
            log::debug!("Page {}: {} -> {}", index + 1, page.layout, layout);
            page.layout = layout;
            return Ok(());
        }
        self.redistribute_section(index, layout)
    }

    /// Give the page at `index` the layout `layout` and regroup the rest of
    /// its section.
    ///
    /// Pages before `index` and pages of other sections are untouched. The
    /// edited page takes the next `slot_count` photos in reading order; the
    /// photos after them are grouped again into fresh pages.
    pub fn redistribute_section(&mut self, index: usize, layout: LayoutTemplate) -> Result<()> {
        let bounds = self.section_bounds(index)?;

        let mut remaining: Vec<SchemaPhoto> = self.pages[index..bounds.end]
            .iter_mut()
            .flat_map(|page| {
                page.photos.sort_by_key(|photo| photo.slot_index);
                page.photos.drain(..)
            })
            .collect();

        let take = layout.slot_count().min(remaining.len());
        let rest = remaining.split_off(take);
        for (slot, photo) in remaining.iter_mut().enumerate() {
            photo.slot_index = slot;
        }
        if take < layout.slot_count() {
            log::warn!(
                "Page {}: {} needs {} photos, only {} left in the section",
                index + 1,
                layout,
                layout.slot_count(),
                take
            );
        }

        let page = &mut self.pages[index];
        page.layout = layout;
        page.photos = remaining;

        let new_pages = paginate(rest)?;
        log::info!(
            "Repaginated section from page {}: {} following pages replaced by {}",
            index + 1,
            bounds.end - index - 1,
            new_pages.len()
        );
        self.pages.splice(index + 1..bounds.end, new_pages);
        Ok(())
    }

    fn check_content_page(&self, index: usize) -> Result<()> {
        match self.pages.get(index) {
            Some(page) if page.is_content() => Ok(()),
            Some(page) => Err(BookError::Structure(format!(
                "page {} is a {} page, not a content page",
                index + 1,
                page.kind.name()
            ))),
            None => Err(BookError::Structure(format!(
                "page {} does not exist ({} pages)",
                index + 1,
                self.pages.len()
            ))),
        }
    }
}
