use std::collections::BTreeMap;

use crate::book::PageKind;
use crate::schema::Schema;
use crate::types::*;

/// Calculate statistics for a planned photobook
pub fn calculate_statistics(schema: &Schema) -> BookStatistics {
    let mut pages_per_layout = BTreeMap::new();
    let mut sections = 0;
    let mut content_pages = 0;

    for page in &schema.pages {
        match page.kind {
            PageKind::Divider => sections += 1,
            PageKind::Content => {
                content_pages += 1;
                *pages_per_layout.entry(page.layout).or_insert(0) += 1;
            }
            PageKind::Cover | PageKind::BackCover => {}
        }
    }

    let photos: Vec<_> = schema.photos().collect();

    BookStatistics {
        photos: photos.len(),
        sections,
        content_pages,
        total_pages: schema.pages.len(),
        pages_per_layout,
        photos_with_subjects: photos.iter().filter(|p| !p.photo.regions.is_empty()).count(),
        adjusted_photos: photos.iter().filter(|p| p.adjustment.is_some()).count(),
    }
}
