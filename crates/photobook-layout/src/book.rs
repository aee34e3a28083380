//! Planned book: pages with resolved geometry, ready to render

use std::path::PathBuf;

use serde::Serialize;

use crate::crop::CropRect;
use crate::layout::{LayoutTemplate, Rect};

/// Kind of page in the book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Cover,
    /// Section divider
    Divider,
    Content,
    BackCover,
}

impl PageKind {
    pub fn name(self) -> &'static str {
        match self {
            PageKind::Cover => "cover",
            PageKind::Divider => "divider",
            PageKind::Content => "content",
            PageKind::BackCover => "back_cover",
        }
    }
}

/// One photo drawn on a content page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoPlacement {
    pub photo_id: String,
    /// Source file
    pub path: PathBuf,
    /// Template box the photo occupies
    pub slot: Rect,
    pub crop: CropRect,
    /// Where the cropped pixels are drawn
    pub dest: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPage {
    /// 1-based page number
    pub number: usize,
    pub kind: PageKind,
    pub layout: Option<LayoutTemplate>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub period: Option<String>,
    /// Pre-generated full-page image for cover and divider pages
    pub image: Option<PathBuf>,
    pub placements: Vec<PhotoPlacement>,
}

/// A fully planned book in page points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Book {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub pages: Vec<BookPage>,
}

impl Book {
    pub fn content_pages(&self) -> impl Iterator<Item = &BookPage> {
        self.pages.iter().filter(|p| p.kind == PageKind::Content)
    }

    pub fn placement_count(&self) -> usize {
        self.pages.iter().map(|p| p.placements.len()).sum()
    }
}
