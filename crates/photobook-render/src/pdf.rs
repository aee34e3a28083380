use std::path::Path;

use image::RgbImage;
use photobook_layout::constants::HELVETICA_CHAR_WIDTH_RATIO;
use photobook_layout::{Book, BookPage, PageKind, PhotoPlacement, Rect};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, TextItem, XObjectTransform,
};

use crate::options::RenderOptions;
use crate::raster::{load_cropped, load_page_image, to_raw_image};
use crate::types::Result;

/// What ended up in the document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub pages: usize,
    pub photos: usize,
    /// Photos that could not be read and were left out
    pub skipped_photos: usize,
}

/// Render a planned book to a PDF file
pub async fn render_book(
    book: &Book,
    options: &RenderOptions,
    output_path: impl AsRef<Path>,
) -> Result<RenderSummary> {
    options.validate()?;
    let book = book.clone();
    let options = options.clone();
    let output_path = output_path.as_ref().to_owned();

    // decoding and resampling is CPU-bound
    let (bytes, summary) =
        tokio::task::spawn_blocking(move || render_book_bytes(&book, &options)).await??;

    tokio::fs::write(&output_path, bytes).await?;
    log::info!(
        "Wrote {} pages with {} photos to {}",
        summary.pages,
        summary.photos,
        output_path.display()
    );

    Ok(summary)
}

/// Render a planned book to PDF bytes.
///
/// Photos that fail to load are skipped with a warning; the page keeps its
/// other photos.
pub fn render_book_bytes(book: &Book, options: &RenderOptions) -> Result<(Vec<u8>, RenderSummary)> {
    let mut doc = PdfDocument::new(&options.document_title);
    let mut summary = RenderSummary::default();

    let width = Mm::from(Pt(book.page_width_pt));
    let height = Mm::from(Pt(book.page_height_pt));

    let mut pages = Vec::with_capacity(book.pages.len());
    for page in &book.pages {
        let ops = match page.kind {
            PageKind::Content => content_ops(&mut doc, page, options, &mut summary),
            PageKind::Cover | PageKind::Divider | PageKind::BackCover => {
                title_page_ops(&mut doc, page, book, options)
            }
        };
        pages.push(PdfPage::new(width, height, ops));
    }
    summary.pages = pages.len();
    doc.pages = pages;

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warnings", warnings.len());
    }

    Ok((bytes, summary))
}

fn content_ops(
    doc: &mut PdfDocument,
    page: &BookPage,
    options: &RenderOptions,
    summary: &mut RenderSummary,
) -> Vec<Op> {
    let mut ops = Vec::with_capacity(page.placements.len());
    for placement in &page.placements {
        match photo_op(doc, placement, options.image_dpi) {
            Ok(op) => {
                ops.push(op);
                summary.photos += 1;
            }
            Err(e) => {
                log::warn!(
                    "Page {}: skipping {}: {}",
                    page.number,
                    placement.path.display(),
                    e
                );
                summary.skipped_photos += 1;
            }
        }
    }
    ops
}

fn photo_op(doc: &mut PdfDocument, placement: &PhotoPlacement, dpi: f32) -> Result<Op> {
    let pixels = load_cropped(&placement.path, &placement.crop, &placement.dest, dpi)?;
    Ok(image_op(doc, pixels, &placement.dest))
}

/// Cover, divider and back cover: the pre-generated image stretched over the
/// page, or centred text when there is none
fn title_page_ops(doc: &mut PdfDocument, page: &BookPage, book: &Book, options: &RenderOptions) -> Vec<Op> {
    if let Some(path) = &page.image {
        match load_page_image(path, book.page_width_pt, book.page_height_pt, options.image_dpi) {
            Ok(pixels) => {
                let full_page = Rect::new(0.0, 0.0, book.page_width_pt, book.page_height_pt);
                return vec![image_op(doc, pixels, &full_page)];
            }
            Err(e) => log::warn!(
                "Page {}: cannot use {} ({}), falling back to text",
                page.number,
                path.display(),
                e
            ),
        }
    }

    let mut ops = Vec::new();
    let lines = [
        (page.title.as_deref(), BuiltinFont::HelveticaBold, options.title_font_size, 0.55),
        (page.subtitle.as_deref(), BuiltinFont::Helvetica, options.subtitle_font_size, 0.45),
        (page.period.as_deref(), BuiltinFont::Helvetica, options.period_font_size, 0.37),
    ];
    for (text, font, size, height_ratio) in lines {
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            let y = book.page_height_pt * height_ratio;
            ops.extend(centered_text(text, font, size, book.page_width_pt, y));
        }
    }
    ops
}

fn image_op(doc: &mut PdfDocument, pixels: RgbImage, dest: &Rect) -> Op {
    let (width, height) = pixels.dimensions();
    let id = doc.add_image(&to_raw_image(pixels));
    // at 72 dpi one pixel is one point
    Op::UseXobject {
        id,
        transform: XObjectTransform {
            translate_x: Some(Pt(dest.x)),
            translate_y: Some(Pt(dest.y)),
            rotate: None,
            scale_x: Some(dest.width / width as f32),
            scale_y: Some(dest.height / height as f32),
            dpi: Some(72.0),
        },
    }
}

/// Estimated width of Helvetica text in points
fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * HELVETICA_CHAR_WIDTH_RATIO
}

fn centered_text(text: &str, font: BuiltinFont, size: f32, page_width: f32, y: f32) -> Vec<Op> {
    let x = ((page_width - text_width(text, size)) / 2.0).max(0.0);
    vec![
        Op::StartTextSection,
        Op::SetTextCursor {
            pos: Point { x: Pt(x), y: Pt(y) },
        },
        Op::SetFontSizeBuiltinFont {
            font,
            size: Pt(size),
        },
        Op::WriteTextBuiltinFont {
            items: vec![TextItem::Text(text.to_string())],
            font,
        },
        Op::EndTextSection,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_width_scales_with_length() {
        assert_eq!(text_width("", 20.0), 0.0);
        assert_eq!(text_width("abcd", 10.0), 4.0 * 10.0 * HELVETICA_CHAR_WIDTH_RATIO);
    }

    #[test]
    fn test_centered_text_is_centred() {
        let ops = centered_text("abcd", BuiltinFont::Helvetica, 10.0, 100.0, 50.0);
        assert_eq!(ops.len(), 5);
        match &ops[1] {
            Op::SetTextCursor { pos } => {
                let expected = (100.0 - text_width("abcd", 10.0)) / 2.0;
                assert!((pos.x.0 - expected).abs() < 1e-4);
                assert_eq!(pos.y.0, 50.0);
            }
            _ => panic!("Expected a text cursor"),
        }
    }

    #[test]
    fn test_long_text_starts_at_page_edge() {
        let text = "x".repeat(500);
        let ops = centered_text(&text, BuiltinFont::Helvetica, 20.0, 100.0, 10.0);
        match &ops[1] {
            Op::SetTextCursor { pos } => assert_eq!(pos.x.0, 0.0),
            _ => panic!("Expected a text cursor"),
        }
    }
}
