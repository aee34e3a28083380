use std::path::Path;

use photobook_layout::*;
use photobook_render::*;

fn write_image(path: &Path, width: u32, height: u32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    image::RgbImage::from_pixel(width, height, image::Rgb([30, 140, 200]))
        .save(path)
        .unwrap();
}

fn title_page(number: usize, kind: PageKind, title: &str, image: Option<&Path>) -> BookPage {
    BookPage {
        number,
        kind,
        layout: None,
        title: Some(title.to_string()),
        subtitle: Some("subtitle".to_string()),
        period: None,
        image: image.map(Path::to_path_buf),
        placements: Vec::new(),
    }
}

fn placement(path: &Path, slot: Rect) -> PhotoPlacement {
    PhotoPlacement {
        photo_id: path.file_name().unwrap().to_string_lossy().into_owned(),
        path: path.to_path_buf(),
        slot,
        crop: CropRect::new(0, 0, 80, 60),
        dest: slot,
    }
}

fn small_book(dir: &Path) -> Book {
    let photo = dir.join("a.png");
    write_image(&photo, 80, 60);
    let cover = dir.join("cover.jpg");
    write_image(&cover, 40, 30);

    let left = Rect::new(20.0, 20.0, 180.0, 200.0);
    let right = Rect::new(210.0, 20.0, 180.0, 200.0);
    Book {
        page_width_pt: 400.0,
        page_height_pt: 240.0,
        pages: vec![
            title_page(1, PageKind::Cover, "Book", Some(&cover)),
            title_page(2, PageKind::Divider, "2020", None),
            BookPage {
                number: 3,
                kind: PageKind::Content,
                layout: Some(LayoutTemplate::L2H),
                title: None,
                subtitle: None,
                period: None,
                image: None,
                placements: vec![placement(&photo, left), placement(&dir.join("missing.png"), right)],
            },
            title_page(4, PageKind::BackCover, "The end", Some(&dir.join("nope.jpg"))),
        ],
    }
}

#[test]
fn test_render_book_bytes_skips_unreadable_photos() {
    let dir = tempfile::tempdir().unwrap();
    let book = small_book(dir.path());

    let (bytes, summary) = render_book_bytes(&book, &RenderOptions::default()).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
    assert_eq!(
        summary,
        RenderSummary {
            pages: 4,
            photos: 1,
            skipped_photos: 1,
        }
    );
}

#[tokio::test]
async fn test_render_book_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let book = small_book(dir.path());
    let output = dir.path().join("book.pdf");

    let summary = render_book(&book, &RenderOptions::default(), &output)
        .await
        .unwrap();
    assert_eq!(summary.pages, 4);

    let bytes = tokio::fs::read(&output).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_invalid_options_are_rejected_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let book = small_book(dir.path());
    let output = dir.path().join("book.pdf");
    let options = RenderOptions {
        image_dpi: -1.0,
        ..Default::default()
    };

    let result = render_book(&book, &options, &output).await;
    assert!(matches!(result, Err(RenderError::Config(_))));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_planned_schema_renders_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a", "b", "c", "d", "e"] {
        write_image(&dir.path().join("2020").join(format!("{}.png", name)), 120, 90);
    }

    let options = BookOptions::default();
    let sections = discover_sections(dir.path(), &options).await.unwrap();
    let sections = analyze_sections(dir.path(), sections, DetectionCascade::new())
        .await
        .unwrap();
    let schema = Schema::generate(dir.path(), &sections, &options, &Adjustments::new()).unwrap();
    let book = schema.to_book(dir.path(), &options).unwrap();

    let output = dir.path().join("book.pdf");
    let summary = render_book(&book, &RenderOptions::default(), &output)
        .await
        .unwrap();
    // cover, divider, quad page, single page, back cover
    assert_eq!(summary.pages, 5);
    assert_eq!(summary.photos, 5);
    assert_eq!(summary.skipped_photos, 0);
}
