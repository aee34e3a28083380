use std::path::Path;

use crate::book::PageKind;
use crate::detect::DetectionCascade;
use crate::discover::{SectionPhotos, analyze_sections, discover_sections};
use crate::grouping::group_items;
use crate::layout::choose_layout;
use crate::options::BookOptions;
use crate::photo::Adjustments;
use crate::types::Result;

use super::{Schema, SchemaPage, SchemaPhoto};

impl Schema {
    /// Discover and analyze a photobook root and plan it from scratch.
    ///
    /// The legacy adjustment file, when present, is applied while grouping,
    /// so the new schema counts as migrated.
    pub async fn plan(root: impl AsRef<Path>, options: &BookOptions) -> Result<Self> {
        let root = root.as_ref();
        let sections = discover_sections(root, options).await?;
        let cascade = DetectionCascade::from_options(&options.detection);
        if cascade.is_empty() {
            log::info!("No subject detectors configured, cropping will be centred");
        }
        let sections = analyze_sections(root, sections, cascade).await?;
        let legacy = Adjustments::load_legacy(root).await?;

        let mut schema = Self::generate(root, &sections, options, &legacy)?;
        schema.legacy_migrated = true;
        Ok(schema)
    }

    /// Plan a fresh book: cover, then a divider and grouped content pages
    /// per section, then the back cover.
    ///
    /// Adjustments (typically from the legacy file) are attached before
    /// grouping so their slot types shape the pages.
    pub fn generate(
        root: &Path,
        sections: &[SectionPhotos],
        options: &BookOptions,
        adjustments: &Adjustments,
    ) -> Result<Self> {
        let covers = Path::new(&options.covers_dir);
        let cover_image = |name: String| -> Option<String> {
            let relative = covers.join(&name);
            root.join(&relative)
                .is_file()
                .then(|| relative.to_string_lossy().replace('\\', "/"))
        };

        let mut pages = Vec::new();

        let mut cover = SchemaPage::titled(PageKind::Cover, Some(options.title.clone()), options.subtitle.clone());
        cover.period = options.period.clone();
        cover.image = cover_image("cover.jpg".to_string());
        pages.push(cover);

        for section in sections {
            let mut divider = SchemaPage::titled(
                PageKind::Divider,
                Some(section.title.clone()),
                section.subtitle.clone(),
            );
            divider.image = cover_image(format!("divider_{}.jpg", section.folder.to_lowercase()));
            pages.push(divider);

            let items: Vec<SchemaPhoto> = section
                .photos
                .iter()
                .map(|photo| SchemaPhoto::new(photo.clone(), 0, adjustments.get(&photo.id).copied()))
                .collect();
            let before = pages.len();
            pages.extend(paginate(items)?);
            log::info!(
                "Section '{}': {} photos on {} pages",
                section.folder,
                section.photos.len(),
                pages.len() - before
            );
        }

        let mut back = SchemaPage::titled(
            PageKind::BackCover,
            options.back_title.clone(),
            options.back_subtitle.clone(),
        );
        back.image = cover_image("back_cover.jpg".to_string());
        pages.push(back);

        Ok(Schema {
            pages,
            ..Default::default()
        })
    }
}

/// Group photos into content pages, ordering each page's photos by slot
pub(super) fn paginate(items: Vec<SchemaPhoto>) -> Result<Vec<SchemaPage>> {
    let groups = group_items(&items);
    let mut pages = Vec::with_capacity(groups.len());

    for group in groups {
        let members = &items[group.range()];
        let (layout, order) = choose_layout(members)?;
        let photos = order
            .iter()
            .enumerate()
            .map(|(slot, &i)| {
                let mut photo = members[i].clone();
                photo.slot_index = slot;
                photo
            })
            .collect();
        pages.push(SchemaPage::content(layout, photos));
    }
    Ok(pages)
}
