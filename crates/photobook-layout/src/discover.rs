//! Section and photo discovery under a photobook root

use std::path::{Path, PathBuf};

use rayon::prelude::*;

use crate::constants::IMAGE_EXTENSIONS;
use crate::detect::DetectionCascade;
use crate::options::BookOptions;
use crate::photo::Photo;
use crate::types::{BookError, Result};

/// A section folder and the image files found in it
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    /// Folder name as found on disk
    pub folder: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub dir: PathBuf,
    /// Image files sorted by name
    pub files: Vec<PathBuf>,
}

/// A section with analyzed photo metadata, ready for planning
#[derive(Debug, Clone, PartialEq)]
pub struct SectionPhotos {
    pub folder: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub photos: Vec<Photo>,
}

/// Find the book's sections (async wrapper)
pub async fn discover_sections(root: impl AsRef<Path>, options: &BookOptions) -> Result<Vec<Section>> {
    let root = root.as_ref().to_path_buf();
    let options = options.clone();
    tokio::task::spawn_blocking(move || scan_sections(&root, &options)).await?
}

/// Find the book's sections.
///
/// Configured sections must exist (matched case-insensitively); without
/// configuration every visible sub-directory except the covers folder is a
/// section, in name order. Sections without images are skipped.
pub fn scan_sections(root: &Path, options: &BookOptions) -> Result<Vec<Section>> {
    let mut dirs: Vec<String> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    dirs.sort();

    let wanted: Vec<(String, String, Option<String>)> = if options.sections.is_empty() {
        dirs.iter()
            .filter(|name| !name.starts_with('.'))
            .filter(|name| !name.eq_ignore_ascii_case(&options.covers_dir))
            .map(|name| (name.clone(), name.clone(), None))
            .collect()
    } else {
        options
            .sections
            .iter()
            .map(|spec| {
                let folder = dirs
                    .iter()
                    .find(|name| name.eq_ignore_ascii_case(spec.folder.trim()))
                    .ok_or_else(|| BookError::MissingSection(spec.folder.clone()))?;
                let title = spec.title.clone().unwrap_or_else(|| spec.folder.clone());
                Ok((folder.clone(), title, spec.subtitle.clone()))
            })
            .collect::<Result<_>>()?
    };

    let mut sections = Vec::new();
    for (folder, title, subtitle) in wanted {
        let dir = root.join(&folder);
        let files = list_images(&dir)?;
        if files.is_empty() {
            log::warn!("Section '{}' has no images, skipping", folder);
            continue;
        }
        log::info!("Section '{}': {} images", folder, files.len());
        sections.push(Section {
            folder,
            title,
            subtitle,
            dir,
            files,
        });
    }

    if sections.is_empty() {
        return Err(BookError::NoPhotos);
    }
    Ok(sections)
}

/// Image files directly inside `dir`, sorted by file name
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && is_image(path))
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Identifier of a file: its path relative to `root` with `/` separators
pub fn photo_id(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Read dimensions and detect subjects for each file, in parallel.
///
/// The output keeps input order. Unreadable files are skipped with a warning.
pub fn analyze_photos(root: &Path, files: &[PathBuf], cascade: &DetectionCascade) -> Vec<Photo> {
    files
        .par_iter()
        .map(|path| analyze_one(root, path, cascade))
        .collect::<Vec<_>>()
        .into_iter()
        .flatten()
        .collect()
}

fn analyze_one(root: &Path, path: &Path, cascade: &DetectionCascade) -> Option<Photo> {
    let (width, height) = match image::image_dimensions(path) {
        Ok(dims) => dims,
        Err(e) => {
            log::warn!("Skipping unreadable image {}: {}", path.display(), e);
            return None;
        }
    };
    let detection = cascade.detect(path, width, height);
    Some(Photo::new(photo_id(root, path), width, height).with_regions(detection.regions, detection.face_count))
}

/// Analyze every discovered section (async wrapper around [`analyze_photos`])
pub async fn analyze_sections(
    root: impl AsRef<Path>,
    sections: Vec<Section>,
    cascade: DetectionCascade,
) -> Result<Vec<SectionPhotos>> {
    let root = root.as_ref().to_path_buf();
    tokio::task::spawn_blocking(move || {
        sections
            .into_iter()
            .map(|section| {
                let photos = analyze_photos(&root, &section.files, &cascade);
                log::debug!("Analyzed {} photos in '{}'", photos.len(), section.folder);
                SectionPhotos {
                    folder: section.folder,
                    title: section.title,
                    subtitle: section.subtitle,
                    photos,
                }
            })
            .filter(|section| !section.photos.is_empty())
            .collect()
    })
    .await
    .map_err(BookError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_id_uses_forward_slashes() {
        let root = Path::new("/books/family");
        let path = root.join("2021").join("beach.jpg");
        assert_eq!(photo_id(root, &path), "2021/beach.jpg");
    }

    #[test]
    fn test_image_extensions() {
        assert!(is_image(Path::new("a.JPG")));
        assert!(is_image(Path::new("b.tiff")));
        assert!(is_image(Path::new("c.webp")));
        assert!(!is_image(Path::new("notes.txt")));
        assert!(!is_image(Path::new("noext")));
    }
}
