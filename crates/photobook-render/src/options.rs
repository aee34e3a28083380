use crate::types::{RenderError, Result};

/// Output settings for the PDF writer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Embedded photos are downsampled to this resolution at their printed size
    pub image_dpi: f32,
    /// Document title stored in the PDF metadata
    pub document_title: String,
    // Fallback text on cover, divider and back cover pages
    pub title_font_size: f32,
    pub subtitle_font_size: f32,
    pub period_font_size: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_dpi: 300.0,
            document_title: "Photobook".to_string(),
            title_font_size: 48.0,
            subtitle_font_size: 28.0,
            period_font_size: 20.0,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.image_dpi > 0.0) {
            return Err(RenderError::Config(format!(
                "Image resolution must be positive, got {} dpi",
                self.image_dpi
            )));
        }
        let sizes = [self.title_font_size, self.subtitle_font_size, self.period_font_size];
        if sizes.iter().any(|size| !(*size > 0.0)) {
            return Err(RenderError::Config("Font sizes must be positive".to_string()));
        }
        Ok(())
    }
}
