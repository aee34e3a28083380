mod options;
mod pdf;
pub mod raster;
mod types;

pub use options::RenderOptions;
pub use pdf::{RenderSummary, render_book, render_book_bytes};
pub use types::*;
