mod book;
mod classify;
pub mod constants;
mod crop;
pub mod detect;
mod discover;
mod grouping;
mod layout;
mod options;
mod photo;
mod schema;
mod stats;
mod types;

pub use book::{Book, BookPage, PageKind, PhotoPlacement};
pub use classify::classify;
pub use crop::*;
pub use detect::{CommandDetector, Detection, DetectionCascade, RegionDetector};
pub use discover::*;
pub use grouping::{Group, group_items};
pub use layout::*;
pub use options::*;
pub use photo::{Adjustments, LayoutItem, Photo};
pub use schema::{Schema, SchemaPage, SchemaPhoto};
pub use stats::calculate_statistics;
pub use types::*;
