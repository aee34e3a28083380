//! Page layout calculation
//!
//! - Template geometry (boxes per grid)
//! - Template choice for a photo group
//! - Usable area per page side

mod page;
mod select;
mod templates;
mod types;

pub use page::*;
pub use select::*;
pub use types::*;
