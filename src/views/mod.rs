//! Server-rendered HTML for the search and detail pages.

pub mod detail;
pub mod html;
pub mod image;
pub mod search;

pub use detail::{render_detail, render_region};
pub use search::{render_results, render_search};
