//! Row-shape selector port
//!
//! Isolates the assumption about where the target rows live in the page, so
//! the layout can be swapped without touching extraction or transformation.

use scraper::Html;

use crate::domain::result::Result;

/// Given a parsed document, return its data rows as ordered cell texts
pub trait RowShapeSelector: Send + Sync {
    fn select_rows(&self, document: &Html) -> Result<Vec<Vec<String>>>;
}
