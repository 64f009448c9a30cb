//! Document source port
//!
//! Fetches the raw text of a document (the HTML page, or a remote rate CSV)
//! given its location.

use crate::domain::result::Result;

/// Source of text documents
///
/// Implementations perform exactly one blocking read per call. Failures are
/// reported as `Error::Fetch`.
pub trait DocumentSource: Send + Sync {
    /// Source name (e.g., "http", "file")
    fn name(&self) -> &str;

    /// Fetch the whole document at `location`
    fn fetch(&self, location: &str) -> Result<String>;
}
