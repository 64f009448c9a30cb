//! Local file document source
//!
//! Reads a saved copy of a document from disk. Accepts plain paths and
//! `file://` URLs.

use std::path::PathBuf;

use url::Url;

use crate::domain::result::{Error, Result};
use crate::ports::DocumentSource;

#[derive(Debug, Default)]
pub struct FileDocumentSource;

impl FileDocumentSource {
    pub fn new() -> Self {
        Self
    }

    fn to_path(location: &str) -> Result<PathBuf> {
        if location.starts_with("file:") {
            let url = Url::parse(location)
                .map_err(|e| Error::fetch(format!("Invalid file URL {}: {}", location, e)))?;
            url.to_file_path()
                .map_err(|_| Error::fetch(format!("Not a local file URL: {}", location)))
        } else {
            Ok(PathBuf::from(location))
        }
    }
}

impl DocumentSource for FileDocumentSource {
    fn name(&self) -> &str {
        "file"
    }

    fn fetch(&self, location: &str) -> Result<String> {
        let path = Self::to_path(location)?;
        std::fs::read_to_string(&path)
            .map_err(|e| Error::fetch(format!("Failed to read {}: {}", path.display(), e)))
    }
}
