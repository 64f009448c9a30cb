//! Location-dispatching document source
//!
//! Routes `http://` and `https://` locations to the HTTP client and everything
//! else (plain paths, `file://` URLs) to the local file reader.

use url::Url;

use super::file::FileDocumentSource;
use super::http::HttpDocumentSource;
use crate::domain::result::Result;
use crate::ports::DocumentSource;

/// Whether a location should be fetched over the network
pub fn is_remote(location: &str) -> bool {
    matches!(
        Url::parse(location).map(|u| u.scheme().to_ascii_lowercase()),
        Ok(scheme) if scheme == "http" || scheme == "https"
    )
}

#[derive(Debug)]
pub struct LocationDocumentSource {
    http: HttpDocumentSource,
    file: FileDocumentSource,
}

impl LocationDocumentSource {
    pub fn new() -> Result<Self> {
        Ok(Self {
            http: HttpDocumentSource::new()?,
            file: FileDocumentSource::new(),
        })
    }
}

impl DocumentSource for LocationDocumentSource {
    fn name(&self) -> &str {
        "location"
    }

    fn fetch(&self, location: &str) -> Result<String> {
        if is_remote(location) {
            self.http.fetch(location)
        } else {
            self.file.fetch(location)
        }
    }
}
