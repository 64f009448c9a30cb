//! HTTP document source
//!
//! Blocking reqwest client used for the source page and for remote rate files.

use reqwest::blocking::{Client, Response};

use crate::domain::result::{Error, Result};
use crate::ports::DocumentSource;

/// Fetches documents over HTTP(S)
#[derive(Debug)]
pub struct HttpDocumentSource {
    client: Client,
}

impl HttpDocumentSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("bankcap/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::fetch(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    fn map_request_error(&self, location: &str, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::fetch(format!("Request to {} timed out", location))
        } else if error.is_connect() {
            Error::fetch(format!("Unable to connect to {}", location))
        } else {
            Error::fetch(format!("Request to {} failed: {}", location, error))
        }
    }

    fn check_response_status(&self, location: &str, response: &Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::fetch(format!(
                "{} returned HTTP {}",
                location,
                status.as_u16()
            )))
        }
    }
}

impl DocumentSource for HttpDocumentSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, location: &str) -> Result<String> {
        let response = self
            .client
            .get(location)
            .send()
            .map_err(|e| self.map_request_error(location, e))?;

        self.check_response_status(location, &response)?;

        response
            .text()
            .map_err(|e| Error::fetch(format!("Failed to read response from {}: {}", location, e)))
    }
}
