//! Result and error types for the core library

use thiserror::Error;

/// Core library error type
///
/// Every variant is fatal for a pipeline run. `kind()` gives a stable label
/// that the progress log and the CLI report alongside the message.
#[derive(Error, Debug)]
pub enum Error {
    /// The source document (or a remote rate resource) could not be fetched
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// The expected table / row / cell layout was not found in the document
    #[error("Structure error: {0}")]
    Structure(String),

    /// A value cell is not numeric text
    #[error("Parse error: {0}")]
    Parse(String),

    /// A target currency is absent from the rate table
    #[error("Missing rate: no conversion rate for currency '{0}'")]
    MissingRate(String),

    /// The rate resource is malformed (bad header, duplicate or invalid rate)
    #[error("Rate table error: {0}")]
    RateTable(String),

    /// Writing the flat file or the relational table failed
    #[error("Sink error: {0}")]
    Sink(String),

    /// A read query was rejected or failed to execute
    #[error("Query error: {0}")]
    Query(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    pub fn structure(msg: impl Into<String>) -> Self {
        Self::Structure(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn rate_table(msg: impl Into<String>) -> Self {
        Self::RateTable(msg.into())
    }

    pub fn sink(msg: impl Into<String>) -> Self {
        Self::Sink(msg.into())
    }

    pub fn query(msg: impl Into<String>) -> Self {
        Self::Query(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Stable, machine-friendly name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Fetch(_) => "FetchError",
            Error::Structure(_) => "StructureError",
            Error::Parse(_) => "ParseError",
            Error::MissingRate(_) => "MissingRateError",
            Error::RateTable(_) => "RateTableError",
            Error::Sink(_) => "SinkError",
            Error::Query(_) => "QueryError",
            Error::Config(_) => "ConfigError",
            Error::Io(_) => "IoError",
            Error::Json(_) => "JsonError",
        }
    }
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(Error::structure("no tbody").kind(), "StructureError");
        assert_eq!(Error::MissingRate("JPY".into()).kind(), "MissingRateError");
        assert_eq!(Error::query("bad").kind(), "QueryError");
    }

    #[test]
    fn test_display_includes_kind_context() {
        let err = Error::MissingRate("JPY".into());
        assert!(err.to_string().contains("JPY"));

        let err = Error::sink("disk full");
        assert_eq!(err.to_string(), "Sink error: disk full");
    }
}
