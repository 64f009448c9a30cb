//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - reqwest blocking client and local files for DocumentSource
//! - scraper for the RowShapeSelector
//! - DuckDB for the relational store

pub mod duckdb;
pub mod file;
pub mod html;
pub mod http;
pub mod location;

pub use self::duckdb::{DuckDbRepository, QueryResult};
pub use file::FileDocumentSource;
pub use html::FirstTableBodySelector;
pub use http::HttpDocumentSource;
pub use location::LocationDocumentSource;
