//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces for external dependencies. The pipeline depends
//! only on these traits, not on concrete implementations.

mod document_source;
mod row_selector;

pub use document_source::DocumentSource;
pub use row_selector::RowShapeSelector;
