//! Extracted row domain model

use serde::{Deserialize, Serialize};

/// One entity as scraped from the source table
///
/// `raw_value` is the cell text exactly as it appeared (trimmed), it is only
/// interpreted as a number by the transformer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// 1-based position in document order
    pub rank: usize,
    pub name: String,
    pub raw_value: String,
}

impl RawRow {
    pub fn new(rank: usize, name: impl Into<String>, raw_value: impl Into<String>) -> Self {
        Self {
            rank,
            name: name.into(),
            raw_value: raw_value.into(),
        }
    }
}
