//! Core domain entities
//!
//! Pure data structures with validation logic - no I/O or external dependencies.

mod raw_row;
pub mod rates;
pub mod record;
pub mod result;

pub use raw_row::RawRow;
pub use rates::ConversionRateTable;
pub use record::{RecordSchema, RecordSet, TargetField, TransformedRecord};
