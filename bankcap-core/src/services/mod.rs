//! Service layer - pipeline stages and their orchestration
//!
//! Each stage is usable on its own; `Pipeline` wires them into one run.

pub mod extract;
pub mod load;
pub mod logging;
pub mod pipeline;
pub mod query;
pub mod rates;
pub mod transform;

pub use extract::{CellLayout, ExtractService, ExtractedTable};
pub use logging::{LogEntry, ProgressLog};
pub use pipeline::{Pipeline, PipelineReport, Preview};
pub use query::{QueryOutput, QueryService};
pub use rates::RateService;
pub use transform::TransformService;
