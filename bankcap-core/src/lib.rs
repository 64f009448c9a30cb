//! Bankcap Core - largest banks market capitalisation ETL
//!
//! This crate follows a hexagonal layout:
//!
//! - **domain**: rows, rate table, record schema and records
//! - **ports**: trait definitions for document fetching and row selection
//! - **services**: extract, transform, load, query and the pipeline
//! - **adapters**: concrete implementations (reqwest, scraper, DuckDB)

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

use std::path::Path;
use std::sync::Arc;

use adapters::{DuckDbRepository, LocationDocumentSource};
use config::Config;
use services::{Pipeline, ProgressLog};

// Re-export commonly used types at crate root
pub use adapters::QueryResult;
pub use domain::result::{Error, Result};
pub use domain::{ConversionRateTable, RawRow, RecordSchema, RecordSet, TransformedRecord};
pub use services::{LogEntry, PipelineReport, Preview, QueryOutput, QueryService};

/// Main context for bankcap operations
///
/// Holds the loaded configuration and a pipeline wired to real sources
/// (HTTP for URLs, the filesystem for paths).
pub struct BankcapContext {
    pub config: Config,
    pub pipeline: Pipeline,
}

impl BankcapContext {
    /// Load `settings.json` from `work_dir` and build the pipeline
    pub fn new(work_dir: &Path) -> Result<Self> {
        let config = Config::load(work_dir)?;
        let source = Arc::new(LocationDocumentSource::new()?);
        let pipeline = Pipeline::new(config.clone(), source)?;

        Ok(Self { config, pipeline })
    }

    pub fn progress_log(&self) -> &ProgressLog {
        self.pipeline.progress_log()
    }

    /// Open the configured store for ad-hoc queries
    pub fn open_store(&self) -> Result<DuckDbRepository> {
        DuckDbRepository::open(&self.config.database_path)
    }
}
