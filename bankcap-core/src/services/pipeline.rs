//! Pipeline - the sequential extract, transform, load and query run
//!
//! Stages run strictly one after another and each transition is written to
//! the progress log. The first error aborts the run; whatever earlier stages
//! wrote (e.g. the CSV file) stays in place.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::extract::{ExtractService, ExtractedTable};
use super::load;
use super::logging::ProgressLog;
use super::query::{QueryOutput, QueryService};
use super::rates::RateService;
use super::transform::TransformService;
use crate::adapters::DuckDbRepository;
use crate::config::Config;
use crate::domain::result::Result;
use crate::domain::{ConversionRateTable, RecordSet};
use crate::ports::DocumentSource;

/// Progress log messages, one per stage transition
pub mod milestones {
    pub const PRELIMINARIES: &str = "Preliminaries complete. Initiating ETL process";
    pub const EXTRACTED: &str = "Data extraction complete. Initiating Transformation process";
    pub const TRANSFORMED: &str = "Data transformation complete. Initiating Loading process";
    pub const CSV_SAVED: &str = "Data saved to CSV file";
    pub const CONNECTION_OPENED: &str = "SQL Connection initiated";
    pub const TABLE_LOADED: &str = "Data loaded to Database as a table, Executing queries";
    pub const COMPLETE: &str = "Process Complete";
    pub const CONNECTION_CLOSED: &str = "Server Connection closed";

    /// Every milestone of a successful run, in order
    pub const ALL: [&str; 8] = [
        PRELIMINARIES,
        EXTRACTED,
        TRANSFORMED,
        CSV_SAVED,
        CONNECTION_OPENED,
        TABLE_LOADED,
        COMPLETE,
        CONNECTION_CLOSED,
    ];
}

/// Outcome of a complete run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub extracted_rows: usize,
    pub records: RecordSet,
    pub flat_file: PathBuf,
    pub database: PathBuf,
    pub table_name: String,
    pub queries: Vec<QueryOutput>,
}

/// Extract and transform results without any writes
#[derive(Debug, Clone, Serialize)]
pub struct Preview {
    pub rates: ConversionRateTable,
    pub records: RecordSet,
}

/// The ETL pipeline for one configuration
pub struct Pipeline {
    config: Config,
    progress_log: ProgressLog,
    extract_service: ExtractService,
    rate_service: RateService,
    transform_service: TransformService,
}

impl Pipeline {
    /// Create a pipeline reading documents through `source`
    pub fn new(config: Config, source: Arc<dyn DocumentSource>) -> Result<Self> {
        config.validate()?;
        let schema = config.record_schema()?;

        Ok(Self {
            progress_log: ProgressLog::new(config.log_path.clone()),
            extract_service: ExtractService::new(Arc::clone(&source))?,
            rate_service: RateService::new(source),
            transform_service: TransformService::new(schema),
            config,
        })
    }

    /// Swap the extractor, e.g. for a page with a different row layout
    pub fn with_extract_service(mut self, extract_service: ExtractService) -> Self {
        self.extract_service = extract_service;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn progress_log(&self) -> &ProgressLog {
        &self.progress_log
    }

    /// Extract stage only
    pub fn extract(&self) -> Result<ExtractedTable> {
        self.extract_service
            .extract(&self.config.source_url, &self.config.expected_columns)
    }

    /// Load the configured rate table
    pub fn load_rates(&self) -> Result<ConversionRateTable> {
        self.rate_service
            .load(&self.config.rates_location, &self.config.base_currency)
    }

    /// Extract and transform, writing nothing
    pub fn preview(&self) -> Result<Preview> {
        let extracted = self.extract()?;
        let rates = self.load_rates()?;
        let records = self.transform_service.transform(&extracted.rows, &rates)?;
        Ok(Preview { rates, records })
    }

    /// Run every stage. A failure is logged with its kind and returned.
    pub fn run(&self) -> Result<PipelineReport> {
        let result = self.run_stages();
        if let Err(e) = &result {
            let _ = self.progress_log.log_failure(e.kind(), &e.to_string());
        }
        result
    }

    fn run_stages(&self) -> Result<PipelineReport> {
        self.milestone(milestones::PRELIMINARIES);

        let extracted = self.extract()?;
        self.milestone(milestones::EXTRACTED);

        let rates = self.load_rates()?;
        let records = self.transform_service.transform(&extracted.rows, &rates)?;
        self.milestone(milestones::TRANSFORMED);

        load::write_flat_file(&records, &self.config.output_csv_path)?;
        self.milestone(milestones::CSV_SAVED);

        let repository = DuckDbRepository::open(&self.config.database_path)?;
        self.milestone(milestones::CONNECTION_OPENED);

        load::replace_table(&records, &repository, &self.config.table_name)?;
        self.milestone(milestones::TABLE_LOADED);

        let queries = QueryService::new(&repository).run_all(&self.config.queries)?;
        self.milestone(milestones::COMPLETE);

        repository.close()?;
        self.milestone(milestones::CONNECTION_CLOSED);

        Ok(PipelineReport {
            extracted_rows: extracted.rows.len(),
            records,
            flat_file: self.config.output_csv_path.clone(),
            database: self.config.database_path.clone(),
            table_name: self.config.table_name.clone(),
            queries,
        })
    }

    // Logging never breaks a run
    fn milestone(&self, message: &str) {
        let _ = self.progress_log.log(message);
    }
}
