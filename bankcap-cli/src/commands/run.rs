//! Run command - full ETL pipeline followed by the configured queries

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use super::get_context;
use crate::output;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let ctx = get_context(dir)?;

    if !json {
        output::info(&format!("Extracting from {}", ctx.config.source_url));
    }

    let report = match ctx.pipeline.run() {
        Ok(report) => report,
        Err(e) => {
            anyhow::bail!("{} (see {})", e, ctx.progress_log().path().display());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    output::success(&format!(
        "Loaded {} banks into table {}",
        report.records.len(),
        report.table_name
    ));
    println!("  CSV file: {}", report.flat_file.display());
    println!("  Database: {}", report.database.display());

    for query in &report.queries {
        println!();
        println!("{} {}", "Result for:".bold(), query.statement);
        println!("{}", output::query_table(&query.result));
    }

    Ok(())
}
