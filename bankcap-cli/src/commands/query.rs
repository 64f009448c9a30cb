//! Query command - execute read-only SQL against the loaded table

use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use bankcap_core::QueryService;

use super::get_context;
use crate::output;

pub fn run(dir: &Path, sql: Option<&str>, file: Option<&Path>, format: &str) -> Result<()> {
    // Get SQL from: argument, file, or stdin
    let sql_content = if let Some(sql) = sql {
        sql.to_string()
    } else if let Some(file_path) = file {
        std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read SQL file: {:?}", file_path))?
    } else if atty::isnt(atty::Stream::Stdin) {
        // Read from stdin if not a TTY
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read SQL from stdin")?;
        buffer
    } else {
        anyhow::bail!("No SQL query provided. Use positional argument, --file, or pipe from stdin.");
    };

    let ctx = get_context(dir)?;
    if !ctx.config.database_path.exists() {
        anyhow::bail!(
            "Database {} not found. Run `bankcap run` first.",
            ctx.config.database_path.display()
        );
    }

    let repository = ctx.open_store()?;
    let result = QueryService::new(&repository).run_query(&sql_content)?;
    repository.close()?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        "csv" => {
            println!("{}", result.columns.join(","));
            for row in &result.rows {
                let values: Vec<String> = row.iter().map(output::value_to_csv).collect();
                println!("{}", values.join(","));
            }
        }
        _ => {
            println!("{}", output::query_table(&result));
            println!();
            println!("{} row(s) returned", result.row_count);
        }
    }

    Ok(())
}
