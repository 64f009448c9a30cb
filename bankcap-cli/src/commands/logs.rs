//! Logs command - view and clear the progress log

use std::path::Path;

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use super::get_context;
use crate::output;
use bankcap_core::services::logging::TIMESTAMP_FORMAT;
use bankcap_core::LogEntry;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent log entries
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Show only failed runs
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove every log entry
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
}

fn format_timestamp(entry: &LogEntry) -> String {
    entry
        .timestamp
        .map(|ts| ts.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

pub fn run(dir: &Path, command: LogsCommands) -> Result<()> {
    let ctx = get_context(dir)?;
    let log = ctx.progress_log();

    match command {
        LogsCommands::List { limit, errors, json } => {
            let mut entries = if errors {
                log.get_failures(limit)?
            } else {
                log.get_recent(limit)?
            };
            // Oldest first reads like the file
            entries.reverse();

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
                return Ok(());
            }

            if entries.is_empty() {
                println!("No log entries found.");
                return Ok(());
            }

            let mut table = output::create_table();
            table.set_header(vec!["Time", "Message"]);
            for entry in &entries {
                let message = if entry.is_failure() {
                    entry.message.red().to_string()
                } else {
                    entry.message.clone()
                };
                table.add_row(vec![format_timestamp(entry), message]);
            }

            println!("{}", table);
            println!();
            println!("Log file: {}", log.path().display().to_string().dimmed());
        }
        LogsCommands::Clear { force } => {
            if !force
                && !Confirm::new()
                    .with_prompt(format!("Clear all entries in {}?", log.path().display()))
                    .default(false)
                    .interact()?
            {
                println!("Cancelled.");
                return Ok(());
            }

            let deleted = log.clear()?;
            output::success(&format!("Deleted {} log entries", deleted));
        }
    }

    Ok(())
}
