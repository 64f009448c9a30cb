//! Bankcap CLI - largest banks market capitalisation ETL

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{extract, init, logs, preview, query, rates, run};

/// Bankcap - scrape, convert and load the largest banks table
#[derive(Parser)]
#[command(name = "bankcap", version, about, long_about = None)]
struct Cli {
    /// Working directory holding settings.json and the outputs
    #[arg(long, global = true, env = "BANKCAP_DIR")]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full ETL pipeline and the configured queries
    Run {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract and transform without writing anything
    Preview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the rows extracted from the source page
    Extract {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the loaded conversion rates
    Rates {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Execute a read-only SQL query against the loaded table
    Query {
        /// SQL query to execute
        sql: Option<String>,
        /// Read SQL from file
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: String,
        /// Output as JSON (shorthand for --format json)
        #[arg(long)]
        json: bool,
    },

    /// View and manage the progress log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },

    /// Write a default settings.json
    Init {
        /// Overwrite an existing settings file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let dir = commands::resolve_dir(cli.dir)?;

    match cli.command {
        Commands::Run { json } => run::run(&dir, json),
        Commands::Preview { json } => preview::run(&dir, json),
        Commands::Extract { json } => extract::run(&dir, json),
        Commands::Rates { json } => rates::run(&dir, json),
        Commands::Query { sql, file, format, json } => {
            let fmt = if json { "json".to_string() } else { format };
            query::run(&dir, sql.as_deref(), file.as_deref(), &fmt)
        }
        Commands::Logs { command } => logs::run(&dir, command),
        Commands::Init { force } => init::run(&dir, force),
    }
}
