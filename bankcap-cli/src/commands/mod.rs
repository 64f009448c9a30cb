//! CLI command implementations

pub mod extract;
pub mod init;
pub mod logs;
pub mod preview;
pub mod query;
pub mod rates;
pub mod run;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use bankcap_core::BankcapContext;

/// Working directory from `--dir` / `BANKCAP_DIR`, else the current directory
pub fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir),
        None => std::env::current_dir().context("Could not determine current directory"),
    }
}

/// Load settings and build the pipeline context
pub fn get_context(dir: &Path) -> Result<BankcapContext> {
    BankcapContext::new(dir)
        .with_context(|| format!("Failed to initialize bankcap in {}", dir.display()))
}
