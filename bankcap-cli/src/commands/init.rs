//! Init command - write a default settings.json

use std::path::Path;

use anyhow::Result;
use bankcap_core::config::{Settings, SETTINGS_FILE};

use crate::output;

pub fn run(dir: &Path, force: bool) -> Result<()> {
    let settings_path = dir.join(SETTINGS_FILE);
    if settings_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite it.",
            settings_path.display()
        );
    }

    let written = Settings::default().save(dir)?;
    output::success(&format!("Wrote {}", written.display()));
    output::info("Place the exchange rate CSV (Currency,Rate) next to it before running.");

    Ok(())
}
