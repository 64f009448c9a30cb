//! Preview command - extract and transform only

use std::path::Path;

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let ctx = get_context(dir)?;
    let preview = ctx.pipeline.preview()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview.records)?);
        return Ok(());
    }

    println!("{}", output::records_table(&preview.records));
    println!();
    println!("{} record(s), nothing written", preview.records.len());

    Ok(())
}
