//! Extract command - show raw rows from the source page

use std::path::Path;

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let ctx = get_context(dir)?;
    let extracted = ctx.pipeline.extract()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&extracted)?);
        return Ok(());
    }

    if extracted.rows.is_empty() {
        output::warning("No data rows found in the first table body.");
        return Ok(());
    }

    let mut table = output::create_table();
    let mut header = vec!["Rank".to_string()];
    header.extend(extracted.columns.iter().cloned());
    table.set_header(header);

    for row in &extracted.rows {
        table.add_row(vec![row.rank.to_string(), row.name.clone(), row.raw_value.clone()]);
    }

    println!("{}", table);
    println!();
    println!("{} row(s) extracted", extracted.rows.len());

    Ok(())
}
