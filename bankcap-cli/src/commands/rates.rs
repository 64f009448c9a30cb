//! Rates command - show the conversion rate table

use std::path::Path;

use anyhow::Result;

use super::get_context;
use crate::output;

pub fn run(dir: &Path, json: bool) -> Result<()> {
    let ctx = get_context(dir)?;
    let rates = ctx.pipeline.load_rates()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rates)?);
        return Ok(());
    }

    let mut table = output::create_table();
    table.set_header(vec![
        "Currency".to_string(),
        format!("Rate (per 1 {})", rates.base_currency()),
        "Target".to_string(),
    ]);

    for (code, rate) in rates.iter() {
        let is_target = ctx
            .config
            .target_currencies
            .iter()
            .any(|t| t.eq_ignore_ascii_case(code));
        table.add_row(vec![
            code.to_string(),
            rate.to_string(),
            if is_target { "yes".to_string() } else { String::new() },
        ]);
    }

    println!("{}", table);

    let missing: Vec<&str> = ctx
        .config
        .target_currencies
        .iter()
        .map(String::as_str)
        .filter(|code| rates.get(code).is_none())
        .collect();
    if !missing.is_empty() {
        output::warning(&format!("No rate for target currency: {}", missing.join(", ")));
    }

    Ok(())
}
