//! Rate service - load the currency conversion table

use std::str::FromStr;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::ConversionRateTable;
use crate::ports::DocumentSource;

const CURRENCY_COLUMN: &str = "Currency";
const RATE_COLUMN: &str = "Rate";

/// Parse the rate CSV (`Currency`, `Rate` columns, others ignored)
pub fn parse_rate_table(csv_text: &str, base_currency: &str) -> Result<ConversionRateTable> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| Error::rate_table(format!("Failed to read header: {}", e)))?
        .clone();

    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::rate_table(format!("Column '{}' not found", name)))
    };
    let currency_idx = column(CURRENCY_COLUMN)?;
    let rate_idx = column(RATE_COLUMN)?;

    let mut table = ConversionRateTable::new(base_currency)?;
    for (line, result) in reader.records().enumerate() {
        let record = result.map_err(|e| Error::rate_table(format!("Malformed row: {}", e)))?;
        let code = record.get(currency_idx).unwrap_or("");
        let rate_text = record.get(rate_idx).unwrap_or("");

        let rate = Decimal::from_str(rate_text)
            .or_else(|_| Decimal::from_scientific(rate_text))
            .map_err(|_| {
                Error::rate_table(format!(
                    "Row {}: rate '{}' for '{}' is not a number",
                    line + 1,
                    rate_text,
                    code
                ))
            })?;
        table.insert(code, rate)?;
    }

    Ok(table)
}

/// Rate service for loading conversion tables
pub struct RateService {
    source: Arc<dyn DocumentSource>,
}

impl RateService {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source }
    }

    /// Load the rate table from a local path or URL
    pub fn load(&self, location: &str, base_currency: &str) -> Result<ConversionRateTable> {
        let text = self.source.fetch(location)?;
        parse_rate_table(&text, base_currency)
    }
}
