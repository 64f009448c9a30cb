//! Conversion rate table domain model

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;

use super::result::{Error, Result};

/// Normalize a currency code to its canonical upper-case three-letter form
pub fn normalize_currency_code(code: &str) -> Result<String> {
    let trimmed = code.trim();
    if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::config(format!(
            "Invalid currency code '{}': expected three letters",
            code
        )));
    }
    Ok(trimmed.to_ascii_uppercase())
}

/// Units of each currency per one unit of the base currency
///
/// Built once per run and never mutated after loading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionRateTable {
    base_currency: String,
    rates: BTreeMap<String, Decimal>,
}

impl ConversionRateTable {
    pub fn new(base_currency: &str) -> Result<Self> {
        Ok(Self {
            base_currency: normalize_currency_code(base_currency)?,
            rates: BTreeMap::new(),
        })
    }

    /// Add a rate. Codes are unique and every factor must be positive.
    pub fn insert(&mut self, code: &str, rate: Decimal) -> Result<()> {
        let code = normalize_currency_code(code).map_err(|e| Error::rate_table(e.to_string()))?;
        if rate <= Decimal::ZERO {
            return Err(Error::rate_table(format!(
                "Rate for {} must be positive, got {}",
                code, rate
            )));
        }
        if self.rates.contains_key(&code) {
            return Err(Error::rate_table(format!("Duplicate rate for {}", code)));
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn get(&self, code: &str) -> Option<Decimal> {
        self.rates.get(&code.trim().to_ascii_uppercase()).copied()
    }

    /// Look up a rate, failing with `MissingRate` when absent
    pub fn require(&self, code: &str) -> Result<Decimal> {
        self.get(code)
            .ok_or_else(|| Error::MissingRate(code.trim().to_ascii_uppercase()))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.rates.iter().map(|(code, rate)| (code.as_str(), *rate))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
