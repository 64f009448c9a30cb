//! Transform service - convert base values into every target currency
//!
//! Pure: no I/O, deterministic for a given row list and rate table.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::record::round_value;
use crate::domain::result::{Error, Result};
use crate::domain::{ConversionRateTable, RawRow, RecordSchema, RecordSet, TransformedRecord};

/// Parse a scraped value cell into a decimal
///
/// Surrounding whitespace and `,` thousands separators are removed, anything
/// else that is not plain decimal text is rejected.
pub fn parse_raw_value(raw: &str) -> Result<Decimal> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() {
        return Err(Error::parse(format!("'{}' is not a number", raw)));
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map_err(|_| Error::parse(format!("'{}' is not a number", raw)))
}

/// Transform service for unit conversion
pub struct TransformService {
    schema: RecordSchema,
}

impl TransformService {
    pub fn new(schema: RecordSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Build one record per row, in row order
    ///
    /// Every target currency must be in `rates`; this is checked before any
    /// row is touched. Base and converted values are rounded to two places,
    /// half away from zero.
    pub fn transform(&self, rows: &[RawRow], rates: &ConversionRateTable) -> Result<RecordSet> {
        let factors: Vec<Decimal> = self
            .schema
            .target_currencies()
            .map(|code| rates.require(code))
            .collect::<Result<_>>()?;

        let mut set = RecordSet::new(self.schema.clone());
        set.records.reserve(rows.len());

        for row in rows {
            let base_value = parse_raw_value(&row.raw_value).map_err(|e| match e {
                Error::Parse(msg) => Error::parse(format!(
                    "Row {} ({}): {}",
                    row.rank, row.name, msg
                )),
                other => other,
            })?;

            // Conversion uses the unrounded base value, only stored results are rounded
            let converted = factors
                .iter()
                .map(|factor| {
                    base_value.checked_mul(*factor).map(round_value).ok_or_else(|| {
                        Error::parse(format!(
                            "Row {} ({}): {} x {} overflows",
                            row.rank, row.name, base_value, factor
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            set.records.push(TransformedRecord {
                name: row.name.clone(),
                base_value: round_value(base_value),
                converted,
            });
        }

        Ok(set)
    }
}
