//! Transformed record domain model
//!
//! A `RecordSet` pairs the field layout (`RecordSchema`) with the rows built by
//! the transformer. Both sinks write the set verbatim, in order.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use super::rates::normalize_currency_code;
use super::result::{Error, Result};

/// Placeholder substituted with the currency code in target field templates
pub const CURRENCY_PLACEHOLDER: &str = "{currency}";

/// Number of decimal places every stored value carries
pub const DECIMAL_PLACES: u32 = 2;

/// Round to two decimal places, midpoints away from zero (139.965 -> 139.97)
pub fn round_value(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(DECIMAL_PLACES);
    rounded
}

/// A converted column: which currency it holds and what it is called
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetField {
    pub currency: String,
    pub field: String,
}

/// Field layout of the persisted table and flat file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordSchema {
    pub name_field: String,
    pub base_field: String,
    pub targets: Vec<TargetField>,
}

impl RecordSchema {
    /// Build a schema from the caller's expected columns (`[name, base]`) and
    /// the target currency list, naming each target through `template`.
    pub fn from_expected_columns(
        expected_columns: &[String],
        target_currencies: &[String],
        template: &str,
    ) -> Result<Self> {
        let [name_field, base_field] = expected_columns else {
            return Err(Error::config(format!(
                "Expected exactly two columns (name, base value), got {}",
                expected_columns.len()
            )));
        };
        Self::new(name_field, base_field, target_currencies, template)
    }

    pub fn new(
        name_field: &str,
        base_field: &str,
        target_currencies: &[String],
        template: &str,
    ) -> Result<Self> {
        if name_field.trim().is_empty() || base_field.trim().is_empty() {
            return Err(Error::config("Field names must not be empty"));
        }
        if !template.contains(CURRENCY_PLACEHOLDER) {
            return Err(Error::config(format!(
                "Target field template '{}' must contain {}",
                template, CURRENCY_PLACEHOLDER
            )));
        }

        let mut targets: Vec<TargetField> = Vec::with_capacity(target_currencies.len());
        for code in target_currencies {
            let currency = normalize_currency_code(code)?;
            if targets.iter().any(|t| t.currency == currency) {
                return Err(Error::config(format!("Target currency {} listed twice", currency)));
            }
            let field = template.replace(CURRENCY_PLACEHOLDER, &currency);
            targets.push(TargetField { currency, field });
        }

        let schema = Self {
            name_field: name_field.to_string(),
            base_field: base_field.to_string(),
            targets,
        };

        // Column names double as SQL identifiers, so they must be distinct
        let header = schema.header();
        for (i, field) in header.iter().enumerate() {
            if header[..i].iter().any(|other| other.eq_ignore_ascii_case(field)) {
                return Err(Error::config(format!("Duplicate field name '{}'", field)));
            }
        }

        Ok(schema)
    }

    /// Column names in output order: name, base, then one per target
    pub fn header(&self) -> Vec<&str> {
        let mut header = vec![self.name_field.as_str(), self.base_field.as_str()];
        header.extend(self.targets.iter().map(|t| t.field.as_str()));
        header
    }

    pub fn target_currencies(&self) -> impl Iterator<Item = &str> {
        self.targets.iter().map(|t| t.currency.as_str())
    }

    fn target_position(&self, currency: &str) -> Option<usize> {
        self.targets
            .iter()
            .position(|t| t.currency.eq_ignore_ascii_case(currency.trim()))
    }
}

/// One entity's final shape: name, base value and converted values
///
/// `converted` is aligned with `RecordSchema::targets`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRecord {
    pub name: String,
    pub base_value: Decimal,
    pub converted: Vec<Decimal>,
}

impl TransformedRecord {
    /// All numeric fields in column order (base first)
    pub fn values(&self) -> impl Iterator<Item = Decimal> + '_ {
        std::iter::once(self.base_value).chain(self.converted.iter().copied())
    }
}

/// Ordered collection of transformed records with their schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSet {
    pub schema: RecordSchema,
    pub records: Vec<TransformedRecord>,
}

impl RecordSet {
    pub fn new(schema: RecordSchema) -> Self {
        Self {
            schema,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Converted value of `record` in `currency`, if that currency is a target
    pub fn value_in(&self, record: &TransformedRecord, currency: &str) -> Option<Decimal> {
        let position = self.schema.target_position(currency)?;
        record.converted.get(position).copied()
    }

    /// Records rendered as text cells in header order, numbers as `%.2f`
    pub fn to_string_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|record| {
                let mut row = Vec::with_capacity(record.converted.len() + 2);
                row.push(record.name.clone());
                row.extend(record.values().map(format_value));
                row
            })
            .collect()
    }
}

/// Fixed two-decimal rendering used by every output
pub fn format_value(value: Decimal) -> String {
    format!("{:.2}", value)
}

struct RecordView<'a> {
    schema: &'a RecordSchema,
    record: &'a TransformedRecord,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.converted.len() + 2))?;
        map.serialize_entry(&self.schema.name_field, &self.record.name)?;
        map.serialize_entry(&self.schema.base_field, &self.record.base_value)?;
        for (target, value) in self.schema.targets.iter().zip(&self.record.converted) {
            map.serialize_entry(&target.field, value)?;
        }
        map.end()
    }
}

// Serialized as a list of objects keyed by field name, in column order
impl Serialize for RecordSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&RecordView {
                schema: &self.schema,
                record,
            })?;
        }
        seq.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn currencies(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_round_value_half_up() {
        assert_eq!(round_value(dec("139.965")).to_string(), "139.97");
        assert_eq!(round_value(dec("120.4")).to_string(), "120.40");
        assert_eq!(round_value(dec("90")).to_string(), "90.00");
        assert_eq!(round_value(dec("1.004999")).to_string(), "1.00");
        assert_eq!(round_value(dec("-2.345")).to_string(), "-2.35");
    }

    #[test]
    fn test_schema_header() {
        let schema = RecordSchema::from_expected_columns(
            &currencies(&["Name", "MC_USD_Billion"]),
            &currencies(&["gbp", "EUR"]),
            "MC_{currency}_Billion",
        )
        .unwrap();

        assert_eq!(
            schema.header(),
            vec!["Name", "MC_USD_Billion", "MC_GBP_Billion", "MC_EUR_Billion"]
        );
        assert_eq!(schema.target_currencies().collect::<Vec<_>>(), vec!["GBP", "EUR"]);
    }

    #[test]
    fn test_schema_rejects_bad_shapes() {
        let targets = currencies(&["GBP"]);
        assert!(RecordSchema::from_expected_columns(&currencies(&["Name"]), &targets, "MC_{currency}").is_err());
        assert!(RecordSchema::new("Name", "MC_USD", &targets, "MC_Billion").is_err());
        assert!(RecordSchema::new("Name", "MC_USD", &currencies(&["GBP", "gbp"]), "MC_{currency}").is_err());
        assert!(RecordSchema::new("Name", "MC_GBP", &targets, "MC_{currency}").is_err());
    }

    #[test]
    fn test_value_in_and_string_rows() {
        let schema = RecordSchema::new("Name", "MC_USD_Billion", &currencies(&["GBP", "EUR"]), "MC_{currency}_Billion").unwrap();
        let mut set = RecordSet::new(schema);
        set.records.push(TransformedRecord {
            name: "Bank B".to_string(),
            base_value: round_value(dec("90")),
            converted: vec![round_value(dec("72")), round_value(dec("83.7"))],
        });

        let record = &set.records[0];
        assert_eq!(set.value_in(record, "eur"), Some(dec("83.70")));
        assert_eq!(set.value_in(record, "INR"), None);
        assert_eq!(
            set.to_string_rows(),
            vec![vec!["Bank B", "90.00", "72.00", "83.70"]]
        );
    }

    #[test]
    fn test_serialize_keeps_field_names() {
        let schema = RecordSchema::new("Name", "MC_USD_Billion", &currencies(&["GBP"]), "MC_{currency}_Billion").unwrap();
        let mut set = RecordSet::new(schema);
        set.records.push(TransformedRecord {
            name: "Bank A".to_string(),
            base_value: dec("150.50"),
            converted: vec![dec("120.40")],
        });

        let json = serde_json::to_value(&set).unwrap();
        assert_eq!(json[0]["Name"], "Bank A");
        assert_eq!(json[0]["MC_GBP_Billion"], "120.40");
    }
}
