//! Load stage - persist the record set to the flat file and the relational table

use std::path::Path;

use crate::adapters::DuckDbRepository;
use crate::domain::result::{Error, Result};
use crate::domain::RecordSet;

/// Write `records` as CSV to `path`, replacing any existing file
///
/// Header row = field names, every number formatted with two decimals.
/// Returns the number of data rows written.
pub fn write_flat_file(records: &RecordSet, path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| Error::sink(format!("Failed to create {}: {}", parent.display(), e)))?;
    }

    let write_err = |e: csv::Error| Error::sink(format!("Failed to write {}: {}", path.display(), e));

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(records.schema.header()).map_err(write_err)?;
    for row in records.to_string_rows() {
        writer.write_record(&row).map_err(write_err)?;
    }
    writer
        .flush()
        .map_err(|e| Error::sink(format!("Failed to write {}: {}", path.display(), e)))?;

    Ok(records.len())
}

/// Replace the named table's entire content with `records`
///
/// The previous table, if any, is dropped first: after this call the table
/// holds exactly this run's records.
pub fn replace_table(
    records: &RecordSet,
    repository: &DuckDbRepository,
    table_name: &str,
) -> Result<usize> {
    repository.replace_table(table_name, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RecordSchema, TransformedRecord};
    use rust_decimal::Decimal;
    use tempfile::tempdir;

    fn two_banks() -> RecordSet {
        let schema = RecordSchema::new(
            "Name",
            "MC_USD_Billion",
            &["GBP".to_string(), "EUR".to_string()],
            "MC_{currency}_Billion",
        )
        .unwrap();
        let mut set = RecordSet::new(schema);
        set.records.push(TransformedRecord {
            name: "Bank A".to_string(),
            base_value: Decimal::new(15050, 2),
            converted: vec![Decimal::new(12040, 2), Decimal::new(13997, 2)],
        });
        set.records.push(TransformedRecord {
            name: "Bank, B".to_string(),
            base_value: Decimal::new(90, 0),
            converted: vec![Decimal::new(72, 0), Decimal::new(837, 1)],
        });
        set
    }

    #[test]
    fn test_write_flat_file_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("Largest_banks_data.csv");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "stale content that is longer than the new file ......................................................................................................").unwrap();

        assert_eq!(write_flat_file(&two_banks(), &path).unwrap(), 2);

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Name,MC_USD_Billion,MC_GBP_Billion,MC_EUR_Billion\n\
             Bank A,150.50,120.40,139.97\n\
             \"Bank, B\",90.00,72.00,83.70\n"
        );
    }

    #[test]
    fn test_write_flat_file_to_directory_fails_as_sink_error() {
        let dir = tempdir().unwrap();
        let err = write_flat_file(&two_banks(), dir.path()).unwrap_err();
        assert_eq!(err.kind(), "SinkError");
    }

    #[test]
    fn test_replace_table_round_trip() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        assert_eq!(replace_table(&two_banks(), &repo, "Largest_banks").unwrap(), 2);

        let result = repo
            .execute_query("SELECT Name, MC_EUR_Billion FROM Largest_banks")
            .unwrap();
        assert_eq!(result.rows[0][0], serde_json::json!("Bank A"));
        assert_eq!(result.rows[1][1], serde_json::json!(83.7));
    }
}
