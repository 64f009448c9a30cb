//! DuckDB relational store
//!
//! Holds the persisted bank table. The connection is opened once per run,
//! borrowed by the loader and the query runner, and closed explicitly.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use duckdb::types::Value;
use duckdb::{params_from_iter, Connection};
use serde::Serialize;
use sqlparser::ast::Statement;
use sqlparser::dialect::DuckDbDialect;
use sqlparser::parser::Parser;

use crate::domain::record::format_value;
use crate::domain::result::{Error, Result};
use crate::domain::RecordSet;

/// Column type for every numeric field
const VALUE_COLUMN_TYPE: &str = "DECIMAL(18,2)";

/// Quote an identifier for use in generated SQL
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Validate that `sql` is exactly one read-only query.
/// Malformed SQL never reaches the database engine.
fn validate_read_only(sql: &str) -> Result<()> {
    let dialect = DuckDbDialect {};
    let statements = Parser::parse_sql(&dialect, sql).map_err(|e| {
        let msg = e.to_string();
        let cleaned = msg.trim_start_matches("sql parser error: ");
        Error::query(cleaned.to_string())
    })?;

    match statements.as_slice() {
        [Statement::Query(_)] => Ok(()),
        [] => Err(Error::query("Empty query")),
        [_] => Err(Error::query("Only read-only SELECT queries are allowed")),
        _ => Err(Error::query("Exactly one statement per query is allowed")),
    }
}

/// Query result structure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<serde_json::Value>>,
    pub row_count: usize,
}

/// DuckDB-backed store
pub struct DuckDbRepository {
    conn: Mutex<Connection>,
    db_path: PathBuf,
}

impl DuckDbRepository {
    /// Open (or create) the database file at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                Error::sink(format!("Failed to create {}: {}", parent.display(), e))
            })?;
        }

        // Extension autoloading is disabled, nothing beyond core SQL is needed
        let conn = duckdb::Config::default()
            .enable_autoload_extension(false)
            .and_then(|config| Connection::open_with_flags(db_path, config))
            .map_err(|e| {
                Error::sink(format!("Failed to open database {}: {}", db_path.display(), e))
            })?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: db_path.to_path_buf(),
        })
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> Result<Self> {
        let conn = duckdb::Config::default()
            .enable_autoload_extension(false)
            .and_then(Connection::open_in_memory_with_flags)
            .map_err(|e| Error::sink(format!("Failed to open in-memory database: {}", e)))?;

        Ok(Self {
            conn: Mutex::new(conn),
            db_path: PathBuf::from(":memory:"),
        })
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    fn lock(&self) -> std::result::Result<MutexGuard<'_, Connection>, String> {
        self.conn.lock().map_err(|e| format!("Lock poisoned: {}", e))
    }

    /// Replace the whole content of `table_name` with `records`
    ///
    /// Drops any existing table of that name, recreates it from the record
    /// schema and inserts every record in order, all in one transaction. The
    /// table never accumulates rows across runs.
    pub fn replace_table(&self, table_name: &str, records: &RecordSet) -> Result<usize> {
        let table = quote_identifier(table_name);
        let header = records.schema.header();

        let mut column_defs = vec![format!("{} VARCHAR", quote_identifier(header[0]))];
        column_defs.extend(
            header[1..]
                .iter()
                .map(|field| format!("{} {}", quote_identifier(field), VALUE_COLUMN_TYPE)),
        );

        let mut placeholders = vec!["?".to_string()];
        placeholders.extend(
            header[1..]
                .iter()
                .map(|_| format!("CAST(? AS {})", VALUE_COLUMN_TYPE)),
        );

        let ddl = format!(
            "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({});",
            column_defs.join(", ")
        );
        let insert_sql = format!("INSERT INTO {table} VALUES ({})", placeholders.join(", "));

        let mut conn = self.lock().map_err(Error::sink)?;
        let tx = conn
            .transaction()
            .map_err(|e| Error::sink(format!("Failed to begin transaction: {}", e)))?;

        tx.execute_batch(&ddl)
            .map_err(|e| Error::sink(format!("Failed to recreate table {}: {}", table_name, e)))?;

        {
            let mut stmt = tx
                .prepare(&insert_sql)
                .map_err(|e| Error::sink(format!("Failed to prepare insert: {}", e)))?;

            for record in &records.records {
                // Decimals travel as text so the DECIMAL cast is exact
                let mut values = vec![Value::Text(record.name.clone())];
                values.extend(record.values().map(|v| Value::Text(format_value(v))));

                stmt.execute(params_from_iter(values)).map_err(|e| {
                    Error::sink(format!("Failed to insert '{}': {}", record.name, e))
                })?;
            }
        }

        tx.commit()
            .map_err(|e| Error::sink(format!("Failed to commit table {}: {}", table_name, e)))?;

        Ok(records.len())
    }

    /// Whether a table with this name exists in the main schema
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        let conn = self.lock().map_err(Error::query)?;
        conn.query_row(
            "SELECT COUNT(*) > 0 FROM information_schema.tables WHERE lower(table_name) = lower(?)",
            [table_name],
            |row| row.get(0),
        )
        .map_err(|e| Error::query(e.to_string()))
    }

    /// Execute a single read-only SQL query and collect the full result set
    pub fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        validate_read_only(sql)?;

        let conn = self.lock().map_err(Error::query)?;
        let mut stmt = conn.prepare(sql).map_err(|e| Error::query(e.to_string()))?;

        let mut result_rows = stmt.query([]).map_err(|e| Error::query(e.to_string()))?;

        let mut rows: Vec<Vec<serde_json::Value>> = Vec::new();
        let mut column_count = 0;

        while let Some(row) = result_rows.next().map_err(|e| Error::query(e.to_string()))? {
            // Get column count from the first row
            if rows.is_empty() {
                column_count = row.as_ref().column_count();
            }

            let row_values: Vec<serde_json::Value> =
                (0..column_count).map(|i| get_column_value(row, i)).collect();
            rows.push(row_values);
        }

        // Drop result_rows to release borrow on stmt
        drop(result_rows);

        if column_count == 0 {
            column_count = stmt.column_count();
        }
        let columns: Vec<String> = (0..column_count)
            .map(|i| {
                stmt.column_name(i)
                    .map(|s| s.to_string())
                    .unwrap_or_else(|_| format!("col{}", i))
            })
            .collect();

        let row_count = rows.len();

        Ok(QueryResult {
            columns,
            rows,
            row_count,
        })
    }

    /// Release the connection
    pub fn close(self) -> Result<()> {
        let conn = self
            .conn
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.close()
            .map_err(|(_, e)| Error::sink(format!("Failed to close database: {}", e)))
    }
}

fn get_column_value(row: &duckdb::Row, idx: usize) -> serde_json::Value {
    use duckdb::types::ValueRef;

    match row.get_ref(idx) {
        Ok(ValueRef::Null) => serde_json::Value::Null,
        Ok(ValueRef::Boolean(b)) => serde_json::Value::Bool(b),
        Ok(ValueRef::TinyInt(i)) => serde_json::json!(i),
        Ok(ValueRef::SmallInt(i)) => serde_json::json!(i),
        Ok(ValueRef::Int(i)) => serde_json::json!(i),
        Ok(ValueRef::BigInt(i)) => serde_json::json!(i),
        Ok(ValueRef::HugeInt(i)) => serde_json::json!(i.to_string()),
        Ok(ValueRef::UTinyInt(i)) => serde_json::json!(i),
        Ok(ValueRef::USmallInt(i)) => serde_json::json!(i),
        Ok(ValueRef::UInt(i)) => serde_json::json!(i),
        Ok(ValueRef::UBigInt(i)) => serde_json::json!(i),
        Ok(ValueRef::Float(f)) => serde_json::json!(f),
        Ok(ValueRef::Double(f)) => serde_json::json!(f),
        Ok(ValueRef::Decimal(d)) => {
            // Decimals surface as JSON numbers
            let s = d.to_string();
            match s.parse::<f64>() {
                Ok(f) => serde_json::json!(f),
                Err(_) => serde_json::Value::String(s),
            }
        }
        Ok(ValueRef::Text(bytes)) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        Ok(ValueRef::Blob(bytes)) => {
            serde_json::Value::String(format!("<blob {} bytes>", bytes.len()))
        }
        _ => serde_json::Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::round_value;
    use crate::domain::{RecordSchema, TransformedRecord};
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn sample_set(names: &[(&str, &str, &str)]) -> RecordSet {
        let schema = RecordSchema::new(
            "Name",
            "MC_USD_Billion",
            &["GBP".to_string()],
            "MC_{currency}_Billion",
        )
        .unwrap();
        let mut set = RecordSet::new(schema);
        for (name, base, gbp) in names {
            set.records.push(TransformedRecord {
                name: name.to_string(),
                base_value: round_value(Decimal::from_str(base).unwrap()),
                converted: vec![round_value(Decimal::from_str(gbp).unwrap())],
            });
        }
        set
    }

    #[test]
    fn test_validate_read_only() {
        assert!(validate_read_only("SELECT * FROM t;").is_ok());
        assert!(validate_read_only("WITH x AS (SELECT 1) SELECT * FROM x").is_ok());
        assert!(matches!(validate_read_only("DROP TABLE t"), Err(Error::Query(_))));
        assert!(matches!(validate_read_only("SELECT 1; SELECT 2"), Err(Error::Query(_))));
        assert!(matches!(validate_read_only("SELEC * FROM"), Err(Error::Query(_))));
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("Largest_banks"), "\"Largest_banks\"");
        assert_eq!(quote_identifier("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn test_replace_table_discards_previous_rows() {
        let repo = DuckDbRepository::open_in_memory().unwrap();

        repo.replace_table("banks", &sample_set(&[("A", "1", "0.8"), ("B", "2", "1.6"), ("C", "3", "2.4")]))
            .unwrap();
        repo.replace_table("banks", &sample_set(&[("X", "10", "8")])).unwrap();

        let result = repo.execute_query("SELECT Name, MC_GBP_Billion FROM banks").unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.columns, vec!["Name", "MC_GBP_Billion"]);
        assert_eq!(result.rows[0][0], serde_json::json!("X"));
        assert_eq!(result.rows[0][1], serde_json::json!(8.0));
    }

    #[test]
    fn test_table_exists_and_empty_result_columns() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        assert!(!repo.table_exists("banks").unwrap());

        repo.replace_table("banks", &sample_set(&[])).unwrap();
        assert!(repo.table_exists("banks").unwrap());

        let result = repo.execute_query("SELECT * FROM banks").unwrap();
        assert_eq!(result.row_count, 0);
        assert_eq!(result.columns, vec!["Name", "MC_USD_Billion", "MC_GBP_Billion"]);
    }

    #[test]
    fn test_query_errors_are_reported() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        let err = repo.execute_query("SELECT * FROM missing_table").unwrap_err();
        assert_eq!(err.kind(), "QueryError");
    }

    #[test]
    fn test_open_file_and_close() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("Banks.duckdb");

        let repo = DuckDbRepository::open(&path).unwrap();
        repo.replace_table("banks", &sample_set(&[("A", "1", "0.8")])).unwrap();
        repo.close().unwrap();

        let reopened = DuckDbRepository::open(&path).unwrap();
        let result = reopened.execute_query("SELECT COUNT(*) AS n FROM banks").unwrap();
        assert_eq!(result.rows[0][0], serde_json::json!(1));
    }
}
