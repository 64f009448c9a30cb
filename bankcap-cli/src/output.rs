//! Output formatting utilities

use bankcap_core::{QueryResult, RecordSet};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Render a record set with its field names as header
pub fn records_table(records: &RecordSet) -> Table {
    let mut table = create_table();
    table.set_header(records.schema.header());
    for row in records.to_string_rows() {
        table.add_row(row);
    }
    table
}

/// Render a query result
pub fn query_table(result: &QueryResult) -> Table {
    let mut table = create_table();
    table.set_header(&result.columns);
    for row in &result.rows {
        let values: Vec<String> = row.iter().map(value_to_string).collect();
        table.add_row(values);
    }
    table
}

/// Cell text for a JSON value; fractional numbers get two decimals
pub fn value_to_string(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => "NULL".to_string(),
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => match (n.is_f64(), n.as_f64()) {
            (true, Some(f)) => format!("{:.2}", f),
            _ => n.to_string(),
        },
        serde_json::Value::Bool(b) => b.to_string(),
        _ => v.to_string(),
    }
}

pub fn value_to_csv(v: &serde_json::Value) -> String {
    match v {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => {
            if s.contains(',') || s.contains('"') || s.contains('\n') {
                format!("\"{}\"", s.replace('"', "\"\""))
            } else {
                s.clone()
            }
        }
        _ => value_to_string(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_value_to_string() {
        assert_eq!(value_to_string(&json!(96.2)), "96.20");
        assert_eq!(value_to_string(&json!(3)), "3");
        assert_eq!(value_to_string(&json!(null)), "NULL");
        assert_eq!(value_to_string(&json!("Bank A")), "Bank A");
    }

    #[test]
    fn test_value_to_csv_quotes() {
        assert_eq!(value_to_csv(&json!("Bank, B")), "\"Bank, B\"");
        assert_eq!(value_to_csv(&json!(null)), "");
        assert_eq!(value_to_csv(&json!(120.4)), "120.40");
    }
}
