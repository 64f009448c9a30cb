//! Query service - read-only SQL against the loaded table

use serde::Serialize;

use crate::adapters::duckdb::{DuckDbRepository, QueryResult};
use crate::domain::result::Result;

/// One executed statement with its full result set
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryOutput {
    pub statement: String,
    pub result: QueryResult,
}

/// Query service borrowing the run's store connection
pub struct QueryService<'a> {
    repository: &'a DuckDbRepository,
}

impl<'a> QueryService<'a> {
    pub fn new(repository: &'a DuckDbRepository) -> Self {
        Self { repository }
    }

    /// Execute a single read-only SQL query
    pub fn run_query(&self, sql: &str) -> Result<QueryResult> {
        self.repository.execute_query(sql)
    }

    /// Execute every statement in order, stopping at the first failure
    pub fn run_all(&self, statements: &[String]) -> Result<Vec<QueryOutput>> {
        statements
            .iter()
            .map(|statement| {
                Ok(QueryOutput {
                    statement: statement.clone(),
                    result: self.run_query(statement)?,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::result::Error;

    #[test]
    fn test_run_all_in_order() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        let service = QueryService::new(&repo);

        let outputs = service
            .run_all(&["SELECT 1 AS one".to_string(), "SELECT 'x' AS letter".to_string()])
            .unwrap();

        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].result.columns, vec!["one"]);
        assert_eq!(outputs[1].result.rows[0][0], serde_json::json!("x"));
    }

    #[test]
    fn test_write_statement_rejected() {
        let repo = DuckDbRepository::open_in_memory().unwrap();
        let service = QueryService::new(&repo);

        let err = service
            .run_all(&["SELECT 1".to_string(), "DELETE FROM t".to_string()])
            .unwrap_err();
        assert!(matches!(err, Error::Query(_)));
    }
}
