//! Progress log - timestamped milestone lines in a plain text file
//!
//! One line per pipeline stage transition, formatted `<timestamp> : <message>`.
//! The log is append-only during a run and is never read back by the pipeline.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::domain::result::Result;

/// Timestamp layout of every log line
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H-%M-%S";

const SEPARATOR: &str = " : ";

/// A log line read back from the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// `None` when the line does not start with a parseable timestamp
    pub timestamp: Option<NaiveDateTime>,
    pub message: String,
}

impl LogEntry {
    fn parse(line: &str) -> Self {
        if let Some((stamp, message)) = line.split_once(SEPARATOR) {
            if let Ok(timestamp) = NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT) {
                return Self {
                    timestamp: Some(timestamp),
                    message: message.to_string(),
                };
            }
        }
        Self {
            timestamp: None,
            message: line.to_string(),
        }
    }

    /// Whether this entry records a failed run
    pub fn is_failure(&self) -> bool {
        self.message.starts_with(FAILURE_PREFIX)
    }
}

/// Prefix of the line written when a run aborts
pub const FAILURE_PREFIX: &str = "Process failed";

/// Format one log line for `message` at `timestamp`
pub fn format_line(timestamp: NaiveDateTime, message: &str) -> String {
    format!("{}{}{}", timestamp.format(TIMESTAMP_FORMAT), SEPARATOR, message)
}

/// Appends milestone messages to the progress log file
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line stamped with the current local time
    pub fn log(&self, message: &str) -> Result<()> {
        self.log_at(Local::now().naive_local(), message)
    }

    /// Append one line with an explicit timestamp
    pub fn log_at(&self, timestamp: NaiveDateTime, message: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", format_line(timestamp, message))?;
        Ok(())
    }

    /// Log a failed run with the error kind
    pub fn log_failure(&self, kind: &str, message: &str) -> Result<()> {
        self.log(&format!("{}: {}: {}", FAILURE_PREFIX, kind, message))
    }

    /// Most recent entries, newest first
    pub fn get_recent(&self, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self.read_all()?.into_iter().rev().take(limit).collect())
    }

    /// Most recent failure entries, newest first
    pub fn get_failures(&self, limit: usize) -> Result<Vec<LogEntry>> {
        Ok(self
            .read_all()?
            .into_iter()
            .rev()
            .filter(LogEntry::is_failure)
            .take(limit)
            .collect())
    }

    /// Number of lines in the log
    pub fn count(&self) -> Result<usize> {
        Ok(self.read_all()?.len())
    }

    /// Remove every entry. Returns how many were deleted.
    pub fn clear(&self) -> Result<usize> {
        let count = self.count()?;
        if self.path.exists() {
            std::fs::write(&self.path, "")?;
        }
        Ok(count)
    }

    fn read_all(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(LogEntry::parse)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_line_format() {
        assert_eq!(
            format_line(at("2024-03-05 09:07:01"), "Data saved to CSV file"),
            "2024-03-05 09-07-01 : Data saved to CSV file"
        );
    }

    #[test]
    fn test_log_appends_and_reads_back() {
        let dir = tempdir().unwrap();
        let log = ProgressLog::new(dir.path().join("code_log.txt"));

        log.log_at(at("2024-03-05 09:07:01"), "first").unwrap();
        log.log_at(at("2024-03-05 09:07:02"), "second").unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(
            content,
            "2024-03-05 09-07-01 : first\n2024-03-05 09-07-02 : second\n"
        );

        let recent = log.get_recent(10).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].message, "second");
        assert_eq!(recent[0].timestamp, Some(at("2024-03-05 09:07:02")));
    }

    #[test]
    fn test_failures_and_clear() {
        let dir = tempdir().unwrap();
        let log = ProgressLog::new(dir.path().join("logs").join("code_log.txt"));

        log.log("Preliminaries complete. Initiating ETL process").unwrap();
        log.log_failure("StructureError", "Document has no table body region").unwrap();

        let failures = log.get_failures(5).unwrap();
        assert_eq!(failures.len(), 1);
        assert!(failures[0].message.contains("StructureError"));

        assert_eq!(log.clear().unwrap(), 2);
        assert_eq!(log.count().unwrap(), 0);
    }

    #[test]
    fn test_unparseable_line_kept_as_message() {
        let entry = LogEntry::parse("garbage line");
        assert_eq!(entry.timestamp, None);
        assert_eq!(entry.message, "garbage line");
    }
}
