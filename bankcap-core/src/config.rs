//! Configuration management
//!
//! Settings live in `settings.json` inside the working directory:
//! ```json
//! {
//!   "sourceUrl": "https://...",
//!   "targetCurrencies": ["GBP", "EUR", "INR"],
//!   "tableName": "Largest_banks",
//!   "queries": ["SELECT * FROM Largest_banks"]
//! }
//! ```
//! Every field is optional and falls back to the defaults below. Relative
//! paths are resolved against the working directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::rates::normalize_currency_code;
use crate::domain::result::{Error, Result};
use crate::domain::RecordSchema;

pub const SETTINGS_FILE: &str = "settings.json";

const DEFAULT_SOURCE_URL: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

/// Raw settings.json structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub source_url: String,
    /// Output-shape hint: `[name field, base value field]`
    pub expected_columns: Vec<String>,
    pub base_currency: String,
    pub target_currencies: Vec<String>,
    /// Target field name, `{currency}` is replaced by the code
    pub target_field_template: String,
    pub rates_path: String,
    pub output_csv_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    pub log_path: PathBuf,
    pub queries: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            expected_columns: vec!["Name".to_string(), "MC_USD_Billion".to_string()],
            base_currency: "USD".to_string(),
            target_currencies: vec!["GBP".to_string(), "EUR".to_string(), "INR".to_string()],
            target_field_template: "MC_{currency}_Billion".to_string(),
            rates_path: "exchange_rate.csv".to_string(),
            output_csv_path: PathBuf::from("Largest_banks_data.csv"),
            database_path: PathBuf::from("Banks.duckdb"),
            table_name: "Largest_banks".to_string(),
            log_path: PathBuf::from("code_log.txt"),
            queries: vec![
                "SELECT * FROM Largest_banks".to_string(),
                "SELECT AVG(MC_GBP_Billion) FROM Largest_banks".to_string(),
                "SELECT Name FROM Largest_banks LIMIT 5".to_string(),
            ],
        }
    }
}

/// Resolved, validated configuration for one pipeline run
///
/// Immutable once loaded, the pipeline only ever borrows it.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub work_dir: PathBuf,
    pub source_url: String,
    pub expected_columns: Vec<String>,
    pub base_currency: String,
    pub target_currencies: Vec<String>,
    pub target_field_template: String,
    /// Local path (resolved) or HTTP(S) URL of the rate CSV
    pub rates_location: String,
    pub output_csv_path: PathBuf,
    pub database_path: PathBuf,
    pub table_name: String,
    pub log_path: PathBuf,
    pub queries: Vec<String>,
}

impl Config {
    /// Load config from a working directory
    ///
    /// The source and rate locations can be overridden with the
    /// `BANKCAP_SOURCE_URL` and `BANKCAP_RATES` environment variables.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let settings = Settings::load(work_dir)?;
        let mut config = Self::from_settings(work_dir, settings);

        if let Some(url) = non_empty_env("BANKCAP_SOURCE_URL") {
            config.source_url = url;
        }
        if let Some(rates) = non_empty_env("BANKCAP_RATES") {
            config.rates_location = resolve_location(work_dir, &rates);
        }

        config.validate()?;
        Ok(config)
    }

    /// Build a config from explicit settings, resolving paths against `work_dir`
    pub fn from_settings(work_dir: &Path, settings: Settings) -> Self {
        let resolve = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                work_dir.join(p)
            }
        };

        Self {
            work_dir: work_dir.to_path_buf(),
            source_url: settings.source_url,
            expected_columns: settings.expected_columns,
            base_currency: settings.base_currency,
            target_currencies: settings.target_currencies,
            target_field_template: settings.target_field_template,
            rates_location: resolve_location(work_dir, &settings.rates_path),
            output_csv_path: resolve(&settings.output_csv_path),
            database_path: resolve(&settings.database_path),
            table_name: settings.table_name,
            log_path: resolve(&settings.log_path),
            queries: settings.queries,
        }
    }

    /// Check the configuration shape before anything runs
    pub fn validate(&self) -> Result<()> {
        if self.source_url.trim().is_empty() {
            return Err(Error::config("sourceUrl must not be empty"));
        }
        if self.table_name.trim().is_empty() {
            return Err(Error::config("tableName must not be empty"));
        }
        if self.target_currencies.is_empty() {
            return Err(Error::config("targetCurrencies must list at least one currency"));
        }
        normalize_currency_code(&self.base_currency)?;
        self.record_schema()?;
        Ok(())
    }

    /// Field layout derived from the expected columns and target currencies
    pub fn record_schema(&self) -> Result<RecordSchema> {
        RecordSchema::from_expected_columns(
            &self.expected_columns,
            &self.target_currencies,
            &self.target_field_template,
        )
    }
}

impl Settings {
    /// Read settings.json, falling back to defaults when it does not exist
    pub fn load(work_dir: &Path) -> Result<Self> {
        let settings_path = work_dir.join(SETTINGS_FILE);
        if !settings_path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&settings_path)?;
        serde_json::from_str(&content).map_err(|e| {
            Error::config(format!("Invalid {}: {}", settings_path.display(), e))
        })
    }

    /// Write settings.json into the working directory
    pub fn save(&self, work_dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(work_dir)?;
        let settings_path = work_dir.join(SETTINGS_FILE);
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&settings_path, content)?;
        Ok(settings_path)
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// URLs stay as they are, relative paths are joined to the working directory
fn resolve_location(work_dir: &Path, location: &str) -> String {
    if crate::adapters::location::is_remote(location) || location.starts_with("file:") {
        return location.to_string();
    }
    let path = Path::new(location);
    if path.is_absolute() {
        location.to_string()
    } else {
        work_dir.join(path).to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_no_settings_file() {
        let dir = tempdir().unwrap();
        let config = Config::from_settings(dir.path(), Settings::load(dir.path()).unwrap());

        assert_eq!(config.table_name, "Largest_banks");
        assert_eq!(config.target_currencies, vec!["GBP", "EUR", "INR"]);
        assert_eq!(config.output_csv_path, dir.path().join("Largest_banks_data.csv"));
        assert_eq!(
            config.rates_location,
            dir.path().join("exchange_rate.csv").to_string_lossy()
        );
        assert_eq!(config.queries.len(), 3);
        config.validate().unwrap();
    }

    #[test]
    fn test_partial_settings_file() {
        let dir = tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{ "tableName": "Banks", "targetCurrencies": ["JPY"], "ratesPath": "https://example.com/rates.csv" }"#,
        )
        .unwrap();

        let config = Config::from_settings(dir.path(), Settings::load(dir.path()).unwrap());
        assert_eq!(config.table_name, "Banks");
        assert_eq!(config.target_currencies, vec!["JPY"]);
        assert_eq!(config.rates_location, "https://example.com/rates.csv");
        assert_eq!(config.expected_columns, vec!["Name", "MC_USD_Billion"]);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "{ not json").unwrap();

        assert!(matches!(Settings::load(dir.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let dir = tempdir().unwrap();
        let base = Config::from_settings(dir.path(), Settings::default());

        let mut config = base.clone();
        config.expected_columns = vec!["Name".to_string()];
        assert!(config.validate().is_err());

        let mut config = base.clone();
        config.target_currencies.clear();
        assert!(config.validate().is_err());

        let mut config = base;
        config.target_field_template = "MC_Billion".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_round_trips_settings() {
        let dir = tempdir().unwrap();
        let mut settings = Settings::default();
        settings.table_name = "Banks".to_string();
        settings.save(dir.path()).unwrap();

        assert_eq!(Settings::load(dir.path()).unwrap(), settings);
    }
}
