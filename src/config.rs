//! Engine configuration
//!
//! Read from the environment:
//!   LEGAL_CALC_INDEX_URL            base URL of the SGS time-series API
//!   LEGAL_CALC_FETCH_TIMEOUT_SECS   timeout for one index fetch
//!   LEGAL_CALC_TABLES_DIR           directory with versioned policy table CSVs (shipped tables when unset)

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::warn;

use crate::error::TableError;
use crate::tables::PolicyCatalog;

pub const DEFAULT_INDEX_URL: &str = "https://api.bcb.gov.br";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

pub const ENV_INDEX_URL: &str = "LEGAL_CALC_INDEX_URL";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "LEGAL_CALC_FETCH_TIMEOUT_SECS";
pub const ENV_TABLES_DIR: &str = "LEGAL_CALC_TABLES_DIR";

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub index_base_url: String,
    pub fetch_timeout: Duration,
    pub tables_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index_base_url: DEFAULT_INDEX_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            tables_dir: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparseable values keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_INDEX_URL).filter(|s| !s.trim().is_empty()) {
            config.index_base_url = url.trim().to_string();
        }

        if let Some(raw) = lookup(ENV_FETCH_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.fetch_timeout = Duration::from_secs(secs),
                _ => warn!(
                    "ignoring {}={:?}, using {}s",
                    ENV_FETCH_TIMEOUT_SECS, raw, DEFAULT_FETCH_TIMEOUT_SECS
                ),
            }
        }

        if let Some(dir) = lookup(ENV_TABLES_DIR).filter(|s| !s.trim().is_empty()) {
            config.tables_dir = Some(PathBuf::from(dir.trim()));
        }

        config
    }

    /// Policy catalog from `tables_dir`, or the tables compiled into the crate
    pub fn load_catalog(&self) -> Result<PolicyCatalog, TableError> {
        match &self.tables_dir {
            Some(dir) => PolicyCatalog::from_csv_dir(dir),
            None => PolicyCatalog::embedded(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.index_base_url, "https://api.bcb.gov.br");
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_default_catalog_includes_shipped_versions() {
        let catalog = EngineConfig::default().load_catalog().unwrap();
        assert_eq!(catalog.versions().len(), 3);
        let may_2025 = chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap();
        assert_eq!(catalog.for_date(may_2025).income_tax.brackets()[0].upper_bound, Some(2428.80));
    }

    #[test]
    fn test_overrides() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (ENV_INDEX_URL, "http://localhost:9000"),
            (ENV_FETCH_TIMEOUT_SECS, "3"),
            (ENV_TABLES_DIR, "data/tables"),
        ]));
        assert_eq!(config.index_base_url, "http://localhost:9000");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.tables_dir, Some(PathBuf::from("data/tables")));
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        for raw in ["ten", "0", "-5"] {
            let config = EngineConfig::from_lookup(lookup_from(&[(ENV_FETCH_TIMEOUT_SECS, raw)]));
            assert_eq!(config.fetch_timeout, Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));
        }
    }
}
