//! CSV-based policy table loader
//!
//! Loads versioned tables from CSV files in data/tables/:
//! - `irpf_brackets.csv`: effective_from,upper_bound,rate_pct,deduction (empty bound = top bracket)
//! - `inss_bands.csv`: effective_from,upper_bound,rate_pct
//! - `parameters.csv`: effective_from,key,value
//!
//! The same files are compiled in as the default catalog (see [`load_embedded`]).
//! Each distinct `effective_from` produces one version. A version starts as a copy of the
//! preceding one (the built-in tables for the first) and then applies its own rows.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::debug;
use serde::Deserialize;

use super::{ContributionBand, ContributionTable, IncomeTaxTable, PolicyTables, TaxBracket};
use crate::error::TableError;

/// Default path to the tables directory
pub const DEFAULT_TABLES_PATH: &str = "data/tables";

const IRPF_FILE: &str = "irpf_brackets.csv";
const INSS_FILE: &str = "inss_bands.csv";
const PARAMETERS_FILE: &str = "parameters.csv";

#[derive(Debug, Deserialize)]
struct BracketRow {
    effective_from: String,
    upper_bound: Option<f64>,
    rate_pct: f64,
    deduction: f64,
}

#[derive(Debug, Deserialize)]
struct BandRow {
    effective_from: String,
    upper_bound: f64,
    rate_pct: f64,
}

#[derive(Debug, Deserialize)]
struct ParameterRow {
    effective_from: String,
    key: String,
    value: f64,
}

/// Rows collected for one effective date
#[derive(Debug, Default)]
struct VersionRows {
    brackets: Vec<TaxBracket>,
    bands: Vec<ContributionBand>,
    parameters: Vec<(String, f64)>,
}

fn parse_date(value: &str, file: &'static str) -> Result<NaiveDate, TableError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| TableError::Date {
        file,
        value: value.to_string(),
    })
}

/// Shipped tables, compiled into the binary
const EMBEDDED_IRPF: &str = include_str!("../../data/tables/irpf_brackets.csv");
const EMBEDDED_INSS: &str = include_str!("../../data/tables/inss_bands.csv");
const EMBEDDED_PARAMETERS: &str = include_str!("../../data/tables/parameters.csv");

fn read_rows<T, R>(mut reader: Reader<R>) -> Result<Vec<T>, TableError>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        rows.push(result?);
    }
    Ok(rows)
}

/// Deserialize every row of a CSV file; a missing file yields no rows
fn read_file_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, TableError> {
    if !path.exists() {
        debug!("policy table file {} not present, skipping", path.display());
        return Ok(Vec::new());
    }
    read_rows(Reader::from_path(path)?)
}

fn read_str_rows<T: for<'de> Deserialize<'de>>(text: &str) -> Result<Vec<T>, TableError> {
    read_rows(Reader::from_reader(text.as_bytes()))
}

/// Raw rows of the three table files
struct TableRows {
    brackets: Vec<BracketRow>,
    bands: Vec<BandRow>,
    parameters: Vec<ParameterRow>,
}

impl TableRows {
    /// Group rows by effective date
    fn into_versions(self) -> Result<BTreeMap<NaiveDate, VersionRows>, TableError> {
        let mut versions: BTreeMap<NaiveDate, VersionRows> = BTreeMap::new();

        for row in self.brackets {
            let date = parse_date(&row.effective_from, IRPF_FILE)?;
            versions.entry(date).or_default().brackets.push(TaxBracket {
                upper_bound: row.upper_bound,
                rate_pct: row.rate_pct,
                deduction: row.deduction,
            });
        }

        for row in self.bands {
            let date = parse_date(&row.effective_from, INSS_FILE)?;
            versions.entry(date).or_default().bands.push(ContributionBand {
                upper_bound: row.upper_bound,
                rate_pct: row.rate_pct,
            });
        }

        for row in self.parameters {
            let date = parse_date(&row.effective_from, PARAMETERS_FILE)?;
            versions
                .entry(date)
                .or_default()
                .parameters
                .push((row.key.trim().to_string(), row.value));
        }

        Ok(versions)
    }
}

/// Load all table versions from a directory, oldest first
pub fn load_versions(path: &Path) -> Result<Vec<PolicyTables>, TableError> {
    if !path.is_dir() {
        return Err(TableError::Io {
            path: path.display().to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "tables directory not found"),
        });
    }

    let rows = TableRows {
        brackets: read_file_rows(&path.join(IRPF_FILE))?,
        bands: read_file_rows(&path.join(INSS_FILE))?,
        parameters: read_file_rows(&path.join(PARAMETERS_FILE))?,
    };
    build_versions(rows.into_versions()?, &path.display().to_string())
}

/// Table versions shipped with the crate
pub fn load_embedded() -> Result<Vec<PolicyTables>, TableError> {
    let rows = TableRows {
        brackets: read_str_rows(EMBEDDED_IRPF)?,
        bands: read_str_rows(EMBEDDED_INSS)?,
        parameters: read_str_rows(EMBEDDED_PARAMETERS)?,
    };
    build_versions(rows.into_versions()?, "embedded tables")
}

/// Each version starts from the previous one (the built-in tables for the first)
fn build_versions(
    rows: BTreeMap<NaiveDate, VersionRows>,
    source: &str,
) -> Result<Vec<PolicyTables>, TableError> {
    if rows.is_empty() {
        return Err(TableError::Structure(format!("no policy table rows found in {}", source)));
    }

    let mut versions: Vec<PolicyTables> = Vec::with_capacity(rows.len());

    for (date, version_rows) in rows {
        let mut tables = match versions.last() {
            Some(previous) => PolicyTables { effective_from: date, ..previous.clone() },
            None => PolicyTables::defaults_effective(date),
        };

        if !version_rows.brackets.is_empty() {
            let dependent_deduction = tables.income_tax.dependent_deduction;
            tables.income_tax = IncomeTaxTable::new(version_rows.brackets, dependent_deduction)?;
        }

        if !version_rows.bands.is_empty() {
            tables.social_security = ContributionTable::new(version_rows.bands)?;
        }

        for (key, value) in &version_rows.parameters {
            tables.set_parameter(key, *value)?;
        }

        debug!("loaded policy tables effective from {} ({})", date, source);
        versions.push(tables);
    }

    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("legal_calc_tables_{}_{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_shipped_tables() {
        let versions = load_versions(Path::new(DEFAULT_TABLES_PATH))
            .expect("Failed to load shipped tables");

        assert!(!versions.is_empty());
        let first = &versions[0];
        assert_eq!(first.effective_from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(first.income_tax, IncomeTaxTable::default_2024());
        assert_eq!(first.social_security, ContributionTable::default_2024());
        assert_eq!(first.progression.heinous_repeat_pct, 60.0);

        // 2025: new INSS bands in January, new IRPF brackets from May
        assert_eq!(versions.len(), 3);
        assert_eq!(versions[1].social_security.ceiling(), 8157.41);
        assert_eq!(versions[1].income_tax, first.income_tax);
        assert_eq!(versions[2].social_security, versions[1].social_security);
        assert_eq!(versions[2].income_tax.brackets()[0].upper_bound, Some(2428.80));
    }

    #[test]
    fn test_embedded_tables_match_shipped_files() {
        let embedded = load_embedded().unwrap();
        let on_disk = load_versions(Path::new(DEFAULT_TABLES_PATH)).unwrap();
        assert_eq!(embedded, on_disk);
    }

    #[test]
    fn test_versions_inherit_from_previous() {
        let dir = scratch_dir("inherit");
        fs::write(
            dir.join(IRPF_FILE),
            "effective_from,upper_bound,rate_pct,deduction\n\
             2023-01-01,2000.00,0,0\n\
             2023-01-01,,10,200\n",
        )
        .unwrap();
        fs::write(
            dir.join(PARAMETERS_FILE),
            "effective_from,key,value\n\
             2023-01-01,irpf.dependent_deduction,150\n\
             2025-01-01,market.financing_monthly_pct,2.2\n",
        )
        .unwrap();

        let versions = load_versions(&dir).unwrap();
        assert_eq!(versions.len(), 2);

        // 2025 keeps the 2023 brackets and dependent deduction
        let later = &versions[1];
        assert_eq!(later.income_tax.brackets().len(), 2);
        assert_eq!(later.income_tax.dependent_deduction, 150.0);
        assert_eq!(later.market_rates.financing_monthly_pct, 2.2);
        // Untouched parameters keep the built-in values
        assert_eq!(later.retirement.male.min_age, 65.0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_unknown_parameter_fails() {
        let dir = scratch_dir("unknown");
        fs::write(
            dir.join(PARAMETERS_FILE),
            "effective_from,key,value\n2024-01-01,not.a.key,1\n",
        )
        .unwrap();

        let result = load_versions(&dir);
        assert!(matches!(result, Err(TableError::UnknownParameter(_))));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_bad_date_fails() {
        let dir = scratch_dir("bad_date");
        fs::write(
            dir.join(PARAMETERS_FILE),
            "effective_from,key,value\n01/01/2024,labor.hazard_pct,30\n",
        )
        .unwrap();

        let result = load_versions(&dir);
        assert!(matches!(result, Err(TableError::Date { .. })));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_directory() {
        let result = load_versions(Path::new("data/does-not-exist"));
        assert!(matches!(result, Err(TableError::Io { .. })));
    }
}
