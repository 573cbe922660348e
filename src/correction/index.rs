//! Economic indices published in the Central Bank time-series system (SGS)

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CalcError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EconomicIndex {
    /// Wage index
    Inpc,
    /// Market price index
    Igpm,
    /// General consumer price index
    Ipca,
    /// Benchmark interest rate, published daily
    Selic,
    /// Reference rate
    Tr,
}

impl EconomicIndex {
    pub const ALL: [EconomicIndex; 5] = [
        EconomicIndex::Inpc,
        EconomicIndex::Igpm,
        EconomicIndex::Ipca,
        EconomicIndex::Selic,
        EconomicIndex::Tr,
    ];

    /// SGS series code
    pub fn series_code(&self) -> u32 {
        match self {
            EconomicIndex::Inpc => 188,
            EconomicIndex::Igpm => 189,
            EconomicIndex::Ipca => 433,
            EconomicIndex::Selic => 11,
            EconomicIndex::Tr => 226,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EconomicIndex::Inpc => "INPC",
            EconomicIndex::Igpm => "IGPM",
            EconomicIndex::Ipca => "IPCA",
            EconomicIndex::Selic => "SELIC",
            EconomicIndex::Tr => "TR",
        }
    }
}

impl fmt::Display for EconomicIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EconomicIndex {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EconomicIndex::ALL
            .into_iter()
            .find(|index| index.as_str() == s)
            .ok_or_else(|| CalcError::UnknownIndex(s.to_string()))
    }
}

/// One published periodic rate, in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndexSeriesPoint {
    pub date: NaiveDate,
    pub rate: f64,
}

impl IndexSeriesPoint {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }
}
