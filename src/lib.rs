//! Legal Calc - calculation engine for Brazilian legal and financial practice
//!
//! This library provides:
//! - Labor entitlements (overtime, premiums, FGTS, termination pay)
//! - Taxes (income tax brackets, INSS slices, PIS/COFINS, ITBI)
//! - Price vs SAC amortization and financing reviews
//! - Monetary correction by official indices fetched from the Central Bank
//! - Retirement, sentence progression, estate, alimony and overindebtedness rules
//! - Versioned, date-effective policy tables

pub mod config;
pub mod correction;
pub mod dispatch;
pub mod error;
pub mod formulas;
pub mod tables;

// Re-export commonly used types
pub use config::EngineConfig;
pub use correction::{BcbClient, EconomicIndex, IndexSeriesSource, SeriesFetch, StaticSeries};
pub use dispatch::{Calculation, CalculationRequest, CalculationResponse, CalculatorKind, Engine};
pub use error::{CalcError, CalcResult, SetupError, TableError};
pub use tables::{PolicyCatalog, PolicyTables};
