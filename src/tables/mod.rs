//! Versioned policy tables: tax brackets, thresholds and rates that change with legislation
//!
//! Every constant the formulas depend on lives here rather than inline in formula code.
//! A [`PolicyCatalog`] holds one [`PolicyTables`] per effective date and picks the version
//! in force for a given reference date.

mod brackets;
mod rules;
pub mod loader;

pub use brackets::{ContributionBand, ContributionTable, IncomeTaxTable, TaxBracket};
pub use rules::{
    DamageRange, DamageRanges, DebtRiskThresholds, LaborConstants, LatePaymentDefaults,
    MarketRates, PisCofinsPair, PisCofinsRates, ProgressionFractions, RetirementRules,
    RetirementThreshold,
};

use chrono::NaiveDate;
use serde::Serialize;
use std::path::Path;

use crate::error::TableError;

/// All policy constants in force from `effective_from`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolicyTables {
    pub effective_from: NaiveDate,
    pub income_tax: IncomeTaxTable,
    pub social_security: ContributionTable,
    pub progression: ProgressionFractions,
    pub retirement: RetirementRules,
    pub debt_risk: DebtRiskThresholds,
    pub market_rates: MarketRates,
    pub pis_cofins: PisCofinsRates,
    pub labor: LaborConstants,
    pub late_payment: LatePaymentDefaults,
    pub damages: DamageRanges,
}

impl PolicyTables {
    /// Built-in tables matching the 2024 legislation
    pub fn default_2024() -> Self {
        Self {
            effective_from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
            income_tax: IncomeTaxTable::default_2024(),
            social_security: ContributionTable::default_2024(),
            progression: ProgressionFractions::default(),
            retirement: RetirementRules::default(),
            debt_risk: DebtRiskThresholds::default(),
            market_rates: MarketRates::default(),
            pis_cofins: PisCofinsRates::default(),
            labor: LaborConstants::default(),
            late_payment: LatePaymentDefaults::default(),
            damages: DamageRanges::default(),
        }
    }

    /// Built-in tables re-stamped with another effective date
    pub fn defaults_effective(effective_from: NaiveDate) -> Self {
        Self { effective_from, ..Self::default_2024() }
    }

    /// Override a scalar constant by its `parameters.csv` key
    pub fn set_parameter(&mut self, key: &str, value: f64) -> Result<(), TableError> {
        let slot = match key {
            "irpf.dependent_deduction" => &mut self.income_tax.dependent_deduction,

            "progression.primary_pct" => &mut self.progression.primary_pct,
            "progression.repeat_pct" => &mut self.progression.repeat_pct,
            "progression.heinous_primary_pct" => &mut self.progression.heinous_primary_pct,
            "progression.heinous_repeat_pct" => &mut self.progression.heinous_repeat_pct,

            "retirement.male_min_age" => &mut self.retirement.male.min_age,
            "retirement.male_min_contribution_years" => &mut self.retirement.male.min_contribution_years,
            "retirement.female_min_age" => &mut self.retirement.female.min_age,
            "retirement.female_min_contribution_years" => &mut self.retirement.female.min_contribution_years,

            "debt_risk.healthy_max_pct" => &mut self.debt_risk.healthy_max_pct,
            "debt_risk.attention_max_pct" => &mut self.debt_risk.attention_max_pct,

            "market.financing_monthly_pct" => &mut self.market_rates.financing_monthly_pct,
            "market.payroll_card_monthly_pct" => &mut self.market_rates.payroll_card_monthly_pct,

            "pis_cofins.cumulative_pis_pct" => &mut self.pis_cofins.cumulative.pis_pct,
            "pis_cofins.cumulative_cofins_pct" => &mut self.pis_cofins.cumulative.cofins_pct,
            "pis_cofins.non_cumulative_pis_pct" => &mut self.pis_cofins.non_cumulative.pis_pct,
            "pis_cofins.non_cumulative_cofins_pct" => &mut self.pis_cofins.non_cumulative.cofins_pct,

            "labor.overtime_50_multiplier" => &mut self.labor.overtime_50_multiplier,
            "labor.overtime_100_multiplier" => &mut self.labor.overtime_100_multiplier,
            "labor.rest_pay_divisor" => &mut self.labor.rest_pay_divisor,
            "labor.hazard_pct" => &mut self.labor.hazard_pct,
            "labor.fgts_deposit_pct" => &mut self.labor.fgts_deposit_pct,
            "labor.fgts_fine_pct" => &mut self.labor.fgts_fine_pct,
            "labor.fgts_interest_pct" => &mut self.labor.fgts_interest_pct,
            "labor.fgts_correction_pct" => &mut self.labor.fgts_correction_pct,
            "labor.notice_base_days" => &mut self.labor.notice_base_days,
            "labor.notice_days_per_year" => &mut self.labor.notice_days_per_year,
            "labor.notice_max_days" => &mut self.labor.notice_max_days,

            "late_payment.iptu_fine_pct" => &mut self.late_payment.iptu_fine_pct,
            "late_payment.iptu_monthly_interest_pct" => &mut self.late_payment.iptu_monthly_interest_pct,
            "late_payment.default_annual_interest_pct" => &mut self.late_payment.default_annual_interest_pct,

            "damages.leve_min" => &mut self.damages.leve.min,
            "damages.leve_max" => &mut self.damages.leve.max,
            "damages.media_min" => &mut self.damages.media.min,
            "damages.media_max" => &mut self.damages.media.max,
            "damages.grave_min" => &mut self.damages.grave.min,
            "damages.grave_max" => &mut self.damages.grave.max,
            "damages.gravissima_min" => &mut self.damages.gravissima.min,
            "damages.gravissima_max" => &mut self.damages.gravissima.max,

            other => return Err(TableError::UnknownParameter(other.to_string())),
        };
        *slot = value;
        Ok(())
    }
}

impl Default for PolicyTables {
    fn default() -> Self {
        Self::default_2024()
    }
}

/// Date-effective collection of table versions
#[derive(Debug, Clone)]
pub struct PolicyCatalog {
    /// Sorted by ascending `effective_from`, never empty
    versions: Vec<PolicyTables>,
}

impl PolicyCatalog {
    /// Catalog with a single version
    pub fn single(tables: PolicyTables) -> Self {
        Self { versions: vec![tables] }
    }

    pub fn new(mut versions: Vec<PolicyTables>) -> Result<Self, TableError> {
        if versions.is_empty() {
            return Err(TableError::Structure("policy catalog has no versions".into()));
        }
        versions.sort_by_key(|v| v.effective_from);
        Ok(Self { versions })
    }

    /// Load every version found in a tables directory
    pub fn from_csv_dir(path: &Path) -> Result<Self, TableError> {
        Self::new(loader::load_versions(path)?)
    }

    /// Versions compiled into the crate from data/tables/
    pub fn embedded() -> Result<Self, TableError> {
        Self::new(loader::load_embedded()?)
    }

    /// Load from the default location (data/tables/)
    pub fn from_csv() -> Result<Self, TableError> {
        Self::from_csv_dir(Path::new(loader::DEFAULT_TABLES_PATH))
    }

    /// Latest version effective on or before `date`.
    /// Dates earlier than every version get the earliest one.
    pub fn for_date(&self, date: NaiveDate) -> &PolicyTables {
        self.versions
            .iter()
            .rev()
            .find(|v| v.effective_from <= date)
            .unwrap_or(&self.versions[0])
    }

    pub fn versions(&self) -> &[PolicyTables] {
        &self.versions
    }
}

impl Default for PolicyCatalog {
    fn default() -> Self {
        Self::single(PolicyTables::default_2024())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_set_parameter() {
        let mut tables = PolicyTables::default_2024();
        tables.set_parameter("market.financing_monthly_pct", 2.5).unwrap();
        assert_eq!(tables.market_rates.financing_monthly_pct, 2.5);

        let err = tables.set_parameter("market.nonexistent", 1.0);
        assert!(matches!(err, Err(TableError::UnknownParameter(_))));
    }

    #[test]
    fn test_catalog_selects_version_by_date() {
        let mut v2025 = PolicyTables::defaults_effective(date(2025, 5, 1));
        v2025.set_parameter("irpf.dependent_deduction", 200.0).unwrap();

        let catalog = PolicyCatalog::new(vec![v2025, PolicyTables::default_2024()]).unwrap();

        assert_eq!(catalog.for_date(date(2024, 6, 1)).effective_from, date(2024, 1, 1));
        assert_eq!(catalog.for_date(date(2025, 5, 1)).income_tax.dependent_deduction, 200.0);
        assert_eq!(catalog.for_date(date(2030, 1, 1)).effective_from, date(2025, 5, 1));
        // Before every version: earliest wins
        assert_eq!(catalog.for_date(date(2000, 1, 1)).effective_from, date(2024, 1, 1));
    }

    #[test]
    fn test_empty_catalog_rejected() {
        assert!(PolicyCatalog::new(Vec::new()).is_err());
    }
}
