//! Scalar policy constants grouped by legal area

use serde::{Deserialize, Serialize};

/// Percent of the sentence to serve before regime progression
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProgressionFractions {
    /// Non-heinous crime, first offence
    pub primary_pct: f64,
    /// Non-heinous crime, repeat offender
    pub repeat_pct: f64,
    pub heinous_primary_pct: f64,
    pub heinous_repeat_pct: f64,
}

impl ProgressionFractions {
    pub fn percent_for(&self, heinous: bool, repeat_offender: bool) -> f64 {
        match (heinous, repeat_offender) {
            (false, false) => self.primary_pct,
            (false, true) => self.repeat_pct,
            (true, false) => self.heinous_primary_pct,
            (true, true) => self.heinous_repeat_pct,
        }
    }
}

impl Default for ProgressionFractions {
    fn default() -> Self {
        // Lei 13.964/2019, generic non-violent and heinous cases
        Self {
            primary_pct: 16.0,
            repeat_pct: 20.0,
            heinous_primary_pct: 40.0,
            heinous_repeat_pct: 60.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetirementThreshold {
    pub min_age: f64,
    pub min_contribution_years: f64,
}

/// Post-2019 general retirement rule by category
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RetirementRules {
    pub male: RetirementThreshold,
    pub female: RetirementThreshold,
}

impl Default for RetirementRules {
    fn default() -> Self {
        Self {
            male: RetirementThreshold { min_age: 65.0, min_contribution_years: 20.0 },
            female: RetirementThreshold { min_age: 62.0, min_contribution_years: 15.0 },
        }
    }
}

/// Debt-service ratio limits, both inclusive on the upper side
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DebtRiskThresholds {
    pub healthy_max_pct: f64,
    pub attention_max_pct: f64,
}

impl Default for DebtRiskThresholds {
    fn default() -> Self {
        Self { healthy_max_pct: 30.0, attention_max_pct: 50.0 }
    }
}

/// Average market rates used as the abusiveness benchmark (percent per month)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MarketRates {
    pub financing_monthly_pct: f64,
    pub payroll_card_monthly_pct: f64,
}

impl Default for MarketRates {
    fn default() -> Self {
        Self { financing_monthly_pct: 2.0, payroll_card_monthly_pct: 1.8 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PisCofinsPair {
    pub pis_pct: f64,
    pub cofins_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PisCofinsRates {
    /// Lucro Presumido
    pub cumulative: PisCofinsPair,
    /// Lucro Real
    pub non_cumulative: PisCofinsPair,
}

impl Default for PisCofinsRates {
    fn default() -> Self {
        Self {
            cumulative: PisCofinsPair { pis_pct: 0.65, cofins_pct: 3.0 },
            non_cumulative: PisCofinsPair { pis_pct: 1.65, cofins_pct: 7.6 },
        }
    }
}

/// Labor-law multipliers and percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaborConstants {
    pub overtime_50_multiplier: f64,
    pub overtime_100_multiplier: f64,
    /// Weekly rest pay is approximated as total overtime / this divisor
    pub rest_pay_divisor: f64,
    pub hazard_pct: f64,
    pub fgts_deposit_pct: f64,
    pub fgts_fine_pct: f64,
    /// Flat placeholders until a per-month JAM table is wired in
    pub fgts_interest_pct: f64,
    pub fgts_correction_pct: f64,
    pub notice_base_days: f64,
    pub notice_days_per_year: f64,
    pub notice_max_days: f64,
}

impl Default for LaborConstants {
    fn default() -> Self {
        Self {
            overtime_50_multiplier: 1.5,
            overtime_100_multiplier: 2.0,
            rest_pay_divisor: 6.0,
            hazard_pct: 30.0,
            fgts_deposit_pct: 8.0,
            fgts_fine_pct: 40.0,
            fgts_interest_pct: 3.0,
            fgts_correction_pct: 15.0,
            notice_base_days: 30.0,
            notice_days_per_year: 3.0,
            notice_max_days: 90.0,
        }
    }
}

/// Defaults applied when a late-payment request omits its rates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatePaymentDefaults {
    pub iptu_fine_pct: f64,
    pub iptu_monthly_interest_pct: f64,
    pub default_annual_interest_pct: f64,
}

impl Default for LatePaymentDefaults {
    fn default() -> Self {
        Self {
            iptu_fine_pct: 2.0,
            iptu_monthly_interest_pct: 1.0,
            default_annual_interest_pct: 12.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageRange {
    pub min: f64,
    pub max: f64,
}

/// Moral damages reference ranges by severity
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DamageRanges {
    pub leve: DamageRange,
    pub media: DamageRange,
    pub grave: DamageRange,
    pub gravissima: DamageRange,
}

impl Default for DamageRanges {
    fn default() -> Self {
        Self {
            leve: DamageRange { min: 1_000.0, max: 5_000.0 },
            media: DamageRange { min: 5_000.0, max: 15_000.0 },
            grave: DamageRange { min: 15_000.0, max: 50_000.0 },
            gravissima: DamageRange { min: 50_000.0, max: 200_000.0 },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progression_lookup() {
        let fractions = ProgressionFractions::default();
        assert_eq!(fractions.percent_for(false, false), 16.0);
        assert_eq!(fractions.percent_for(false, true), 20.0);
        assert_eq!(fractions.percent_for(true, false), 40.0);
        assert_eq!(fractions.percent_for(true, true), 60.0);
    }
}
