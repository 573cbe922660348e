//! Progressive bracket tables for income tax and social-security contributions

use serde::{Deserialize, Serialize};

use crate::error::TableError;

/// One row of the income-tax table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Inclusive upper bound of the taxable base; `None` for the top bracket
    pub upper_bound: Option<f64>,
    /// Marginal rate in percent (7.5 means 7.5%)
    pub rate_pct: f64,
    /// Fixed amount subtracted after applying the rate
    pub deduction: f64,
}

impl TaxBracket {
    /// Whether a base falls in this bracket.
    /// Bounds are inclusive: a base equal to the bound belongs to this bracket, not the next.
    pub fn covers(&self, base: f64) -> bool {
        match self.upper_bound {
            Some(bound) => base <= bound,
            None => true,
        }
    }
}

/// Monthly income-tax table ("rate minus fixed deduction" form)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IncomeTaxTable {
    brackets: Vec<TaxBracket>,
    /// Flat deduction per declared dependent
    pub dependent_deduction: f64,
}

impl IncomeTaxTable {
    /// Build a table, ordering brackets by ascending upper bound.
    /// Exactly one bracket must be unbounded.
    pub fn new(mut brackets: Vec<TaxBracket>, dependent_deduction: f64) -> Result<Self, TableError> {
        if brackets.is_empty() {
            return Err(TableError::Structure("income tax table has no brackets".into()));
        }

        let unbounded = brackets.iter().filter(|b| b.upper_bound.is_none()).count();
        if unbounded != 1 {
            return Err(TableError::Structure(format!(
                "income tax table needs exactly one unbounded bracket, found {}",
                unbounded
            )));
        }

        brackets.sort_by(|a, b| {
            let a = a.upper_bound.unwrap_or(f64::INFINITY);
            let b = b.upper_bound.unwrap_or(f64::INFINITY);
            a.total_cmp(&b)
        });

        Ok(Self { brackets, dependent_deduction })
    }

    /// 2024 monthly table (Lei 14.663/2023)
    pub fn default_2024() -> Self {
        Self {
            brackets: vec![
                TaxBracket { upper_bound: Some(2259.20), rate_pct: 0.0, deduction: 0.0 },
                TaxBracket { upper_bound: Some(2826.65), rate_pct: 7.5, deduction: 169.44 },
                TaxBracket { upper_bound: Some(3751.05), rate_pct: 15.0, deduction: 381.44 },
                TaxBracket { upper_bound: Some(4664.68), rate_pct: 22.5, deduction: 662.77 },
                TaxBracket { upper_bound: None, rate_pct: 27.5, deduction: 896.00 },
            ],
            dependent_deduction: 189.59,
        }
    }

    /// First bracket, in ascending bound order, whose bound is >= base
    pub fn bracket_for(&self, base: f64) -> &TaxBracket {
        self.brackets
            .iter()
            .find(|b| b.covers(base))
            // new() guarantees an unbounded bracket, which covers everything
            .unwrap_or(&self.brackets[self.brackets.len() - 1])
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }
}

impl Default for IncomeTaxTable {
    fn default() -> Self {
        Self::default_2024()
    }
}

/// One slice of the contribution table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionBand {
    pub upper_bound: f64,
    pub rate_pct: f64,
}

/// Social-security contribution table, progressive by slices.
/// Each band taxes only the part of the salary that lies inside it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContributionTable {
    bands: Vec<ContributionBand>,
}

impl ContributionTable {
    pub fn new(mut bands: Vec<ContributionBand>) -> Result<Self, TableError> {
        if bands.is_empty() {
            return Err(TableError::Structure("contribution table has no bands".into()));
        }
        bands.sort_by(|a, b| a.upper_bound.total_cmp(&b.upper_bound));
        Ok(Self { bands })
    }

    /// 2024 table
    pub fn default_2024() -> Self {
        Self {
            bands: vec![
                ContributionBand { upper_bound: 1412.00, rate_pct: 7.5 },
                ContributionBand { upper_bound: 2666.68, rate_pct: 9.0 },
                ContributionBand { upper_bound: 4000.03, rate_pct: 12.0 },
                ContributionBand { upper_bound: 7786.02, rate_pct: 14.0 },
            ],
        }
    }

    /// Contribution ceiling (upper bound of the last band)
    pub fn ceiling(&self) -> f64 {
        self.bands.last().map(|b| b.upper_bound).unwrap_or(0.0)
    }

    /// Total contribution on a salary, capped at the ceiling
    pub fn contribution(&self, salary: f64) -> f64 {
        let capped = salary.min(self.ceiling());
        let mut lower = 0.0;
        let mut total = 0.0;

        for band in &self.bands {
            if capped <= lower {
                break;
            }
            let slice = capped.min(band.upper_bound) - lower;
            total += slice * band.rate_pct / 100.0;
            lower = band.upper_bound;
        }

        total
    }

    pub fn bands(&self) -> &[ContributionBand] {
        &self.bands
    }
}

impl Default for ContributionTable {
    fn default() -> Self {
        Self::default_2024()
    }
}
