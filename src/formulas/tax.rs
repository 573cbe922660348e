//! Tax formulas: monthly income tax, social-security contribution, PIS/COFINS and ITBI

use serde::{Deserialize, Serialize};

use crate::tables::{ContributionTable, IncomeTaxTable, PisCofinsRates};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeTaxInput {
    pub gross_income: f64,
    pub dependents: u32,
    pub pension_contribution: f64,
    pub other_deductions: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IncomeTax {
    pub taxable_base: f64,
    /// Nominal rate of the selected bracket, in percent
    pub rate_pct: f64,
    pub deduction: f64,
    pub tax_due: f64,
    pub effective_rate_pct: f64,
}

/// Monthly progressive income tax.
///
/// The bracket is the first one, in ascending bound order, whose upper bound is >= the
/// taxable base; a base exactly on a bound stays in the lower bracket.
/// Tax due is `base·rate − deduction`, floored at zero.
pub fn income_tax(input: &IncomeTaxInput, table: &IncomeTaxTable) -> IncomeTax {
    let dependents_deduction = input.dependents as f64 * table.dependent_deduction;
    let taxable_base =
        input.gross_income - input.pension_contribution - dependents_deduction - input.other_deductions;

    let bracket = table.bracket_for(taxable_base);
    let tax_due = (taxable_base * bracket.rate_pct / 100.0 - bracket.deduction).max(0.0);

    let effective_rate_pct = if input.gross_income > 0.0 {
        tax_due / input.gross_income * 100.0
    } else {
        0.0
    };

    IncomeTax {
        taxable_base,
        rate_pct: bracket.rate_pct,
        deduction: bracket.deduction,
        tax_due,
        effective_rate_pct,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SocialSecurity {
    pub contribution: f64,
    pub effective_rate_pct: f64,
    pub ceiling_reached: bool,
}

/// Employee contribution (INSS), progressive by slices up to the ceiling
pub fn social_security(gross_salary: f64, table: &ContributionTable) -> SocialSecurity {
    let contribution = table.contribution(gross_salary);
    let effective_rate_pct = if gross_salary > 0.0 {
        contribution / gross_salary * 100.0
    } else {
        0.0
    };

    SocialSecurity {
        contribution,
        effective_rate_pct,
        ceiling_reached: gross_salary > table.ceiling(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaxRegime {
    /// Lucro Presumido
    Cumulative,
    /// Lucro Real
    NonCumulative,
}

impl TaxRegime {
    pub fn label(&self) -> &'static str {
        match self {
            TaxRegime::Cumulative => "Cumulativo (Lucro Presumido)",
            TaxRegime::NonCumulative => "Não Cumulativo (Lucro Real)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PisCofins {
    pub pis: f64,
    pub cofins: f64,
    pub total: f64,
    pub regime: TaxRegime,
}

pub fn pis_cofins(revenue: f64, regime: TaxRegime, rates: &PisCofinsRates) -> PisCofins {
    let pair = match regime {
        TaxRegime::Cumulative => rates.cumulative,
        TaxRegime::NonCumulative => rates.non_cumulative,
    };
    let pis = revenue * pair.pis_pct / 100.0;
    let cofins = revenue * pair.cofins_pct / 100.0;

    PisCofins { pis, cofins, total: pis + cofins, regime }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferTax {
    pub base: f64,
    pub rate_pct: f64,
    pub tax: f64,
}

/// Real-estate transfer tax (ITBI) at the municipal rate
pub fn transfer_tax(property_value: f64, rate_pct: f64) -> TransferTax {
    TransferTax {
        base: property_value,
        rate_pct,
        tax: property_value * rate_pct / 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn gross(income: f64) -> IncomeTaxInput {
        IncomeTaxInput { gross_income: income, dependents: 0, pension_contribution: 0.0, other_deductions: 0.0 }
    }

    #[test]
    fn test_exempt_bracket() {
        let tax = income_tax(&gross(2_000.0), &IncomeTaxTable::default_2024());
        assert_eq!(tax.rate_pct, 0.0);
        assert_eq!(tax.tax_due, 0.0);
        assert_eq!(tax.effective_rate_pct, 0.0);
    }

    #[test]
    fn test_base_on_boundary_uses_lower_bracket() {
        let table = IncomeTaxTable::default_2024();

        let tax = income_tax(&gross(2_826.65), &table);
        assert_eq!(tax.rate_pct, 7.5);
        assert_abs_diff_eq!(tax.tax_due, 2_826.65 * 0.075 - 169.44, epsilon = 1e-9);

        let above = income_tax(&gross(2_826.66), &table);
        assert_eq!(above.rate_pct, 15.0);
    }

    #[test]
    fn test_top_bracket_with_deductions() {
        let input = IncomeTaxInput {
            gross_income: 10_000.0,
            dependents: 2,
            pension_contribution: 500.0,
            other_deductions: 100.0,
        };
        let tax = income_tax(&input, &IncomeTaxTable::default_2024());

        let base = 10_000.0 - 500.0 - 2.0 * 189.59 - 100.0;
        assert_abs_diff_eq!(tax.taxable_base, base, epsilon = 1e-9);
        assert_eq!(tax.rate_pct, 27.5);
        assert_abs_diff_eq!(tax.tax_due, base * 0.275 - 896.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tax.effective_rate_pct, tax.tax_due / 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_tax_never_negative() {
        let table = IncomeTaxTable::default_2024();
        for income in [0.0, 100.0, 2_259.21, 2_300.0, 3_000.0, 4_000.0, 50_000.0] {
            assert!(income_tax(&gross(income), &table).tax_due >= 0.0);
        }
        // Deductions larger than income
        let input = IncomeTaxInput { gross_income: 1_000.0, dependents: 10, pension_contribution: 0.0, other_deductions: 0.0 };
        let tax = income_tax(&input, &table);
        assert!(tax.taxable_base < 0.0);
        assert_eq!(tax.tax_due, 0.0);
    }

    #[test]
    fn test_social_security() {
        let ss = social_security(1_412.0, &ContributionTable::default_2024());
        assert_abs_diff_eq!(ss.contribution, 105.9, epsilon = 1e-9);
        assert_abs_diff_eq!(ss.effective_rate_pct, 7.5, epsilon = 1e-9);
        assert!(!ss.ceiling_reached);

        let capped = social_security(10_000.0, &ContributionTable::default_2024());
        assert!(capped.ceiling_reached);
        assert_abs_diff_eq!(capped.contribution, 908.8618, epsilon = 1e-3);
    }

    #[test]
    fn test_pis_cofins_regimes() {
        let rates = PisCofinsRates::default();

        let cumulative = pis_cofins(100_000.0, TaxRegime::Cumulative, &rates);
        assert_abs_diff_eq!(cumulative.pis, 650.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cumulative.cofins, 3_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cumulative.total, 3_650.0, epsilon = 1e-9);

        let non_cumulative = pis_cofins(100_000.0, TaxRegime::NonCumulative, &rates);
        assert_abs_diff_eq!(non_cumulative.pis, 1_650.0, epsilon = 1e-9);
        assert_abs_diff_eq!(non_cumulative.cofins, 7_600.0, epsilon = 1e-9);
    }

    #[test]
    fn test_transfer_tax() {
        let itbi = transfer_tax(500_000.0, 3.0);
        assert_abs_diff_eq!(itbi.tax, 15_000.0, epsilon = 1e-9);
    }
}
