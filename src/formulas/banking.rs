//! Consumer-credit checks: overindebtedness, financing review and payroll-card (RMC/RCC) rates

use serde::{Deserialize, Serialize};

use super::amortization::price_installment;
use crate::tables::{DebtRiskThresholds, MarketRates};

/// Debt-service classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DebtRisk {
    Healthy,
    Attention,
    Overindebted,
}

impl DebtRisk {
    pub fn label(&self) -> &'static str {
        match self {
            DebtRisk::Healthy => "Saudável",
            DebtRisk::Attention => "Atenção",
            DebtRisk::Overindebted => "Superendividado",
        }
    }
}

/// Upper bounds are inclusive: exactly 30% is healthy, exactly 50% is attention
pub fn classify_debt_ratio(ratio_pct: f64, thresholds: &DebtRiskThresholds) -> DebtRisk {
    if ratio_pct <= thresholds.healthy_max_pct {
        DebtRisk::Healthy
    } else if ratio_pct <= thresholds.attention_max_pct {
        DebtRisk::Attention
    } else {
        DebtRisk::Overindebted
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebtLoadInput {
    pub monthly_income: f64,
    pub essential_expenses: f64,
    /// Monthly installment of each debt
    pub installments: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebtLoad {
    pub total_installments: f64,
    pub payment_capacity: f64,
    pub ratio_pct: f64,
    pub risk: DebtRisk,
}

pub fn debt_load(input: &DebtLoadInput, thresholds: &DebtRiskThresholds) -> DebtLoad {
    let total_installments: f64 = input.installments.iter().sum();

    // Scale before dividing so that round ratios land exactly on the thresholds
    let ratio_pct = if input.monthly_income > 0.0 {
        total_installments * 100.0 / input.monthly_income
    } else {
        0.0
    };

    DebtLoad {
        total_installments,
        payment_capacity: input.monthly_income - input.essential_expenses,
        ratio_pct,
        risk: classify_debt_ratio(ratio_pct, thresholds),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FinancingReview {
    pub installment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
    pub charged_rate_pct: f64,
    pub market_rate_pct: f64,
    pub above_market: bool,
    /// Total paid at the charged rate minus total paid at the market rate; zero when not above market
    pub estimated_saving: f64,
}

/// Price schedule at the charged rate compared with the same loan at the market average
pub fn review_financing(principal: f64, charged_rate_pct: f64, months: u32, rates: &MarketRates) -> FinancingReview {
    let n = months as f64;
    let installment = price_installment(principal, charged_rate_pct / 100.0, months);
    let total_paid = installment * n;

    let market_rate_pct = rates.financing_monthly_pct;
    let above_market = charged_rate_pct > market_rate_pct;

    let estimated_saving = if above_market {
        let market_total = price_installment(principal, market_rate_pct / 100.0, months) * n;
        total_paid - market_total
    } else {
        0.0
    };

    FinancingReview {
        installment,
        total_paid,
        total_interest: total_paid - principal,
        charged_rate_pct,
        market_rate_pct,
        above_market,
        estimated_saving,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayrollCardCheck {
    pub abusive: bool,
    pub charged_rate_pct: f64,
    pub market_rate_pct: f64,
    pub rate_difference: f64,
    /// Annualized estimate of the amount paid above the market rate
    pub overpaid: f64,
}

impl PayrollCardCheck {
    pub fn message(&self) -> &'static str {
        if self.abusive {
            "Identificamos indícios de juros acima da média de mercado."
        } else {
            "A taxa cobrada está dentro ou abaixo da média de mercado."
        }
    }
}

/// Payroll-deducted credit card (RMC/RCC) rate against the market average.
/// Without the payment history the overpayment is estimated as `loan · diff% · 12`.
pub fn check_payroll_card_rate(loan: f64, charged_rate_pct: f64, rates: &MarketRates) -> PayrollCardCheck {
    let market_rate_pct = rates.payroll_card_monthly_pct;
    let abusive = charged_rate_pct > market_rate_pct;

    let (rate_difference, overpaid) = if abusive {
        let diff = charged_rate_pct - market_rate_pct;
        (diff, loan * diff / 100.0 * 12.0)
    } else {
        (0.0, 0.0)
    };

    PayrollCardCheck {
        abusive,
        charged_rate_pct,
        market_rate_pct,
        rate_difference,
        overpaid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn load(income: f64, installments: Vec<f64>) -> DebtLoad {
        debt_load(
            &DebtLoadInput { monthly_income: income, essential_expenses: 0.0, installments },
            &DebtRiskThresholds::default(),
        )
    }

    #[test]
    fn test_debt_ratio_boundaries() {
        assert_eq!(load(1_000.0, vec![300.0]).risk, DebtRisk::Healthy);
        assert_eq!(load(10_000.0, vec![3_001.0]).risk, DebtRisk::Attention);
        assert_eq!(load(1_000.0, vec![500.0]).risk, DebtRisk::Attention);
        assert_eq!(load(10_000.0, vec![5_001.0]).risk, DebtRisk::Overindebted);
    }

    #[test]
    fn test_debt_ratio_exactly_thirty_from_parts() {
        let result = load(100.0, vec![10.0, 20.0]);
        assert_eq!(result.ratio_pct, 30.0);
        assert_eq!(result.risk, DebtRisk::Healthy);
    }

    #[test]
    fn test_zero_income() {
        let result = load(0.0, vec![500.0]);
        assert_eq!(result.ratio_pct, 0.0);
        assert_eq!(result.risk, DebtRisk::Healthy);
    }

    #[test]
    fn test_payment_capacity() {
        let result = debt_load(
            &DebtLoadInput { monthly_income: 5_000.0, essential_expenses: 3_200.0, installments: vec![] },
            &DebtRiskThresholds::default(),
        );
        assert_eq!(result.payment_capacity, 1_800.0);
        assert_eq!(result.total_installments, 0.0);
    }

    #[test]
    fn test_financing_review_above_market() {
        let review = review_financing(10_000.0, 3.0, 12, &MarketRates::default());
        assert!(review.above_market);
        let market_total = price_installment(10_000.0, 0.02, 12) * 12.0;
        assert_abs_diff_eq!(review.estimated_saving, review.total_paid - market_total, epsilon = 1e-9);
        assert!(review.estimated_saving > 0.0);
    }

    #[test]
    fn test_financing_review_at_market() {
        let review = review_financing(10_000.0, 2.0, 12, &MarketRates::default());
        assert!(!review.above_market);
        assert_eq!(review.estimated_saving, 0.0);
        assert_abs_diff_eq!(review.installment, 945.596, epsilon = 1e-3);
    }

    #[test]
    fn test_payroll_card() {
        let rates = MarketRates::default();
        let abusive = check_payroll_card_rate(5_000.0, 3.0, &rates);
        assert!(abusive.abusive);
        assert_abs_diff_eq!(abusive.rate_difference, 1.2, epsilon = 1e-9);
        assert_abs_diff_eq!(abusive.overpaid, 720.0, epsilon = 1e-9);

        let fair = check_payroll_card_rate(5_000.0, 1.8, &rates);
        assert!(!fair.abusive);
        assert_eq!(fair.overpaid, 0.0);
        assert_eq!(fair.message(), "A taxa cobrada está dentro ou abaixo da média de mercado.");
    }
}
