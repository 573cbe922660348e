//! Loan amortization under the Price (French) and SAC (constant amortization) systems
//!
//! Both systems charge compound interest on the outstanding balance; they differ in how
//! the principal is repaid:
//! - **Price**: fixed installment `P·i(1+i)^n / ((1+i)^n − 1)`, principal share grows over time
//! - **SAC**: fixed principal slice `P/n`, installments strictly decrease with the balance

use serde::{Deserialize, Serialize};

/// Principal, monthly rate and term of a loan
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: f64,
    /// Monthly rate in percent (2.0 means 2% a.m.)
    pub monthly_rate_pct: f64,
    /// Number of monthly periods, at least 1
    pub months: u32,
}

impl LoanTerms {
    pub fn new(principal: f64, monthly_rate_pct: f64, months: u32) -> Self {
        Self { principal, monthly_rate_pct, months }
    }

    /// Periodic rate as a fraction
    pub fn rate(&self) -> f64 {
        self.monthly_rate_pct / 100.0
    }
}

/// A single period of an amortization schedule
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub period: u32,
    /// Outstanding balance before this period's interest
    pub opening_balance: f64,
    pub interest: f64,
    pub amortization: f64,
    pub installment: f64,
    pub closing_balance: f64,
}

/// Fixed Price installment, `P·i / (1 − (1+i)^−n)`.
///
/// The discount form stays finite for long terms, where `(1+i)^n` overflows.
/// With a zero rate the closed form is 0/0, so the installment degenerates to `P/n`.
pub fn price_installment(principal: f64, rate: f64, months: u32) -> f64 {
    if months == 0 {
        return 0.0;
    }
    if rate.abs() < 1e-12 {
        return principal / months as f64;
    }

    let discount = (1.0 + rate).powf(-(months as f64));
    principal * rate / (1.0 - discount)
}

/// Full Price schedule
pub fn price_schedule(terms: &LoanTerms) -> Vec<ScheduleRow> {
    let rate = terms.rate();
    let installment = price_installment(terms.principal, rate, terms.months);
    let mut balance = terms.principal;
    let mut rows = Vec::with_capacity(terms.months as usize);

    for period in 1..=terms.months {
        let interest = balance * rate;
        let amortization = installment - interest;
        let closing = balance - amortization;

        rows.push(ScheduleRow {
            period,
            opening_balance: balance,
            interest,
            amortization,
            installment,
            closing_balance: closing,
        });

        balance = closing;
    }

    rows
}

/// Full SAC schedule.
///
/// Periods are generated in ascending order; the opening balance of period `t`
/// is `P − A·(t−1)` with `A = P/n`.
pub fn sac_schedule(terms: &LoanTerms) -> Vec<ScheduleRow> {
    if terms.months == 0 {
        return Vec::new();
    }

    let rate = terms.rate();
    let amortization = terms.principal / terms.months as f64;

    (1..=terms.months)
        .map(|period| {
            let opening = terms.principal - amortization * (period - 1) as f64;
            let interest = opening * rate;
            ScheduleRow {
                period,
                opening_balance: opening,
                interest,
                amortization,
                installment: amortization + interest,
                closing_balance: opening - amortization,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub installment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SacSummary {
    pub first_installment: f64,
    pub last_installment: f64,
    pub total_paid: f64,
    pub total_interest: f64,
}

pub fn price_summary(terms: &LoanTerms) -> PriceSummary {
    let installment = price_installment(terms.principal, terms.rate(), terms.months);
    let total_paid = installment * terms.months as f64;

    PriceSummary {
        installment,
        total_paid,
        total_interest: total_paid - terms.principal,
    }
}

/// Aggregates of the SAC schedule. The whole schedule is walked because interest
/// accrues on the declining balance.
pub fn sac_summary(terms: &LoanTerms) -> SacSummary {
    let schedule = sac_schedule(terms);
    let total_paid: f64 = schedule.iter().map(|r| r.installment).sum();

    SacSummary {
        first_installment: schedule.first().map(|r| r.installment).unwrap_or(0.0),
        last_installment: schedule.last().map(|r| r.installment).unwrap_or(0.0),
        total_paid,
        total_interest: total_paid - terms.principal,
    }
}

/// Method with the lower total interest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendedMethod {
    Sac,
    Price,
}

impl RecommendedMethod {
    pub fn rationale(&self) -> &'static str {
        match self {
            RecommendedMethod::Sac => "SAC (Menor custo total de juros)",
            RecommendedMethod::Price => "Price (Parcelas fixas, mas juros maiores)",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmortizationComparison {
    pub price: PriceSummary,
    pub sac: SacSummary,
    /// Absolute difference between the two total-interest figures
    pub interest_difference: f64,
    pub recommended: RecommendedMethod,
}

/// Compare both systems for the same loan.
/// SAC is recommended only when its total interest is strictly lower (ties go to Price).
pub fn compare_methods(terms: &LoanTerms) -> AmortizationComparison {
    let price = price_summary(terms);
    let sac = sac_summary(terms);

    let recommended = if sac.total_interest < price.total_interest {
        RecommendedMethod::Sac
    } else {
        RecommendedMethod::Price
    };

    AmortizationComparison {
        price,
        sac,
        interest_difference: (price.total_interest - sac.total_interest).abs(),
        recommended,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn fixture() -> LoanTerms {
        LoanTerms::new(10_000.0, 2.0, 12)
    }

    #[test]
    fn test_price_installment_fixture() {
        let summary = price_summary(&fixture());
        assert_abs_diff_eq!(summary.installment, 945.596, epsilon = 1e-3);
        assert_abs_diff_eq!(summary.total_paid, 11_347.15, epsilon = 1e-2);
        assert_abs_diff_eq!(summary.total_interest, 1_347.15, epsilon = 1e-2);
    }

    #[test]
    fn test_sac_fixture() {
        let summary = sac_summary(&fixture());
        assert_abs_diff_eq!(summary.first_installment, 1_033.333, epsilon = 1e-3);
        // Balance before period 12 is one slice (833.33), interest 16.67
        assert_abs_diff_eq!(summary.last_installment, 850.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.total_paid, 11_300.0, epsilon = 1e-9);
        assert_abs_diff_eq!(summary.total_interest, 1_300.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sac_installments_strictly_decrease() {
        let schedule = sac_schedule(&fixture());
        assert_eq!(schedule.len(), 12);
        for pair in schedule.windows(2) {
            assert!(pair[1].installment < pair[0].installment);
        }
        assert_abs_diff_eq!(schedule.last().unwrap().closing_balance, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_sac_total_matches_schedule_sum() {
        for months in [1, 2, 7, 60, 360] {
            let terms = LoanTerms::new(250_000.0, 0.9, months);
            let summed: f64 = sac_schedule(&terms).iter().map(|r| r.installment).sum();
            assert_relative_eq!(sac_summary(&terms).total_paid, summed, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_sac_interest_never_exceeds_price() {
        for &principal in &[1_000.0, 50_000.0, 1_000_000.0] {
            for &rate in &[0.1, 1.0, 2.5, 8.0] {
                for &months in &[1_u32, 2, 12, 48, 240] {
                    let terms = LoanTerms::new(principal, rate, months);
                    let cmp = compare_methods(&terms);
                    assert!(
                        cmp.sac.total_interest <= cmp.price.total_interest + 1e-6,
                        "P={} i={} n={}", principal, rate, months
                    );
                }
            }
        }
    }

    #[test]
    fn test_single_period_ties() {
        let cmp = compare_methods(&LoanTerms::new(1_000.0, 2.0, 1));
        assert_abs_diff_eq!(cmp.sac.total_interest, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cmp.price.total_interest, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(cmp.interest_difference, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_recommendation_fixture() {
        let cmp = compare_methods(&fixture());
        assert_eq!(cmp.recommended, RecommendedMethod::Sac);
        assert_abs_diff_eq!(cmp.interest_difference, 47.15, epsilon = 1e-2);
    }

    #[test]
    fn test_price_long_term_stays_finite() {
        // (1.02)^40000 overflows f64; the installment tends to the interest-only P·i
        let installment = price_installment(10_000.0, 0.02, 40_000);
        assert!(installment.is_finite());
        assert_abs_diff_eq!(installment, 200.0, epsilon = 1e-9);

        let cmp = compare_methods(&LoanTerms::new(10_000.0, 2.0, 1_200));
        assert!(cmp.price.total_interest.is_finite());
        assert!(cmp.sac.total_interest <= cmp.price.total_interest);
        assert_eq!(cmp.recommended, RecommendedMethod::Sac);
    }

    #[test]
    fn test_zero_rate() {
        let terms = LoanTerms::new(1_200.0, 0.0, 12);
        let price = price_summary(&terms);
        assert_abs_diff_eq!(price.installment, 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(price.total_interest, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_price_schedule_pays_off() {
        let schedule = price_schedule(&fixture());
        let last = schedule.last().unwrap();
        assert_abs_diff_eq!(last.closing_balance, 0.0, epsilon = 1e-6);
        // Interest share shrinks, principal share grows
        assert!(schedule[0].interest > last.interest);
        assert!(schedule[0].amortization < last.amortization);
    }
}
