//! Late-payment penalties: overdue property tax, back rent and statutory default interest.
//!
//! All three accrue **simple** interest. Compounding belongs to monetary correction
//! and amortization only.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::dates::{days_between, whole_months_between};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PropertyTaxInput {
    pub original_value: f64,
    pub due_date: NaiveDate,
    pub reference_date: NaiveDate,
    pub fine_pct: f64,
    pub monthly_interest_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverdueCharge {
    pub original_value: f64,
    pub months_late: u32,
    pub fine: f64,
    pub interest: f64,
    pub total: f64,
}

/// Overdue IPTU: flat fine plus simple monthly interest per whole month late.
/// Nothing accrues until a full month has passed.
pub fn overdue_property_tax(input: &PropertyTaxInput) -> OverdueCharge {
    let months = whole_months_between(input.due_date, input.reference_date).max(0) as u32;

    let (fine, interest) = if months > 0 {
        (
            input.original_value * input.fine_pct / 100.0,
            input.original_value * input.monthly_interest_pct / 100.0 * months as f64,
        )
    } else {
        (0.0, 0.0)
    };

    OverdueCharge {
        original_value: input.original_value,
        months_late: months,
        fine,
        interest,
        total: input.original_value + fine + interest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentDebtInput {
    pub monthly_rent: f64,
    pub months_late: u32,
    pub fine_pct: f64,
    pub monthly_interest_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentDebt {
    pub base: f64,
    pub fine: f64,
    pub interest: f64,
    pub total: f64,
}

/// Back rent. The whole accumulated base is charged interest for the whole period,
/// not month by month.
pub fn rent_debt(input: &RentDebtInput) -> RentDebt {
    let months = input.months_late as f64;
    let base = input.monthly_rent * months;
    let fine = base * input.fine_pct / 100.0;
    let interest = base * input.monthly_interest_pct / 100.0 * months;

    RentDebt {
        base,
        fine,
        interest,
        total: base + fine + interest,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultInterestInput {
    pub principal: f64,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub annual_rate_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefaultInterest {
    pub principal: f64,
    pub days: u32,
    pub interest: f64,
    pub total: f64,
}

/// Juros moratórios on a 365-day year
pub fn default_interest(input: &DefaultInterestInput) -> DefaultInterest {
    let days = days_between(input.start, input.end).max(0);
    let interest = input.principal * input.annual_rate_pct / 100.0 / 365.0 * days as f64;

    DefaultInterest {
        principal: input.principal,
        days: days as u32,
        interest,
        total: input.principal + interest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_property_tax_three_months() {
        let charge = overdue_property_tax(&PropertyTaxInput {
            original_value: 1_000.0,
            due_date: d(2024, 1, 10),
            reference_date: d(2024, 4, 10),
            fine_pct: 2.0,
            monthly_interest_pct: 1.0,
        });
        assert_eq!(charge.months_late, 3);
        assert_abs_diff_eq!(charge.fine, 20.0, epsilon = 1e-9);
        assert_abs_diff_eq!(charge.interest, 30.0, epsilon = 1e-9);
        assert_abs_diff_eq!(charge.total, 1_050.0, epsilon = 1e-9);
    }

    #[test]
    fn test_property_tax_not_yet_late() {
        let charge = overdue_property_tax(&PropertyTaxInput {
            original_value: 1_000.0,
            due_date: d(2024, 1, 10),
            reference_date: d(2024, 2, 9),
            fine_pct: 2.0,
            monthly_interest_pct: 1.0,
        });
        assert_eq!(charge.months_late, 0);
        assert_eq!(charge.fine, 0.0);
        assert_eq!(charge.total, 1_000.0);

        let future = overdue_property_tax(&PropertyTaxInput {
            original_value: 1_000.0,
            due_date: d(2024, 1, 10),
            reference_date: d(2023, 6, 1),
            fine_pct: 2.0,
            monthly_interest_pct: 1.0,
        });
        assert_eq!(future.months_late, 0);
        assert_eq!(future.interest, 0.0);
    }

    #[test]
    fn test_interest_is_simple_not_compound() {
        let charge = overdue_property_tax(&PropertyTaxInput {
            original_value: 1_000.0,
            due_date: d(2022, 1, 1),
            reference_date: d(2024, 1, 1),
            fine_pct: 0.0,
            monthly_interest_pct: 1.0,
        });
        assert_eq!(charge.months_late, 24);
        assert_abs_diff_eq!(charge.interest, 240.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rent_debt() {
        let debt = rent_debt(&RentDebtInput {
            monthly_rent: 1_000.0,
            months_late: 10,
            fine_pct: 10.0,
            monthly_interest_pct: 1.0,
        });
        assert_eq!(debt.base, 10_000.0);
        assert_abs_diff_eq!(debt.fine, 1_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(debt.interest, 1_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(debt.total, 12_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_default_interest() {
        let result = default_interest(&DefaultInterestInput {
            principal: 36_500.0,
            start: d(2023, 1, 1),
            end: d(2024, 1, 1),
            annual_rate_pct: 12.0,
        });
        assert_eq!(result.days, 365);
        assert_abs_diff_eq!(result.interest, 4_380.0, epsilon = 1e-6);

        let reversed = default_interest(&DefaultInterestInput {
            principal: 36_500.0,
            start: d(2024, 1, 1),
            end: d(2023, 1, 1),
            annual_rate_pct: 12.0,
        });
        assert_eq!(reversed.days, 0);
        assert_eq!(reversed.interest, 0.0);
        assert_eq!(reversed.total, 36_500.0);
    }
}
