//! Labor-law entitlements: overtime, health/hazard premiums, FGTS and termination pay

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::dates::{days_between, whole_months_between};
use crate::tables::LaborConstants;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvertimeInput {
    pub monthly_salary: f64,
    /// Contractual monthly hours (e.g. 220), must be positive
    pub monthly_hours: f64,
    pub hours_50: f64,
    pub hours_100: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OvertimePay {
    pub hourly_rate: f64,
    pub hourly_rate_50: f64,
    pub hourly_rate_100: f64,
    pub total_50: f64,
    pub total_100: f64,
    /// Weekly rest pay reflex (DSR)
    pub rest_pay: f64,
    pub grand_total: f64,
}

/// Overtime at the 50% and 100% premiums plus the weekly rest pay reflex.
///
/// Rest pay uses the fixed `total / 6` business-day-to-Sunday approximation,
/// not a calendar count.
pub fn overtime(input: &OvertimeInput, labor: &LaborConstants) -> OvertimePay {
    let hourly_rate = input.monthly_salary / input.monthly_hours;
    let hourly_rate_50 = hourly_rate * labor.overtime_50_multiplier;
    let hourly_rate_100 = hourly_rate * labor.overtime_100_multiplier;

    let total_50 = hourly_rate_50 * input.hours_50;
    let total_100 = hourly_rate_100 * input.hours_100;
    let overtime_total = total_50 + total_100;
    let rest_pay = overtime_total / labor.rest_pay_divisor;

    OvertimePay {
        hourly_rate,
        hourly_rate_50,
        hourly_rate_100,
        total_50,
        total_100,
        rest_pay,
        grand_total: overtime_total + rest_pay,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumInput {
    pub minimum_wage: f64,
    pub base_salary: f64,
    /// Insalubridade degree in percent (10, 20 or 40)
    pub unhealthy_degree_pct: f64,
    pub hazardous: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Premiums {
    pub unhealthy: f64,
    pub hazard: f64,
    pub total: f64,
    pub final_salary: f64,
}

impl Premiums {
    /// Both premiums were granted at once. The law normally makes the worker choose one;
    /// the sum is kept and this flag lets the caller show the caveat.
    pub fn accumulated(&self) -> bool {
        self.unhealthy > 0.0 && self.hazard > 0.0
    }
}

/// Unhealthy-work premium on the minimum wage plus hazard premium on the base salary.
/// When both apply they are summed.
pub fn work_premiums(input: &PremiumInput, labor: &LaborConstants) -> Premiums {
    let unhealthy = input.minimum_wage * (input.unhealthy_degree_pct / 100.0);
    let hazard = if input.hazardous {
        input.base_salary * labor.hazard_pct / 100.0
    } else {
        0.0
    };
    let total = unhealthy + hazard;

    Premiums {
        unhealthy,
        hazard,
        total,
        final_salary: input.base_salary + total,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FgtsInput {
    pub monthly_salary: f64,
    pub admission: NaiveDate,
    pub calculation_date: NaiveDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FgtsEstimate {
    pub months: u32,
    pub deposited: f64,
    pub interest: f64,
    pub correction: f64,
    pub total: f64,
}

/// FGTS balance estimate: monthly deposits plus flat interest and correction placeholders
pub fn fgts_estimate(input: &FgtsInput, labor: &LaborConstants) -> FgtsEstimate {
    let months = whole_months_between(input.admission, input.calculation_date).max(0) as u32;
    let deposited = input.monthly_salary * labor.fgts_deposit_pct / 100.0 * months as f64;
    let interest = deposited * labor.fgts_interest_pct / 100.0;
    let correction = deposited * labor.fgts_correction_pct / 100.0;

    FgtsEstimate {
        months,
        deposited,
        interest,
        correction,
        total: deposited + interest + correction,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminationInput {
    pub monthly_salary: f64,
    pub admission: NaiveDate,
    pub dismissal: NaiveDate,
    pub include_vacation: bool,
    pub include_thirteenth: bool,
    pub include_notice: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TerminationPay {
    pub salary_balance: f64,
    pub vacation: f64,
    pub thirteenth: f64,
    pub notice: f64,
    pub fgts: f64,
    pub fgts_fine: f64,
    pub total: f64,
    pub days_worked: i64,
    pub months_worked: u32,
}

/// Months counted toward the 13th salary in the dismissal year
fn thirteenth_months(admission: NaiveDate, dismissal: NaiveDate) -> u32 {
    let months = if admission.year() == dismissal.year() {
        whole_months_between(admission, dismissal)
    } else {
        let year_start = NaiveDate::from_ymd_opt(dismissal.year(), 1, 1).unwrap_or(dismissal);
        whole_months_between(year_start, dismissal)
    };
    months.clamp(0, 12) as u32
}

/// Termination entitlements (verbas rescisórias).
///
/// Assumes no vacation was taken in the current vesting period. One full vacation period
/// is added once the contract reaches twelve months.
pub fn termination_pay(input: &TerminationInput, labor: &LaborConstants) -> TerminationPay {
    let salary = input.monthly_salary;
    let days_worked = days_between(input.admission, input.dismissal);
    let months_worked = whole_months_between(input.admission, input.dismissal).max(0) as u32;

    let salary_balance = salary / 30.0 * input.dismissal.day() as f64;

    let vacation = if input.include_vacation {
        let proportional = salary / 12.0 * (months_worked % 12) as f64;
        let full = if months_worked >= 12 { salary + salary / 3.0 } else { 0.0 };
        proportional + proportional / 3.0 + full
    } else {
        0.0
    };

    let thirteenth = if input.include_thirteenth {
        salary / 12.0 * thirteenth_months(input.admission, input.dismissal) as f64
    } else {
        0.0
    };

    let notice = if input.include_notice {
        let years = (months_worked / 12) as f64;
        let days = (labor.notice_base_days + years * labor.notice_days_per_year).min(labor.notice_max_days);
        salary / 30.0 * days
    } else {
        0.0
    };

    let fgts = salary * labor.fgts_deposit_pct / 100.0 * months_worked as f64;
    let fgts_fine = fgts * labor.fgts_fine_pct / 100.0;

    TerminationPay {
        salary_balance,
        vacation,
        thirteenth,
        notice,
        fgts,
        fgts_fine,
        total: salary_balance + vacation + thirteenth + notice + fgts + fgts_fine,
        days_worked,
        months_worked,
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
    fn test_overtime() {
        let pay = overtime(
            &OvertimeInput { monthly_salary: 2_200.0, monthly_hours: 220.0, hours_50: 10.0, hours_100: 5.0 },
            &LaborConstants::default(),
        );
        assert_abs_diff_eq!(pay.hourly_rate, 10.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pay.hourly_rate_50, 15.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pay.hourly_rate_100, 20.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pay.total_50, 150.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pay.total_100, 100.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pay.rest_pay, 250.0 / 6.0, epsilon = 1e-12);
        assert_abs_diff_eq!(pay.grand_total, 250.0 + 250.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_premiums_are_summed() {
        let premiums = work_premiums(
            &PremiumInput { minimum_wage: 1_412.0, base_salary: 3_000.0, unhealthy_degree_pct: 20.0, hazardous: true },
            &LaborConstants::default(),
        );
        assert_abs_diff_eq!(premiums.unhealthy, 282.4, epsilon = 1e-9);
        assert_abs_diff_eq!(premiums.hazard, 900.0, epsilon = 1e-9);
        assert_abs_diff_eq!(premiums.total, 1_182.4, epsilon = 1e-9);
        assert_abs_diff_eq!(premiums.final_salary, 4_182.4, epsilon = 1e-9);
        assert!(premiums.accumulated());
    }

    #[test]
    fn test_hazard_only() {
        let premiums = work_premiums(
            &PremiumInput { minimum_wage: 1_412.0, base_salary: 3_000.0, unhealthy_degree_pct: 0.0, hazardous: true },
            &LaborConstants::default(),
        );
        assert_eq!(premiums.unhealthy, 0.0);
        assert!(!premiums.accumulated());
    }

    #[test]
    fn test_fgts_estimate() {
        let estimate = fgts_estimate(
            &FgtsInput { monthly_salary: 2_000.0, admission: d(2023, 1, 10), calculation_date: d(2024, 1, 10) },
            &LaborConstants::default(),
        );
        assert_eq!(estimate.months, 12);
        assert_abs_diff_eq!(estimate.deposited, 1_920.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.interest, 57.6, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.correction, 288.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.total, 2_265.6, epsilon = 1e-9);
    }

    #[test]
    fn test_fgts_calculation_before_admission() {
        let estimate = fgts_estimate(
            &FgtsInput { monthly_salary: 2_000.0, admission: d(2024, 6, 1), calculation_date: d(2024, 1, 1) },
            &LaborConstants::default(),
        );
        assert_eq!(estimate.months, 0);
        assert_eq!(estimate.total, 0.0);
    }

    #[test]
    fn test_termination_full() {
        // 2 years and 5 months, dismissed on the 15th
        let pay = termination_pay(
            &TerminationInput {
                monthly_salary: 3_000.0,
                admission: d(2022, 1, 15),
                dismissal: d(2024, 6, 15),
                include_vacation: true,
                include_thirteenth: true,
                include_notice: true,
            },
            &LaborConstants::default(),
        );

        assert_eq!(pay.months_worked, 29);
        assert_abs_diff_eq!(pay.salary_balance, 1_500.0, epsilon = 1e-9);

        // 5 proportional months + 1/3, plus one full period + 1/3
        let proportional = 3_000.0 / 12.0 * 5.0;
        assert_abs_diff_eq!(pay.vacation, proportional * 4.0 / 3.0 + 4_000.0, epsilon = 1e-9);

        // Jan 1 -> Jun 15 is 5 whole months
        assert_abs_diff_eq!(pay.thirteenth, 1_250.0, epsilon = 1e-9);

        // 30 + 2 * 3 = 36 days
        assert_abs_diff_eq!(pay.notice, 3_600.0, epsilon = 1e-9);

        assert_abs_diff_eq!(pay.fgts, 3_000.0 * 0.08 * 29.0, epsilon = 1e-9);
        assert_abs_diff_eq!(pay.fgts_fine, pay.fgts * 0.4, epsilon = 1e-9);

        let sum = pay.salary_balance + pay.vacation + pay.thirteenth + pay.notice + pay.fgts + pay.fgts_fine;
        assert_abs_diff_eq!(pay.total, sum, epsilon = 1e-9);
    }

    #[test]
    fn test_notice_capped() {
        let pay = termination_pay(
            &TerminationInput {
                monthly_salary: 3_000.0,
                admission: d(1990, 1, 1),
                dismissal: d(2024, 1, 1),
                include_vacation: false,
                include_thirteenth: false,
                include_notice: true,
            },
            &LaborConstants::default(),
        );
        assert_abs_diff_eq!(pay.notice, 9_000.0, epsilon = 1e-9);
        assert_eq!(pay.vacation, 0.0);
        assert_eq!(pay.thirteenth, 0.0);
    }

    #[test]
    fn test_thirteenth_same_year_counts_from_admission() {
        assert_eq!(thirteenth_months(d(2024, 3, 1), d(2024, 9, 1)), 6);
        assert_eq!(thirteenth_months(d(2020, 3, 1), d(2024, 9, 1)), 8);
    }
}
