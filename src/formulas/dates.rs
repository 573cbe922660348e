//! Calendar differences used by the late-payment and labor formulas

use chrono::{Datelike, NaiveDate};

fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.succ_opt().map(|next| next.month() != date.month()).unwrap_or(true)
}

/// Whole calendar months from `start` to `end`.
///
/// Counts month boundaries and drops the last one when the end day-of-month has not yet
/// reached the start day-of-month (Jan 15 -> Feb 14 is 0 months, Jan 15 -> Feb 15 is 1).
/// An end date on the last day of its month always completes the month
/// (Jan 31 -> Feb 29 is 1). Negative when `end` precedes `start`.
pub fn whole_months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    if end < start {
        return -whole_months_between(end, start);
    }

    let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;

    if end.day() < start.day() && !is_last_day_of_month(end) {
        months -= 1;
    }

    months.max(0)
}

/// Signed number of days from `start` to `end`
pub fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}
