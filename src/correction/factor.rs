//! Compound correction of a principal by a periodic rate series

use serde::{Deserialize, Serialize};

use super::client::SeriesFetch;
use super::index::IndexSeriesPoint;

/// Product of `(1 + rate/100)` over every entry, each entry being one compounding step
/// whatever the native period of the index. `1.0` for an empty series.
pub fn correction_factor(series: &[IndexSeriesPoint]) -> f64 {
    series.iter().fold(1.0, |factor, point| factor * (1.0 + point.rate / 100.0))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrectionStatus {
    Corrected,
    /// The source answered but had no rates for the period
    NoDataAvailable,
    /// The source could not be reached or answered garbage
    SourceUnavailable,
}

impl CorrectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectionStatus::Corrected => "corrigido",
            CorrectionStatus::NoDataAvailable => "sem_dados",
            CorrectionStatus::SourceUnavailable => "fonte_indisponivel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrectionOutcome {
    pub status: CorrectionStatus,
    pub principal: f64,
    pub factor: f64,
    pub corrected_value: f64,
    pub periods: usize,
}

impl CorrectionOutcome {
    pub fn correction(&self) -> f64 {
        self.corrected_value - self.principal
    }

    pub fn percent(&self) -> f64 {
        (self.factor - 1.0) * 100.0
    }
}

/// Apply a fetched series to a principal. The factor is exactly 1 unless rates were found.
pub fn apply_correction(principal: f64, fetch: &SeriesFetch) -> CorrectionOutcome {
    let (status, series) = match fetch {
        SeriesFetch::Points(points) if points.is_empty() => (CorrectionStatus::NoDataAvailable, &[][..]),
        SeriesFetch::Points(points) => (CorrectionStatus::Corrected, points.as_slice()),
        SeriesFetch::Unavailable(_) => (CorrectionStatus::SourceUnavailable, &[][..]),
    };

    let factor = correction_factor(series);

    CorrectionOutcome {
        status,
        principal,
        factor,
        corrected_value: principal * factor,
        periods: series.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(rates: &[f64]) -> Vec<IndexSeriesPoint> {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        rates
            .iter()
            .enumerate()
            .map(|(i, &rate)| IndexSeriesPoint::new(start + chrono::Days::new(i as u64), rate))
            .collect()
    }

    #[test]
    fn test_empty_series_is_neutral() {
        let outcome = apply_correction(1_234.56, &SeriesFetch::Points(vec![]));
        assert_eq!(outcome.status, CorrectionStatus::NoDataAvailable);
        assert_eq!(outcome.factor, 1.0);
        assert_eq!(outcome.corrected_value, 1_234.56);
        assert_eq!(outcome.percent(), 0.0);
    }

    #[test]
    fn test_unavailable_source_is_neutral_but_flagged() {
        let outcome = apply_correction(1_000.0, &SeriesFetch::Unavailable("timeout".into()));
        assert_eq!(outcome.status, CorrectionStatus::SourceUnavailable);
        assert_eq!(outcome.corrected_value, 1_000.0);
        assert_eq!(outcome.periods, 0);
    }

    #[test]
    fn test_compound_factor() {
        let outcome = apply_correction(1_000.0, &SeriesFetch::Points(series(&[1.0, 2.0])));
        assert_eq!(outcome.status, CorrectionStatus::Corrected);
        assert_relative_eq!(outcome.factor, 1.01 * 1.02, max_relative = 1e-15);
        assert_relative_eq!(outcome.corrected_value, 1_030.2, max_relative = 1e-12);
        assert_relative_eq!(outcome.percent(), 3.02, max_relative = 1e-9);
        assert_eq!(outcome.periods, 2);
    }

    #[test]
    fn test_correction_is_associative_under_concatenation() {
        let rates = [0.42, 0.83, 0.16, -0.05, 0.38, 0.46, 0.21];
        let whole = series(&rates);
        let (head, tail) = whole.split_at(3);

        let once = 5_000.0 * correction_factor(&whole);
        let twice = 5_000.0 * correction_factor(head) * correction_factor(tail);
        assert_relative_eq!(once, twice, max_relative = 1e-12);
    }
}
