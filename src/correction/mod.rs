//! Monetary correction: index series retrieval and compound correction

pub mod client;
pub mod factor;
pub mod index;

pub use client::{parse_entries, series_from_entries, BcbClient, IndexSeriesSource, SeriesFetch, StaticSeries};
pub use factor::{apply_correction, correction_factor, CorrectionOutcome, CorrectionStatus};
pub use index::{EconomicIndex, IndexSeriesPoint};
