//! Index series sources: the Central Bank SGS HTTP client and an in-memory source

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::Client;
use serde_json::Value;

use super::index::{EconomicIndex, IndexSeriesPoint};
use crate::config::EngineConfig;

const SGS_DATE_FORMAT: &str = "%d/%m/%Y";

/// Outcome of a single series fetch.
///
/// A failed fetch is a value, not an error: the correction falls back to a neutral
/// factor and reports the outage instead of failing the request.
#[derive(Debug, Clone, PartialEq)]
pub enum SeriesFetch {
    Points(Vec<IndexSeriesPoint>),
    Unavailable(String),
}

impl SeriesFetch {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, SeriesFetch::Unavailable(_))
    }
}

/// Anything that can supply the periodic rates of an index between two dates
#[async_trait]
pub trait IndexSeriesSource: Send + Sync {
    async fn fetch(&self, index: EconomicIndex, start: NaiveDate, end: NaiveDate) -> SeriesFetch;
}

/// Client for the public SGS endpoint. One attempt per fetch, bounded by the client timeout.
pub struct BcbClient {
    client: Client,
    base_url: String,
}

impl BcbClient {
    pub fn new(base_url: &str, timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &EngineConfig) -> reqwest::Result<Self> {
        Self::new(&config.index_base_url, config.fetch_timeout)
    }

    fn series_url(&self, index: EconomicIndex) -> String {
        format!("{}/dados/serie/bcdata.sgs.{}/dados", self.base_url, index.series_code())
    }

    async fn request(&self, index: EconomicIndex, start: NaiveDate, end: NaiveDate) -> Result<Vec<Value>, String> {
        let start = start.format(SGS_DATE_FORMAT).to_string();
        let end = end.format(SGS_DATE_FORMAT).to_string();

        let response = self
            .client
            .get(self.series_url(index))
            .query(&[("formato", "json"), ("dataInicial", start.as_str()), ("dataFinal", end.as_str())])
            .send()
            .await
            .map_err(|e| format!("request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("HTTP {}", status));
        }

        response
            .json::<Vec<Value>>()
            .await
            .map_err(|e| format!("undecodable body: {}", e))
    }
}

#[async_trait]
impl IndexSeriesSource for BcbClient {
    async fn fetch(&self, index: EconomicIndex, start: NaiveDate, end: NaiveDate) -> SeriesFetch {
        let fetch = match self.request(index, start, end).await {
            Ok(entries) => {
                debug!("{} series: {} entries between {} and {}", index, entries.len(), start, end);
                series_from_entries(&entries)
            }
            Err(reason) => SeriesFetch::Unavailable(reason),
        };

        if let SeriesFetch::Unavailable(reason) = &fetch {
            warn!("{} series unavailable: {}", index, reason);
        }
        fetch
    }
}

/// Classify a decoded body. An empty array means no data for the period; a body
/// whose entries are all malformed counts as a failed fetch.
pub fn series_from_entries(entries: &[Value]) -> SeriesFetch {
    let points = parse_entries(entries);
    if points.is_empty() && !entries.is_empty() {
        return SeriesFetch::Unavailable(format!("none of {} entries could be decoded", entries.len()));
    }
    SeriesFetch::Points(points)
}

/// Decode SGS entries `{ "data": "dd/mm/yyyy", "valor": "0.42" }`, skipping malformed ones
pub fn parse_entries(entries: &[Value]) -> Vec<IndexSeriesPoint> {
    let mut points: Vec<IndexSeriesPoint> = entries
        .iter()
        .filter_map(|entry| {
            let point = parse_entry(entry);
            if point.is_none() {
                debug!("skipping malformed series entry: {}", entry);
            }
            point
        })
        .collect();

    points.sort_by_key(|p| p.date);
    points
}

fn parse_entry(entry: &Value) -> Option<IndexSeriesPoint> {
    let date = entry.get("data")?.as_str()?;
    let date = NaiveDate::parse_from_str(date.trim(), SGS_DATE_FORMAT).ok()?;

    let rate = match entry.get("valor")? {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };

    rate.is_finite().then_some(IndexSeriesPoint::new(date, rate))
}

/// In-memory source for offline runs and tests
#[derive(Debug, Clone, Default)]
pub struct StaticSeries {
    series: HashMap<EconomicIndex, Vec<IndexSeriesPoint>>,
    outage: Option<String>,
}

impl StaticSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_index(mut self, index: EconomicIndex, mut points: Vec<IndexSeriesPoint>) -> Self {
        points.sort_by_key(|p| p.date);
        self.series.insert(index, points);
        self
    }

    /// A source whose every fetch fails
    pub fn unavailable(reason: &str) -> Self {
        Self {
            series: HashMap::new(),
            outage: Some(reason.to_string()),
        }
    }
}

#[async_trait]
impl IndexSeriesSource for StaticSeries {
    async fn fetch(&self, index: EconomicIndex, start: NaiveDate, end: NaiveDate) -> SeriesFetch {
        if let Some(reason) = &self.outage {
            return SeriesFetch::Unavailable(reason.clone());
        }

        let points = self
            .series
            .get(&index)
            .map(|points| {
                points
                    .iter()
                    .filter(|p| p.date >= start && p.date <= end)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();

        SeriesFetch::Points(points)
    }
}
