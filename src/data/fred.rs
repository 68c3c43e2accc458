//! FRED API integration for weekly mortgage rate series.
//!
//! Only the newest observation of a series is ever requested. Every failure mode
//! (transport, HTTP status, payload, missing-data marker) ends as `None` at the
//! [`RateSource`] boundary so the resolver can degrade instead of erroring.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::FredConfig;
use crate::data::RateSource;
use crate::domain::RateObservation;
use crate::error::AppError;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred/series/observations";

pub struct FredClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FredClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build FRED HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
        })
    }

    /// Build a client from configuration; `None` when no API key is configured.
    pub fn from_config(config: &FredConfig) -> Result<Option<Self>, AppError> {
        match &config.api_key {
            Some(key) => Self::new(key.clone(), config.base_url.clone(), config.timeout).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch the most recent observation of `series_id`.
    ///
    /// `Ok(None)` means FRED answered but had no usable value.
    pub fn fetch_latest(&self, series_id: &str) -> Result<Option<RateObservation>, AppError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("series_id", series_id),
                ("api_key", self.api_key.as_str()),
                ("file_type", "json"),
                ("sort_order", "desc"),
                ("limit", "1"),
            ])
            .send()
            .map_err(|e| AppError::runtime(format!("FRED request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::runtime(format!(
                "FRED request failed with status {}.",
                resp.status()
            )));
        }

        let body: ObservationsResponse = resp
            .json()
            .map_err(|e| AppError::runtime(format!("Failed to parse FRED response: {e}")))?;

        Ok(latest_observation(&body))
    }
}

impl RateSource for FredClient {
    fn latest(&self, series_key: &str) -> Option<RateObservation> {
        match self.fetch_latest(series_key) {
            Ok(Some(obs)) => {
                debug!(series = series_key, percent = obs.percent, date = ?obs.date, "FRED observation");
                Some(obs)
            }
            Ok(None) => {
                warn!(series = series_key, "FRED returned no usable observation");
                None
            }
            Err(err) => {
                warn!(series = series_key, error = %err, "FRED unavailable");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ObservationsResponse {
    #[serde(default)]
    observations: Vec<Observation>,
}

#[derive(Debug, Deserialize)]
struct Observation {
    #[serde(default)]
    date: String,
    #[serde(default)]
    value: String,
}

/// First observation with a numeric value. Responses are requested newest-first.
fn latest_observation(body: &ObservationsResponse) -> Option<RateObservation> {
    body.observations.iter().find_map(|obs| {
        let percent = parse_value(&obs.value)?;
        Some(RateObservation {
            date: NaiveDate::parse_from_str(obs.date.trim(), "%Y-%m-%d").ok(),
            percent,
        })
    })
}

fn parse_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed == "." || trimmed.is_empty() {
        return None;
    }
    let v = trimmed.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 { Some(v) } else { None }
}
