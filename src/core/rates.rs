//! Exchange rate tables and the abstractions that produce them

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::currency::REFERENCE_CURRENCY;

const FALLBACK_RATES: [(&str, f64); 13] = [
    ("CNY", 7.15),
    ("JPY", 151.2),
    ("EUR", 0.92),
    ("GBP", 0.79),
    ("HKD", 7.82),
    ("TWD", 31.5),
    ("KRW", 1335.0),
    ("SGD", 1.34),
    ("AUD", 1.52),
    ("CAD", 1.35),
    ("THB", 35.8),
    ("PHP", 56.1),
    ("MYR", 4.74),
];

/// Rates for many currencies, all relative to one reference currency.
///
/// The reference always maps to exactly `1.0`. Entries that are not
/// positive finite numbers never make it into the table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    reference: String,
    rates: HashMap<String, f64>,
}

impl ExchangeRateTable {
    pub fn new(reference: &str, rates: HashMap<String, f64>) -> Self {
        let mut rates: HashMap<String, f64> = rates
            .into_iter()
            .filter(|(_, rate)| rate.is_finite() && *rate > 0.0)
            .collect();
        rates.insert(reference.to_string(), 1.0);
        Self {
            reference: reference.to_string(),
            rates,
        }
    }

    /// Static approximate rates used whenever a fetch fails.
    pub fn fallback() -> Self {
        let rates = FALLBACK_RATES
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect();
        Self::new(REFERENCE_CURRENCY, rates)
    }

    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

/// Advisory citation describing where a set of rates came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundingSource {
    pub uri: String,
    pub title: String,
}

impl GroundingSource {
    /// Title when present, otherwise the host of the uri.
    pub fn label(&self) -> String {
        if !self.title.trim().is_empty() {
            return self.title.clone();
        }
        reqwest::Url::parse(&self.uri)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.uri.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateSnapshot {
    pub rates: ExchangeRateTable,
    pub sources: Vec<GroundingSource>,
}

impl RateSnapshot {
    pub fn fallback() -> Self {
        Self {
            rates: ExchangeRateTable::fallback(),
            sources: Vec::new(),
        }
    }
}

/// What the board knows about rates at a given moment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RateState {
    pub rates: ExchangeRateTable,
    pub sources: Vec<GroundingSource>,
    pub loading: bool,
    pub last_update: Option<DateTime<Utc>>,
}

/// A backend able to produce a fresh rate snapshot. Failures are reported,
/// the infallible wrapper lives in [`crate::providers::RateProvider`].
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<RateSnapshot>;
}
