use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use super::util::with_retry;
use crate::core::rates::{ExchangeRateTable, RateSnapshot, RateSource};

const RETRY_DELAY_MS: u64 = 500;

/// Public exchange-rate endpoint keyed by a reference currency.
pub struct OpenErApiSource {
    base_url: String,
    reference: String,
    retries: usize,
}

impl OpenErApiSource {
    pub fn new(base_url: &str, reference: &str, retries: usize) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            reference: reference.to_string(),
            retries,
        }
    }

    async fn fetch_once(&self, client: &reqwest::Client, url: &str) -> Result<RateSnapshot> {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for reference currency: {}",
                response.status(),
                self.reference
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text).map_err(|e| {
            anyhow!(
                "Failed to parse JSON response for {}: {}",
                self.reference,
                e
            )
        })?;

        if data.result.as_deref() != Some("success") {
            return Err(anyhow!(
                "Exchange rate API reported failure for {}: {:?}",
                self.reference,
                data.result
            ));
        }
        let rates = data
            .rates
            .ok_or_else(|| anyhow!("No rates in response for {}", self.reference))?;

        Ok(RateSnapshot {
            rates: ExchangeRateTable::new(&self.reference, rates),
            sources: Vec::new(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    result: Option<String>,
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl RateSource for OpenErApiSource {
    #[instrument(name = "OpenErApiFetch", skip(self), fields(reference = %self.reference))]
    async fn fetch_latest(&self) -> Result<RateSnapshot> {
        let url = format!("{}/v6/latest/{}", self.base_url, self.reference);
        debug!("Requesting rates from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("fxboard/0.1")
            .build()?;
        let snapshot = with_retry(
            || self.fetch_once(&client, &url),
            self.retries,
            RETRY_DELAY_MS,
        )
        .await?;

        debug!(count = snapshot.rates.len(), "Received rates");
        Ok(snapshot)
    }
}
