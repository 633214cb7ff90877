pub mod gemini;
pub mod open_er_api;
pub mod util;

use anyhow::{Result, anyhow};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::core::config::{AppConfig, GEMINI_API_KEY_ENV, RateSourceKind};
use crate::core::rates::{RateSnapshot, RateSource};
use gemini::GeminiSource;
use open_er_api::OpenErApiSource;

/// Fetches rates from a backend and never fails: any error is replaced by
/// the static fallback table. Nothing is cached between calls.
#[derive(Clone)]
pub struct RateProvider {
    source: Arc<dyn RateSource>,
}

impl RateProvider {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self { source }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let source: Arc<dyn RateSource> = match config.source {
            RateSourceKind::ExchangeApi => {
                let api = &config.providers.exchange_api;
                Arc::new(OpenErApiSource::new(&api.base_url, &api.reference, api.retries))
            }
            RateSourceKind::Gemini => {
                let gemini = &config.providers.gemini;
                let api_key = gemini.resolve_api_key().ok_or_else(|| {
                    anyhow!(
                        "Gemini source needs providers.gemini.api_key or {}",
                        GEMINI_API_KEY_ENV
                    )
                })?;
                Arc::new(GeminiSource::new(
                    &gemini.base_url,
                    &gemini.model,
                    &api_key,
                    &config.providers.exchange_api.reference,
                ))
            }
        };
        debug!(source = ?config.source, "Configured rate source");
        Ok(Self::new(source))
    }

    pub async fn fetch_rates(&self) -> RateSnapshot {
        match self.source.fetch_latest().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Rate fetch failed, using fallback rates");
                RateSnapshot::fallback()
            }
        }
    }
}
