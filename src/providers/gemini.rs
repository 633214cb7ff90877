//! Rates from a generative model with web search grounding.
//!
//! The model is asked for a bare JSON object. Its reply is read through a
//! fixed chain: strict JSON, then the first `{...}` span in the text, then
//! nothing.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

use crate::core::currency::ALL_CURRENCIES;
use crate::core::rates::{ExchangeRateTable, GroundingSource, RateSnapshot, RateSource};

lazy_static! {
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").expect("Invalid regex pattern");
}

fn numeric_entries(object: Map<String, Value>) -> HashMap<String, f64> {
    object
        .into_iter()
        .filter_map(|(code, value)| value.as_f64().map(|rate| (code.to_uppercase(), rate)))
        .collect()
}

/// Reads a code → rate object out of free-form model output.
pub fn parse_rates_text(text: &str) -> HashMap<String, f64> {
    if let Ok(object) = serde_json::from_str::<Map<String, Value>>(text.trim()) {
        return numeric_entries(object);
    }
    debug!("Model output is not strict JSON, trying extraction");

    if let Some(found) = JSON_OBJECT.find(text) {
        if let Ok(object) = serde_json::from_str::<Map<String, Value>>(found.as_str()) {
            return numeric_entries(object);
        }
    }
    debug!("No JSON object found in model output");

    HashMap::new()
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

impl Candidate {
    fn text(&self) -> String {
        self.content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }

    fn sources(&self) -> Vec<GroundingSource> {
        self.grounding_metadata
            .iter()
            .flat_map(|m| m.grounding_chunks.iter())
            .filter_map(|chunk| chunk.web.as_ref())
            .filter_map(|web| {
                web.uri.as_ref().map(|uri| GroundingSource {
                    uri: uri.clone(),
                    title: web.title.clone().unwrap_or_default(),
                })
            })
            .collect()
    }
}

pub struct GeminiSource {
    base_url: String,
    model: String,
    api_key: String,
    reference: String,
}

impl GeminiSource {
    pub fn new(base_url: &str, model: &str, api_key: &str, reference: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
            reference: reference.to_string(),
        }
    }

    fn prompt(&self) -> String {
        let codes = ALL_CURRENCIES
            .iter()
            .map(|c| c.code)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Find the latest exchange rates of 1 {} against these currencies: {}. \
             Reply with only a JSON object mapping each currency code to its rate, \
             for example {{\"EUR\": 0.92}}. No prose, no code fences.",
            self.reference, codes
        )
    }
}

#[async_trait]
impl RateSource for GeminiSource {
    #[instrument(name = "GeminiRateFetch", skip(self), fields(model = %self.model))]
    async fn fetch_latest(&self) -> Result<RateSnapshot> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!("Requesting rates from {}", url);

        let body = json!({
            "contents": [{ "parts": [{ "text": self.prompt() }] }],
            "tools": [{ "google_search": {} }],
        });

        let client = reqwest::Client::builder()
            .user_agent("fxboard/0.1")
            .build()?;
        let response = client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for model: {}", e, self.model))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for model: {}",
                response.status(),
                self.model
            ));
        }

        let text = response.text().await?;
        let data: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse model response: {}", e))?;

        let candidate = data
            .candidates
            .first()
            .ok_or_else(|| anyhow!("Model returned no candidates"))?;

        let rates = parse_rates_text(&candidate.text());
        if rates.is_empty() {
            warn!("Model reply contained no rates");
            return Err(anyhow!("No rates in model reply"));
        }

        let sources = candidate.sources();
        debug!(
            count = rates.len(),
            sources = sources.len(),
            "Parsed model rates"
        );
        Ok(RateSnapshot {
            rates: ExchangeRateTable::new(&self.reference, rates),
            sources,
        })
    }
}
