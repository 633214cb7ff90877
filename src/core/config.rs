use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

use super::board::{ConversionState, DEFAULT_BASE_AMOUNT};
use super::currency::REFERENCE_CURRENCY;

pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Which backend feeds the board.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum RateSourceKind {
    #[default]
    ExchangeApi,
    Gemini,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExchangeApiConfig {
    pub base_url: String,
    #[serde(default = "default_reference")]
    pub reference: String,
    #[serde(default)]
    pub retries: usize,
}

impl Default for ExchangeApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://open.er-api.com".to_string(),
            reference: default_reference(),
            retries: 0,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GeminiConfig {
    pub base_url: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: None,
        }
    }
}

impl GeminiConfig {
    /// Key from the config file, else from the environment.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(GEMINI_API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub exchange_api: ExchangeApiConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub source: RateSourceKind,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_reference")]
    pub base_currency: String,
    #[serde(default = "default_base_amount")]
    pub base_amount: String,
    pub data_path: Option<String>,
}

fn default_reference() -> String {
    REFERENCE_CURRENCY.to_string()
}

fn default_refresh_interval() -> u64 {
    DEFAULT_REFRESH_INTERVAL_SECS
}

fn default_base_amount() -> String {
    DEFAULT_BASE_AMOUNT.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            source: RateSourceKind::default(),
            providers: ProvidersConfig::default(),
            refresh_interval_secs: default_refresh_interval(),
            base_currency: default_reference(),
            base_amount: default_base_amount(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the default config file, or defaults when there is none yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config at {}, using built-in defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "fxboard", "fxboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("dev", "fxboard", "fxboard")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    pub fn conversion_state(&self) -> ConversionState {
        ConversionState {
            base_code: self.base_currency.trim().to_uppercase(),
            base_amount: self.base_amount.clone(),
        }
    }
}
