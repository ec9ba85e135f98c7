//! Configuration loading, validation, and management for StorePilot.
//!
//! Loads configuration from `~/.storepilot/config.toml` with environment
//! variable overrides. Validates all settings at startup. The resulting values
//! are handed to the inference client and pipeline at construction; nothing
//! here is global state.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.storepilot/config.toml`.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key for the inference endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Inference endpoint configuration
    #[serde(default)]
    pub endpoint: EndpointConfig,

    /// Forecast defaults
    #[serde(default)]
    pub forecast: ForecastConfig,

    /// Chat behaviour
    #[serde(default)]
    pub chat: ChatConfig,

    /// Local data storage
    #[serde(default)]
    pub store: StoreConfig,
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("endpoint", &self.endpoint)
            .field("forecast", &self.forecast)
            .field("chat", &self.chat)
            .field("store", &self.store)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    /// OpenAI-compatible base URL (`/chat/completions` is appended)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Full URL of the image synthesis endpoint
    #[serde(default = "default_image_url")]
    pub image_url: String,

    /// Model used for text intents
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_image_url() -> String {
    "https://api.openai.com/v1/images/product".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_timeout_secs() -> u64 {
    60
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_url: default_image_url(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Minimum distinct days of history before a forecast is attempted
    #[serde(default = "default_min_points")]
    pub min_points: usize,

    /// How many days back the history window reaches by default
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Default number of days to forecast
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
}

fn default_min_points() -> usize {
    7
}
fn default_lookback_days() -> u32 {
    30
}
fn default_horizon_days() -> u32 {
    7
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            min_points: default_min_points(),
            lookback_days: default_lookback_days(),
            horizon_days: default_horizon_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Shown to the operator when the model returns an empty reply
    #[serde(default = "default_fallback_message")]
    pub fallback_message: String,
}

fn default_fallback_message() -> String {
    "Sorry, I couldn't come up with an answer just now. Please rephrase or ask a colleague.".into()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            fallback_message: default_fallback_message(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding `knowledge.json` and `facts.jsonl`.
    /// Defaults to `~/.storepilot/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl StoreConfig {
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("data"))
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.storepilot/config.toml).
    ///
    /// Environment variables take precedence over the file:
    /// - `STOREPILOT_API_KEY`, then `OPENAI_API_KEY` (only if no key in file)
    /// - `STOREPILOT_BASE_URL`
    /// - `STOREPILOT_MODEL`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_overrides(&mut self, env: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = env("STOREPILOT_API_KEY").or_else(|| env("OPENAI_API_KEY"));
        }

        if let Some(url) = env("STOREPILOT_BASE_URL") {
            self.endpoint.base_url = url;
        }

        if let Some(model) = env("STOREPILOT_MODEL") {
            self.endpoint.model = model;
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".storepilot")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("endpoint.base_url", &self.endpoint.base_url),
            ("endpoint.image_url", &self.endpoint.image_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::ValidationError(format!(
                    "{name} must be an http(s) URL, got '{url}'"
                )));
            }
        }

        if self.endpoint.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "endpoint.model must not be empty".into(),
            ));
        }

        if self.endpoint.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "endpoint.timeout_secs must be > 0".into(),
            ));
        }

        if self.forecast.min_points == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.min_points must be at least 1".into(),
            ));
        }

        if self.forecast.horizon_days == 0 {
            return Err(ConfigError::ValidationError(
                "forecast.horizon_days must be at least 1".into(),
            ));
        }

        if self.chat.fallback_message.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "chat.fallback_message must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for `onboard` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
