//! Runtime configuration for campaign-forge.
//!
//! Settings come from defaults, then environment variables, then CLI flags
//! (applied by the caller through the builder methods).

use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// Default OpenAI-compatible endpoint.
pub const DEFAULT_API_BASE: &str = "https://openrouter.ai/api/v1";

/// Default model identifier sent to the oracle.
pub const DEFAULT_MODEL: &str = "google/gemini-2.5-flash";

/// Default feedback log location.
pub const DEFAULT_FEEDBACK_PATH: &str = "./feedback.jsonl";

/// Configuration for the oracle client, sessions and feedback log.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Oracle settings
    /// Base URL of the chat-completions API.
    pub api_base: String,
    /// Bearer token for the API, if required.
    pub api_key: Option<String>,
    /// Model identifier used for every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Upper bound on generated tokens per call.
    pub max_tokens: u32,
    /// HTTP request timeout.
    pub request_timeout: Duration,

    // Feedback settings
    /// JSON Lines file receiving feedback records.
    pub feedback_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            max_tokens: 2000,
            request_timeout: Duration::from_secs(120),
            feedback_path: PathBuf::from(DEFAULT_FEEDBACK_PATH),
        }
    }
}

impl AppConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CAMPAIGN_FORGE_API_BASE`: API base URL (default: OpenRouter)
    /// - `CAMPAIGN_FORGE_API_KEY`: API key, falling back to `OPENROUTER_API_KEY`
    /// - `CAMPAIGN_FORGE_MODEL`: model identifier (default: google/gemini-2.5-flash)
    /// - `CAMPAIGN_FORGE_TEMPERATURE`: sampling temperature (default: 0.8)
    /// - `CAMPAIGN_FORGE_MAX_TOKENS`: max generated tokens (default: 2000)
    /// - `CAMPAIGN_FORGE_TIMEOUT_SECS`: request timeout (default: 120)
    /// - `CAMPAIGN_FORGE_FEEDBACK_PATH`: feedback log path (default: ./feedback.jsonl)
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the resulting
    /// configuration is invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("CAMPAIGN_FORGE_API_BASE") {
            config.api_base = val.trim_end_matches('/').to_string();
        }

        config.api_key = lookup("CAMPAIGN_FORGE_API_KEY")
            .or_else(|| lookup("OPENROUTER_API_KEY"))
            .filter(|key| !key.trim().is_empty());

        if let Some(val) = lookup("CAMPAIGN_FORGE_MODEL") {
            config.model = val;
        }

        if let Some(val) = lookup("CAMPAIGN_FORGE_TEMPERATURE") {
            config.temperature = parse_env_value(&val, "CAMPAIGN_FORGE_TEMPERATURE")?;
        }

        if let Some(val) = lookup("CAMPAIGN_FORGE_MAX_TOKENS") {
            config.max_tokens = parse_env_value(&val, "CAMPAIGN_FORGE_MAX_TOKENS")?;
        }

        if let Some(val) = lookup("CAMPAIGN_FORGE_TIMEOUT_SECS") {
            let secs: u64 = parse_env_value(&val, "CAMPAIGN_FORGE_TIMEOUT_SECS")?;
            config.request_timeout = Duration::from_secs(secs);
        }

        if let Some(val) = lookup("CAMPAIGN_FORGE_FEEDBACK_PATH") {
            config.feedback_path = PathBuf::from(val);
        }

        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` if any values are invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base cannot be empty".to_string(),
            ));
        }

        if self.model.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "model cannot be empty".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationFailed(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationFailed(
                "max_tokens must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout.as_secs() == 0 {
            return Err(ConfigError::ValidationFailed(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Builder method to set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder method to set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Builder method to set the API base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Builder method to set the temperature.
    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builder method to set the feedback log path.
    pub fn with_feedback_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.feedback_path = path.into();
        self
    }
}

fn parse_env_value<T: std::str::FromStr>(value: &str, key: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })
}
