//! Runtime configuration for the prism client.
//!
//! Configuration is environment-driven: the chat backend endpoint for debate
//! sends, and OpenRouter credentials for single-shot lens generation.

use std::env;
use std::time::Duration;

pub use crate::error::ConfigError;

/// Default chat backend endpoint.
const DEFAULT_API_BASE: &str = "http://localhost:3000";

/// Default model for lens generation.
const DEFAULT_MODEL: &str = "anthropic/claude-opus-4.5";

/// Default per-request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Configuration for the prism client.
#[derive(Debug, Clone)]
pub struct PrismConfig {
    /// Base URL of the chat backend serving `/api/chat/send`.
    pub api_base: String,
    /// OpenRouter API key for lens generation (optional; only the
    /// `lenses generate` path needs it).
    pub openrouter_api_key: Option<String>,
    /// Model identifier used for lens generation.
    pub model: String,
    /// Timeout applied to non-streaming requests.
    pub request_timeout: Duration,
}

impl Default for PrismConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            openrouter_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }
}

impl PrismConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from environment variables.
    ///
    /// Reads:
    /// - `PRISM_API_BASE`: chat backend base URL (defaults to localhost)
    /// - `OPENROUTER_API_KEY`: key for lens generation (optional)
    /// - `OPENROUTER_MODEL`: model for lens generation (optional)
    /// - `PRISM_REQUEST_TIMEOUT_SECS`: request timeout override (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(api_base) = env::var("PRISM_API_BASE") {
            config.api_base = api_base;
        }
        config.openrouter_api_key = env::var("OPENROUTER_API_KEY").ok();
        if let Ok(model) = env::var("OPENROUTER_MODEL") {
            config.model = model;
        }
        if let Ok(raw) = env::var("PRISM_REQUEST_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PRISM_REQUEST_TIMEOUT_SECS".to_string(),
                message: format!("expected a positive integer, got '{}'", raw),
            })?;
            config.request_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Sets the chat backend base URL.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Sets the model used for lens generation.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "api_base must not be empty".to_string(),
            ));
        }
        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::ValidationFailed(format!(
                "api_base must be an http(s) URL, got '{}'",
                self.api_base
            )));
        }
        if self.request_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "request_timeout must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = PrismConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
    }

    #[test]
    fn test_validate_rejects_empty_api_base() {
        let config = PrismConfig::default().with_api_base("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationFailed(_))
        ));
    }

    #[test]
    fn test_validate_rejects_non_http_api_base() {
        let config = PrismConfig::default().with_api_base("ftp://example.com");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_builder_setters() {
        let config = PrismConfig::new()
            .with_api_base("https://chat.example.com")
            .with_model("openai/gpt-5.2");
        assert_eq!(config.api_base, "https://chat.example.com");
        assert_eq!(config.model, "openai/gpt-5.2");
    }
}
