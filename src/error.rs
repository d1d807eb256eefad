//! Error types for prism-chat operations.
//!
//! Defines error types for the major subsystems:
//! - LLM API interactions (lens generation)
//! - Lens catalog operations
//! - Chat backend transport
//! - Configuration loading

use thiserror::Error;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing API key: OPENROUTER_API_KEY environment variable not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },
}

/// Errors that can occur during lens catalog operations.
#[derive(Debug, Error)]
pub enum LensError {
    #[error("Lens not found: {0}")]
    NotFound(String),

    #[error("Lens generation failed: {0}")]
    GenerationFailed(String),

    #[error("Cannot activate more than {limit} lenses at once")]
    LimitExceeded { limit: usize },

    #[error("Invalid lens {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur on the chat backend transport.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Chat request failed: {0}")]
    RequestFailed(String),

    #[error("Chat backend returned HTTP {code}")]
    Status { code: u16 },

    #[error("Stream read failed: {0}")]
    StreamRead(String),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::RequestFailed(err.to_string())
    }
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Configuration validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}
