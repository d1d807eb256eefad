//! prism-chat: lens-augmented chat client with a two-sided AI debate engine.
//!
//! This library provides the debate orchestration core (two concurrent,
//! independently-cancelable streaming conversations with cross-feed
//! auto-continue), the lens system (persona/prompt fragments composed into
//! system prompts), and the chat backend transport they run against.

// Core modules
pub mod chat;
pub mod cli;
pub mod config;
pub mod debate;
pub mod error;
pub mod lenses;
pub mod llm;

// Re-export commonly used error types
pub use error::{ChatError, ConfigError, LensError, LlmError};
