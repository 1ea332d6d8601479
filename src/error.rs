//! Error types for the engagement bot.
//!
//! Every failure an action can meet is one of these variants. Errors are
//! caught and logged at the action boundary (see [`crate::engagement::Engagement::dispatch`]),
//! so none of them ever reaches the trigger source.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type BotResult<T> = Result<T, BotError>;

/// Failure taxonomy for engagement actions and their collaborators.
#[derive(Debug, Error)]
pub enum BotError {
    /// The REST call or network transport failed before a response arrived.
    #[error("transport error during '{operation}': {message}")]
    Transport { operation: String, message: String },

    /// The platform answered, but not with HTTP 200.
    #[error("'{operation}' returned HTTP {status}")]
    Status { operation: String, status: u16 },

    /// A response body was not the JSON shape we expected.
    #[error("parse error: {0}")]
    Parse(String),

    /// No eligible record or candidate was available.
    #[error("not found: {0}")]
    NotFound(String),

    /// A fetched document is missing required fields.
    #[error("validation error: {0}")]
    Validation(String),

    /// A persistence read or write failed.
    #[error("store error: {0}")]
    Store(String),

    /// Settings or credentials could not be loaded.
    #[error("configuration error: {0}")]
    Config(String),
}

impl BotError {
    pub fn transport(operation: &str, message: impl ToString) -> Self {
        BotError::Transport {
            operation: operation.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<reqwest::Error> for BotError {
    fn from(e: reqwest::Error) -> Self {
        let operation = e
            .url()
            .map(|u| u.path().to_string())
            .unwrap_or_else(|| "http".to_string());
        BotError::Transport {
            operation,
            message: e.to_string(),
        }
    }
}

impl From<serde_json::Error> for BotError {
    fn from(e: serde_json::Error) -> Self {
        BotError::Parse(e.to_string())
    }
}

impl From<sqlx::Error> for BotError {
    fn from(e: sqlx::Error) -> Self {
        BotError::Store(e.to_string())
    }
}

impl From<std::io::Error> for BotError {
    fn from(e: std::io::Error) -> Self {
        BotError::Config(e.to_string())
    }
}
