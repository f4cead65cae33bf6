//! Error types for the code review plugin.

use thiserror::Error;

/// Result type for code review operations.
pub type Result<T> = std::result::Result<T, CodeReviewError>;

/// Errors raised by persona validation and configuration.
///
/// Thread resolution and dialogue turns never fail; only authoring-time
/// checks report errors.
#[derive(Error, Debug)]
pub enum CodeReviewError {
    /// A required key is absent from a persona script.
    #[error("Missing key '{key}' in {location}")]
    MissingKey { key: String, location: String },

    /// A key is present but holds the wrong kind of value.
    #[error("Invalid field '{key}' in {location}: {message}")]
    InvalidField {
        key: String,
        location: String,
        message: String,
    },

    /// The persona script text could not be parsed.
    #[error("Invalid script: {0}")]
    InvalidScript(String),

    /// Invalid configuration.
    #[error("Config: {0}")]
    Config(String),

    /// JSON (de)serialization failure.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodeReviewError {
    pub fn missing_key(key: impl Into<String>, location: impl Into<String>) -> Self {
        Self::MissingKey {
            key: key.into(),
            location: location.into(),
        }
    }

    pub fn invalid_field(
        key: impl Into<String>,
        location: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidField {
            key: key.into(),
            location: location.into(),
            message: message.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Name of the offending key, when the error is about a specific key.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key, .. } | Self::InvalidField { key, .. } => Some(key),
            _ => None,
        }
    }
}
