// src/error.rs

//! Unified error handling for the schedule provider.

use thiserror::Error;

/// Result type alias for provider operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed or returned a non-success status
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Spreadsheet export could not be parsed into a schedule
    #[error("Parse error: {0}")]
    Parse(String),

    /// Persisted state missing or malformed at load time
    #[error("Load error for {path}: {message}")]
    Load { path: String, message: String },

    /// Durable state could not be written
    #[error("Persist error for {path}: {message}")]
    Persist { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider state accessed before the first successful load
    #[error("Provider not ready: {0}")]
    NotReady(&'static str),
}

impl AppError {
    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Create a load error with the offending path.
    pub fn load(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a persist error with the offending path.
    pub fn persist(path: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Persist {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
