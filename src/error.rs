// src/error.rs

//! Unified error handling for the keyword pipeline.
//!
//! Every failure carries an [`ErrorKind`] so callers can tell a failure that
//! is safe to skip (one source, one candidate) from one that must stop the
//! process before any cycle runs.

use std::fmt;

use thiserror::Error;

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Classification of failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Network error, timeout or non-2xx status from a source
    TransientFetch,
    /// Unexpected document shape
    Parse,
    /// Translator call failed
    Translation,
    /// Document store query or write failed
    Store,
    /// Missing or invalid configuration
    Configuration,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::TransientFetch => "transient_fetch",
            ErrorKind::Parse => "parse",
            ErrorKind::Translation => "translation",
            ErrorKind::Store => "store",
            ErrorKind::Configuration => "configuration",
        };
        f.write_str(name)
    }
}

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Fetching a source failed
    #[error("Fetch error for {url}: {message}")]
    Fetch { url: String, message: String },

    /// A fetched document could not be interpreted
    #[error("Parse error for {context}: {message}")]
    Parse { context: String, message: String },

    /// Translation request failed
    #[error("Translation error: {0}")]
    Translation(String),

    /// Document store error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

impl AppError {
    /// Create a fetch error for the given URL.
    pub fn fetch(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a parse error with context.
    pub fn parse(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Parse {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a translation error.
    pub fn translation(message: impl fmt::Display) -> Self {
        Self::Translation(message.to_string())
    }

    /// Create a store error.
    pub fn store(message: impl fmt::Display) -> Self {
        Self::Store(message.to_string())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Fetch { .. } => ErrorKind::TransientFetch,
            AppError::Parse { .. } => ErrorKind::Parse,
            AppError::Translation(_) => ErrorKind::Translation,
            AppError::Store(_) | AppError::Io(_) | AppError::Json(_) => ErrorKind::Store,
            AppError::Config(_) | AppError::Toml(_) | AppError::Url(_) => ErrorKind::Configuration,
        }
    }

    /// Only configuration failures abort the whole run.
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::Configuration
    }
}
