//! Error types and result aliases for heft operations.
//!
//! Expected upstream failures (timeouts, non-2xx responses, malformed bodies)
//! never surface here: they collapse to `Resolution::Unresolved` at the
//! adapter boundary. `HeftError` covers the failures a caller must act on.

use thiserror::Error;

/// Unified error type for all heft operations
#[derive(Error, Debug)]
pub enum HeftError {
    // Config errors
    #[error("Failed to parse {path}: {message}")]
    TomlParse { path: String, message: String },

    #[error("Failed to parse package.json: {message}")]
    JsonParse { message: String },

    #[error("Configuration field '{field}' is invalid: {reason}")]
    ConfigValidation { field: String, reason: String },

    // Client errors
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for heft operations
pub type HeftResult<T> = Result<T, HeftError>;

impl HeftError {
    /// Create a network error from any error type
    pub fn network<E>(message: String, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Network {
            message,
            source: Some(Box::new(source)),
        }
    }

    /// Create an IO error from std::io::Error
    pub fn io(message: String, source: std::io::Error) -> Self {
        Self::Io { message, source }
    }

    /// Create a validation error for a named configuration field
    pub fn invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Check if this error is recoverable
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HeftError::Network { .. } | HeftError::Io { .. })
    }

    /// Get a user-friendly suggestion for fixing this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            HeftError::TomlParse { .. } => Some("Check heft.toml for syntax errors"),
            HeftError::JsonParse { .. } => {
                Some("Make sure the manifest is a valid package.json document")
            }
            HeftError::ConfigValidation { .. } => {
                Some("Run 'heft config' to inspect the effective configuration")
            }
            HeftError::Network { .. } => Some("Check your internet connection and try again"),
            HeftError::Io { .. } => None,
        }
    }
}
