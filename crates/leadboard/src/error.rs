//! Error types for leadboard.
//!
//! This module defines all error types used throughout the leadboard crate,
//! providing detailed context for debugging and user-friendly error messages.

use thiserror::Error;

/// The main error type for leadboard operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === SmartSuite Errors ===
    /// No API key was configured, so records cannot be fetched.
    #[error("SmartSuite API key not configured")]
    MissingApiKey,

    /// Account or table identifier is missing.
    #[error("SmartSuite configuration incomplete: missing {field}")]
    SmartSuiteConfig {
        /// Name of the missing setting.
        field: &'static str,
    },

    /// SmartSuite answered with a non-success status.
    #[error("SmartSuite request failed with status {status}: {body}")]
    SmartSuiteStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// SmartSuite returned a payload we could not interpret.
    #[error("unexpected SmartSuite response: {0}")]
    SmartSuiteResponse(String),

    // === Geocoding Errors ===
    /// A geocoding provider failed.
    #[error("geocoding provider '{provider}' failed: {message}")]
    Geocode {
        /// Name of the provider.
        provider: &'static str,
        /// Description of what went wrong.
        message: String,
    },

    // === Transport Errors ===
    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to bind the listening socket.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that couldn't be bound.
        address: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for leadboard operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a geocoding provider error.
    #[must_use]
    pub fn geocode(provider: &'static str, message: impl Into<String>) -> Self {
        Self::Geocode {
            provider,
            message: message.into(),
        }
    }

    /// Create a SmartSuite status error, truncating long bodies.
    #[must_use]
    pub fn smartsuite_status(status: u16, body: &str) -> Self {
        const MAX_BODY: usize = 512;
        let body = if body.len() > MAX_BODY {
            let mut end = MAX_BODY;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}...", &body[..end])
        } else {
            body.to_string()
        };
        Self::SmartSuiteStatus { status, body }
    }

    /// Check if this error stems from missing or incomplete configuration.
    #[must_use]
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::MissingApiKey
                | Self::SmartSuiteConfig { .. }
                | Self::ConfigLoad(_)
                | Self::ConfigValidation { .. }
        )
    }
}
