//! Error types for quote provider clients.

use thiserror::Error;

/// Errors that can occur when fetching quotes.
#[derive(Debug, Error)]
pub enum QuoteError {
    /// Network error.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout.
    #[error("request timeout: {0}")]
    Timeout(String),

    /// Non-success HTTP status.
    #[error("API error: {status_code} - {message}")]
    Api {
        /// HTTP status code.
        status_code: u16,
        /// Response body.
        message: String,
    },

    /// Provider answered successfully but reported an error in the body.
    #[error("provider error: {0}")]
    Provider(String),

    /// Response could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Symbol is not safe to place in a request.
    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl QuoteError {
    /// Creates an API error from status code and message.
    pub fn api(status_code: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status_code,
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for QuoteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_decode() {
            Self::Serialization(err.to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {err}"))
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for QuoteError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for quote operations.
pub type Result<T> = std::result::Result<T, QuoteError>;
