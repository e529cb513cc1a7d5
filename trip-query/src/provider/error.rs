//! Provider error types.

use std::time::Duration;

use super::ConversionError;

/// Errors reported by a provider or while activating one.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend did not answer within the configured timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse the backend response
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// The response parsed but holds no usable data
    #[error("invalid response: {0}")]
    InvalidResponse(#[from] ConversionError),

    /// Rate limited by the backend
    #[error("rate limited by provider")]
    RateLimited,

    /// No location matches the query text
    #[error("no match for '{0}'")]
    NoMatch(String),

    /// The request cannot be sent as given
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// No provider is registered under this name
    #[error("unknown provider '{name}' (available: {available})")]
    UnknownProvider { name: String, available: String },

    /// Provider needs configuration that was not supplied
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}

impl ProviderError {
    /// Map a `reqwest` error, separating client-side timeouts.
    pub(crate) fn from_request(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(timeout)
        } else {
            ProviderError::Http(err)
        }
    }
}
