//! Error types for the completion layer

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when requesting a completion
#[derive(Debug, Error)]
pub enum CompletionError {
    /// No API key configured, or the provider rejected it
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// HTTP request failures (status 0 when no response was received)
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// The request did not finish in time
    #[error("Request timed out")]
    Timeout,

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded (retry after {retry_after:?})")]
    RateLimitExceeded { retry_after: Option<Duration> },

    /// Provider returned a structured error envelope
    #[error("Provider error ({code}): {message}")]
    ProviderError { code: String, message: String },

    /// Response carried no usable text
    #[error("Empty response: {0}")]
    EmptyResponse(String),
}

impl From<serde_json::Error> for CompletionError {
    fn from(err: serde_json::Error) -> Self {
        CompletionError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for CompletionError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return CompletionError::Timeout;
        }
        if err.is_decode() {
            return CompletionError::SerializationError(err.to_string());
        }
        CompletionError::HttpError {
            status: err.status().map(|s| s.as_u16()).unwrap_or(0),
            body: err.to_string(),
        }
    }
}
