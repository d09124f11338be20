//! HTTP client error types.

use std::time::Duration;

use seating_core::SourceError;
use thiserror::Error;

/// Errors that can occur when making HTTP requests.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Failed to send the request.
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP error response.
    #[error("HTTP {status}: {message}")]
    HttpError { status: u16, message: String },

    /// Failed to parse response body.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// The request's deadline elapsed.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(String),
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::JsonError(e.to_string())
    }
}

impl FetchError {
    /// Classify a reqwest failure for a request sent with `deadline`.
    pub fn from_reqwest(e: reqwest::Error, deadline: Option<Duration>) -> Self {
        match deadline {
            Some(deadline) if e.is_timeout() => FetchError::Timeout(deadline),
            _ if e.is_builder() => FetchError::InvalidUrl(e.to_string()),
            _ => FetchError::RequestError(e.to_string()),
        }
    }
}

impl From<FetchError> for SourceError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::HttpError { status, message } => SourceError::Status { status, message },
            FetchError::ParseError(msg) | FetchError::JsonError(msg) => SourceError::Malformed(msg),
            FetchError::Timeout(deadline) => SourceError::Timeout(deadline),
            FetchError::RequestError(msg) | FetchError::InvalidUrl(msg) => {
                SourceError::Transport(msg)
            }
        }
    }
}
