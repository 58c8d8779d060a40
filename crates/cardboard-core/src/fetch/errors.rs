use crate::errors::CardboardError;

/// A request that could not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl CardboardError for FetchError {
    fn error_code(&self) -> &'static str {
        match self {
            FetchError::Timeout => "FETCH_TIMEOUT",
            FetchError::Connect(_) => "FETCH_CONNECT_FAILED",
            FetchError::Body(_) => "FETCH_BODY_FAILED",
            FetchError::Request(_) => "FETCH_REQUEST_FAILED",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect(e.to_string())
        } else if e.is_body() || e.is_decode() {
            FetchError::Body(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}
