use crate::errors::CardboardError;
use crate::fetch::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum PollError {
    #[error("invalid card snapshot: {source}")]
    InvalidSnapshot {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] FetchError),
}

impl CardboardError for PollError {
    fn error_code(&self) -> &'static str {
        match self {
            PollError::InvalidSnapshot { .. } => "INVALID_SNAPSHOT",
            PollError::Client(_) => "HTTP_CLIENT_ERROR",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(self, PollError::InvalidSnapshot { .. })
    }
}
