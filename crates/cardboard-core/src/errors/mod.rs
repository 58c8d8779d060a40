use std::error::Error;

/// Base trait for errors surfaced to the CLI.
pub trait CardboardError: Error + Send + Sync + 'static {
    /// Error code for programmatic handling
    fn error_code(&self) -> &'static str;

    /// Whether this error should be logged as an error or warning
    fn is_user_error(&self) -> bool {
        false
    }
}

/// Common result type for the application
pub type CardboardResult<T> = Result<T, Box<dyn CardboardError>>;

impl CardboardError for cardboard_config::ConfigError {
    fn error_code(&self) -> &'static str {
        cardboard_config::ConfigError::error_code(self)
    }

    fn is_user_error(&self) -> bool {
        cardboard_config::ConfigError::is_user_error(self)
    }
}
