//! Error types for the notifications domain.

use thiserror::Error;

/// Result type for notification operations.
pub type NotificationResult<T> = Result<T, NotificationError>;

#[derive(Debug, Error)]
pub enum NotificationError {
    /// The messaging provider rejected the request or could not be reached.
    #[error("Messaging provider error: {0}")]
    ProviderError(String),

    /// Credentials or endpoints are missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<reqwest::Error> for NotificationError {
    fn from(err: reqwest::Error) -> Self {
        NotificationError::ProviderError(err.to_string())
    }
}
