use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build the HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Invalid API base URL '{0}': {1}")]
    InvalidUrl(String, String),

    #[error("Invalid value for header {0}")]
    InvalidHeader(String),

    #[error("Failed to prepare the request body: {0}")]
    Payload(#[from] translator::TranslateError),

    #[error("Network error while calling the API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("The API request timed out after {0:?}")]
    Timeout(Duration),

    #[error("The API rejected the request with status {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),
}

impl ApiError {
    /// Whether the same request may succeed if the caller tries again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Transport(_) | ApiError::Timeout(_))
    }
}
