//! Error types for the JBoard client.

use thiserror::Error;

/// Result type for JBoard client operations.
pub type Result<T> = std::result::Result<T, JBoardError>;

/// JBoard client errors.
#[derive(Debug, Error)]
pub enum JBoardError {
    /// Request rejected before it was sent (bad page number, empty id)
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Transport failure (connection refused, timeout, TLS)
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-2xx response from the directory
    #[error("JBoard API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Payload did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl JBoardError {
    /// Whether the failure is worth retrying.
    ///
    /// Transport errors, rate limits and server errors are transient; every
    /// other 4xx and shape errors are not.
    pub fn is_transient(&self) -> bool {
        match self {
            JBoardError::Network(_) => true,
            JBoardError::Api { status, .. } => *status == 429 || *status >= 500,
            JBoardError::InvalidRequest(_) | JBoardError::MalformedResponse(_) => false,
        }
    }
}
