//! Error taxonomy for a reconciliation pass.

use jboard_client::JBoardError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EnrichError>;

#[derive(Debug, Error)]
pub enum EnrichError {
    /// Directory read or write failed (transport error or non-2xx)
    #[error("employer directory unavailable: {message}")]
    DirectoryUnavailable { message: String, transient: bool },

    /// Directory payload did not contain an employer list
    #[error("malformed directory response: {0}")]
    MalformedResponse(String),

    /// Model call failed
    #[error("enrichment oracle unavailable: {message}")]
    OracleUnavailable { message: String, transient: bool },

    /// Model output had no parseable JSON object
    #[error("no usable JSON object in model output")]
    UnrecoverableExtraction,

    /// Arguments rejected before any call was made
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl EnrichError {
    pub fn directory(message: impl Into<String>, transient: bool) -> Self {
        Self::DirectoryUnavailable {
            message: message.into(),
            transient,
        }
    }

    pub fn oracle(message: impl Into<String>, transient: bool) -> Self {
        Self::OracleUnavailable {
            message: message.into(),
            transient,
        }
    }

    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::DirectoryUnavailable { transient, .. }
            | Self::OracleUnavailable { transient, .. } => *transient,
            Self::MalformedResponse(_) | Self::UnrecoverableExtraction | Self::InvalidRequest(_) => {
                false
            }
        }
    }
}

impl From<JBoardError> for EnrichError {
    fn from(err: JBoardError) -> Self {
        let transient = err.is_transient();
        match err {
            JBoardError::MalformedResponse(message) => Self::MalformedResponse(message),
            JBoardError::InvalidRequest(message) => Self::InvalidRequest(message),
            other => Self::directory(other.to_string(), transient),
        }
    }
}
