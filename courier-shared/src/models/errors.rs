use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents an error response returned by the API.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message
    pub message: String,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}

/// Result type alias for thread view operations
pub type ThreadResult<T> = Result<T, ThreadError>;

/// Errors raised while loading or reconciling a direct-message thread.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ThreadError {
    /// A record without identity reached the reconciliation path
    #[error("Malformed message record: {reason}")]
    MalformedMessage {
        index: Option<usize>,
        reason: String,
    },

    /// The API answered with an error body
    #[error("API error: {0}")]
    Api(#[from] ErrorResponse),

    /// The request never produced a usable response
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// A live-feed payload could not be decoded
    #[error("Invalid live update payload: {details}")]
    InvalidPayload { details: String },
}

impl ThreadError {
    /// Attach the position of the offending record.
    #[must_use]
    pub fn at_index(self, position: usize) -> Self {
        match self {
            Self::MalformedMessage { reason, .. } => Self::MalformedMessage {
                index: Some(position),
                reason,
            },
            other => other,
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for ThreadError {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidPayload {
            details: err.to_string(),
        }
    }
}
