//! Client error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never produced a response
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The orchestrator answered with an error status; `message` is its
    /// `error` field
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Rejected locally before any call
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A code was submitted without an open verification request
    #[error("No active verification request")]
    NoActiveRequest,

    #[error("Unexpected response: {0}")]
    InvalidResponse(String),
}

impl ClientError {
    /// HTTP status of a backend rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
