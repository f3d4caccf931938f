//! Error types for input validation and provider calls

use thiserror::Error;

/// Validation errors
///
/// Raised before any provider call; each names the offending field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {field}")]
    RequiredField { field: String },

    #[error("Invalid format for field: {field}")]
    InvalidFormat { field: String },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::RequiredField {
            field: field.into(),
        }
    }

    pub fn invalid_format(field: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
        }
    }

    /// Name of the field the error refers to
    pub fn field(&self) -> &str {
        match self {
            ValidationError::RequiredField { field } | ValidationError::InvalidFormat { field } => {
                field
            }
        }
    }
}

/// Failures reported by (or while reaching) the verification provider
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// The provider answered with a non-success status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// Transport failure or timeout before any answer arrived
    #[error("Verification provider unreachable: {message}")]
    Unreachable { message: String },

    /// The provider answered with a body we could not interpret
    #[error("Unexpected verification provider response: {message}")]
    InvalidResponse { message: String },
}

impl ProviderError {
    /// HTTP status the provider answered with, if it answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
