//! Domain-specific error types and error handling.

mod types;


// Re-export all error types
pub use types::{ProviderError, ValidationError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    /// Rejected locally; never reached the provider
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The provider refused the call or could not be reached
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl DomainError {
    /// Whether the failure was caused by the caller's input
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::Validation(_))
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
