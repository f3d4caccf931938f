//! Trait for verification provider integration

use async_trait::async_trait;

use crate::domain::entities::{
    CodeSubmission, NewVerification, VerificationOutcome, VerificationRequest, WorkflowAdvance,
};
use crate::errors::ProviderError;

/// Narrow seam in front of the vendor verification API
///
/// Adapters translate vendor wire formats and transport failures into
/// domain types; the orchestrator never sees vendor specifics.
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    /// Open a verification request running the given workflow
    async fn start_verification(
        &self,
        request: &NewVerification,
    ) -> Result<VerificationRequest, ProviderError>;

    /// Check a code against an open request
    ///
    /// A code the provider simply does not accept is a negative outcome,
    /// not an error.
    async fn check_code(
        &self,
        submission: &CodeSubmission,
    ) -> Result<VerificationOutcome, ProviderError>;

    /// Move the request to its next configured channel
    async fn advance_workflow(&self, advance: &WorkflowAdvance) -> Result<(), ProviderError>;

    /// Provider name for logs
    fn provider_name(&self) -> &str;
}
