//! Main verification service implementation

use std::sync::Arc;

use sv_shared::phone::mask_phone_number;

use crate::domain::entities::{
    CallbackEvent, CodeSubmission, NewVerification, VerificationOutcome, VerificationRequest,
    WorkflowAdvance,
};
use crate::domain::value_objects::RequestId;
use crate::errors::{DomainResult, ValidationError};

use super::config::VerificationServiceConfig;
use super::traits::VerificationProvider;

/// Wire name of the phone field
pub const PHONE_FIELD: &str = "phone";

/// Wire name of the code field
pub const CODE_FIELD: &str = "code";

/// Stateless pass-through from the HTTP layer to the verification provider
///
/// Each call validates its inputs, forwards to the provider, and returns the
/// result unchanged. Nothing is cached between calls.
pub struct VerificationService<P: VerificationProvider + ?Sized> {
    /// Provider adapter
    provider: Arc<P>,
    /// Service configuration
    config: VerificationServiceConfig,
}

impl<P: VerificationProvider + ?Sized> VerificationService<P> {
    /// Create a new verification service
    pub fn new(provider: Arc<P>, config: VerificationServiceConfig) -> Self {
        Self { provider, config }
    }

    /// Open a verification request for `phone` running the configured workflow
    ///
    /// # Returns
    ///
    /// * `Ok(VerificationRequest)` - request id plus the silent-auth check URL
    /// * `Err(DomainError::Validation)` - phone missing or blank
    /// * `Err(DomainError::Provider)` - provider rejected the number or was unreachable
    pub async fn start(&self, phone: &str) -> DomainResult<VerificationRequest> {
        let phone = required(PHONE_FIELD, phone)?;

        tracing::info!(
            phone = %mask_phone_number(phone),
            provider = self.provider.provider_name(),
            event = "verification_requested",
            "Starting verification"
        );

        let request = NewVerification {
            phone: phone.to_string(),
            brand: self.config.brand.clone(),
            workflow: self.config.workflow.clone(),
        };

        let verification = self
            .provider
            .start_verification(&request)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %mask_phone_number(phone),
                    error = %e,
                    event = "verification_start_failed",
                    "Provider rejected verification request"
                );
                e
            })?;

        tracing::info!(
            request_id = %verification.request_id,
            silent_auth = verification.supports_silent_auth(),
            event = "verification_started",
            "Verification request opened"
        );

        Ok(verification)
    }

    /// Check a code against an open request
    pub async fn check_code(&self, request_id: &str, code: &str) -> DomainResult<VerificationOutcome> {
        let request_id = RequestId::parse(request_id)?;
        let code = required(CODE_FIELD, code)?;

        let submission = CodeSubmission {
            request_id,
            code: code.to_string(),
        };

        let outcome = self.provider.check_code(&submission).await.map_err(|e| {
            tracing::error!(
                request_id = %submission.request_id,
                error = %e,
                event = "code_check_failed",
                "Provider failed to check code"
            );
            e
        })?;

        tracing::info!(
            request_id = %submission.request_id,
            verified = outcome.verified,
            status = outcome.provider_status.as_deref().unwrap_or("unknown"),
            event = "code_checked",
            "Code checked"
        );

        Ok(outcome)
    }

    /// Move an open request to its next channel (silent auth → SMS)
    pub async fn advance_workflow(&self, request_id: &str) -> DomainResult<()> {
        let advance = WorkflowAdvance {
            request_id: RequestId::parse(request_id)?,
        };

        self.provider.advance_workflow(&advance).await.map_err(|e| {
            tracing::error!(
                request_id = %advance.request_id,
                error = %e,
                event = "workflow_advance_failed",
                "Provider failed to advance workflow"
            );
            e
        })?;

        tracing::info!(
            request_id = %advance.request_id,
            event = "workflow_advanced",
            "Workflow advanced to next channel"
        );

        Ok(())
    }

    /// Record a provider callback. Never fails: the provider retries on
    /// anything but a 2xx, so every payload is acknowledged.
    pub fn record_callback(&self, event: &CallbackEvent) {
        if event.is_recognized() {
            tracing::info!(
                request_id = event.request_id.as_deref().unwrap_or_default(),
                status = event.status.as_deref().unwrap_or_default(),
                event = "callback_received",
                "Provider callback received"
            );
        } else {
            tracing::warn!(
                payload = %event.payload,
                event = "callback_unrecognized",
                "Provider callback with unrecognized payload"
            );
        }
        tracing::debug!(payload = %event.payload, "Callback payload");
    }
}

/// Trim `value` and reject it when blank
fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::required(field));
    }
    Ok(trimmed)
}
