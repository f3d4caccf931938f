//! Verification request lifecycle entities

use serde::Serialize;

use crate::domain::value_objects::{Channel, RequestId};

/// Provider status reported once a code has been accepted
pub const COMPLETED_STATUS: &str = "completed";

/// Status reported when the provider rejected the submitted code
pub const INVALID_CODE_STATUS: &str = "invalid_code";

/// Everything the provider needs to open a verification request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewVerification {
    /// Phone number every channel is addressed to
    pub phone: String,
    /// Brand name shown in the SMS text
    pub brand: String,
    /// Ordered channel fallback sequence
    pub workflow: Vec<Channel>,
}

/// An open verification request, as issued by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationRequest {
    pub request_id: RequestId,
    /// Only present while the silent-auth channel is active
    pub check_url: Option<String>,
}

impl VerificationRequest {
    pub fn new(request_id: RequestId, check_url: Option<String>) -> Self {
        Self {
            request_id,
            check_url,
        }
    }

    /// Whether the client can attempt silent authentication for this request
    pub fn supports_silent_auth(&self) -> bool {
        self.check_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

/// A code submitted against an open request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSubmission {
    pub request_id: RequestId,
    pub code: String,
}

/// Result of checking a submitted code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    pub verified: bool,
    pub provider_status: Option<String>,
}

impl VerificationOutcome {
    /// Map a raw provider status; only `completed` counts as verified
    pub fn from_provider_status(status: impl Into<String>) -> Self {
        let status = status.into();
        Self {
            verified: status == COMPLETED_STATUS,
            provider_status: Some(status),
        }
    }

    /// Negative outcome for a code the provider did not accept
    pub fn invalid_code() -> Self {
        Self {
            verified: false,
            provider_status: Some(INVALID_CODE_STATUS.to_string()),
        }
    }
}

/// Request to move a verification to its next configured channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowAdvance {
    pub request_id: RequestId,
}
