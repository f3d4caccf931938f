//! Mock verification provider
//!
//! In-memory stand-in for the vendor API, for development and tests.
//! Requests are held in memory; every request accepts the same code.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{info, warn};
use uuid::Uuid;

use sv_core::domain::{
    CodeSubmission, NewVerification, RequestId, VerificationOutcome, VerificationRequest,
    WorkflowAdvance, COMPLETED_STATUS,
};
use sv_core::errors::ProviderError;
use sv_core::services::VerificationProvider;
use sv_shared::config::env_var;
use sv_shared::phone::{is_valid_e164, mask_phone_number};

/// Code accepted when `MOCK_VERIFY_CODE` is unset
pub const DEFAULT_MOCK_CODE: &str = "000000";

#[derive(Debug, Clone)]
struct MockRequest {
    phone: String,
    channel_index: usize,
    channels: usize,
}

/// Mock provider for development and testing
///
/// - Rejects phone numbers that are not E.164 with a 422
/// - Accepts `accepted_code` for any open request
/// - Issues a `check_url` only when a base URL is configured
/// - Tracks call count for tests
#[derive(Clone)]
pub struct MockVerificationProvider {
    accepted_code: String,
    check_url_base: Option<String>,
    requests: Arc<Mutex<HashMap<String, MockRequest>>>,
    call_count: Arc<AtomicU64>,
    simulate_failure: bool,
}

impl MockVerificationProvider {
    pub fn new(accepted_code: impl Into<String>, check_url_base: Option<String>) -> Self {
        Self {
            accepted_code: accepted_code.into(),
            check_url_base,
            requests: Arc::new(Mutex::new(HashMap::new())),
            call_count: Arc::new(AtomicU64::new(0)),
            simulate_failure: false,
        }
    }

    /// Load from `MOCK_VERIFY_CODE` and `MOCK_CHECK_URL_BASE`
    pub fn from_env() -> Self {
        Self::new(
            env_var("MOCK_VERIFY_CODE").unwrap_or_else(|| DEFAULT_MOCK_CODE.to_string()),
            env_var("MOCK_CHECK_URL_BASE"),
        )
    }

    /// Make every call fail as if the provider were down
    pub fn with_failure(mut self) -> Self {
        self.simulate_failure = true;
        self
    }

    /// Total provider calls received
    pub fn get_call_count(&self) -> u64 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Number of requests opened so far
    pub fn open_requests(&self) -> usize {
        self.lock_requests().len()
    }

    /// Index of the active channel for `request_id`, if the request exists
    pub fn active_channel(&self, request_id: &str) -> Option<usize> {
        self.lock_requests()
            .get(request_id)
            .map(|request| request.channel_index)
    }

    fn lock_requests(&self) -> std::sync::MutexGuard<'_, HashMap<String, MockRequest>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self) -> Result<(), ProviderError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if self.simulate_failure {
            warn!(provider = "mock", "Mock provider simulating outage");
            return Err(ProviderError::Unreachable {
                message: "Simulated provider outage".to_string(),
            });
        }
        Ok(())
    }

    fn not_found(request_id: &RequestId) -> ProviderError {
        ProviderError::Rejected {
            status: 404,
            message: format!("Request '{}' was not found or it has been verified already.", request_id),
        }
    }
}

impl Default for MockVerificationProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MOCK_CODE, None)
    }
}

#[async_trait]
impl VerificationProvider for MockVerificationProvider {
    async fn start_verification(
        &self,
        request: &NewVerification,
    ) -> Result<VerificationRequest, ProviderError> {
        self.record_call()?;

        if !is_valid_e164(&request.phone) {
            return Err(ProviderError::Rejected {
                status: 422,
                message: format!("Invalid phone number: {}", mask_phone_number(&request.phone)),
            });
        }

        let request_id = Uuid::new_v4().to_string();
        let check_url = self
            .check_url_base
            .as_deref()
            .map(|base| format!("{}/{}", base.trim_end_matches('/'), request_id));

        self.lock_requests().insert(
            request_id.clone(),
            MockRequest {
                phone: request.phone.clone(),
                channel_index: 0,
                channels: request.workflow.len(),
            },
        );

        info!(
            provider = "mock",
            phone = %mask_phone_number(&request.phone),
            request_id = %request_id,
            code = %self.accepted_code,
            "Mock verification request created"
        );

        let request_id = RequestId::parse(request_id).map_err(|e| ProviderError::InvalidResponse {
            message: e.to_string(),
        })?;
        Ok(VerificationRequest::new(request_id, check_url))
    }

    async fn check_code(
        &self,
        submission: &CodeSubmission,
    ) -> Result<VerificationOutcome, ProviderError> {
        self.record_call()?;

        let requests = self.lock_requests();
        let request = requests
            .get(submission.request_id.as_str())
            .ok_or_else(|| Self::not_found(&submission.request_id))?;

        if submission.code != self.accepted_code {
            info!(
                provider = "mock",
                phone = %mask_phone_number(&request.phone),
                "Mock provider rejected code"
            );
            return Ok(VerificationOutcome::invalid_code());
        }

        Ok(VerificationOutcome::from_provider_status(COMPLETED_STATUS))
    }

    async fn advance_workflow(&self, advance: &WorkflowAdvance) -> Result<(), ProviderError> {
        self.record_call()?;

        let mut requests = self.lock_requests();
        let request = requests
            .get_mut(advance.request_id.as_str())
            .ok_or_else(|| Self::not_found(&advance.request_id))?;

        if request.channel_index + 1 >= request.channels {
            return Err(ProviderError::Rejected {
                status: 409,
                message: "There are no more workflows to advance to.".to_string(),
            });
        }

        request.channel_index += 1;
        info!(
            provider = "mock",
            request_id = %advance.request_id,
            channel_index = request.channel_index,
            "Mock workflow advanced"
        );
        Ok(())
    }

    fn provider_name(&self) -> &str {
        "mock"
    }
}
