//! Vonage Verify v2 adapter
//!
//! Talks to the Verify v2 REST API:
//!
//! - `POST /v2/verify` opens a request running the silent_auth → sms workflow
//! - `POST /v2/verify/{request_id}` checks a code
//! - `POST /v2/verify/{request_id}/next_workflow` skips to the next channel
//!
//! Errors come back as RFC 7807 problem documents; the adapter surfaces the
//! problem's `detail` (or `title`) as the error message.

pub mod auth;
pub mod models;

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde::Serialize;
use tracing::{debug, info, warn};
use url::Url;

use sv_core::domain::{
    CodeSubmission, NewVerification, RequestId, VerificationOutcome, VerificationRequest,
    WorkflowAdvance,
};
use sv_core::errors::ProviderError;
use sv_core::services::VerificationProvider;
use sv_shared::config::{env_parse, env_var};
use sv_shared::phone::mask_phone_number;

use crate::InfrastructureError;
use auth::TokenSigner;
use models::{CheckCodeRequest, CheckCodeResponse, Problem, StartRequest, StartResponse, WorkflowStep};

/// Public Vonage API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.nexmo.com";

const PROVIDER_NAME: &str = "vonage";

/// Vonage adapter configuration
#[derive(Debug)]
pub struct VonageConfig {
    /// Vonage application id (JWT `application_id` claim)
    pub application_id: String,
    /// PEM-encoded application private key
    pub private_key: SecretString,
    /// API base URL
    pub base_url: Url,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl VonageConfig {
    pub fn new(
        application_id: impl Into<String>,
        private_key_pem: impl Into<String>,
        base_url: &str,
    ) -> Result<Self, InfrastructureError> {
        Ok(Self {
            application_id: application_id.into(),
            private_key: SecretString::from(private_key_pem.into()),
            base_url: parse_base_url(base_url)?,
            request_timeout_secs: 10,
        })
    }

    /// Create configuration from environment variables
    ///
    /// `VONAGE_PRIVATE_KEY` holds either the PEM text itself (newlines may
    /// be escaped as `\n`) or a path to a PEM file.
    pub fn from_env() -> Result<Self, InfrastructureError> {
        let application_id = env_var("VONAGE_APP_ID")
            .or_else(|| env_var("VONAGE_APPLICATION_ID"))
            .ok_or_else(|| InfrastructureError::Config("VONAGE_APP_ID not set".to_string()))?;
        let key_source = env_var("VONAGE_PRIVATE_KEY")
            .ok_or_else(|| InfrastructureError::Config("VONAGE_PRIVATE_KEY not set".to_string()))?;
        let base_url = env_var("VONAGE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = Self::new(application_id, load_private_key(&key_source)?, &base_url)?;
        config.request_timeout_secs = env_parse("VONAGE_REQUEST_TIMEOUT_SECS", 10);
        Ok(config)
    }
}

/// Resolve `VONAGE_PRIVATE_KEY` to PEM text
pub fn load_private_key(source: &str) -> Result<String, InfrastructureError> {
    if source.contains("-----BEGIN") {
        return Ok(source.replace("\\n", "\n"));
    }

    let path = Path::new(source);
    if !path.is_file() {
        return Err(InfrastructureError::Config(
            "VONAGE_PRIVATE_KEY is neither a PEM key nor a readable file".to_string(),
        ));
    }
    Ok(std::fs::read_to_string(path)?)
}

fn parse_base_url(raw: &str) -> Result<Url, InfrastructureError> {
    let url = Url::parse(raw)
        .map_err(|e| InfrastructureError::Config(format!("Invalid VONAGE_API_BASE_URL: {}", e)))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(InfrastructureError::Config(format!(
            "VONAGE_API_BASE_URL must be an http(s) URL: {}",
            raw
        )));
    }
    Ok(url)
}

/// Vonage Verify v2 provider
#[derive(Debug)]
pub struct VonageVerifyProvider {
    client: Client,
    signer: TokenSigner,
    base_url: Url,
}

impl VonageVerifyProvider {
    /// Build the HTTP client and parse the signing key
    pub fn new(config: VonageConfig) -> Result<Self, InfrastructureError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        let signer = TokenSigner::new(config.application_id.as_str(), &config.private_key)?;

        info!(
            application_id = %config.application_id,
            base_url = %config.base_url,
            "Vonage verify provider initialized"
        );

        Ok(Self {
            client,
            signer,
            base_url: config.base_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ProviderError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ProviderError::Unreachable {
                message: format!("Cannot build endpoint from {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send an authenticated JSON POST and return the status with the raw body
    async fn post<B: Serialize + ?Sized>(
        &self,
        url: Url,
        body: Option<&B>,
    ) -> Result<(StatusCode, String), ProviderError> {
        let token = self.signer.sign().map_err(|e| ProviderError::Unreachable {
            message: format!("Failed to sign provider token: {}", e),
        })?;

        debug!(url = %url, "Calling Vonage");

        let mut request = self.client.post(url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Vonage request failed before a response arrived");
            ProviderError::Unreachable {
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| ProviderError::Unreachable {
            message: e.to_string(),
        })?;
        Ok((status, text))
    }
}

/// Convert a non-success answer into a provider error
fn rejected(status: StatusCode, body: &str) -> ProviderError {
    let problem = Problem::parse(body);
    let mut message = problem.message(body);
    if message.is_empty() {
        message = format!("Verification provider returned HTTP {}", status.as_u16());
    }

    warn!(
        status = status.as_u16(),
        problem_type = problem.kind.as_deref().unwrap_or_default(),
        instance = problem.instance.as_deref().unwrap_or_default(),
        "Vonage rejected request: {}",
        message
    );

    ProviderError::Rejected {
        status: status.as_u16(),
        message,
    }
}

fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Result<T, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::InvalidResponse {
        message: e.to_string(),
    })
}

#[async_trait]
impl VerificationProvider for VonageVerifyProvider {
    async fn start_verification(
        &self,
        request: &NewVerification,
    ) -> Result<VerificationRequest, ProviderError> {
        let body = StartRequest {
            brand: &request.brand,
            workflow: request
                .workflow
                .iter()
                .map(|channel| WorkflowStep {
                    channel: *channel,
                    to: &request.phone,
                })
                .collect(),
        };

        let (status, text) = self.post(self.endpoint(&["v2", "verify"])?, Some(&body)).await?;
        if !status.is_success() {
            return Err(rejected(status, &text));
        }

        let started: StartResponse = decode(&text)?;
        let request_id =
            RequestId::parse(&started.request_id).map_err(|_| ProviderError::InvalidResponse {
                message: "response carried an empty request_id".to_string(),
            })?;
        let check_url = started.check_url.filter(|url| !url.trim().is_empty());

        info!(
            phone = %mask_phone_number(&request.phone),
            request_id = %request_id,
            silent_auth = check_url.is_some(),
            "Vonage verification request created"
        );

        Ok(VerificationRequest::new(request_id, check_url))
    }

    async fn check_code(
        &self,
        submission: &CodeSubmission,
    ) -> Result<VerificationOutcome, ProviderError> {
        let url = self.endpoint(&["v2", "verify", submission.request_id.as_str()])?;
        let body = CheckCodeRequest {
            code: &submission.code,
        };

        let (status, text) = self.post(url, Some(&body)).await?;
        if status == StatusCode::BAD_REQUEST && Problem::parse(&text).is_invalid_code() {
            info!(request_id = %submission.request_id, "Vonage rejected the submitted code");
            return Ok(VerificationOutcome::invalid_code());
        }
        if !status.is_success() {
            return Err(rejected(status, &text));
        }

        let checked: CheckCodeResponse = decode(&text)?;
        if let Some(echoed) = checked.request_id.as_deref() {
            if echoed != submission.request_id.as_str() {
                warn!(
                    expected = %submission.request_id,
                    received = echoed,
                    "Vonage echoed a different request id"
                );
            }
        }

        Ok(VerificationOutcome::from_provider_status(checked.status))
    }

    async fn advance_workflow(&self, advance: &WorkflowAdvance) -> Result<(), ProviderError> {
        let url = self.endpoint(&["v2", "verify", advance.request_id.as_str(), "next_workflow"])?;

        let (status, text) = self.post::<()>(url, None).await?;
        if !status.is_success() {
            return Err(rejected(status, &text));
        }

        info!(request_id = %advance.request_id, "Vonage workflow advanced");
        Ok(())
    }

    fn provider_name(&self) -> &str {
        PROVIDER_NAME
    }
}
