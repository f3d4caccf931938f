//! Orchestrator API client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde_json::json;

use sv_shared::{CheckCodeResponse, ErrorResponse, StartVerificationResponse};

use crate::config::ClientConfig;
use crate::error::ClientError;

/// The three orchestrator operations the sign-in screen uses
#[async_trait]
pub trait VerifyBackend: Send + Sync {
    /// `POST /verification`
    async fn start(&self, phone: &str) -> Result<StartVerificationResponse, ClientError>;

    /// `POST /check-code`
    async fn check_code(&self, request_id: &str, code: &str)
        -> Result<CheckCodeResponse, ClientError>;

    /// `POST /next`
    async fn advance_workflow(&self, request_id: &str) -> Result<(), ClientError>;
}

/// [`VerifyBackend`] over HTTP/JSON
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(client, config.base_url()))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(&self, path: &str, body: serde_json::Value) -> Result<Response, ClientError> {
        tracing::debug!(path, "Calling orchestrator");
        let response = self.client.post(self.url(path)).json(&body).send().await?;
        ensure_success(response).await
    }
}

/// Turn an error status into [`ClientError::Status`] carrying the
/// orchestrator's `error` text
async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&text)
        .map(|body| body.error)
        .ok()
        .filter(|message| !message.trim().is_empty())
        .or_else(|| Some(text.trim().to_string()).filter(|t| !t.is_empty()))
        .unwrap_or_else(|| format!("Request failed with HTTP {}", status.as_u16()));

    tracing::warn!(status = status.as_u16(), error = %message, "Orchestrator returned an error");
    Err(ClientError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl VerifyBackend for HttpBackend {
    async fn start(&self, phone: &str) -> Result<StartVerificationResponse, ClientError> {
        let response = self.post("/verification", json!({ "phone": phone })).await?;
        let started: StartVerificationResponse = decode(response).await?;
        if started.request_id.trim().is_empty() {
            return Err(ClientError::InvalidResponse(
                "response carried an empty request_id".to_string(),
            ));
        }
        Ok(started)
    }

    async fn check_code(
        &self,
        request_id: &str,
        code: &str,
    ) -> Result<CheckCodeResponse, ClientError> {
        let response = self
            .post("/check-code", json!({ "request_id": request_id, "code": code }))
            .await?;
        decode(response).await
    }

    async fn advance_workflow(&self, request_id: &str) -> Result<(), ClientError> {
        self.post("/next", json!({ "requestId": request_id })).await?;
        Ok(())
    }
}
