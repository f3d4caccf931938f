//! Silent-authentication probe
//!
//! The check URL is fetched directly by the device, over the cellular data
//! connection, so the carrier can vouch for the number. A usable answer is
//! a 2xx JSON body carrying a non-empty `code`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

/// Outcome of polling a check URL
///
/// Failures are data, not errors: any probe without a usable code sends the
/// workflow to SMS.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SilentAuthProbe {
    /// Absent when no response was received at all
    pub http_status: Option<u16>,
    pub code: Option<String>,
    pub error: Option<String>,
}

impl SilentAuthProbe {
    /// A probe that could not run (no check URL, transport failure)
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            http_status: None,
            code: None,
            error: Some(error.into()),
        }
    }

    /// The code, when the probe returned 2xx with a non-empty one
    pub fn usable_code(&self) -> Option<&str> {
        let success = self
            .http_status
            .is_some_and(|status| (200..300).contains(&status));
        if !success {
            return None;
        }
        self.code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }
}

/// Polls a silent-auth check URL
#[async_trait]
pub trait SilentAuthClient: Send + Sync {
    async fn probe(&self, check_url: &str) -> SilentAuthProbe;
}

#[derive(Debug, Deserialize)]
struct CheckUrlBody {
    #[serde(default)]
    code: Option<String>,
}

/// [`SilentAuthClient`] over HTTP, following the carrier redirects
#[derive(Debug, Clone)]
pub struct HttpSilentAuthClient {
    client: Client,
}

impl HttpSilentAuthClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SilentAuthClient for HttpSilentAuthClient {
    async fn probe(&self, check_url: &str) -> SilentAuthProbe {
        let response = match self.client.get(check_url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Silent auth check URL unreachable");
                return SilentAuthProbe::failed(e.to_string());
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                return SilentAuthProbe {
                    http_status: Some(status.as_u16()),
                    code: None,
                    error: Some(e.to_string()),
                }
            }
        };

        let (code, error) = if status.is_success() {
            match serde_json::from_str::<CheckUrlBody>(&text) {
                Ok(body) if body.code.as_deref().is_some_and(|c| !c.trim().is_empty()) => {
                    (body.code, None)
                }
                Ok(_) => (None, Some("check URL response carried no code".to_string())),
                Err(e) => (None, Some(format!("unreadable check URL response: {}", e))),
            }
        } else {
            (None, Some(format!("check URL returned HTTP {}", status.as_u16())))
        };

        tracing::debug!(
            status = status.as_u16(),
            has_code = code.is_some(),
            "Silent auth probe finished"
        );

        SilentAuthProbe {
            http_status: Some(status.as_u16()),
            code,
            error,
        }
    }
}
