//! Client configuration
//!
//! Defaults are baked in at build time (`VERIFY_BACKEND_URL`,
//! `VERIFY_DEFAULT_PHONE`) and can be overridden by the same variables at
//! runtime.

use sv_shared::config::{env_parse, env_var};

/// Orchestrator URL when nothing else is configured
pub const FALLBACK_BACKEND_URL: &str = "http://localhost:4000";

/// Backend URL baked in at build time
pub fn baked_backend_url() -> &'static str {
    option_env!("VERIFY_BACKEND_URL").unwrap_or(FALLBACK_BACKEND_URL)
}

/// Default phone number baked in at build time
pub fn baked_default_phone() -> Option<&'static str> {
    option_env!("VERIFY_DEFAULT_PHONE").filter(|phone| !phone.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Orchestrator base URL
    pub backend_url: String,
    /// Number pre-filled on the sign-in screen
    pub default_phone: Option<String>,
    /// Timeout for each HTTP call in seconds
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: baked_backend_url().to_string(),
            default_phone: baked_default_phone().map(str::to_string),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_url: env_var("VERIFY_BACKEND_URL").unwrap_or(defaults.backend_url),
            default_phone: env_var("VERIFY_DEFAULT_PHONE").or(defaults.default_phone),
            request_timeout_secs: env_parse("VERIFY_REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
        }
    }

    /// Backend URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.backend_url.trim_end_matches('/')
    }
}
