//! # Infrastructure Layer
//!
//! Concrete implementations of the verification provider seam defined in
//! `sv_core`.
//!
//! ## Architecture
//!
//! - **Vonage**: Verify v2 over HTTPS, authenticated with an application JWT
//! - **Mock**: in-process provider for local development and tests
//!
//! [`create_provider`] picks the adapter named by `VERIFY_PROVIDER`.

use std::sync::Arc;

use sv_core::services::VerificationProvider;

/// Verification provider adapters
pub mod provider;

pub use provider::{MockVerificationProvider, VonageConfig, VonageVerifyProvider};

/// Configuration module for infrastructure services
pub mod config {
    //! Provider selection
    //!
    //! Adapter-specific settings live next to each adapter
    //! (`VonageConfig`, `MockVerificationProvider::from_env`).

    use std::fmt;
    use std::str::FromStr;

    use sv_shared::config::env_var;

    /// Which provider adapter backs the orchestrator
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum ProviderKind {
        /// Vonage Verify v2
        Vonage,
        /// In-process mock
        #[default]
        Mock,
    }

    impl FromStr for ProviderKind {
        type Err = String;

        fn from_str(s: &str) -> Result<Self, Self::Err> {
            match s.trim().to_lowercase().as_str() {
                "vonage" | "nexmo" => Ok(ProviderKind::Vonage),
                "mock" => Ok(ProviderKind::Mock),
                other => Err(format!("Unknown verification provider: {}", other)),
            }
        }
    }

    impl fmt::Display for ProviderKind {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                ProviderKind::Vonage => write!(f, "vonage"),
                ProviderKind::Mock => write!(f, "mock"),
            }
        }
    }

    /// Provider selection settings
    #[derive(Debug, Clone, Default)]
    pub struct ProviderConfig {
        pub kind: ProviderKind,
    }

    impl ProviderConfig {
        /// Load from `VERIFY_PROVIDER`; unknown values fall back to the mock
        pub fn from_env() -> Self {
            let kind = match env_var("VERIFY_PROVIDER") {
                Some(value) => value.parse().unwrap_or_else(|e: String| {
                    tracing::warn!("{}, falling back to mock provider", e);
                    ProviderKind::Mock
                }),
                None => ProviderKind::default(),
            };
            Self { kind }
        }
    }
}

use config::{ProviderConfig, ProviderKind};

/// Build the provider adapter named by `config`
///
/// The Vonage adapter reads its credentials from the environment and fails
/// when they are missing or unusable; the mock never fails.
pub fn create_provider(
    config: &ProviderConfig,
) -> Result<Arc<dyn VerificationProvider>, InfrastructureError> {
    let provider: Arc<dyn VerificationProvider> = match config.kind {
        ProviderKind::Vonage => {
            let vonage = VonageConfig::from_env()?;
            Arc::new(VonageVerifyProvider::new(vonage)?)
        }
        ProviderKind::Mock => {
            tracing::warn!("Using mock verification provider; no real verification is performed");
            Arc::new(MockVerificationProvider::from_env())
        }
    };

    tracing::info!(provider = provider.provider_name(), "Verification provider initialized");
    Ok(provider)
}

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP client construction error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider token could not be built or signed
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// Key file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
