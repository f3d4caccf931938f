//! Configuration for the verification service

use sv_shared::config::env_var;

use crate::domain::value_objects::{default_workflow, Channel};

/// Configuration for the verification service
#[derive(Debug, Clone)]
pub struct VerificationServiceConfig {
    /// Brand name the provider includes in its messages
    pub brand: String,
    /// Ordered channels every new request runs through
    pub workflow: Vec<Channel>,
}

impl Default for VerificationServiceConfig {
    fn default() -> Self {
        Self {
            brand: "DemoApp".to_string(),
            workflow: default_workflow(),
        }
    }
}

impl VerificationServiceConfig {
    /// Load from `VERIFY_BRAND`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            brand: env_var("VERIFY_BRAND").unwrap_or(defaults.brand),
            workflow: defaults.workflow,
        }
    }
}
