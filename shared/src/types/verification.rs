//! Response bodies of the orchestrator's verification endpoints

use serde::{Deserialize, Serialize};

/// Body of a successful `POST /verification`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartVerificationResponse {
    /// Provider-issued identifier joining every later call of this attempt
    pub request_id: String,

    /// Silent-auth check URL, only present while the silent-auth channel is active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_url: Option<String>,
}

/// Body of a successful `POST /check-code`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckCodeResponse {
    pub verified: bool,

    /// Raw provider status (`completed`, `invalid_code`, ...)
    #[serde(default)]
    pub status: Option<String>,
}

/// Acknowledgement of a provider callback; echoes the pushed status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackAck {
    pub status: Option<String>,
}
