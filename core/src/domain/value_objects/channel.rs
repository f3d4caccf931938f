//! Verification workflow channels

use serde::{Deserialize, Serialize};
use std::fmt;

/// One verification method in the provider's ordered fallback sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Deviceless check through carrier-side signaling
    SilentAuth,
    /// One-time code delivered by text message
    Sms,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::SilentAuth => "silent_auth",
            Channel::Sms => "sms",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "silent_auth" | "silent-auth" => Ok(Channel::SilentAuth),
            "sms" => Ok(Channel::Sms),
            other => Err(format!("Unknown verification channel: {}", other)),
        }
    }
}

/// Silent auth first, SMS as the fallback
pub fn default_workflow() -> Vec<Channel> {
    vec![Channel::SilentAuth, Channel::Sms]
}
