//! Application JWT for the Vonage API
//!
//! Every request carries a short-lived RS256 token signed with the
//! application's private key.

use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::InfrastructureError;

/// Token lifetime
pub const TOKEN_TTL_SECS: i64 = 15 * 60;

/// Claims Vonage expects in an application token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub application_id: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Signs application tokens
pub struct TokenSigner {
    application_id: String,
    key: EncodingKey,
}

impl TokenSigner {
    /// Parse the PEM private key up front so a bad key fails at startup
    pub fn new(
        application_id: impl Into<String>,
        private_key: &SecretString,
    ) -> Result<Self, InfrastructureError> {
        let key = EncodingKey::from_rsa_pem(private_key.expose_secret().as_bytes())?;
        Ok(Self {
            application_id: application_id.into(),
            key,
        })
    }

    /// Fresh claims with a unique `jti`
    pub fn claims(&self) -> Claims {
        let now = Utc::now();
        Claims {
            application_id: self.application_id.clone(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Sign a new token
    pub fn sign(&self) -> Result<String, InfrastructureError> {
        let token = encode(&Header::new(Algorithm::RS256), &self.claims(), &self.key)?;
        Ok(token)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("application_id", &self.application_id)
            .finish_non_exhaustive()
    }
}
