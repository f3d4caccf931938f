//! Verification orchestration
//!
//! This module provides the orchestrator's side of the verification flow:
//! - Starting a multi-channel verification request (silent auth, then SMS)
//! - Checking submitted codes
//! - Advancing the provider workflow to its next channel
//! - Ingesting asynchronous provider callbacks
//!
//! The provider itself sits behind [`VerificationProvider`].

mod config;
mod service;
mod traits;

#[cfg(test)]
mod tests;

pub use config::VerificationServiceConfig;
pub use service::{VerificationService, CODE_FIELD, PHONE_FIELD};
pub use traits::VerificationProvider;
