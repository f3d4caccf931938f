//! Verification provider adapters
//!
//! Each adapter implements `sv_core::services::VerificationProvider` and
//! converts vendor failures into `ProviderError` at the seam.
//!
//! - **Vonage**: Verify v2 REST API (`/v2/verify`)
//! - **Mock**: in-memory requests with a fixed code

pub mod mock;
pub mod vonage;

pub use mock::MockVerificationProvider;
pub use vonage::{VonageConfig, VonageVerifyProvider};

#[cfg(test)]
mod tests;
