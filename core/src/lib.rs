//! # Silent Verify Core
//!
//! Core domain layer for the verification orchestrator.
//! This crate contains the verification entities, the provider seam that
//! vendor adapters implement, the orchestration service, and error types.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
