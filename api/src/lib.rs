//! # Silent Verify API
//!
//! HTTP orchestrator between the sign-in client and the verification
//! provider. Library exports are used by the binary and the integration
//! tests.

pub mod app;
pub mod config;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod telemetry;

pub use app::create_app;
pub use config::Config;
