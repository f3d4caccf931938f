//! Configuration module
//!
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server bind configuration

pub mod environment;
pub mod server;

pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

use std::env;

/// Read an environment variable, treating empty values as unset
pub fn env_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Read and parse an environment variable, falling back to `default` on
/// absence or parse failure
pub fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env_var(key)
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
