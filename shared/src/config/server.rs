//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_parse, env_var};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,

    /// Maximum JSON payload size in bytes
    #[serde(default = "default_max_payload_size")]
    pub max_payload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: default_port(),
            workers: 0,
            max_payload_size: default_max_payload_size(),
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Load from `SERVER_HOST`, `PORT` (or `SERVER_PORT`) and `SERVER_WORKERS`
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let port = env_var("PORT")
            .or_else(|| env_var("SERVER_PORT"))
            .and_then(|p| p.parse().ok())
            .unwrap_or(defaults.port);

        Self {
            host: env_var("SERVER_HOST").unwrap_or(defaults.host),
            port,
            workers: env_parse("SERVER_WORKERS", defaults.workers),
            max_payload_size: env_parse("SERVER_MAX_PAYLOAD_SIZE", defaults.max_payload_size),
        }
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_port() -> u16 {
    4000
}

fn default_max_payload_size() -> usize {
    64 * 1024
}
