use sv_core::services::VerificationServiceConfig;
use sv_infra::config::ProviderConfig;
use sv_shared::config::{env_var, Environment, LoggingConfig, ServerConfig};

/// Everything the API binary reads at startup
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub environment: Environment,
    pub logging: LoggingConfig,
    pub provider: ProviderConfig,
    pub verification: VerificationServiceConfig,
    /// Origins accepted by CORS in production
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let environment = Environment::from_env();

        Config {
            server: ServerConfig::from_env(),
            environment,
            logging: LoggingConfig::from_env(environment),
            provider: ProviderConfig::from_env(),
            verification: VerificationServiceConfig::from_env(),
            allowed_origins: parse_origins(env_var("ALLOWED_ORIGINS").as_deref()),
        }
    }

    pub fn is_development(&self) -> bool {
        self.environment.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

impl Default for Config {
    fn default() -> Self {
        let environment = Environment::default();
        Config {
            server: ServerConfig::default(),
            environment,
            logging: LoggingConfig::for_environment(environment),
            provider: ProviderConfig::default(),
            verification: VerificationServiceConfig::default(),
            allowed_origins: Vec::new(),
        }
    }
}

/// Split a comma-separated origin list, dropping blanks
pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect()
    })
    .unwrap_or_default()
}
