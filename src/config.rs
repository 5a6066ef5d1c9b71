/*!
 * Application Configuration
 * Settings read once from the process environment at startup
 */
use std::net::SocketAddr;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid bind address {0}")]
    InvalidBindAddress(String),
}

/// Runtime configuration shared with handlers through `AppState`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            environment: "development".to_string(),
            database_url: None,
            database_name: None,
        }
    }
}

impl AppConfig {
    /// Build the configuration from environment variables, falling back to
    /// development defaults. Empty values count as unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: env_non_empty("HOST").unwrap_or(defaults.host),
            port: env_non_empty("PORT")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            environment: env_non_empty("ENVIRONMENT").unwrap_or(defaults.environment),
            database_url: env_non_empty("DATABASE_URL"),
            database_name: env_non_empty("DATABASE_NAME"),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let raw = format!("{}:{}", self.host, self.port);
        raw.parse().map_err(|_| ConfigError::InvalidBindAddress(raw))
    }
}

pub(crate) fn env_non_empty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
