use std::path::PathBuf;

use crate::config::{env_non_empty, AppConfig};

/// Output format for every log layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Logging settings derived from the environment
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub environment: String,
    pub level: String,
    pub directory: PathBuf,
    pub format: LogFormat,
}

impl LoggingConfig {
    /// `LOG_LEVEL` defaults to `info` in production and `debug` elsewhere;
    /// `LOG_DIR` defaults to `logs`.
    pub fn from_app(app: &AppConfig) -> Self {
        let production = app.is_production();
        Self {
            environment: app.environment.clone(),
            level: env_non_empty("LOG_LEVEL")
                .unwrap_or_else(|| (if production { "info" } else { "debug" }).to_string()),
            directory: env_non_empty("LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("logs")),
            format: if production {
                LogFormat::Json
            } else {
                LogFormat::Pretty
            },
        }
    }

    /// Default filter directive when `RUST_LOG` is not set.
    pub fn filter_directive(&self) -> String {
        format!(
            "portfolio_api={},tower_http=debug,axum=debug,sqlx=warn",
            self.level
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_uses_json() {
        let app = AppConfig {
            environment: "production".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(LoggingConfig::from_app(&app).format, LogFormat::Json);
    }

    #[test]
    fn test_development_uses_pretty() {
        let config = LoggingConfig::from_app(&AppConfig::default());
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.environment, "development");
    }

    #[test]
    fn test_filter_directive_targets_crate() {
        let config = LoggingConfig {
            environment: "development".to_string(),
            level: "trace".to_string(),
            directory: PathBuf::from("logs"),
            format: LogFormat::Pretty,
        };
        assert!(config.filter_directive().starts_with("portfolio_api=trace"));
    }
}
