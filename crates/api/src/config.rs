//! Application Configuration
//!
//! Layered: built-in defaults, then an optional
//! `config/generator-diagnostics.{toml,yaml,json}` file, then `GENDIAG_*`
//! environment variables (`__` separates nested keys, e.g.
//! `GENDIAG_REMOTE__ENDPOINT`).

use crate::rate_limit::RateLimitConfig;
use config::{Config, Environment, File, FileFormat};
use health_scoring::ScoringConfig;
use remote_reasoning::RemoteConfig;
use rule_evaluator::{CostModel, EvaluatorConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default configuration file, without extension
pub const DEFAULT_CONFIG_FILE: &str = "config/generator-diagnostics";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "GENDIAG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub remote: RemoteConfig,
    pub scoring: ScoringConfig,
    pub cost: CostModel,
    pub rate_limit: RateLimitConfig,
    /// Replace the embedded fault knowledge with this JSON file
    pub knowledge_path: Option<String>,
}

impl AppConfig {
    /// Load from `path` (any supported extension, optional) and the environment
    pub fn load(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(env_source())
            .build()?;
        Self::finish(settings)
    }

    /// Parse a TOML document, ignoring the environment
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?;
        Self::finish(settings)
    }

    fn finish(settings: Config) -> Result<Self, ConfigError> {
        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.scoring
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.remote.deadline_ms == 0 {
            return Err(ConfigError::Invalid("remote.deadline_ms must be positive".to_string()));
        }
        if self.rate_limit.enabled && (self.rate_limit.per_second == 0 || self.rate_limit.burst_size == 0) {
            return Err(ConfigError::Invalid(
                "rate_limit.per_second and rate_limit.burst_size must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn evaluator(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            scoring: self.scoring.clone(),
            cost: self.cost,
        }
    }
}

fn env_source() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(config.logging.level, "info");
        assert!(!config.remote.enabled);
        assert!(!config.rate_limit.enabled);
        assert!(config.knowledge_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = AppConfig::from_toml(
            r#"
            knowledge_path = "/etc/gendiag/knowledge.json"

            [server]
            port = 9090

            [remote]
            enabled = true
            endpoint = "https://reasoning.example.com/v1/diagnose"
            deadline_ms = 8000

            [scoring.penalties]
            warning = 5
            critical = 15
            emergency = 30

            [rate_limit]
            enabled = true
            per_second = 4
            burst_size = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.remote.enabled);
        assert_eq!(config.remote.deadline_ms, 8000);
        assert_eq!(config.scoring.penalties.critical, 15);
        assert_eq!(config.rate_limit.burst_size, 2);
        assert_eq!(config.knowledge_path.as_deref(), Some("/etc/gendiag/knowledge.json"));
    }

    #[test]
    fn test_invalid_penalties_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [scoring.penalties]
            warning = 40
            critical = 20
            emergency = 35
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_zero_deadline_rejected() {
        let err = AppConfig::from_toml("[remote]\ndeadline_ms = 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = AppConfig::load("does/not/exist/generator-diagnostics").unwrap();
        assert_eq!(config.server.port, AppConfig::default().server.port);
    }
}
