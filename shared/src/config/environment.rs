//! Deployment environment and logging configuration

use serde::{Deserialize, Serialize};
use std::env;

/// Deployment environment the process runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }

    /// Reads `SCRIBE_ENV`, then `ENVIRONMENT`, defaulting to development
    pub fn from_env() -> Self {
        env::var("SCRIBE_ENV")
            .or_else(|_| env::var("ENVIRONMENT"))
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    /// Base name of the optional configuration file for this environment
    pub fn config_file(&self) -> &'static str {
        match self {
            Environment::Development => "config.development",
            Environment::Staging => "config.staging",
            Environment::Production => "config.production",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "staging" | "stage" | "test" => Ok(Environment::Staging),
            "production" | "prod" => Ok(Environment::Production),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

/// Logging configuration consumed by the tracing subscriber
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset (e.g. `info`)
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: LogFormat,

    /// Include file and line of the call site
    #[serde(default)]
    pub source_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: default_log_format(),
            source_location: false,
        }
    }
}

impl LoggingConfig {
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                level: String::from("debug"),
                format: LogFormat::Pretty,
                source_location: true,
            },
            Environment::Staging => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                source_location: false,
            },
            Environment::Production => Self {
                level: String::from("info"),
                format: LogFormat::Json,
                source_location: false,
            },
        }
    }
}

fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}
