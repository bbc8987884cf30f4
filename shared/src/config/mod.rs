//! Configuration module with business-specific sub-modules
//!
//! - `auth` - token signing and session lifecycle
//! - `cipher` - secret encryption key
//! - `database` - MySQL connection pool
//! - `environment` - environment detection and logging

pub mod auth;
pub mod cipher;
pub mod database;
pub mod environment;

use serde::{Deserialize, Serialize};

pub use auth::{AuthConfig, JwtConfig, RefreshPolicy, SessionConfig, DEFAULT_JWT_SECRET};
pub use cipher::{CipherConfig, SECRET_KEY_ENV};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};

/// Prefix for environment overrides, e.g. `SCRIBE__AUTH__JWT__SECRET`
const ENV_PREFIX: &str = "SCRIBE";

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub environment: Environment,

    pub database: DatabaseConfig,

    pub auth: AuthConfig,

    #[serde(default)]
    pub cipher: CipherConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        let env = Environment::default();
        Self {
            environment: env,
            database: DatabaseConfig::default(),
            auth: AuthConfig::default(),
            cipher: CipherConfig::default(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

impl AppConfig {
    /// Defaults tuned for one environment
    pub fn for_environment(env: Environment) -> Self {
        Self {
            environment: env,
            logging: LoggingConfig::for_environment(env),
            ..Default::default()
        }
    }

    /// Layered load: environment defaults, then the optional
    /// `config.<env>.toml` in the working directory, then `SCRIBE__*`
    /// environment variables. The cipher key falls back to
    /// `SCRIBE_SECRET_KEY` when no layer set it.
    pub fn load() -> Result<Self, config::ConfigError> {
        let env = Environment::from_env();
        let defaults = config::Config::try_from(&Self::for_environment(env))?;

        let mut loaded: Self = config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name(env.config_file()).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        if loaded.cipher.key.is_empty() {
            loaded.cipher = CipherConfig::from_env();
        }

        Ok(loaded)
    }

    /// Plain environment variables only, no files
    pub fn from_env() -> Self {
        let env = Environment::from_env();
        Self {
            environment: env,
            database: DatabaseConfig::from_env(),
            auth: AuthConfig::from_env(),
            cipher: CipherConfig::from_env(),
            logging: LoggingConfig::for_environment(env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_environment_sets_logging() {
        let config = AppConfig::for_environment(Environment::Production);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.cipher.key.is_empty());
    }

    #[test]
    fn test_defaults_round_trip_through_config_source() {
        let source = config::Config::try_from(&AppConfig::default()).unwrap();
        let loaded: AppConfig = source.try_deserialize().unwrap();
        assert_eq!(loaded.auth.jwt.access_token_expiry, 900);
        assert_eq!(loaded.auth.session.refresh_policy, RefreshPolicy::Reuse);
        assert_eq!(loaded.database.max_connections, 10);
    }
}
