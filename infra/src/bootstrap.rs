//! Process start-up: configuration, key validation and service wiring
//!
//! Key material is validated before any connection is opened. A process
//! with an invalid secret key must not start.

use std::sync::Arc;

use scribe_core::errors::DomainError;
use scribe_core::services::{
    JwtTokenService, SecretCipher, SessionCleanupConfig, SessionCleanupService, SessionManager,
    TokenServiceConfig,
};
use scribe_shared::config::AppConfig;
use tracing::{error, info, warn};

use crate::database::{DatabasePool, MySqlSessionStore};
use crate::InfrastructureError;

pub type MySqlSessionManager = SessionManager<MySqlSessionStore, JwtTokenService>;

/// Fully wired services for one process
pub struct ScribeServices {
    pub config: AppConfig,
    pub pool: DatabasePool,
    pub cipher: Arc<SecretCipher>,
    pub tokens: Arc<JwtTokenService>,
    pub sessions: Arc<MySqlSessionManager>,
    pub cleanup: Arc<SessionCleanupService<MySqlSessionStore, JwtTokenService>>,
}

/// Loads `.env` if present, then the layered configuration
pub fn load_config() -> Result<AppConfig, InfrastructureError> {
    dotenvy::dotenv().ok();
    AppConfig::load().map_err(|e| InfrastructureError::Config(e.to_string()))
}

/// Builds the cipher and token service, rejecting unusable key material
pub fn validate_secrets(config: &AppConfig) -> Result<(SecretCipher, JwtTokenService), InfrastructureError> {
    let cipher = SecretCipher::from_base64_key(&config.cipher.key).map_err(|e| {
        error!("Secret key rejected: {}", e);
        DomainError::from(e)
    })?;

    let token_config = TokenServiceConfig::from_jwt_config(&config.auth.jwt).map_err(DomainError::from)?;

    if token_config.is_using_default_secret() {
        if config.environment.is_production() {
            return Err(InfrastructureError::Config(
                "JWT secret must be set in production".to_string(),
            ));
        }
        warn!("Using the built-in development JWT secret");
    }

    let tokens = JwtTokenService::new(token_config).map_err(DomainError::from)?;

    Ok((cipher, tokens))
}

/// Validates secrets, connects to MySQL and wires the session services
pub async fn initialize(config: AppConfig) -> Result<ScribeServices, InfrastructureError> {
    info!(environment = ?config.environment, "Initializing Scribe services");

    let (cipher, tokens) = validate_secrets(&config)?;
    let tokens = Arc::new(tokens);

    let pool = DatabasePool::new(config.database.clone()).await?;
    let store = Arc::new(MySqlSessionStore::new(pool.get_pool().clone()));

    let sessions = Arc::new(SessionManager::with_policy(
        store,
        tokens.clone(),
        config.auth.session.refresh_policy,
    ));
    let cleanup = Arc::new(SessionCleanupService::new(
        sessions.clone(),
        SessionCleanupConfig::from(&config.auth.session),
    ));

    info!(
        refresh_policy = ?config.auth.session.refresh_policy,
        "Scribe services initialized"
    );

    Ok(ScribeServices {
        config,
        pool,
        cipher: Arc::new(cipher),
        tokens,
        sessions,
        cleanup,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::errors::{KeyError, TokenError};
    use scribe_shared::config::{CipherConfig, Environment, JwtConfig};

    const ZERO_KEY: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

    fn config_with_key(key: &str) -> AppConfig {
        AppConfig {
            cipher: CipherConfig::new(key),
            ..AppConfig::for_environment(Environment::Development)
        }
    }

    #[test]
    fn test_missing_key_is_fatal() {
        let result = validate_secrets(&config_with_key(""));
        assert!(matches!(
            result,
            Err(InfrastructureError::Domain(DomainError::Key(KeyError::MissingKey)))
        ));
    }

    #[test]
    fn test_short_key_is_fatal() {
        let result = validate_secrets(&config_with_key("c2hvcnQ="));
        assert!(matches!(
            result,
            Err(InfrastructureError::Domain(DomainError::Key(KeyError::WrongKeySize {
                expected: 32,
                actual: 5
            })))
        ));
    }

    #[test]
    fn test_valid_key_builds_services() {
        let (cipher, _tokens) = validate_secrets(&config_with_key(ZERO_KEY)).unwrap();
        let sealed = cipher.encrypt("hunter2").unwrap();
        assert_eq!(cipher.decrypt(&sealed).unwrap(), "hunter2");
    }

    #[test]
    fn test_default_jwt_secret_rejected_in_production() {
        let config = AppConfig {
            cipher: CipherConfig::new(ZERO_KEY),
            ..AppConfig::for_environment(Environment::Production)
        };
        assert!(config.auth.jwt.is_using_default_secret());
        assert!(matches!(validate_secrets(&config), Err(InfrastructureError::Config(_))));

        let mut config = config;
        config.auth.jwt = JwtConfig::new("a-production-secret-of-reasonable-length");
        assert!(validate_secrets(&config).is_ok());
    }

    #[test]
    fn test_default_jwt_secret_rejected_for_any_algorithm_case() {
        for algorithm in ["hs256", "Hs256", "HS256"] {
            let mut config = AppConfig {
                cipher: CipherConfig::new(ZERO_KEY),
                ..AppConfig::for_environment(Environment::Production)
            };
            config.auth.jwt.algorithm = algorithm.to_string();

            assert!(
                matches!(validate_secrets(&config), Err(InfrastructureError::Config(_))),
                "{} accepted with the development secret",
                algorithm
            );
        }
    }

    #[test]
    fn test_empty_jwt_secret_rejected_in_production() {
        let mut config = AppConfig {
            cipher: CipherConfig::new(ZERO_KEY),
            ..AppConfig::for_environment(Environment::Production)
        };
        config.auth.jwt = JwtConfig::new("");
        assert!(matches!(validate_secrets(&config), Err(InfrastructureError::Config(_))));
    }

    #[test]
    fn test_invalid_token_lifetime_is_fatal() {
        let mut config = config_with_key(ZERO_KEY);
        config.auth.jwt.refresh_token_expiry = -5;
        assert!(matches!(
            validate_secrets(&config),
            Err(InfrastructureError::Domain(DomainError::Token(TokenError::InvalidLifetime {
                seconds: -5,
                ..
            })))
        ));

        let mut config = config_with_key(ZERO_KEY);
        config.auth.jwt.access_token_expiry = i64::MAX;
        assert!(matches!(
            validate_secrets(&config),
            Err(InfrastructureError::Domain(DomainError::Token(TokenError::InvalidLifetime { .. })))
        ));
    }

    #[test]
    fn test_unsupported_algorithm_is_rejected() {
        let mut config = config_with_key(ZERO_KEY);
        config.auth.jwt.algorithm = "ES512".to_string();
        assert!(matches!(
            validate_secrets(&config),
            Err(InfrastructureError::Domain(DomainError::Token(_)))
        ));
    }
}
