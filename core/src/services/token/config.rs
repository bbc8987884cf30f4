//! Configuration for the token service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use scribe_shared::config::{JwtConfig, DEFAULT_JWT_SECRET};

use crate::domain::entities::token::{
    ACCESS_TOKEN_EXPIRY_MINUTES, JWT_AUDIENCE, JWT_ISSUER, REFRESH_TOKEN_EXPIRY_DAYS,
};
use crate::errors::TokenError;

use super::key_manager::Rs256KeyManager;

/// Longest accepted token lifetime (10 years)
pub const MAX_TOKEN_LIFETIME_SECONDS: i64 = 10 * 365 * 86400;

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HS256 signing secret, unused for RS256
    pub jwt_secret: String,
    /// JWT signing algorithm, HS256 or RS256
    pub algorithm: Algorithm,
    pub access_token_lifetime: Duration,
    pub refresh_token_lifetime: Duration,
    pub issuer: String,
    pub audience: String,
    /// Path to the RS256 private key
    pub private_key_path: Option<String>,
    /// Path to the RS256 public key
    pub public_key_path: Option<String>,
}

impl Default for TokenServiceConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            algorithm: Algorithm::HS256,
            access_token_lifetime: Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            refresh_token_lifetime: Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            issuer: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
            private_key_path: None,
            public_key_path: None,
        }
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("jwt_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_lifetime", &self.access_token_lifetime)
            .field("refresh_token_lifetime", &self.refresh_token_lifetime)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl TokenServiceConfig {
    /// Builds the service configuration from the shared JWT settings.
    ///
    /// Only HS256 and RS256 are accepted. Lifetimes must be positive and at
    /// most [`MAX_TOKEN_LIFETIME_SECONDS`].
    pub fn from_jwt_config(jwt: &JwtConfig) -> Result<Self, TokenError> {
        let algorithm = match jwt.algorithm.to_ascii_uppercase().as_str() {
            "HS256" => Algorithm::HS256,
            "RS256" => Algorithm::RS256,
            other => {
                return Err(TokenError::UnsupportedAlgorithm {
                    algorithm: other.to_string(),
                })
            }
        };

        Ok(Self {
            jwt_secret: jwt.secret.clone(),
            algorithm,
            access_token_lifetime: lifetime("access token", jwt.access_token_expiry)?,
            refresh_token_lifetime: lifetime("refresh token", jwt.refresh_token_expiry)?,
            issuer: jwt.issuer.clone(),
            audience: jwt.audience.clone(),
            private_key_path: jwt.private_key_path.clone(),
            public_key_path: jwt.public_key_path.clone(),
        })
    }

    /// Checks both lifetimes against the accepted range
    pub fn validate(&self) -> Result<(), TokenError> {
        check_lifetime("access token", self.access_token_lifetime)?;
        check_lifetime("refresh token", self.refresh_token_lifetime)?;
        Ok(())
    }

    /// HS256 signing with the built-in development secret or an empty one
    pub fn is_using_default_secret(&self) -> bool {
        self.algorithm == Algorithm::HS256
            && (self.jwt_secret == DEFAULT_JWT_SECRET || self.jwt_secret.trim().is_empty())
    }

    /// Loads the RS256 key pair when both paths are configured
    pub fn load_key_manager(&self) -> Result<Option<Rs256KeyManager>, TokenError> {
        match (&self.private_key_path, &self.public_key_path) {
            (Some(private_key), Some(public_key)) => {
                Rs256KeyManager::new(private_key, public_key).map(Some)
            }
            _ => Ok(None),
        }
    }
}

fn lifetime(name: &'static str, seconds: i64) -> Result<Duration, TokenError> {
    if seconds <= 0 || seconds > MAX_TOKEN_LIFETIME_SECONDS {
        return Err(TokenError::InvalidLifetime { name, seconds });
    }
    Duration::try_seconds(seconds).ok_or(TokenError::InvalidLifetime { name, seconds })
}

fn check_lifetime(name: &'static str, lifetime: Duration) -> Result<(), TokenError> {
    let seconds = lifetime.num_seconds();
    if lifetime <= Duration::zero() || seconds > MAX_TOKEN_LIFETIME_SECONDS {
        return Err(TokenError::InvalidLifetime { name, seconds });
    }
    Ok(())
}
