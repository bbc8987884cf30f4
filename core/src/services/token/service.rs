//! Main token service implementation

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, Role, TokenKind};
use crate::errors::TokenError;

use super::config::TokenServiceConfig;
use super::key_manager::Rs256KeyManager;

/// Issues and verifies signed access and refresh tokens.
///
/// Verification is stateless; whether a refresh token is still backed by a
/// session is decided by the session manager, not here.
pub trait TokenIssuer: Send + Sync {
    fn issue_access_token(&self, user_id: Uuid, role: &Role) -> Result<String, TokenError>;

    fn issue_refresh_token(&self, user_id: Uuid, role: &Role) -> Result<String, TokenError>;

    /// Checks signature, expiry, not-before, issuer and audience.
    ///
    /// Every failure is reported as `InvalidOrExpiredToken`.
    fn verify(&self, token: &str) -> Result<Claims, TokenError>;

    /// `verify`, additionally requiring the token to be of `kind`
    fn verify_kind(&self, token: &str, kind: TokenKind) -> Result<Claims, TokenError> {
        let claims = self.verify(token)?;
        if claims.kind != kind {
            debug!(expected = %kind, actual = %claims.kind, "token rejected: wrong kind");
            return Err(TokenError::InvalidOrExpiredToken);
        }
        Ok(claims)
    }
}

/// JWT implementation of [`TokenIssuer`] supporting HS256 and RS256
pub struct JwtTokenService {
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    /// Creates a new token service.
    ///
    /// For RS256 the key pair named in the configuration is loaded here, so
    /// a missing or unreadable key fails at start-up rather than at the
    /// first login.
    pub fn new(config: TokenServiceConfig) -> Result<Self, TokenError> {
        config.validate()?;

        let (encoding_key, decoding_key) = match config.algorithm {
            Algorithm::RS256 => {
                let manager = config.load_key_manager()?.ok_or_else(|| TokenError::KeyLoadError {
                    message: "RS256 algorithm requires both key paths".to_string(),
                })?;
                (manager.encoding_key().clone(), manager.decoding_key().clone())
            }
            Algorithm::HS256 => (
                EncodingKey::from_secret(config.jwt_secret.as_bytes()),
                DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            ),
            other => {
                return Err(TokenError::UnsupportedAlgorithm {
                    algorithm: format!("{:?}", other),
                })
            }
        };

        info!(algorithm = ?config.algorithm, issuer = %config.issuer, "token service initialised");

        Ok(Self::from_keys(config, encoding_key, decoding_key))
    }

    /// Creates an RS256 token service from an already loaded key pair
    pub fn with_rs256_keys(
        mut config: TokenServiceConfig,
        key_manager: &Rs256KeyManager,
    ) -> Result<Self, TokenError> {
        config.validate()?;
        config.algorithm = Algorithm::RS256;
        let encoding_key = key_manager.encoding_key().clone();
        let decoding_key = key_manager.decoding_key().clone();
        Ok(Self::from_keys(config, encoding_key, decoding_key))
    }

    fn from_keys(config: TokenServiceConfig, encoding_key: EncodingKey, decoding_key: DecodingKey) -> Self {
        let mut validation = Validation::new(config.algorithm);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud", "sub"]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            config,
            encoding_key,
            decoding_key,
            validation,
        }
    }

    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    fn issue(&self, user_id: Uuid, role: &Role, kind: TokenKind) -> Result<String, TokenError> {
        let lifetime = match kind {
            TokenKind::Access => self.config.access_token_lifetime,
            TokenKind::Refresh => self.config.refresh_token_lifetime,
        };

        let claims = Claims::new(
            user_id,
            role.clone(),
            kind,
            lifetime,
            &self.config.issuer,
            &self.config.audience,
        );

        self.encode_jwt(&claims)
    }

    /// Encodes claims into a JWT
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, TokenError> {
        let header = Header::new(self.config.algorithm);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            error!("JWT encoding failed: {}", e);
            TokenError::IssuanceFailed
        })
    }
}

impl TokenIssuer for JwtTokenService {
    fn issue_access_token(&self, user_id: Uuid, role: &Role) -> Result<String, TokenError> {
        self.issue(user_id, role, TokenKind::Access)
    }

    fn issue_refresh_token(&self, user_id: Uuid, role: &Role) -> Result<String, TokenError> {
        self.issue(user_id, role, TokenKind::Refresh)
    }

    fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!(reason = ?e.kind(), "token rejected");
            TokenError::InvalidOrExpiredToken
        })?;

        let claims = token_data.claims;
        if claims.user_id().is_err() {
            debug!("token rejected: subject is not a user id");
            return Err(TokenError::InvalidOrExpiredToken);
        }

        Ok(claims)
    }
}
