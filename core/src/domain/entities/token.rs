//! Token claims carried inside signed access and refresh tokens.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default access token lifetime (15 minutes)
pub const ACCESS_TOKEN_EXPIRY_MINUTES: i64 = 15;

/// Default refresh token lifetime (7 days)
pub const REFRESH_TOKEN_EXPIRY_DAYS: i64 = 7;

/// Default JWT issuer
pub const JWT_ISSUER: &str = "scribe";

/// Default JWT audience
pub const JWT_AUDIENCE: &str = "scribe-api";

/// Distinguishes the two token kinds sharing one signing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived, verified statelessly on every request
    Access,
    /// Long-lived, only honoured while its session row exists
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Role of an authenticated user, as established by the login boundary.
///
/// The core never interprets the value; it only carries it from the
/// identity into the tokens and back out on refresh.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(role: impl Into<String>) -> Self {
        Self(role.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        Self::new(role)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    pub role: Role,

    pub kind: TokenKind,

    /// Issued at, seconds since the epoch
    pub iat: i64,

    /// Expiration, seconds since the epoch
    pub exp: i64,

    /// Not before, seconds since the epoch
    pub nbf: i64,

    pub iss: String,

    pub aud: String,

    /// Unique token id; keeps two tokens minted in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims valid from now for `lifetime`
    pub fn new(
        user_id: Uuid,
        role: Role,
        kind: TokenKind,
        lifetime: Duration,
        issuer: &str,
        audience: &str,
    ) -> Self {
        let now = Utc::now();
        let expiry = now + lifetime;

        Self {
            sub: user_id.to_string(),
            role,
            kind,
            iat: now.timestamp(),
            exp: expiry.timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Access token claims with the default lifetime, issuer and audience
    pub fn new_access_token(user_id: Uuid, role: Role) -> Self {
        Self::new(
            user_id,
            role,
            TokenKind::Access,
            Duration::minutes(ACCESS_TOKEN_EXPIRY_MINUTES),
            JWT_ISSUER,
            JWT_AUDIENCE,
        )
    }

    /// Refresh token claims with the default lifetime, issuer and audience
    pub fn new_refresh_token(user_id: Uuid, role: Role) -> Self {
        Self::new(
            user_id,
            role,
            TokenKind::Refresh,
            Duration::days(REFRESH_TOKEN_EXPIRY_DAYS),
            JWT_ISSUER,
            JWT_AUDIENCE,
        )
    }

    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Not expired and past `nbf`
    pub fn is_valid(&self) -> bool {
        let now = Utc::now().timestamp();
        now >= self.nbf && now < self.exp
    }

    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// `exp` as a timestamp; `None` if out of chrono's range
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.exp, 0).single()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.iat, 0).single()
    }
}
