//! Error kinds for each concern of the authentication core
//!
//! Messages are deliberately terse. Anything that could help an attacker
//! guess keys or tokens is logged where the error is produced, never carried
//! in the error value.

use thiserror::Error;

/// Cipher key material rejected at start-up
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    #[error("Secret key is not configured")]
    MissingKey,

    #[error("Secret key is not valid base64")]
    MalformedEncoding,

    #[error("Secret key must decode to {expected} bytes, got {actual}")]
    WrongKeySize { expected: usize, actual: usize },

    #[error("Secret key cannot initialise the cipher")]
    UnusableKey,
}

/// Secret encryption and decryption failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CipherError {
    #[error("Encrypted secret is not a valid envelope")]
    InvalidEncoding,

    #[error("Encrypted secret is truncated")]
    Truncated,

    /// Covers both corruption and tampering
    #[error("Encrypted secret failed authentication")]
    AuthenticationFailed,

    #[error("Secret encryption failed")]
    EncryptionFailed,
}

/// Token issuance and verification failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Bad signature, expired, not yet valid, wrong issuer or audience,
    /// malformed or of the wrong kind
    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Token issuance failed")]
    IssuanceFailed,

    #[error("Signing key could not be loaded: {message}")]
    KeyLoadError { message: String },

    #[error("Unsupported signing algorithm: {algorithm}")]
    UnsupportedAlgorithm { algorithm: String },

    /// Lifetime not positive or beyond the supported maximum
    #[error("Invalid {name} lifetime: {seconds} seconds")]
    InvalidLifetime { name: &'static str, seconds: i64 },
}

/// Session store failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Backend unreachable or timed out; the caller may retry
    #[error("Session storage unavailable: {message}")]
    Unavailable { message: String },

    /// Unique constraint violated
    #[error("Session storage conflict: {message}")]
    Conflict { message: String },

    /// Stored row cannot be mapped back to a session
    #[error("Session storage returned corrupt data: {message}")]
    Corrupt { message: String },
}

impl StorageError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable { .. })
    }
}

/// Session lifecycle failures surfaced by the session manager
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Token issuance failed")]
    TokenIssuanceFailed,

    #[error("Session could not be persisted: {0}")]
    PersistenceFailed(StorageError),

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid access token")]
    InvalidAccessToken,

    /// Unknown, expired and revoked sessions all end up here
    #[error("Session not found or expired")]
    SessionNotFoundOrExpired,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl SessionError {
    /// True for the outcomes that mean "log in again"
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            SessionError::InvalidRefreshToken
                | SessionError::InvalidAccessToken
                | SessionError::SessionNotFoundOrExpired
        )
    }
}
