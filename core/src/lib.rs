//! # Scribe Core
//!
//! Authentication and secret-protection core for the Scribe backend.
//! This crate contains domain entities, the token, session and encryption
//! services, the session store interface, and the error types shared by
//! every layer above it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    Claims, RemoteCredential, Role, Session, SessionInfo, SessionLookup, TokenKind,
};
pub use domain::value_objects::RefreshedSession;
pub use errors::{
    CipherError, DomainError, DomainResult, KeyError, SessionError, StorageError, TokenError,
};
pub use repositories::{MockSessionStore, SessionStore, StoreCalls};
pub use services::{
    validate_key, CipherKey, CleanupResult, JwtTokenService, Rs256KeyManager, SecretCipher,
    SessionCleanupConfig, SessionCleanupService, SessionManager, TokenIssuer, TokenServiceConfig,
};
