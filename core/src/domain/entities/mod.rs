//! Domain entities representing core business objects.

pub mod credential;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use credential::RemoteCredential;
pub use session::{Session, SessionInfo, SessionLookup};
pub use token::{
    Claims, Role, TokenKind,
    ACCESS_TOKEN_EXPIRY_MINUTES, REFRESH_TOKEN_EXPIRY_DAYS,
    JWT_ISSUER, JWT_AUDIENCE
};
