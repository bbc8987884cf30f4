//! Business services containing domain logic and use cases.

pub mod encryption;
pub mod session;
pub mod token;

// Re-export commonly used types
pub use encryption::{validate_key, CipherKey, SecretCipher};
pub use session::{CleanupResult, SessionCleanupConfig, SessionCleanupService, SessionManager};
pub use token::{JwtTokenService, Rs256KeyManager, TokenIssuer, TokenServiceConfig};
