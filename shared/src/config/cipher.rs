//! Secret encryption key configuration

use serde::{Deserialize, Serialize};

/// Environment variable holding the base64-encoded 256-bit key
pub const SECRET_KEY_ENV: &str = "SCRIBE_SECRET_KEY";

/// Configuration for the secret cipher.
///
/// The key is kept as its textual encoding here; decoding and length
/// validation happen once at start-up in the core crate.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct CipherConfig {
    /// Base64 (standard alphabet) encoding of exactly 32 bytes
    #[serde(default)]
    pub key: String,
}

impl CipherConfig {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// An unset variable yields an empty key, which validation rejects
    pub fn from_env() -> Self {
        Self {
            key: std::env::var(SECRET_KEY_ENV).unwrap_or_default(),
        }
    }
}

impl std::fmt::Debug for CipherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let shown = if self.key.is_empty() { "<unset>" } else { "<redacted>" };
        f.debug_struct("CipherConfig").field("key", &shown).finish()
    }
}
