//! RS256 key management for JWT signing and verification

use std::fs;
use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::errors::TokenError;

/// Manager for RS256 keys used in JWT operations
#[derive(Clone)]
pub struct Rs256KeyManager {
    /// Private key for signing JWTs
    encoding_key: EncodingKey,
    /// Public key for verifying JWTs
    decoding_key: DecodingKey,
    private_key_path: PathBuf,
    public_key_path: PathBuf,
}

impl std::fmt::Debug for Rs256KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rs256KeyManager")
            .field("private_key_path", &self.private_key_path)
            .field("public_key_path", &self.public_key_path)
            .finish()
    }
}

impl Rs256KeyManager {
    /// Loads a PEM key pair from disk.
    ///
    /// # Errors
    ///
    /// `TokenError::KeyLoadError` if either file is unreadable or not an RSA
    /// key in PEM form.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use scribe_core::services::token::Rs256KeyManager;
    ///
    /// let key_manager = Rs256KeyManager::new(
    ///     "keys/jwt_private_key.pem",
    ///     "keys/jwt_public_key.pem",
    /// )?;
    /// # Ok::<(), scribe_core::errors::TokenError>(())
    /// ```
    pub fn new<P: AsRef<Path>>(private_key_path: P, public_key_path: P) -> Result<Self, TokenError> {
        let private_key_path = private_key_path.as_ref().to_path_buf();
        let public_key_path = public_key_path.as_ref().to_path_buf();

        let private_key_pem = fs::read(&private_key_path).map_err(|e| TokenError::KeyLoadError {
            message: format!("Failed to read private key {}: {}", private_key_path.display(), e),
        })?;

        let public_key_pem = fs::read(&public_key_path).map_err(|e| TokenError::KeyLoadError {
            message: format!("Failed to read public key {}: {}", public_key_path.display(), e),
        })?;

        let (encoding_key, decoding_key) = Self::parse_pem(&private_key_pem, &public_key_pem)?;

        Ok(Self {
            encoding_key,
            decoding_key,
            private_key_path,
            public_key_path,
        })
    }

    /// Creates a key manager from PEM strings (embedded keys and tests)
    pub fn from_pem_strings(private_key_pem: &str, public_key_pem: &str) -> Result<Self, TokenError> {
        let (encoding_key, decoding_key) =
            Self::parse_pem(private_key_pem.as_bytes(), public_key_pem.as_bytes())?;

        Ok(Self {
            encoding_key,
            decoding_key,
            private_key_path: PathBuf::from("memory"),
            public_key_path: PathBuf::from("memory"),
        })
    }

    fn parse_pem(private_key_pem: &[u8], public_key_pem: &[u8]) -> Result<(EncodingKey, DecodingKey), TokenError> {
        let encoding_key = EncodingKey::from_rsa_pem(private_key_pem).map_err(|e| TokenError::KeyLoadError {
            message: format!("Invalid private key format: {}", e),
        })?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key_pem).map_err(|e| TokenError::KeyLoadError {
            message: format!("Invalid public key format: {}", e),
        })?;

        Ok((encoding_key, decoding_key))
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding_key
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding_key
    }

    pub fn key_paths(&self) -> (&Path, &Path) {
        (&self.private_key_path, &self.public_key_path)
    }
}
