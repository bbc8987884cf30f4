//! Validation of the configured secret-encryption key

use aes_gcm::{aead::KeyInit, Aes256Gcm};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::errors::KeyError;

/// AES-256 key length in bytes
pub const KEY_SIZE: usize = 32;

/// A validated 256-bit cipher key.
///
/// Only obtainable through validation, so a `SecretCipher` can never be
/// built from key material of the wrong length.
#[derive(Clone, PartialEq, Eq)]
pub struct CipherKey {
    bytes: [u8; KEY_SIZE],
}

impl CipherKey {
    /// Decodes and validates a base64 key.
    ///
    /// # Errors
    ///
    /// * `MissingKey` - empty or blank input
    /// * `MalformedEncoding` - not standard base64
    /// * `WrongKeySize` - decoded length is not 32 bytes
    /// * `UnusableKey` - the cipher rejects the bytes
    pub fn from_base64(candidate: &str) -> Result<Self, KeyError> {
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return Err(KeyError::MissingKey);
        }

        let decoded = BASE64
            .decode(candidate)
            .map_err(|_| KeyError::MalformedEncoding)?;

        Self::from_bytes(&decoded)
    }

    /// Validates raw key bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, KeyError> {
        if bytes.len() != KEY_SIZE {
            return Err(KeyError::WrongKeySize {
                expected: KEY_SIZE,
                actual: bytes.len(),
            });
        }

        Aes256Gcm::new_from_slice(bytes).map_err(|_| KeyError::UnusableKey)?;

        let mut key = [0u8; KEY_SIZE];
        key.copy_from_slice(bytes);
        Ok(Self { bytes: key })
    }

    /// Fresh random key from the OS RNG, for provisioning and tests
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_SIZE];
        OsRng.fill_bytes(&mut key);
        Self { bytes: key }
    }

    /// Textual form accepted by `from_base64`
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.bytes)
    }

    pub(crate) fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("CipherKey(<redacted>)")
    }
}

/// Pure validation of a configured key; nothing is retained
pub fn validate_key(candidate: &str) -> Result<(), KeyError> {
    CipherKey::from_base64(candidate).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_32_zero_bytes() {
        let encoded = BASE64.encode([0u8; KEY_SIZE]);
        let key = CipherKey::from_base64(&encoded).unwrap();
        assert_eq!(key.as_bytes(), &[0u8; KEY_SIZE]);
        assert!(validate_key(&encoded).is_ok());
    }

    #[test]
    fn test_rejects_empty_and_blank() {
        assert_eq!(validate_key(""), Err(KeyError::MissingKey));
        assert_eq!(validate_key("   \n"), Err(KeyError::MissingKey));
    }

    #[test]
    fn test_rejects_garbage() {
        assert_eq!(validate_key("not base64 at all!"), Err(KeyError::MalformedEncoding));
        assert_eq!(validate_key("%%%%"), Err(KeyError::MalformedEncoding));
    }

    #[test]
    fn test_rejects_every_wrong_length() {
        for len in [1usize, 16, 24, 31, 33, 64] {
            let encoded = BASE64.encode(vec![7u8; len]);
            assert_eq!(
                validate_key(&encoded),
                Err(KeyError::WrongKeySize {
                    expected: KEY_SIZE,
                    actual: len
                }),
                "length {} should be rejected",
                len
            );
        }
    }

    #[test]
    fn test_from_bytes_checks_length() {
        assert!(CipherKey::from_bytes(&[1u8; KEY_SIZE]).is_ok());
        assert_eq!(
            CipherKey::from_bytes(&[]),
            Err(KeyError::WrongKeySize {
                expected: KEY_SIZE,
                actual: 0
            })
        );
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let encoded = format!("{}\n", BASE64.encode([9u8; KEY_SIZE]));
        assert!(validate_key(&encoded).is_ok());
    }

    #[test]
    fn test_generate_round_trips_through_base64() {
        let key = CipherKey::generate();
        let restored = CipherKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, restored);
        assert_ne!(key, CipherKey::generate());
    }

    #[test]
    fn test_debug_is_redacted() {
        let key = CipherKey::from_bytes(&[0xAB; KEY_SIZE]).unwrap();
        let rendered = format!("{:?}", key);
        assert_eq!(rendered, "CipherKey(<redacted>)");
    }
}
