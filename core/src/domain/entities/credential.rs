//! Remote-repository credential stored alongside a workspace

use serde::{Deserialize, Serialize};

use crate::errors::CipherError;
use crate::services::encryption::SecretCipher;

/// Credential used to push a workspace to its remote repository.
///
/// Only the sealed envelope is ever persisted; an empty `secret` means no
/// secret has been set.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteCredential {
    pub remote_url: String,

    pub username: String,

    /// Base64 AES-GCM envelope, or empty
    pub secret: String,
}

impl RemoteCredential {
    /// Encrypts `secret` and builds the credential
    pub fn seal(
        cipher: &SecretCipher,
        remote_url: impl Into<String>,
        username: impl Into<String>,
        secret: &str,
    ) -> Result<Self, CipherError> {
        Ok(Self {
            remote_url: remote_url.into(),
            username: username.into(),
            secret: cipher.encrypt(secret)?,
        })
    }

    pub fn has_secret(&self) -> bool {
        !self.secret.is_empty()
    }

    /// Decrypts the stored secret.
    ///
    /// `Ok(None)` when no secret is set. A secret that cannot be decrypted is
    /// an error; callers must not fall back to an empty value.
    pub fn open(&self, cipher: &SecretCipher) -> Result<Option<String>, CipherError> {
        if !self.has_secret() {
            return Ok(None);
        }
        cipher.decrypt(&self.secret).map(Some)
    }

    /// Re-encrypts with a new secret, keeping url and username
    pub fn with_secret(self, cipher: &SecretCipher, secret: &str) -> Result<Self, CipherError> {
        Ok(Self {
            secret: cipher.encrypt(secret)?,
            ..self
        })
    }
}

impl std::fmt::Debug for RemoteCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCredential")
            .field("remote_url", &self.remote_url)
            .field("username", &self.username)
            .field("secret", &if self.has_secret() { "<sealed>" } else { "<unset>" })
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::encryption::CipherKey;

    fn cipher() -> SecretCipher {
        SecretCipher::new(&CipherKey::generate())
    }

    #[test]
    fn test_seal_and_open() {
        let cipher = cipher();
        let credential = RemoteCredential::seal(
            &cipher,
            "https://git.example.com/team/notes.git",
            "deploy-bot",
            "glpat-abc123",
        )
        .unwrap();

        assert!(credential.has_secret());
        assert_ne!(credential.secret, "glpat-abc123");
        assert_eq!(credential.open(&cipher).unwrap(), Some("glpat-abc123".to_string()));
    }

    #[test]
    fn test_unset_secret_opens_to_none() {
        let cipher = cipher();
        let credential = RemoteCredential::seal(&cipher, "https://git.example.com/a.git", "me", "").unwrap();

        assert!(!credential.has_secret());
        assert_eq!(credential.open(&cipher).unwrap(), None);
    }

    #[test]
    fn test_unreadable_secret_is_an_error() {
        let credential = RemoteCredential::seal(&cipher(), "https://git.example.com/a.git", "me", "token").unwrap();

        assert_eq!(credential.open(&cipher()), Err(CipherError::AuthenticationFailed));
    }

    #[test]
    fn test_with_secret_replaces_only_the_secret() {
        let cipher = cipher();
        let credential = RemoteCredential::seal(&cipher, "https://git.example.com/a.git", "me", "old").unwrap();
        let updated = credential.clone().with_secret(&cipher, "new").unwrap();

        assert_eq!(updated.remote_url, credential.remote_url);
        assert_eq!(updated.username, credential.username);
        assert_eq!(updated.open(&cipher).unwrap(), Some("new".to_string()));
    }

    #[test]
    fn test_serialized_form_holds_only_the_envelope() {
        let cipher = cipher();
        let credential = RemoteCredential::seal(&cipher, "https://git.example.com/a.git", "me", "plain-secret").unwrap();

        let json = serde_json::to_string(&credential).unwrap();
        assert!(!json.contains("plain-secret"));

        let restored: RemoteCredential = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.open(&cipher).unwrap(), Some("plain-secret".to_string()));
    }

    #[test]
    fn test_debug_hides_envelope() {
        let credential = RemoteCredential::seal(&cipher(), "https://git.example.com/a.git", "me", "s").unwrap();
        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("<sealed>"));
        assert!(!rendered.contains(&credential.secret));
    }
}
