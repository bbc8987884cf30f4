//! Tokens handed back to the client by the session lifecycle.

use serde::{Deserialize, Serialize};

/// Result of refreshing a session
///
/// `refresh_token` is only present when the refresh policy rotated the
/// stored token; otherwise the client keeps using the one it has.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshedSession {
    pub access_token: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl RefreshedSession {
    /// Access token only, refresh token unchanged
    pub fn reused(access_token: String) -> Self {
        Self {
            access_token,
            refresh_token: None,
        }
    }

    /// Access token plus the replacement refresh token
    pub fn rotated(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token: Some(refresh_token),
        }
    }

    pub fn is_rotated(&self) -> bool {
        self.refresh_token.is_some()
    }
}

impl std::fmt::Debug for RefreshedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshedSession")
            .field("access_token", &"<redacted>")
            .field("rotated", &self.is_rotated())
            .finish()
    }
}
