//! Server-side session bound to one refresh token.

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

/// One issued refresh-token lineage.
///
/// `expires_at` is copied from the refresh token's own `exp` claim; the
/// token stays the single source of truth and the store only caches the
/// value for filtering and sweeping.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    pub id: Uuid,

    pub user_id: Uuid,

    /// Raw refresh token; stores persist a digest of it
    pub refresh_token: String,

    pub expires_at: DateTime<Utc>,

    pub created_at: DateTime<Utc>,
}

impl Session {
    /// New session with a fresh id, created now
    pub fn new(user_id: Uuid, refresh_token: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            refresh_token,
            expires_at,
            created_at: Utc::now(),
        }
    }

    /// Expired once `now` reaches `expires_at`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_expired_at(now)
    }

    /// Zero once expired
    pub fn time_until_expiration(&self, now: DateTime<Utc>) -> Duration {
        if self.expires_at > now {
            self.expires_at - now
        } else {
            Duration::zero()
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("created_at", &self.created_at)
            .finish()
    }
}

/// Session metadata without the refresh token.
///
/// Returned by lookups that do not start from a token. Stores keep only a
/// digest of the token and cannot hand the raw value back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    pub id: Uuid,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SessionInfo {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

impl From<&Session> for SessionInfo {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id,
            user_id: session.user_id,
            expires_at: session.expires_at,
            created_at: session.created_at,
        }
    }
}

/// Result of a session lookup.
///
/// `NotFound` covers missing, expired and revoked rows alike.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionLookup {
    Found(Session),
    NotFound,
}

impl SessionLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, SessionLookup::Found(_))
    }

    pub fn into_option(self) -> Option<Session> {
        match self {
            SessionLookup::Found(session) => Some(session),
            SessionLookup::NotFound => None,
        }
    }
}

impl From<Option<Session>> for SessionLookup {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionLookup::Found(session),
            None => SessionLookup::NotFound,
        }
    }
}
