//! In-memory session store for tests and local development

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::session::{Session, SessionInfo, SessionLookup};
use crate::errors::StorageError;

use super::r#trait::SessionStore;

/// Snapshot of how often each store operation was called
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCalls {
    pub insert: usize,
    pub find_by_refresh_token: usize,
    pub find_by_id: usize,
    pub delete_by_id: usize,
    pub delete_by_user: usize,
    pub delete_expired: usize,
    pub count_active_for_user: usize,
    pub replace_refresh_token: usize,
}

impl StoreCalls {
    pub fn total(&self) -> usize {
        self.insert
            + self.find_by_refresh_token
            + self.find_by_id
            + self.delete_by_id
            + self.delete_by_user
            + self.delete_expired
            + self.count_active_for_user
            + self.replace_refresh_token
    }
}

#[derive(Default)]
struct Counters {
    insert: AtomicUsize,
    find_by_refresh_token: AtomicUsize,
    find_by_id: AtomicUsize,
    delete_by_id: AtomicUsize,
    delete_by_user: AtomicUsize,
    delete_expired: AtomicUsize,
    count_active_for_user: AtomicUsize,
    replace_refresh_token: AtomicUsize,
}

fn bump(counter: &AtomicUsize) {
    counter.fetch_add(1, Ordering::Relaxed);
}

/// Mock session store keyed by session id
///
/// Clones share the same underlying map and counters.
#[derive(Clone, Default)]
pub struct MockSessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, Session>>>,
    counters: Arc<Counters>,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> StoreCalls {
        let c = &self.counters;
        StoreCalls {
            insert: c.insert.load(Ordering::Relaxed),
            find_by_refresh_token: c.find_by_refresh_token.load(Ordering::Relaxed),
            find_by_id: c.find_by_id.load(Ordering::Relaxed),
            delete_by_id: c.delete_by_id.load(Ordering::Relaxed),
            delete_by_user: c.delete_by_user.load(Ordering::Relaxed),
            delete_expired: c.delete_expired.load(Ordering::Relaxed),
            count_active_for_user: c.count_active_for_user.load(Ordering::Relaxed),
            replace_refresh_token: c.replace_refresh_token.load(Ordering::Relaxed),
        }
    }

    /// Number of stored rows, expired ones included
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }

    /// Raw row by id, regardless of expiry
    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.sessions.read().await.get(&id).cloned()
    }
}

#[async_trait]
impl SessionStore for MockSessionStore {
    async fn insert(&self, session: &Session) -> Result<(), StorageError> {
        bump(&self.counters.insert);
        let mut sessions = self.sessions.write().await;

        if sessions.contains_key(&session.id) {
            return Err(StorageError::Conflict {
                message: format!("session {} already exists", session.id),
            });
        }
        if sessions
            .values()
            .any(|existing| existing.refresh_token == session.refresh_token)
        {
            return Err(StorageError::Conflict {
                message: "refresh token already stored".to_string(),
            });
        }

        sessions.insert(session.id, session.clone());
        Ok(())
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionLookup, StorageError> {
        bump(&self.counters.find_by_refresh_token);
        let sessions = self.sessions.read().await;

        Ok(sessions
            .values()
            .find(|s| s.refresh_token == refresh_token && s.is_active_at(now))
            .cloned()
            .into())
    }

    async fn find_by_id(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<SessionInfo>, StorageError> {
        bump(&self.counters.find_by_id);
        let sessions = self.sessions.read().await;

        Ok(sessions
            .get(&id)
            .filter(|s| s.is_active_at(now))
            .map(SessionInfo::from))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        bump(&self.counters.delete_by_id);
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(&id).is_some())
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, StorageError> {
        bump(&self.counters.delete_by_user);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, s| s.user_id != user_id);

        Ok((before - sessions.len()) as u64)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        bump(&self.counters.delete_expired);
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();

        sessions.retain(|_, s| !s.is_expired_at(now));

        Ok((before - sessions.len()) as u64)
    }

    async fn count_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, StorageError> {
        bump(&self.counters.count_active_for_user);
        let sessions = self.sessions.read().await;

        Ok(sessions
            .values()
            .filter(|s| s.user_id == user_id && s.is_active_at(now))
            .count() as u64)
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
        next_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        bump(&self.counters.replace_refresh_token);
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&id) {
            Some(session) if session.refresh_token == current && session.is_active_at(now) => {
                session.refresh_token = next.to_string();
                session.expires_at = next_expires_at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}
