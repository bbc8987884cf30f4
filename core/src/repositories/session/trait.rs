//! Session store trait defining the interface for session persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::session::{Session, SessionInfo, SessionLookup};
use crate::errors::StorageError;

/// Persistence contract for server-side sessions
///
/// Every expiry decision takes an explicit `now`, so implementations never
/// read the clock themselves and tests can pin time.
///
/// # Security Considerations
/// - Implementations backed by shared storage should persist a digest of
///   the refresh token rather than the token itself
/// - `delete_expired` must evaluate the expiry predicate inside the storage
///   layer so that a concurrent lookup of a live row is never affected
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a new session
    ///
    /// # Returns
    /// * `Ok(())` - Session stored
    /// * `Err(StorageError::Conflict)` - A session with the same id or refresh token exists
    /// * `Err(StorageError::Unavailable)` - Backend unreachable
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::{Duration, Utc};
    /// # use uuid::Uuid;
    /// # use scribe_core::repositories::SessionStore;
    /// # use scribe_core::domain::entities::session::Session;
    /// # async fn example(store: &impl SessionStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let session = Session::new(
    ///     Uuid::new_v4(),
    ///     "signed-refresh-token".to_string(),
    ///     Utc::now() + Duration::days(7),
    /// );
    ///
    /// store.insert(&session).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn insert(&self, session: &Session) -> Result<(), StorageError>;

    /// Find the live session holding `refresh_token`
    ///
    /// Rows with `expires_at <= now` are reported as `NotFound`.
    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionLookup, StorageError>;

    /// Find a live session by id
    ///
    /// Only metadata is returned; the refresh token is never recoverable
    /// from an id.
    async fn find_by_id(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<SessionInfo>, StorageError>;

    /// Delete one session
    ///
    /// # Returns
    /// * `Ok(true)` - A row was removed
    /// * `Ok(false)` - No such session; not an error
    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError>;

    /// Delete every session of a user, returning how many were removed
    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, StorageError>;

    /// Delete all sessions with `expires_at <= now`
    ///
    /// Idempotent: a second call with the same `now` removes nothing.
    ///
    /// # Example
    /// ```no_run
    /// # use chrono::Utc;
    /// # use scribe_core::repositories::SessionStore;
    /// # async fn example(store: &impl SessionStore) -> Result<(), Box<dyn std::error::Error>> {
    /// let removed = store.delete_expired(Utc::now()).await?;
    /// println!("Swept {} expired sessions", removed);
    /// # Ok(())
    /// # }
    /// ```
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StorageError>;

    /// Count a user's sessions with `expires_at > now`
    async fn count_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, StorageError>;

    /// Swap the refresh token of session `id` from `current` to `next`
    ///
    /// Compare-and-swap: succeeds only if the row still holds `current`
    /// and has not expired by `now`. When two refreshes race with the same
    /// token exactly one of them wins; the loser gets `Ok(false)`. An
    /// expired row is never given a new expiry.
    async fn replace_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
        next_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError>;
}
