//! MySQL implementation of the SessionStore trait.
//!
//! Refresh tokens are stored as SHA-256 hex digests; every lookup hashes the
//! presented token first. Expiry predicates are evaluated by MySQL inside a
//! single statement, so sweeping never races with a lookup of a live row.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{MySqlPool, Row};
use tracing::{debug, error};
use uuid::Uuid;

use scribe_core::domain::entities::session::{Session, SessionInfo, SessionLookup};
use scribe_core::errors::StorageError;
use scribe_core::repositories::SessionStore;

/// MySQL implementation of SessionStore
pub struct MySqlSessionStore {
    pool: MySqlPool,
}

impl MySqlSessionStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Hash a token value using SHA-256
    ///
    /// # Returns
    /// 64-character lowercase hex digest
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Convert database row to SessionInfo
    ///
    /// The stored column holds a digest, so no token is read back.
    fn row_to_info(row: &sqlx::mysql::MySqlRow) -> Result<SessionInfo, StorageError> {
        let id: String = row.try_get("id").map_err(corrupt("id"))?;
        let user_id: String = row.try_get("user_id").map_err(corrupt("user_id"))?;

        Ok(SessionInfo {
            id: Uuid::parse_str(&id).map_err(|e| StorageError::Corrupt {
                message: format!("Invalid session UUID: {}", e),
            })?,
            user_id: Uuid::parse_str(&user_id).map_err(|e| StorageError::Corrupt {
                message: format!("Invalid user UUID: {}", e),
            })?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(corrupt("expires_at"))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(corrupt("created_at"))?,
        })
    }

    /// Convert database row to Session entity, carrying the token the
    /// caller looked it up with
    fn row_to_session(row: &sqlx::mysql::MySqlRow, refresh_token: &str) -> Result<Session, StorageError> {
        let info = Self::row_to_info(row)?;
        Ok(Session {
            id: info.id,
            user_id: info.user_id,
            refresh_token: refresh_token.to_string(),
            expires_at: info.expires_at,
            created_at: info.created_at,
        })
    }
}

fn corrupt(column: &'static str) -> impl Fn(sqlx::Error) -> StorageError {
    move |e| StorageError::Corrupt {
        message: format!("Failed to get {}: {}", column, e),
    }
}

/// Classifies driver errors into storage error kinds
pub(crate) fn map_sqlx_error(operation: &str, e: sqlx::Error) -> StorageError {
    let message = format!("{}: {}", operation, e);
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict { message },
        sqlx::Error::RowNotFound
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::Decode(_) => StorageError::Corrupt { message },
        _ => {
            error!("Session storage failure during {}: {}", operation, e);
            StorageError::Unavailable { message }
        }
    }
}

#[async_trait]
impl SessionStore for MySqlSessionStore {
    async fn insert(&self, session: &Session) -> Result<(), StorageError> {
        let query = r#"
            INSERT INTO sessions (id, user_id, refresh_token, expires_at, created_at)
            VALUES (?, ?, ?, ?, ?)
        "#;

        sqlx::query(query)
            .bind(session.id.to_string())
            .bind(session.user_id.to_string())
            .bind(Self::hash_token(&session.refresh_token))
            .bind(session.expires_at)
            .bind(session.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("insert session", e))?;

        debug!(session_id = %session.id, "session row inserted");
        Ok(())
    }

    async fn find_by_refresh_token(
        &self,
        refresh_token: &str,
        now: DateTime<Utc>,
    ) -> Result<SessionLookup, StorageError> {
        let query = r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE refresh_token = ? AND expires_at > ?
        "#;

        let row = sqlx::query(query)
            .bind(Self::hash_token(refresh_token))
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find session by refresh token", e))?;

        match row {
            Some(row) => Ok(SessionLookup::Found(Self::row_to_session(&row, refresh_token)?)),
            None => Ok(SessionLookup::NotFound),
        }
    }

    async fn find_by_id(&self, id: Uuid, now: DateTime<Utc>) -> Result<Option<SessionInfo>, StorageError> {
        let query = r#"
            SELECT id, user_id, expires_at, created_at
            FROM sessions
            WHERE id = ? AND expires_at > ?
        "#;

        let row = sqlx::query(query)
            .bind(id.to_string())
            .bind(now)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("find session by id", e))?;

        row.as_ref().map(Self::row_to_info).transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete session", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_user(&self, user_id: Uuid) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete user sessions", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete expired sessions", e))?;

        Ok(result.rows_affected())
    }

    async fn count_active_for_user(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<u64, StorageError> {
        let row = sqlx::query("SELECT COUNT(*) AS active FROM sessions WHERE user_id = ? AND expires_at > ?")
            .bind(user_id.to_string())
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("count active sessions", e))?;

        let count: i64 = row.try_get("active").map_err(corrupt("active"))?;
        Ok(count.max(0) as u64)
    }

    async fn replace_refresh_token(
        &self,
        id: Uuid,
        current: &str,
        next: &str,
        next_expires_at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<bool, StorageError> {
        let query = r#"
            UPDATE sessions
            SET refresh_token = ?, expires_at = ?
            WHERE id = ? AND refresh_token = ? AND expires_at > ?
        "#;

        let result = sqlx::query(query)
            .bind(Self::hash_token(next))
            .bind(next_expires_at)
            .bind(id.to_string())
            .bind(Self::hash_token(current))
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("rotate refresh token", e))?;

        Ok(result.rows_affected() == 1)
    }
}
