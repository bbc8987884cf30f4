//! Session lifecycle: creation, refresh, revocation and sweeping

use std::sync::Arc;

use chrono::{DateTime, Utc};
use scribe_shared::config::RefreshPolicy;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::session::{Session, SessionLookup};
use crate::domain::entities::token::{Claims, Role, TokenKind};
use crate::domain::value_objects::RefreshedSession;
use crate::errors::SessionError;
use crate::repositories::SessionStore;
use crate::services::token::TokenIssuer;

/// Coordinates the token issuer and the session store.
///
/// Holds no mutable state of its own; share it as `Arc<SessionManager<_, _>>`.
/// Every check against the store uses the current time at the moment of the
/// call, and nothing is retried.
pub struct SessionManager<S: SessionStore, T: TokenIssuer> {
    store: Arc<S>,
    tokens: Arc<T>,
    refresh_policy: RefreshPolicy,
}

impl<S: SessionStore, T: TokenIssuer> SessionManager<S, T> {
    /// Creates a manager that reuses refresh tokens on refresh
    pub fn new(store: Arc<S>, tokens: Arc<T>) -> Self {
        Self::with_policy(store, tokens, RefreshPolicy::default())
    }

    pub fn with_policy(store: Arc<S>, tokens: Arc<T>, refresh_policy: RefreshPolicy) -> Self {
        Self {
            store,
            tokens,
            refresh_policy,
        }
    }

    pub fn refresh_policy(&self) -> RefreshPolicy {
        self.refresh_policy
    }

    /// Starts a session for an already authenticated identity.
    ///
    /// Issues an access and a refresh token, stores the refresh token with
    /// the expiry taken from its own claims, and returns the stored session
    /// together with the access token.
    ///
    /// # Errors
    ///
    /// * `TokenIssuanceFailed` - either token could not be minted
    /// * `PersistenceFailed` - the session row could not be written
    pub async fn create_session(&self, user_id: Uuid, role: &Role) -> Result<(Session, String), SessionError> {
        let access_token = self
            .tokens
            .issue_access_token(user_id, role)
            .map_err(|e| {
                error!(%user_id, "failed to issue access token: {}", e);
                SessionError::TokenIssuanceFailed
            })?;

        let refresh_token = self
            .tokens
            .issue_refresh_token(user_id, role)
            .map_err(|e| {
                error!(%user_id, "failed to issue refresh token: {}", e);
                SessionError::TokenIssuanceFailed
            })?;

        let expires_at = self.expiry_of(&refresh_token)?;
        let session = Session::new(user_id, refresh_token, expires_at);

        self.store.insert(&session).await.map_err(|e| {
            error!(%user_id, "failed to persist session: {}", e);
            SessionError::PersistenceFailed(e)
        })?;

        info!(session_id = %session.id, %user_id, %expires_at, "session created");

        Ok((session, access_token))
    }

    /// Exchanges a refresh token for a new access token.
    ///
    /// A token that fails verification is rejected without touching the
    /// store. A well-formed token is honoured only while its session row
    /// exists and has not expired; revoked and expired sessions look the
    /// same to the caller.
    pub async fn refresh_session(&self, refresh_token: &str) -> Result<RefreshedSession, SessionError> {
        let claims = self
            .tokens
            .verify_kind(refresh_token, TokenKind::Refresh)
            .map_err(|_| SessionError::InvalidRefreshToken)?;

        let user_id = claims
            .user_id()
            .map_err(|_| SessionError::InvalidRefreshToken)?;

        let session = match self
            .store
            .find_by_refresh_token(refresh_token, Utc::now())
            .await?
        {
            SessionLookup::Found(session) => session,
            SessionLookup::NotFound => {
                debug!(%user_id, "refresh rejected: no live session");
                return Err(SessionError::SessionNotFoundOrExpired);
            }
        };

        if session.user_id != user_id {
            warn!(session_id = %session.id, "refresh token subject does not match its session");
            return Err(SessionError::SessionNotFoundOrExpired);
        }

        let access_token = self
            .tokens
            .issue_access_token(user_id, &claims.role)
            .map_err(|e| {
                error!(%user_id, "failed to issue access token on refresh: {}", e);
                SessionError::TokenIssuanceFailed
            })?;

        let refreshed = match self.refresh_policy {
            RefreshPolicy::Reuse => RefreshedSession::reused(access_token),
            RefreshPolicy::Rotate => {
                let next = self.rotate(&session, refresh_token, &claims).await?;
                RefreshedSession::rotated(access_token, next)
            }
        };

        debug!(session_id = %session.id, rotated = refreshed.is_rotated(), "session refreshed");

        Ok(refreshed)
    }

    async fn rotate(&self, session: &Session, current: &str, claims: &Claims) -> Result<String, SessionError> {
        let next = self
            .tokens
            .issue_refresh_token(session.user_id, &claims.role)
            .map_err(|e| {
                error!(session_id = %session.id, "failed to issue replacement refresh token: {}", e);
                SessionError::TokenIssuanceFailed
            })?;
        let next_expires_at = self.expiry_of(&next)?;

        let swapped = self
            .store
            .replace_refresh_token(session.id, current, &next, next_expires_at, Utc::now())
            .await
            .map_err(SessionError::PersistenceFailed)?;

        if !swapped {
            warn!(session_id = %session.id, "refresh token already rotated or session expired");
            return Err(SessionError::SessionNotFoundOrExpired);
        }

        Ok(next)
    }

    /// Verifies an access token without consulting the store
    pub fn verify_access_token(&self, access_token: &str) -> Result<Claims, SessionError> {
        self.tokens
            .verify_kind(access_token, TokenKind::Access)
            .map_err(|_| SessionError::InvalidAccessToken)
    }

    /// Revokes one session. Revoking an unknown session is not an error.
    pub async fn invalidate_session(&self, session_id: Uuid) -> Result<(), SessionError> {
        let removed = self.store.delete_by_id(session_id).await?;
        if removed {
            info!(%session_id, "session invalidated");
        } else {
            debug!(%session_id, "session already gone");
        }
        Ok(())
    }

    /// Revokes every session of a user, returning how many were removed
    pub async fn invalidate_user_sessions(&self, user_id: Uuid) -> Result<u64, SessionError> {
        let removed = self.store.delete_by_user(user_id).await?;
        info!(%user_id, removed, "user sessions invalidated");
        Ok(removed)
    }

    pub async fn active_session_count(&self, user_id: Uuid) -> Result<u64, SessionError> {
        Ok(self.store.count_active_for_user(user_id, Utc::now()).await?)
    }

    /// Deletes every session that has expired by now
    pub async fn clean_expired_sessions(&self) -> Result<u64, SessionError> {
        let removed = self.store.delete_expired(Utc::now()).await?;
        debug!(removed, "expired sessions swept");
        Ok(removed)
    }

    /// Expiry recorded in a freshly issued refresh token
    fn expiry_of(&self, refresh_token: &str) -> Result<DateTime<Utc>, SessionError> {
        self.tokens
            .verify_kind(refresh_token, TokenKind::Refresh)
            .ok()
            .and_then(|claims| claims.expires_at())
            .ok_or_else(|| {
                error!("issued refresh token carries no usable expiry");
                SessionError::TokenIssuanceFailed
            })
    }
}
