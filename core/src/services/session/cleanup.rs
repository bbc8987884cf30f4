//! Periodic sweeping of expired sessions
//!
//! Expired rows are already invisible to lookups; sweeping only keeps the
//! session table from growing without bound.

use std::sync::Arc;

use scribe_shared::config::SessionConfig;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::errors::SessionError;
use crate::repositories::SessionStore;
use crate::services::token::TokenIssuer;

use super::manager::SessionManager;

/// Configuration for session cleanup service
#[derive(Debug, Clone)]
pub struct SessionCleanupConfig {
    /// How often to run cleanup (in seconds)
    pub interval_seconds: u64,
    pub enabled: bool,
}

impl Default for SessionCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600, // Run every hour
            enabled: true,
        }
    }
}

impl From<&SessionConfig> for SessionCleanupConfig {
    fn from(config: &SessionConfig) -> Self {
        Self {
            interval_seconds: config.cleanup_interval_seconds.max(1),
            enabled: config.cleanup_enabled,
        }
    }
}

/// Service for sweeping expired sessions through the session manager
pub struct SessionCleanupService<S: SessionStore + 'static, T: TokenIssuer + 'static> {
    manager: Arc<SessionManager<S, T>>,
    config: SessionCleanupConfig,
}

impl<S: SessionStore + 'static, T: TokenIssuer + 'static> SessionCleanupService<S, T> {
    pub fn new(manager: Arc<SessionManager<S, T>>, config: SessionCleanupConfig) -> Self {
        Self { manager, config }
    }

    /// Run a single cleanup cycle
    ///
    /// Failures are recorded in the result rather than returned, so a
    /// failing store never stops the background loop.
    pub async fn run_cleanup(&self) -> CleanupResult {
        if !self.config.enabled {
            return CleanupResult::default();
        }

        let mut result = CleanupResult::default();

        match self.manager.clean_expired_sessions().await {
            Ok(count) => {
                result.expired_sessions_deleted = count;
                info!("Deleted {} expired sessions", count);
            }
            Err(e) => {
                error!("Failed to cleanup expired sessions: {}", e);
                result.retryable = matches!(&e, SessionError::Storage(err) if err.is_retryable());
                result.errors.push(format!("Session cleanup error: {}", e));
            }
        }

        result
    }

    /// Start the cleanup service as a background task
    ///
    /// The first sweep runs immediately. Returns `None` when cleanup is
    /// disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.enabled {
            warn!("Session cleanup service is disabled");
            return None;
        }

        let interval = std::time::Duration::from_secs(self.config.interval_seconds);

        Some(tokio::spawn(async move {
            info!(
                "Session cleanup service started - will run every {} seconds",
                self.config.interval_seconds
            );

            let mut interval_timer = tokio::time::interval(interval);

            loop {
                interval_timer.tick().await;

                let result = self.run_cleanup().await;
                if !result.is_success() {
                    warn!("Cleanup completed with errors: {:?}", result.errors);
                }
            }
        }))
    }
}

/// Result of a cleanup operation
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub expired_sessions_deleted: u64,
    /// Whether the failure was a transient storage outage
    pub retryable: bool,
    /// Any errors encountered during cleanup
    pub errors: Vec<String>,
}

impl CleanupResult {
    /// Check if the cleanup was successful (no errors)
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}
