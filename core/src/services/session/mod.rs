//! Session service module
//!
//! Server-side sessions backing refresh tokens:
//! - Session creation from an authenticated identity
//! - Refresh with optional refresh-token rotation
//! - Revocation of single sessions or all sessions of a user
//! - Background sweeping of expired sessions

mod cleanup;
mod manager;


pub use cleanup::{CleanupResult, SessionCleanupConfig, SessionCleanupService};
pub use manager::SessionManager;
