//! # Infrastructure Layer
//!
//! Concrete implementations behind the Scribe core:
//! - **Database**: MySQL connection pool and session store using SQLx
//! - **Telemetry**: tracing subscriber set-up
//! - **Bootstrap**: configuration loading, start-up key validation and
//!   service wiring

pub mod bootstrap;
pub mod database;
pub mod telemetry;

pub use bootstrap::{initialize, load_config, validate_secrets, MySqlSessionManager, ScribeServices};

use scribe_core::errors::DomainError;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Core rejected the configuration, e.g. an invalid secret key
    #[error(transparent)]
    Domain(#[from] DomainError),
}
