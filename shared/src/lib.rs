//! Shared configuration and response types for the Scribe server
//!
//! - Configuration types loaded at process start
//! - Error response structures handed to the request layer

pub mod config;
pub mod errors;

pub use config::{
    AppConfig, AuthConfig, CipherConfig, DatabaseConfig, Environment, JwtConfig, LogFormat,
    LoggingConfig, RefreshPolicy, SessionConfig,
};
pub use errors::{error_codes, messages, ErrorResponse, IntoErrorResponse};
