//! Domain-specific error types and error handling.

mod types;


pub use types::{CipherError, KeyError, SessionError, StorageError, TokenError};

use scribe_shared::errors::{error_codes, messages, ErrorResponse, IntoErrorResponse};
use thiserror::Error;

/// Core domain errors bridging every concern
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error(transparent)]
    Key(#[from] KeyError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl DomainError {
    /// Only storage unavailability is worth retrying; the core itself never
    /// retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            DomainError::Storage(err) => err.is_retryable(),
            DomainError::Session(SessionError::Storage(err))
            | DomainError::Session(SessionError::PersistenceFailed(err)) => err.is_retryable(),
            _ => false,
        }
    }

    /// Configuration problems must stop the process
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DomainError::Configuration { .. }
                | DomainError::Key(_)
                | DomainError::Token(TokenError::KeyLoadError { .. })
                | DomainError::Token(TokenError::UnsupportedAlgorithm { .. })
                | DomainError::Token(TokenError::InvalidLifetime { .. })
        )
    }
}

impl IntoErrorResponse for DomainError {
    fn to_error_response(&self) -> ErrorResponse {
        if self.is_retryable() {
            return ErrorResponse::new(error_codes::SERVICE_UNAVAILABLE, messages::TRY_AGAIN)
                .retryable();
        }

        match self {
            DomainError::Cipher(_) => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, messages::SECRET_UNREADABLE)
            }
            DomainError::Token(TokenError::InvalidOrExpiredToken) => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, messages::SESSION_INVALID)
            }
            DomainError::Session(err) if err.requires_reauthentication() => {
                ErrorResponse::new(error_codes::UNAUTHORIZED, messages::SESSION_INVALID)
            }
            _ => ErrorResponse::new(error_codes::INTERNAL_ERROR, messages::INTERNAL),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
