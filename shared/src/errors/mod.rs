//! Shared error response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error body handed to the request layer.
///
/// Only carries a stable code and a generic message; internal detail stays
/// in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for client identification
    pub error: String,

    /// Human-readable message
    pub message: String,

    /// Whether repeating the same request may succeed
    #[serde(default)]
    pub retryable: bool,

    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            retryable: false,
            timestamp: Utc::now(),
        }
    }

    pub fn retryable(mut self) -> Self {
        self.retryable = true;
        self
    }

    /// HTTP status the request layer should use for this code
    pub fn status_code(&self) -> u16 {
        match self.error.as_str() {
            error_codes::UNAUTHORIZED => 401,
            error_codes::BAD_REQUEST => 400,
            error_codes::NOT_FOUND => 404,
            error_codes::SERVICE_UNAVAILABLE => 503,
            _ => 500,
        }
    }
}

/// Common error codes used across the application
pub mod error_codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
}

/// Generic messages; never include error detail
pub mod messages {
    pub const SESSION_INVALID: &str = "your session is no longer valid";
    pub const SECRET_UNREADABLE: &str = "stored secret could not be read";
    pub const TRY_AGAIN: &str = "service temporarily unavailable, please retry";
    pub const INTERNAL: &str = "internal server error";
}

/// Trait for converting errors to ErrorResponse
pub trait IntoErrorResponse {
    fn to_error_response(&self) -> ErrorResponse;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ErrorResponse::new(error_codes::UNAUTHORIZED, "x").status_code(), 401);
        assert_eq!(
            ErrorResponse::new(error_codes::SERVICE_UNAVAILABLE, "x").status_code(),
            503
        );
        assert_eq!(ErrorResponse::new("SOMETHING_ELSE", "x").status_code(), 500);
    }

    #[test]
    fn test_retryable_flag_serializes() {
        let response = ErrorResponse::new(error_codes::SERVICE_UNAVAILABLE, messages::TRY_AGAIN)
            .retryable();
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["retryable"], true);
        assert_eq!(json["error"], "SERVICE_UNAVAILABLE");
    }
}
