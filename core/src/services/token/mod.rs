//! Token service module for JWT management
//!
//! This module handles:
//! - Access and refresh token issuance (HS256 or RS256)
//! - Stateless verification with issuer, audience and kind checks
//! - RS256 key loading from PEM files or strings

mod config;
mod key_manager;
mod service;


pub use config::{TokenServiceConfig, MAX_TOKEN_LIFETIME_SECONDS};
pub use key_manager::Rs256KeyManager;
pub use service::{JwtTokenService, TokenIssuer};
