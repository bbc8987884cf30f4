//! Value objects representing immutable domain concepts.

pub mod session_tokens;

pub use session_tokens::RefreshedSession;
