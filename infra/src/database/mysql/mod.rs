//! MySQL implementations of the core repository traits

mod session_store_impl;

pub use session_store_impl::MySqlSessionStore;
