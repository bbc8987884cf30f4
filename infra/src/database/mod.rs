//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management and migrations
//! - Session store implementation

pub mod connection;
pub mod mysql;


// Re-export commonly used types
pub use connection::{DatabasePool, PoolStatistics};
pub use mysql::MySqlSessionStore;
