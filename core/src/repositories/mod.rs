pub mod session;

pub use session::{MockSessionStore, SessionStore, StoreCalls};
