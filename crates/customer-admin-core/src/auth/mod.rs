//! Session management.
//!
//! `Session` holds the bearer token and the signed-in customer. It is passed
//! explicitly to every authenticated `ApiClient` call and can be persisted to
//! the cache directory so a login survives between runs.

pub mod session;

pub use session::{Session, SessionData, DEFAULT_TOKEN_TTL_MINUTES};
