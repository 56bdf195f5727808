//! Snapshot caching and session ownership for the metrics store.

pub mod cache;
pub mod session;

pub use cache::SnapshotCache;
pub use session::{Session, SessionStore, SESSION_TIMEOUT_MINUTES};
