//! clipstash - Storage module
//!
//! Provides the in-memory history, its persisted forms and file ownership

pub mod history;
pub mod lock;

pub use history::{HistoryStore, StorageError};
pub use lock::{HistoryLock, LockError};
