//! clipstash - Clipboard module
//!
//! Provides clipboard access, change monitoring and entry capture

pub mod access;
pub mod models;
pub mod monitor;
pub mod watcher;

pub use access::{ClipboardAccess, ClipboardError, SystemClipboard};
pub use models::{generate_preview, Entry, EntryView};
pub use monitor::{ChangeDetector, ClipboardMonitor, ClipboardSnapshot};
pub use watcher::ClipboardWatcher;
