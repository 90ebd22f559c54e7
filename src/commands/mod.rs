//! clipstash - Front-end command layer

pub mod handlers;

pub use handlers::{ClipboardService, CommandResult};
