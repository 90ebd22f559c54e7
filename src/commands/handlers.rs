//! clipstash - Command handlers
//!
//! Operations the front-end calls into. Every call returns a
//! [`CommandResult`]; nothing here panics or aborts the process.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::clipboard::{ClipboardAccess, ClipboardWatcher, Entry, EntryView};
use crate::config::Settings;

/// Command execution result
#[derive(Debug, Serialize)]
pub struct CommandResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> CommandResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }

    pub fn into_result(self) -> Result<T, String> {
        match (self.success, self.data) {
            (true, Some(data)) => Ok(data),
            _ => Err(self.error.unwrap_or_else(|| "unknown error".to_string())),
        }
    }
}

/// History, watcher state and clipboard access behind one interface
pub struct ClipboardService {
    watcher: ClipboardWatcher,
    clipboard: Box<dyn ClipboardAccess>,
    export_path: PathBuf,
    preview_length: usize,
}

impl ClipboardService {
    pub fn new(
        watcher: ClipboardWatcher,
        clipboard: Box<dyn ClipboardAccess>,
        export_path: PathBuf,
        preview_length: usize,
    ) -> Self {
        Self {
            watcher,
            clipboard,
            export_path,
            preview_length,
        }
    }

    /// Load the persisted history named by `settings`
    pub fn from_settings(settings: &Settings, clipboard: Box<dyn ClipboardAccess>) -> Self {
        Self::new(
            ClipboardWatcher::load(settings.history_path.clone()),
            clipboard,
            settings.export_path.clone(),
            settings.preview_length,
        )
    }

    pub fn watcher(&self) -> &ClipboardWatcher {
        &self.watcher
    }

    /// Record a clipboard change; `text` may be empty
    pub fn notify_clipboard_changed(&mut self, text: &str) -> CommandResult<bool> {
        CommandResult::ok(self.watcher.on_clipboard_changed(text))
    }

    pub fn set_enabled(&mut self, enabled: bool) -> CommandResult<bool> {
        self.watcher.set_enabled(enabled);
        CommandResult::ok(enabled)
    }

    pub fn toggle_monitoring(&mut self) -> CommandResult<bool> {
        CommandResult::ok(self.watcher.toggle())
    }

    pub fn is_enabled(&self) -> CommandResult<bool> {
        CommandResult::ok(self.watcher.is_enabled())
    }

    /// Clear all history records and persist the empty list.
    ///
    /// Callers confirm with the user first.
    pub fn request_clear(&mut self) -> CommandResult<bool> {
        self.watcher.store_mut().clear();
        self.watcher.save();
        log::info!("History cleared");
        CommandResult::ok(true)
    }

    /// Copy the entry at `index` back to the system clipboard
    pub fn request_copy(&mut self, index: usize) -> CommandResult<bool> {
        let text = match self.watcher.store().get(index) {
            Some(entry) => entry.text.clone(),
            None => return CommandResult::err(format!("Item not found: {}", index)),
        };

        match self.clipboard.set_text(&text) {
            Ok(()) => CommandResult::ok(true),
            Err(e) => CommandResult::err(format!("Failed to set clipboard text: {}", e)),
        }
    }

    /// Export raw texts; `None` uses the configured export path
    pub fn request_export(&self, path: Option<&Path>) -> CommandResult<PathBuf> {
        let path = path.unwrap_or(self.export_path.as_path()).to_path_buf();
        match self.watcher.store().export(&path) {
            Ok(()) => CommandResult::ok(path),
            Err(e) => CommandResult::err(format!("Failed to export history: {}", e)),
        }
    }

    /// Indices of entries matching `query`
    pub fn search(&self, query: &str) -> CommandResult<Vec<usize>> {
        CommandResult::ok(self.watcher.store().search(query))
    }

    /// List views of entries matching `query`, newest first
    pub fn history(&self, query: &str) -> CommandResult<Vec<EntryView>> {
        let store = self.watcher.store();
        let views = store
            .search(query)
            .into_iter()
            .filter_map(|index| {
                store
                    .get(index)
                    .map(|entry| EntryView::from_entry(index, entry, self.preview_length))
            })
            .collect();
        CommandResult::ok(views)
    }

    /// Complete content of a single record
    pub fn entry(&self, index: usize) -> CommandResult<Entry> {
        match self.watcher.store().get(index) {
            Some(entry) => CommandResult::ok(entry.clone()),
            None => CommandResult::err(format!("Item not found: {}", index)),
        }
    }

    pub fn history_count(&self) -> CommandResult<usize> {
        CommandResult::ok(self.watcher.store().len())
    }

    /// Persist the history (periodic tick and shutdown)
    pub fn save(&self) {
        self.watcher.save();
    }
}
