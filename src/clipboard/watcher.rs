//! clipstash - Clipboard watcher
//!
//! Turns clipboard-change notifications into history entries while enabled

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use super::models::Entry;
use crate::storage::HistoryStore;

/// Records clipboard changes into the owned history
#[derive(Debug)]
pub struct ClipboardWatcher {
    store: HistoryStore,
    history_path: PathBuf,
    enabled: bool,
}

impl ClipboardWatcher {
    /// Create an enabled watcher over `store`, persisting to `history_path`
    pub fn new(store: HistoryStore, history_path: PathBuf) -> Self {
        Self {
            store,
            history_path,
            enabled: true,
        }
    }

    /// Create a watcher whose history is loaded from `history_path`
    pub fn load(history_path: PathBuf) -> Self {
        let mut store = HistoryStore::new();
        store.load(&history_path);
        Self::new(store, history_path)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            log::info!("[Watcher] Monitoring {}", if enabled { "enabled" } else { "disabled" });
        }
        self.enabled = enabled;
    }

    /// Flip the enabled state, returning the new one
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    pub fn store(&self) -> &HistoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut HistoryStore {
        &mut self.store
    }

    pub fn history_path(&self) -> &Path {
        &self.history_path
    }

    /// Persist the history to its configured path
    pub fn save(&self) {
        self.store.save(&self.history_path);
    }

    /// Handle a clipboard change. Returns whether an entry was recorded.
    pub fn on_clipboard_changed(&mut self, raw_text: &str) -> bool {
        self.on_clipboard_changed_at(raw_text, Local::now())
    }

    /// Same as [`Self::on_clipboard_changed`] with an explicit capture time
    pub fn on_clipboard_changed_at(&mut self, raw_text: &str, now: DateTime<Local>) -> bool {
        if !self.enabled {
            log::debug!("[Watcher] Disabled, ignoring clipboard change");
            return false;
        }
        if !Entry::has_content(raw_text) {
            return false;
        }

        self.store.insert(Entry::captured_at(now, raw_text.to_string()));
        log::info!("[Watcher] Recorded entry ({} total)", self.store.len());
        self.save();
        true
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::TimeZone;
    use tempfile::tempdir;

    use super::*;

    fn at(secs: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 1, 0, 0, secs).unwrap()
    }

    fn watcher_in(dir: &Path) -> ClipboardWatcher {
        ClipboardWatcher::new(HistoryStore::new(), dir.join("clipboard_history.json"))
    }

    #[test]
    fn test_starts_enabled() {
        let dir = tempdir().unwrap();
        assert!(watcher_in(dir.path()).is_enabled());
    }

    #[test]
    fn test_records_at_front_and_saves() {
        let dir = tempdir().unwrap();
        let mut watcher = watcher_in(dir.path());

        assert!(watcher.on_clipboard_changed_at("hello", at(0)));
        assert!(watcher.on_clipboard_changed_at("world", at(5)));

        let store = watcher.store();
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().text, "world");
        assert_eq!(store.get(0).unwrap().timestamp, "2024-01-01 00:00:05");
        assert_eq!(store.get(1).unwrap().timestamp, "2024-01-01 00:00:00");

        let on_disk: Vec<Entry> =
            serde_json::from_str(&fs::read_to_string(watcher.history_path()).unwrap()).unwrap();
        assert_eq!(on_disk[0].text, "hello");
        assert_eq!(on_disk[1].text, "world");
    }

    #[test]
    fn test_keeps_raw_text_and_duplicates() {
        let dir = tempdir().unwrap();
        let mut watcher = watcher_in(dir.path());

        assert!(watcher.on_clipboard_changed("  line\n\n  next  "));
        assert!(watcher.on_clipboard_changed("  line\n\n  next  "));
        assert_eq!(watcher.store().len(), 2);
        assert_eq!(watcher.store().get(0).unwrap().text, "  line\n\n  next  ");
    }

    #[test]
    fn test_ignores_blank_text_in_any_state() {
        let dir = tempdir().unwrap();
        let mut watcher = watcher_in(dir.path());

        for blank in ["", " ", "\n\t\r\n"] {
            assert!(!watcher.on_clipboard_changed(blank));
        }
        watcher.set_enabled(false);
        assert!(!watcher.on_clipboard_changed(" "));
        assert!(watcher.store().is_empty());
        assert!(!watcher.history_path().exists());
    }

    #[test]
    fn test_disabled_is_no_op() {
        let dir = tempdir().unwrap();
        let mut watcher = watcher_in(dir.path());

        assert!(!watcher.toggle());
        assert!(!watcher.on_clipboard_changed("copied while paused"));
        assert!(watcher.store().is_empty());

        assert!(watcher.toggle());
        assert!(watcher.on_clipboard_changed("copied after resume"));
        assert_eq!(watcher.store().len(), 1);
    }

    #[test]
    fn test_load_restores_previous_session() {
        let dir = tempdir().unwrap();
        let mut first = watcher_in(dir.path());
        first.on_clipboard_changed_at("hello", at(0));
        first.on_clipboard_changed_at("world", at(5));

        let second = ClipboardWatcher::load(dir.path().join("clipboard_history.json"));
        assert_eq!(second.store().len(), 2);
        assert_eq!(second.store().get(0).unwrap().text, "world");
        assert!(second.is_enabled());
    }
}
