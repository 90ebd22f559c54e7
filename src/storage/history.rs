//! clipstash - History store
//!
//! Holds the newest-first entry list and its on-disk representations:
//! a pretty-printed JSON array stored oldest-first, and a plain-text export.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::clipboard::Entry;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Ordered clipboard history, newest first
#[derive(Debug, Default, Clone)]
pub struct HistoryStore {
    entries: Vec<Entry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prepend an entry
    pub fn insert(&mut self, entry: Entry) {
        self.entries.insert(0, entry);
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    /// Lazily yield `(index, entry)` pairs accepted by `predicate`
    pub fn find<'a, P>(&'a self, mut predicate: P) -> impl Iterator<Item = (usize, &'a Entry)> + 'a
    where
        P: FnMut(&Entry) -> bool + 'a,
    {
        self.entries
            .iter()
            .enumerate()
            .filter(move |(_, entry)| predicate(entry))
    }

    /// Indices of entries whose text or timestamp contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<usize> {
        let needle = query.to_lowercase();
        self.find(move |entry| entry.matches(&needle))
            .map(|(index, _)| index)
            .collect()
    }

    /// Replace the in-memory list with the persisted one.
    ///
    /// Any failure leaves the history empty; the error is logged, not returned.
    pub fn load(&mut self, path: &Path) {
        match Self::read_entries(path) {
            Ok(entries) => {
                log::info!("[Storage] Loaded {} entries from {:?}", entries.len(), path);
                self.entries = entries;
            }
            Err(e) => {
                log::error!("[Storage] Failed to load history from {:?}: {}", path, e);
                self.entries.clear();
            }
        }
    }

    /// Persist the list oldest-first. Failures are logged, not returned.
    pub fn save(&self, path: &Path) {
        match self.write_entries(path) {
            Ok(()) => log::debug!("[Storage] Saved {} entries to {:?}", self.entries.len(), path),
            Err(e) => log::error!("[Storage] Failed to save history to {:?}: {}", path, e),
        }
    }

    /// Write each entry's raw text followed by a blank line, newest first
    pub fn export(&self, path: &Path) -> Result<(), StorageError> {
        ensure_parent_dir(path)?;
        let mut file = fs::File::create(path)?;
        for entry in &self.entries {
            write!(file, "{}\n\n", entry.text)?;
        }
        file.flush()?;
        log::info!("[Storage] Exported {} entries to {:?}", self.entries.len(), path);
        Ok(())
    }

    fn read_entries(path: &Path) -> Result<Vec<Entry>, StorageError> {
        if !path.exists() {
            log::info!("[Storage] No history file at {:?}, starting empty", path);
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(path)?;
        let mut entries: Vec<Entry> = serde_json::from_str(&content)?;
        // Stored oldest-first
        entries.reverse();
        Ok(entries)
    }

    fn write_entries(&self, path: &Path) -> Result<(), StorageError> {
        let oldest_first: Vec<&Entry> = self.entries.iter().rev().collect();
        let content = serde_json::to_string_pretty(&oldest_first)?;
        ensure_parent_dir(path)?;
        fs::write(path, content)?;
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => fs::create_dir_all(parent),
        _ => Ok(()),
    }
}
