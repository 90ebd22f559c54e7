//! clipstash - User settings module
//!
//! Manages application configuration

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::clipboard::models::PREVIEW_LENGTH;

/// Global settings instance
static SETTINGS: Lazy<RwLock<Settings>> = Lazy::new(|| RwLock::new(Settings::default()));

/// Default history file name (relative to the working directory)
pub const HISTORY_FILE_NAME: &str = "clipboard_history.json";

/// Default export file name (inside the home directory)
pub const EXPORT_FILE_NAME: &str = "clipboard_history.txt";

/// Settings error type
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// User settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the history is persisted
    pub history_path: PathBuf,
    /// Default export destination
    pub export_path: PathBuf,
    /// Periodic save interval (seconds)
    pub save_interval_secs: u64,
    /// Clipboard polling interval (milliseconds)
    pub poll_interval_ms: u64,
    /// Preview text length
    pub preview_length: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(HISTORY_FILE_NAME),
            export_path: default_export_path(),
            save_interval_secs: 30,
            poll_interval_ms: 150,
            preview_length: PREVIEW_LENGTH,
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults on any failure
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            log::debug!("No settings file at {:?}, using defaults", path);
            return Settings::default();
        }

        match Self::read(path) {
            Ok(settings) => {
                log::info!("Settings loaded from {:?}", path);
                settings
            }
            Err(e) => {
                log::warn!("Failed to load settings from {:?}: {}, using defaults", path, e);
                Settings::default()
            }
        }
    }

    fn read(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// Default settings file location: `<config dir>/clipstash/settings.json`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("clipstash")
        .join("settings.json")
}

/// Default export destination: `~/clipboard_history.txt`
pub fn default_export_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(EXPORT_FILE_NAME)
}

/// Get current settings
pub fn get_settings() -> Settings {
    SETTINGS.read().clone()
}

/// Replace the current settings and persist them to `path`
pub fn update_settings(settings: Settings, path: &Path) -> Result<(), SettingsError> {
    settings.save(path)?;
    *SETTINGS.write() = settings;
    Ok(())
}

/// Initialize settings
pub fn init_settings(settings: Settings) {
    *SETTINGS.write() = settings;
    log::info!("Settings initialized");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.history_path, PathBuf::from("clipboard_history.json"));
        assert!(settings.export_path.ends_with("clipboard_history.txt"));
        assert_eq!(settings.save_interval_secs, 30);
        assert_eq!(settings.poll_interval_ms, 150);
        assert_eq!(settings.preview_length, 300);
    }

    #[test]
    fn test_settings_save_load() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("settings.json");

        let settings = Settings {
            history_path: temp_dir.path().join("history.json"),
            save_interval_secs: 5,
            ..Settings::default()
        };
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path), settings);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        fs::write(&path, r#"{ "poll_interval_ms": 500 }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.poll_interval_ms, 500);
        assert_eq!(settings.save_interval_secs, 30);
    }

    #[test]
    fn test_missing_or_malformed_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        assert_eq!(Settings::load(&path), Settings::default());

        fs::write(&path, "not json").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());
    }

    #[test]
    fn test_update_settings_persists_and_publishes() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("settings.json");
        let settings = Settings {
            preview_length: 42,
            ..Settings::default()
        };

        update_settings(settings.clone(), &path).unwrap();
        assert_eq!(get_settings().preview_length, 42);
        assert_eq!(Settings::load(&path), settings);
    }
}
