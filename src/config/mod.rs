//! clipstash - Configuration module

pub mod settings;

pub use settings::{
    default_config_path, default_export_path, get_settings, init_settings, update_settings,
    Settings, SettingsError,
};
