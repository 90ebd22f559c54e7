//! clipstash - Event loop
//!
//! Clipboard changes, monitoring toggles, periodic saves and shutdown are all
//! delivered to one task, so the history has exactly one writer.

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::commands::ClipboardService;

/// Events handled by the loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Clipboard content changed (text may be empty)
    ClipboardChanged(String),
    /// Explicitly enable or disable monitoring
    SetEnabled(bool),
    /// Flip monitoring state
    Toggle,
    /// Report current state
    Status,
    /// Clear the history (already confirmed by the user)
    Clear,
    /// Copy the entry at this index back to the clipboard
    Copy(usize),
    /// Export raw texts, to the configured path when `None`
    Export(Option<PathBuf>),
    /// Save and stop
    Shutdown,
}

impl AppEvent {
    /// Parse a control line typed by the user in watch mode
    pub fn from_control(line: &str) -> Option<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match (word.to_lowercase().as_str(), rest) {
            ("pause" | "off" | "disable", "") => Some(AppEvent::SetEnabled(false)),
            ("resume" | "on" | "enable", "") => Some(AppEvent::SetEnabled(true)),
            ("toggle", "") => Some(AppEvent::Toggle),
            ("status", "") => Some(AppEvent::Status),
            ("quit" | "exit", "") => Some(AppEvent::Shutdown),
            // Clearing is irreversible, the confirmation is part of the line
            ("clear", confirm) if confirm.eq_ignore_ascii_case("yes") => Some(AppEvent::Clear),
            ("copy", index) => index.parse().ok().map(AppEvent::Copy),
            ("export", "") => Some(AppEvent::Export(None)),
            ("export", path) => Some(AppEvent::Export(Some(PathBuf::from(path)))),
            _ => None,
        }
    }
}

/// Run until a shutdown event arrives or every sender is gone.
///
/// The history is saved on every tick of `save_interval` and once more
/// before returning.
pub async fn run_event_loop(
    service: &mut ClipboardService,
    mut events: UnboundedReceiver<AppEvent>,
    save_interval: Duration,
) {
    let mut ticker = interval_at(Instant::now() + save_interval, save_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    log::info!("Event channel closed");
                    break;
                };
                if !handle_event(service, event) {
                    break;
                }
            }
            _ = ticker.tick() => {
                log::debug!("Periodic save");
                service.save();
            }
        }
    }

    service.save();
    log::info!("Event loop stopped, history saved");
}

/// Apply one event. Returns `false` when the loop should stop.
fn handle_event(service: &mut ClipboardService, event: AppEvent) -> bool {
    match event {
        AppEvent::ClipboardChanged(text) => {
            service.notify_clipboard_changed(&text);
        }
        AppEvent::SetEnabled(enabled) => {
            service.set_enabled(enabled);
        }
        AppEvent::Toggle => {
            service.toggle_monitoring();
        }
        AppEvent::Status => {
            let watcher = service.watcher();
            log::info!(
                "Monitoring {}, {} entries in history",
                if watcher.is_enabled() { "on" } else { "off" },
                watcher.store().len()
            );
        }
        AppEvent::Clear => {
            service.request_clear();
        }
        AppEvent::Copy(index) => match service.request_copy(index).into_result() {
            Ok(_) => log::info!("Copied entry {} to the clipboard", index),
            Err(e) => log::warn!("{}", e),
        },
        AppEvent::Export(path) => match service.request_export(path.as_deref()).into_result() {
            Ok(written) => log::info!("Exported history to {:?}", written),
            Err(e) => log::warn!("{}", e),
        },
        AppEvent::Shutdown => {
            log::info!("Shutdown requested");
            return false;
        }
    }
    true
}
