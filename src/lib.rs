//! clipstash - A lightweight clipboard history recorder
//!
//! Watches the system clipboard, keeps every text capture with a timestamp,
//! persists the history as JSON and offers search, copy, export and clear.

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod events;
pub mod storage;

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::{self, UnboundedSender};

use cli::{Cli, Command};
use clipboard::{ClipboardMonitor, SystemClipboard};
use commands::ClipboardService;
use config::{default_config_path, get_settings, init_settings, update_settings, Settings};
use events::{run_event_loop, AppEvent};
use storage::{HistoryLock, LockError};

/// Initialize logger
fn init_logger(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .init();
}

/// Start clipboard monitoring, forwarding changes to the event loop
fn start_clipboard_monitor(poll_interval_ms: u64, events: UnboundedSender<AppEvent>) -> ClipboardMonitor {
    let monitor = ClipboardMonitor::new(poll_interval_ms);
    monitor.start(SystemClipboard::new, move |snapshot| {
        if events.send(AppEvent::ClipboardChanged(snapshot.text)).is_err() {
            log::debug!("[Monitor] Event loop gone, dropping change");
        }
    });
    monitor
}

/// Forward Ctrl-C as a shutdown request
fn spawn_shutdown_listener(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                let _ = events.send(AppEvent::Shutdown);
            }
            Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });
}

const CONTROL_HELP: &str = "pause, resume, toggle, status, copy <index>, export [path], clear yes, quit";

/// Forward control lines typed on stdin to the event loop
fn spawn_control_reader(events: UnboundedSender<AppEvent>) {
    tokio::spawn(async move {
        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => match AppEvent::from_control(&line) {
                    Some(event) => {
                        if events.send(event).is_err() {
                            break;
                        }
                    }
                    None if line.trim().is_empty() => {}
                    None => log::warn!("Unknown control '{}' ({})", line.trim(), CONTROL_HELP),
                },
                Ok(None) => break,
                Err(e) => {
                    log::warn!("Failed to read control input: {}", e);
                    break;
                }
            }
        }
    });
}

/// Record clipboard changes until Ctrl-C or `quit`
fn watch(settings: &Settings, paused: bool) -> Result<(), String> {
    let _lock = HistoryLock::acquire(&settings.history_path).map_err(|e| match e {
        LockError::Held { pid, .. } => format!("Another watcher (pid {}) is already recording this history", pid),
        other => format!("Failed to lock history: {}", other),
    })?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {}", e))?;

    runtime.block_on(async {
        let mut service = ClipboardService::from_settings(settings, Box::new(SystemClipboard::new()));
        if paused {
            service.set_enabled(false);
        }

        let (tx, rx) = mpsc::unbounded_channel();
        let monitor = start_clipboard_monitor(settings.poll_interval_ms, tx.clone());
        spawn_shutdown_listener(tx.clone());
        spawn_control_reader(tx);

        log::info!(
            "Watching clipboard, history at {:?} (controls: {})",
            settings.history_path,
            CONTROL_HELP
        );
        let save_interval = Duration::from_secs(settings.save_interval_secs.max(1));
        run_event_loop(&mut service, rx, save_interval).await;
        monitor.stop();
    });

    // The stdin reader may still be parked on a blocking read
    runtime.shutdown_background();
    Ok(())
}

/// Ask the user to confirm clearing the history
fn confirm_clear() -> bool {
    print!("Clear all clipboard history? This cannot be undone. [y/N] ");
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    match io::stdin().lock().read_line(&mut answer) {
        Ok(_) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

fn open_service(settings: &Settings) -> ClipboardService {
    ClipboardService::from_settings(settings, Box::new(SystemClipboard::new()))
}

/// Clear the history file, unless a running watcher owns it
fn clear_history(settings: &Settings) -> Result<(), String> {
    let _lock = HistoryLock::acquire(&settings.history_path).map_err(|e| match e {
        LockError::Held { pid, .. } => format!(
            "A watcher (pid {}) is recording this history; type 'clear yes' in its session instead",
            pid
        ),
        other => format!("Failed to lock history: {}", other),
    })?;
    open_service(settings).request_clear().into_result()?;
    Ok(())
}

fn execute(command: Command, settings: &Settings, config_path: &Path) -> Result<(), String> {
    match command {
        Command::Watch { paused, .. } => watch(settings, paused),
        Command::List { query, json } => {
            let views = open_service(settings)
                .history(query.as_deref().unwrap_or(""))
                .into_result()?;
            if json {
                let out = serde_json::to_string_pretty(&views)
                    .map_err(|e| format!("Failed to serialize history: {}", e))?;
                println!("{}", out);
            } else if views.is_empty() {
                println!("No entries");
            } else {
                for view in views {
                    println!("[{}] {}\n    {}", view.index, view.timestamp, view.preview);
                }
            }
            Ok(())
        }
        Command::Show { index } => {
            let entry = open_service(settings).entry(index).into_result()?;
            println!("{}", entry.text);
            Ok(())
        }
        Command::Copy { index } => {
            // Stay alive until a clipboard manager or paste takes the text
            ClipboardService::from_settings(settings, Box::new(SystemClipboard::one_shot()))
                .request_copy(index)
                .into_result()?;
            println!("Copied entry {}", index);
            Ok(())
        }
        Command::Export { path } => {
            let written = open_service(settings)
                .request_export(path.as_deref())
                .into_result()?;
            println!("Exported to {}", written.display());
            Ok(())
        }
        Command::Clear { yes } => {
            if !yes && !confirm_clear() {
                println!("Cancelled");
                return Ok(());
            }
            clear_history(settings)?;
            println!("History cleared");
            Ok(())
        }
        Command::Status => {
            let service = open_service(settings);
            let count = service.history_count().into_result()?;
            println!("Entries:  {}", count);
            println!("History:  {}", settings.history_path.display());
            println!("Export:   {}", settings.export_path.display());
            println!("Settings: {}", config_path.display());
            Ok(())
        }
        Command::Config { save } => {
            let out = serde_json::to_string_pretty(settings)
                .map_err(|e| format!("Failed to serialize settings: {}", e))?;
            println!("{}", out);
            if save {
                update_settings(settings.clone(), config_path)
                    .map_err(|e| format!("Failed to save settings: {}", e))?;
                println!("Saved to {}", config_path.display());
            }
            Ok(())
        }
    }
}

/// Application main entry point
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let mut settings = Settings::load(&config_path);
    cli.apply_overrides(&mut settings);
    init_settings(settings);
    let settings = get_settings();

    match execute(cli.command, &settings, &config_path) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
