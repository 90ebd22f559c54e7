//! clipstash - Command line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

/// Clipboard history recorder
#[derive(Debug, Parser)]
#[command(name = "clipstash", version, about = "Record, search and export clipboard history")]
pub struct Cli {
    /// Settings file (defaults to <config dir>/clipstash/settings.json)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// History file, overrides the settings file
    #[arg(long, global = true)]
    pub history: Option<PathBuf>,

    /// Verbosity level for logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Watch the clipboard and record every text change
    Watch {
        /// Seconds between periodic saves
        #[arg(long)]
        save_interval: Option<u64>,
        /// Milliseconds between clipboard polls
        #[arg(long)]
        poll_interval: Option<u64>,
        /// Start with monitoring disabled
        #[arg(long)]
        paused: bool,
    },
    /// List entries, newest first
    List {
        /// Only entries whose text or timestamp contains this (case-insensitive)
        query: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the full text of one entry
    Show { index: usize },
    /// Copy an entry back to the clipboard
    Copy { index: usize },
    /// Write every entry's text to a plain-text file
    Export {
        /// Destination (defaults to ~/clipboard_history.txt)
        path: Option<PathBuf>,
    },
    /// Delete all entries
    Clear {
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Show history size and file locations
    Status,
    /// Print the effective settings
    Config {
        /// Write the effective settings to the settings file
        #[arg(long)]
        save: bool,
    },
}

impl Cli {
    /// Apply command line overrides on top of file settings
    pub fn apply_overrides(&self, settings: &mut Settings) {
        if let Some(history) = &self.history {
            settings.history_path = history.clone();
        }
        if let Command::Watch {
            save_interval,
            poll_interval,
            ..
        } = &self.command
        {
            if let Some(secs) = save_interval {
                settings.save_interval_secs = *secs;
            }
            if let Some(ms) = poll_interval {
                settings.poll_interval_ms = *ms;
            }
        }
    }
}
