//! clipstash - History ownership lock
//!
//! A running watcher keeps its own copy of the history and rewrites the file
//! on every capture and tick. Writers in other processes must not touch the
//! file while it runs, so ownership is marked with `<history>.lock` holding
//! the owner's pid.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use sysinfo::{Pid, ProcessesToUpdate, System};

/// Lock error type
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("history {history:?} is owned by a running watcher (pid {pid})")]
    Held { history: PathBuf, pid: u32 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Exclusive ownership of a history file, released on drop
#[derive(Debug)]
pub struct HistoryLock {
    path: PathBuf,
}

impl HistoryLock {
    /// Take ownership of `history`, reclaiming locks left by dead processes
    pub fn acquire(history: &Path) -> Result<Self, LockError> {
        let path = lock_path(history);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Second attempt only after removing a stale lock
        for _ in 0..2 {
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    write!(file, "{}", std::process::id())?;
                    log::debug!("[Lock] Acquired {:?}", path);
                    return Ok(Self { path });
                }
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    if let Some(pid) = holder(history)? {
                        return Err(LockError::Held {
                            history: history.to_path_buf(),
                            pid,
                        });
                    }
                    log::warn!("[Lock] Removing stale lock {:?}", path);
                    match fs::remove_file(&path) {
                        Ok(()) => {}
                        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                        Err(e) => return Err(e.into()),
                    }
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(io::Error::new(io::ErrorKind::AlreadyExists, format!("lock {:?} keeps reappearing", path)).into())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for HistoryLock {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            log::warn!("[Lock] Failed to release {:?}: {}", self.path, e);
        }
    }
}

/// Lock file guarding `history`
pub fn lock_path(history: &Path) -> PathBuf {
    let mut name = history.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    history.with_file_name(name)
}

/// Pid of the live process owning `history`, if any
pub fn holder(history: &Path) -> io::Result<Option<u32>> {
    let content = match fs::read_to_string(lock_path(history)) {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e),
    };

    Ok(content
        .trim()
        .parse::<u32>()
        .ok()
        .filter(|pid| process_alive(*pid)))
}

fn process_alive(pid: u32) -> bool {
    if pid == std::process::id() {
        return true;
    }
    let pid = Pid::from_u32(pid);
    let mut sys = System::new();
    sys.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    sys.process(pid).is_some()
}
