//! clipstash - Clipboard monitoring module
//!
//! Polls the system clipboard and reports text changes

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use blake3::Hasher;

use super::access::{ClipboardAccess, ClipboardError};

/// Clipboard content snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardSnapshot {
    /// Text content, empty when the clipboard holds no text
    pub text: String,
    /// Content hash
    pub hash: String,
}

impl ClipboardSnapshot {
    pub fn new(text: String) -> Self {
        let hash = compute_hash(text.as_bytes());
        Self { text, hash }
    }
}

/// Tracks the hash of the last observed content.
///
/// The first observation only primes the detector, so content already on
/// the clipboard at startup is not reported.
#[derive(Debug, Default)]
pub struct ChangeDetector {
    last_hash: Option<String>,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot when `content` differs from the previous observation
    pub fn observe(&mut self, content: Option<String>) -> Option<ClipboardSnapshot> {
        let snapshot = ClipboardSnapshot::new(content.unwrap_or_default());
        match self.last_hash.replace(snapshot.hash.clone()) {
            None => None,
            Some(previous) if previous == snapshot.hash => None,
            Some(_) => Some(snapshot),
        }
    }
}

/// Logs clipboard read failures once per outage instead of once per poll
#[derive(Debug, Default)]
struct ReadHealth {
    failures: u64,
}

impl ReadHealth {
    /// Returns true when the result changed the failing/healthy state
    fn record<T>(&mut self, result: &Result<T, ClipboardError>) -> bool {
        match result {
            Ok(_) if self.failures > 0 => {
                log::info!("[Monitor] Clipboard readable again after {} failed reads", self.failures);
                self.failures = 0;
                true
            }
            Ok(_) => false,
            Err(e) => {
                self.failures += 1;
                if self.failures == 1 {
                    log::warn!("[Monitor] Failed to read clipboard: {}", e);
                    true
                } else {
                    log::debug!("[Monitor] Clipboard still unreadable ({} failures): {}", self.failures, e);
                    false
                }
            }
        }
    }
}

/// Clipboard monitor
pub struct ClipboardMonitor {
    /// Whether running
    running: Arc<AtomicBool>,
    /// Polling interval (milliseconds)
    poll_interval_ms: u64,
}

impl ClipboardMonitor {
    /// Create a new monitor
    pub fn new(poll_interval_ms: u64) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            poll_interval_ms,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Start monitoring on a background thread.
    ///
    /// `make_access` runs on that thread, so the clipboard handle never
    /// crosses threads. `callback` is called for every detected change.
    pub fn start<A, M, F>(&self, make_access: M, callback: F)
    where
        A: ClipboardAccess,
        M: FnOnce() -> A + Send + 'static,
        F: Fn(ClipboardSnapshot) + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            log::warn!("[Monitor] Clipboard monitor is already running");
            return;
        }

        let running = Arc::clone(&self.running);
        let interval = Duration::from_millis(self.poll_interval_ms);

        thread::spawn(move || {
            log::info!("[Monitor] Started with {}ms interval", interval.as_millis());
            let mut access = make_access();
            let mut detector = ChangeDetector::new();
            let mut health = ReadHealth::default();

            while running.load(Ordering::SeqCst) {
                let result = access.get_text();
                health.record(&result);
                if let Ok(content) = result {
                    if let Some(snapshot) = detector.observe(content) {
                        log::debug!("[Monitor] New content detected, hash: {}", &snapshot.hash[..8]);
                        callback(snapshot);
                    }
                }

                thread::sleep(interval);
            }

            log::info!("[Monitor] Stopped");
        });
    }

    /// Stop monitoring
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for ClipboardMonitor {
    fn default() -> Self {
        Self::new(150) // Default 150ms polling interval
    }
}

impl Drop for ClipboardMonitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Compute content hash
fn compute_hash(data: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize().to_hex().to_string()
}
