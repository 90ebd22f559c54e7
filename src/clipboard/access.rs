//! clipstash - System clipboard access
//!
//! Narrow read/write interface over the platform clipboard

use arboard::Clipboard;

/// Clipboard error type
#[derive(Debug, thiserror::Error)]
pub enum ClipboardError {
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),
    #[error("Clipboard read failed: {0}")]
    Read(String),
    #[error("Clipboard write failed: {0}")]
    Write(String),
}

/// Plain-text clipboard collaborator
pub trait ClipboardAccess {
    /// Current text content, `None` when the clipboard holds no text
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError>;

    /// Replace the clipboard content with `text`
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// arboard-backed platform clipboard
///
/// The handle is opened lazily and kept, so text written from this process
/// stays owned by it on platforms where ownership ends with the handle.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<Clipboard>,
    wait_on_set: bool,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clipboard for a process that exits right after writing.
    ///
    /// On Linux `set_text` blocks until another application takes the
    /// selection, so the text outlives the process.
    pub fn one_shot() -> Self {
        Self {
            inner: None,
            wait_on_set: true,
        }
    }

    fn handle(&mut self) -> Result<&mut Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard handle missing".to_string()))
    }

    #[cfg(target_os = "linux")]
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        use arboard::SetExtLinux;

        let wait = self.wait_on_set;
        let clipboard = self.handle()?;
        let result = if wait {
            log::info!("[Clipboard] Holding the selection until another application takes it");
            clipboard.set().wait().text(text)
        } else {
            clipboard.set_text(text)
        };
        result.map_err(|e| ClipboardError::Write(e.to_string()))
    }

    #[cfg(not(target_os = "linux"))]
    fn write(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Map an arboard read result; non-text content is `None`, not an error
fn map_read(result: Result<String, arboard::Error>) -> Result<Option<String>, ClipboardError> {
    match result {
        Ok(text) => Ok(Some(text)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(ClipboardError::Read(e.to_string())),
    }
}

impl ClipboardAccess for SystemClipboard {
    fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
        let result = map_read(self.handle()?.get_text());
        if result.is_err() {
            // Drop the handle so the next call reconnects
            self.inner = None;
        }
        result
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.write(text)?;
        log::debug!("[Clipboard] Wrote {} chars", text.chars().count());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_text_is_not_an_error() {
        assert_eq!(map_read(Err(arboard::Error::ContentNotAvailable)).unwrap(), None);
        assert_eq!(map_read(Ok("hi".to_string())).unwrap(), Some("hi".to_string()));
    }

    #[test]
    fn test_other_read_failures_are_errors() {
        let err = map_read(Err(arboard::Error::ClipboardOccupied)).unwrap_err();
        assert!(matches!(err, ClipboardError::Read(_)));
    }

    #[test]
    fn test_one_shot_waits_on_set() {
        assert!(SystemClipboard::one_shot().wait_on_set);
        assert!(!SystemClipboard::new().wait_on_set);
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    /// In-memory clipboard shared between a test and the code under test
    #[derive(Clone, Default)]
    pub struct MemoryClipboard {
        pub content: Arc<Mutex<Option<String>>>,
        pub reads: Arc<AtomicUsize>,
    }

    impl MemoryClipboard {
        pub fn with_text(text: &str) -> Self {
            Self {
                content: Arc::new(Mutex::new(Some(text.to_string()))),
                ..Default::default()
            }
        }

        pub fn put(&self, text: &str) {
            *self.content.lock() = Some(text.to_string());
        }

        pub fn current(&self) -> Option<String> {
            self.content.lock().clone()
        }

        pub fn read_count(&self) -> usize {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl ClipboardAccess for MemoryClipboard {
        fn get_text(&mut self) -> Result<Option<String>, ClipboardError> {
            let content = self.content.lock().clone();
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(content)
        }

        fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            self.put(text);
            Ok(())
        }
    }
}
