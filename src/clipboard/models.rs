//! clipstash - Clipboard history data models
//!
//! Defines the recorded entry and its display projection

use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Timestamp layout used both in memory and on disk
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Default preview length (characters)
pub const PREVIEW_LENGTH: usize = 300;

/// Marker appended to truncated previews
pub const ELLIPSIS: char = '…';

/// One recorded clipboard capture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Capture time, `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// Raw captured text, newlines preserved
    pub text: String,
}

impl Entry {
    /// Create an entry stamped with the given instant
    pub fn captured_at<Tz>(at: DateTime<Tz>, text: String) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        Self {
            timestamp: at.format(TIMESTAMP_FORMAT).to_string(),
            text,
        }
    }

    /// Whether the text carries any visible content
    pub fn has_content(text: &str) -> bool {
        !text.trim().is_empty()
    }

    /// Case-insensitive substring match against timestamp or text.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle) || self.timestamp.to_lowercase().contains(needle)
    }

    /// Preview text for list display
    pub fn preview(&self, max_len: usize) -> String {
        generate_preview(&self.text, max_len)
    }
}

/// Collapse whitespace runs to single spaces and truncate to `max_len` characters
pub fn generate_preview(text: &str, max_len: usize) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= max_len {
        collapsed
    } else {
        let mut truncated: String = collapsed.chars().take(max_len).collect();
        truncated.push(ELLIPSIS);
        truncated
    }
}

/// Simplified record for front-end display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    /// Position in the newest-first history
    pub index: usize,
    pub timestamp: String,
    pub preview: String,
}

impl EntryView {
    pub fn from_entry(index: usize, entry: &Entry, preview_length: usize) -> Self {
        Self {
            index,
            timestamp: entry.timestamp.clone(),
            preview: entry.preview(preview_length),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Local;

    use super::*;

    #[test]
    fn test_preview_collapses_whitespace() {
        assert_eq!(generate_preview("a\n\nb   c", PREVIEW_LENGTH), "a b c");
        assert_eq!(generate_preview("  \tleading\r\ntrailing \n", PREVIEW_LENGTH), "leading trailing");
    }

    #[test]
    fn test_preview_truncates_long_text() {
        let text = "x".repeat(450);
        let preview = generate_preview(&text, PREVIEW_LENGTH);
        assert_eq!(preview.chars().count(), 301);
        assert!(preview.ends_with(ELLIPSIS));

        let exact = "y".repeat(300);
        assert_eq!(generate_preview(&exact, PREVIEW_LENGTH), exact);
    }

    #[test]
    fn test_preview_counts_characters_not_bytes() {
        let text = "剪".repeat(301);
        let preview = generate_preview(&text, PREVIEW_LENGTH);
        assert_eq!(preview.chars().count(), 301);
        assert!(preview.starts_with("剪剪"));
    }

    #[test]
    fn test_preview_does_not_touch_stored_text() {
        let entry = Entry {
            timestamp: "2024-01-01 00:00:00".to_string(),
            text: "line one\n\nline   two".to_string(),
        };
        assert_eq!(entry.preview(PREVIEW_LENGTH), "line one line two");
        assert_eq!(entry.text, "line one\n\nline   two");
    }

    #[test]
    fn test_captured_at_formats_to_seconds() {
        let at = Local.with_ymd_and_hms(2024, 1, 1, 0, 0, 5).unwrap();
        let entry = Entry::captured_at(at, "hello".to_string());
        assert_eq!(entry.timestamp, "2024-01-01 00:00:05");
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let entry = Entry {
            timestamp: "2024-03-09 12:00:00".to_string(),
            text: "Hello World".to_string(),
        };
        assert!(entry.matches("world"));
        assert!(entry.matches("03-09"));
        assert!(entry.matches(""));
        assert!(!entry.matches("planet"));
    }

    #[test]
    fn test_has_content() {
        assert!(!Entry::has_content(""));
        assert!(!Entry::has_content(" \n\t "));
        assert!(Entry::has_content(" x "));
    }
}
