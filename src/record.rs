//! One parsed chat line.
//!
//! [`LogRecord`] is what the [`parser`](crate::parser) produces for every
//! well-formed transcript line. Records are ephemeral: the aggregation
//! pipeline consumes them and keeps only the pieces it needs.
//!
//! # Example
//!
//! ```
//! use chatlog::LogRecord;
//!
//! let record = LogRecord::new(14, "alice", "hello world").with_date("2024-01-15");
//! assert_eq!(record.hour(), 14);
//! assert_eq!(record.user(), "alice");
//! assert_eq!(record.date(), "2024-01-15");
//! ```

use serde::{Deserialize, Serialize};

/// A single chat message read from a per-day log file.
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | `hour` | `u8` | Hour of day (0-23) the message was sent, local time |
/// | `user` | `String` | Lowercase username |
/// | `message` | `String` | Message text |
/// | `date` | `String` | Day of the log file (`YYYY-MM-DD`) |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Hour of day, always in `0..24`.
    pub hour: u8,

    /// Username of the author.
    pub user: String,

    /// Message text with the `username: ` prefix removed.
    pub message: String,

    /// Date of the log file the line came from.
    ///
    /// Empty when the record was built outside of a log file.
    #[serde(default)]
    pub date: String,
}

impl LogRecord {
    /// Creates a record without a date.
    pub fn new(hour: u8, user: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            hour,
            user: user.into(),
            message: message.into(),
            date: String::new(),
        }
    }

    /// Builder method to set the date.
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    /// Returns the hour of day.
    pub fn hour(&self) -> u8 {
        self.hour
    }

    /// Returns the username.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Returns the message text.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the log date.
    pub fn date(&self) -> &str {
        &self.date
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_has_no_date() {
        let record = LogRecord::new(3, "bob", "hi");
        assert!(record.date().is_empty());
        assert_eq!(record.message(), "hi");
    }

    #[test]
    fn test_serde_roundtrip() {
        let record = LogRecord::new(23, "bob", "late").with_date("2024-02-01");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: LogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, parsed);
    }

    #[test]
    fn test_missing_date_defaults() {
        let parsed: LogRecord =
            serde_json::from_str(r#"{"hour":1,"user":"a","message":"m"}"#).unwrap();
        assert_eq!(parsed.date, "");
    }
}
