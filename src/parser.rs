//! Parser for raw transcript lines.
//!
//! Chatterino writes one file per channel per day. Every chat line has the
//! shape:
//!
//! ```text
//! [14:02:33]  some_user: message text
//! ```
//!
//! A bracketed timestamp, **two** spaces, a lowercase username, `: ` and the
//! message. Only the hour of the timestamp is kept. Anything else (join
//! notices, blank lines, truncated writes) is a [`ParseFailure`]: the caller
//! skips the line and keeps going.
//!
//! # Example
//!
//! ```
//! use chatlog::parser::{parse_line, ParseFailure};
//!
//! let record = parse_line("[01:02:03]  alice: hello world", "2024-01-15").unwrap();
//! assert_eq!(record.hour, 1);
//! assert_eq!(record.user, "alice");
//! assert_eq!(record.message, "hello world");
//!
//! assert_eq!(parse_line("# Start logging at ...", "2024-01-15"), Err(ParseFailure::Shape));
//! ```

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::LogRecord;

/// `[H:MM:SS]  user: message`; minutes and seconds are optional so that
/// hand-trimmed logs still parse.
static LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[(\d{1,2})(?::\d{1,2}){0,2}\]  ([a-z\d_]+): (.*)$").expect("valid line regex")
});

/// Why a line was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseFailure {
    /// The line is empty after trimming.
    #[error("blank line")]
    Blank,
    /// The line does not have the `[HH:MM:SS]  user: message` shape.
    #[error("line does not match '[HH:MM:SS]  user: message'")]
    Shape,
    /// The hour component is not a valid hour of day.
    #[error("hour {0} is out of range")]
    HourOutOfRange(u8),
}

/// Parses one raw line into a [`LogRecord`] stamped with `date`.
///
/// Leading and trailing whitespace on the line is insignificant. The hour is
/// read from the first timestamp component, so `[1:02:03]` and `[01:02:03]`
/// both land in hour 1.
pub fn parse_line(raw: &str, date: &str) -> Result<LogRecord, ParseFailure> {
    let line = raw.trim();
    if line.is_empty() {
        return Err(ParseFailure::Blank);
    }

    let caps = LINE_PATTERN.captures(line).ok_or(ParseFailure::Shape)?;

    let hour: u8 = caps[1].parse().map_err(|_| ParseFailure::Shape)?;
    if hour > 23 {
        return Err(ParseFailure::HourOutOfRange(hour));
    }

    Ok(LogRecord {
        hour,
        user: caps[2].to_string(),
        message: caps[3].to_string(),
        date: date.to_string(),
    })
}

/// Line counters for one query execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct ParseStats {
    /// Lines turned into records.
    pub parsed: usize,
    /// Non-blank lines that were rejected.
    pub skipped: usize,
    /// Blank lines.
    pub blank: usize,
}

impl ParseStats {
    /// Records the outcome of one line.
    pub fn record<T>(&mut self, outcome: &Result<T, ParseFailure>) {
        match outcome {
            Ok(_) => self.parsed += 1,
            Err(ParseFailure::Blank) => self.blank += 1,
            Err(_) => self.skipped += 1,
        }
    }

    /// Total number of lines seen.
    pub fn total(&self) -> usize {
        self.parsed + self.skipped + self.blank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_line() {
        let record = parse_line("[13:45:10]  some_user42: Hello there!", "2024-03-01").unwrap();
        assert_eq!(record.hour, 13);
        assert_eq!(record.user, "some_user42");
        assert_eq!(record.message, "Hello there!");
        assert_eq!(record.date, "2024-03-01");
    }

    #[test]
    fn test_surrounding_whitespace_ignored() {
        let record = parse_line("   [00:00:01]  bob: hi   \r\n", "d").unwrap();
        assert_eq!(record.hour, 0);
        assert_eq!(record.message, "hi");
    }

    #[test]
    fn test_hour_is_canonical_without_padding() {
        let padded = parse_line("[01:02:03]  alice: a", "d").unwrap();
        let unpadded = parse_line("[1:02:03]  alice: a", "d").unwrap();
        assert_eq!(padded.hour, 1);
        assert_eq!(unpadded.hour, 1);
    }

    #[test]
    fn test_message_keeps_colons() {
        let record = parse_line("[10:00:00]  alice: time is 10:30: ok", "d").unwrap();
        assert_eq!(record.message, "time is 10:30: ok");
    }

    #[test]
    fn test_single_space_rejected() {
        assert_eq!(
            parse_line("[10:00:00] alice: hi", "d"),
            Err(ParseFailure::Shape)
        );
    }

    #[test]
    fn test_uppercase_username_rejected() {
        assert_eq!(
            parse_line("[10:00:00]  Alice: hi", "d"),
            Err(ParseFailure::Shape)
        );
    }

    #[test]
    fn test_hour_out_of_range() {
        assert_eq!(
            parse_line("[25:00:00]  alice: hi", "d"),
            Err(ParseFailure::HourOutOfRange(25))
        );
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse_line("   ", "d"), Err(ParseFailure::Blank));
    }

    #[test]
    fn test_parse_stats() {
        let mut stats = ParseStats::default();
        for line in ["[01:00:00]  a: x", "", "garbage", "[02:00:00]  b: y"] {
            stats.record(&parse_line(line, "d"));
        }
        assert_eq!(stats.parsed, 2);
        assert_eq!(stats.blank, 1);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.total(), 4);
    }
}
