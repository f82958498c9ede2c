//! Unified error types for chatlog.
//!
//! This module provides a single [`ChatlogError`] enum that covers every
//! failure the library can report. Per-line parse failures are
//! *not* part of it: malformed log lines are skipped and tallied (see
//! [`ParseFailure`](crate::parser::ParseFailure)), never surfaced as errors.
//!
//! # Error Handling Philosophy
//!
//! - **Configuration errors** (bad pattern, bad date, unknown channel) are
//!   raised once, before any log file is read
//! - **Computation errors** (division by zero in a reducer) are explicit
//!   variants instead of NaN or garbage values
//! - **Lookups** of unknown users report a not-found condition

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for chatlog operations.
///
/// # Example
///
/// ```rust
/// use chatlog::error::Result;
///
/// fn my_function() -> Result<u32> {
///     Ok(42)
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatlogError>;

/// The error type for all chatlog operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatlogError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The logs directory doesn't exist
    /// - A term list or config file cannot be read or written
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A query literal could not be compiled into a matcher.
    #[error("Invalid query '{query}': {source}")]
    InvalidPattern {
        /// The literal that failed to compile
        query: String,
        /// The underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Invalid date in a date selection.
    ///
    /// Dates are expected in YYYY-MM-DD format (single-digit month and day
    /// are accepted and normalized).
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// The UTC offset is outside the range of real time zones.
    #[error("Invalid UTC offset {offset}. Expected a value between -12 and 14")]
    InvalidUtcOffset {
        /// The rejected offset in hours
        offset: i32,
    },

    /// The requested channel has no log directory.
    #[error("Unknown channel '{input}'. Available: {available}")]
    UnknownChannel {
        /// Name or index the user supplied
        input: String,
        /// Comma-separated list of known channels
        available: String,
    },

    /// One or more term list files were missing and have been created empty.
    #[error(
        "Missing term lists (created empty, add one lowercase term per line): {}",
        join_paths(created)
    )]
    MissingTermLists {
        /// Files that were created
        created: Vec<PathBuf>,
    },

    /// No logs folder was configured.
    #[error("No logs folder configured (pass --logs DIR)")]
    MissingLogsFolder,

    /// A reducer was asked to divide by zero.
    ///
    /// Raised by purity scoring for users with no messages and by average
    /// conversion with a zero divisor.
    #[error("Division by zero while computing {context}")]
    DivisionByZero {
        /// What was being computed
        context: String,
    },

    /// A user is not present in a ranking.
    #[error("User \"{user}\" not found in results")]
    UserNotFound {
        /// The username that was looked up
        user: String,
    },

    /// JSON (de)serialization error for config or report output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatlogError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(query: impl Into<String>, source: regex::Error) -> Self {
        ChatlogError::InvalidPattern {
            query: query.into(),
            source,
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        ChatlogError::InvalidDate {
            input: input.into(),
            expected: "YYYY-MM-DD",
        }
    }

    /// Creates a division-by-zero error.
    pub fn division_by_zero(context: impl Into<String>) -> Self {
        ChatlogError::DivisionByZero {
            context: context.into(),
        }
    }

    /// Creates a user-not-found error.
    pub fn user_not_found(user: impl Into<String>) -> Self {
        ChatlogError::UserNotFound { user: user.into() }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, ChatlogError::Io(_))
    }

    /// Returns `true` if this error was raised while building the query or
    /// selecting inputs, before any aggregation.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            ChatlogError::InvalidPattern { .. }
                | ChatlogError::InvalidDate { .. }
                | ChatlogError::InvalidUtcOffset { .. }
                | ChatlogError::UnknownChannel { .. }
                | ChatlogError::MissingLogsFolder
        )
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, ChatlogError::InvalidDate { .. })
    }

    /// Returns `true` if this is a not-found lookup.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ChatlogError::UserNotFound { .. })
    }
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err = ChatlogError::from(io_err);
        let display = err.to_string();
        assert!(display.contains("IO error"));
        assert!(display.contains("file not found"));
    }

    #[test]
    fn test_invalid_pattern_display() {
        let regex_err = regex::Regex::new("(").unwrap_err();
        let err = ChatlogError::invalid_pattern("(", regex_err);
        let display = err.to_string();
        assert!(display.contains("Invalid query '('"));
        assert!(err.is_config());
    }

    #[test]
    fn test_invalid_date_display() {
        let err = ChatlogError::invalid_date("not-a-date");
        let display = err.to_string();
        assert!(display.contains("not-a-date"));
        assert!(display.contains("YYYY-MM-DD"));
        assert!(err.is_invalid_date());
    }

    #[test]
    fn test_missing_term_lists_display() {
        let err = ChatlogError::MissingTermLists {
            created: vec![PathBuf::from("bots.txt"), PathBuf::from("sexual.txt")],
        };
        let display = err.to_string();
        assert!(display.contains("bots.txt, sexual.txt"));
    }

    #[test]
    fn test_division_by_zero_display() {
        let err = ChatlogError::division_by_zero("purity score for alice");
        assert!(err.to_string().contains("purity score for alice"));
    }

    #[test]
    fn test_user_not_found() {
        let err = ChatlogError::user_not_found("ghost");
        assert!(err.is_not_found());
        assert!(!err.is_io());
        assert_eq!(err.to_string(), "User \"ghost\" not found in results");
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let err = ChatlogError::from(io_err);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_is_config() {
        assert!(
            ChatlogError::UnknownChannel {
                input: "x".into(),
                available: String::new()
            }
            .is_config()
        );
        assert!(ChatlogError::InvalidUtcOffset { offset: 20 }.is_config());
        assert!(ChatlogError::MissingLogsFolder.is_config());
        assert!(!ChatlogError::MissingLogsFolder.is_io());
        assert!(!ChatlogError::user_not_found("a").is_config());
    }
}
