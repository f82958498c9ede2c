//! Progress reporting for multi-file reads.
//!
//! A query reads one log file per selected day. [`LogStream`] reports a
//! [`Progress`] snapshot through a [`ProgressCallback`] each time it finishes
//! a file.
//!
//! # Example
//!
//! ```rust
//! use chatlog::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     if let Some(pct) = progress.percentage() {
//!         println!("Progress: {:.1}%", pct);
//!     }
//! });
//!
//! for done in 1..=4usize {
//!     callback(Progress::new(done, 4).with_lines(done * 100));
//! }
//! ```
//!
//! [`LogStream`]: crate::stream::LogStream

use std::sync::Arc;

/// Progress through the selected log files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Files read so far.
    pub files_processed: usize,

    /// Files selected for this query.
    pub total_files: usize,

    /// Lines read so far, across all files.
    pub lines_processed: usize,
}

impl Progress {
    /// Creates a new progress instance.
    pub fn new(files_processed: usize, total_files: usize) -> Self {
        Self {
            files_processed,
            total_files,
            lines_processed: 0,
        }
    }

    /// Sets the number of lines read so far.
    #[must_use]
    pub fn with_lines(mut self, lines: usize) -> Self {
        self.lines_processed = lines;
        self
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// Returns `None` before any file has been selected.
    ///
    /// ```rust
    /// use chatlog::progress::Progress;
    ///
    /// assert_eq!(Progress::new(1, 4).percentage(), Some(25.0));
    /// assert_eq!(Progress::new(0, 0).percentage(), None);
    /// ```
    pub fn percentage(&self) -> Option<f64> {
        (self.total_files > 0)
            .then(|| self.files_processed as f64 / self.total_files as f64 * 100.0)
    }

    /// Returns whether every selected file has been read.
    pub fn is_complete(&self) -> bool {
        self.files_processed >= self.total_files
    }

    /// Files left to read.
    pub fn remaining_files(&self) -> usize {
        self.total_files.saturating_sub(self.files_processed)
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that rewrites one line on stderr.
///
/// ```text
/// Reading logs... (3/10)
/// ```
pub fn stderr_progress() -> ProgressCallback {
    Arc::new(|progress| {
        eprint!(
            "Reading logs... ({}/{})\r",
            progress.files_processed, progress.total_files
        );
        if progress.is_complete() {
            eprintln!();
        }
    })
}
