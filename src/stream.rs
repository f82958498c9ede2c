//! Streaming over the selected day files.
//!
//! [`LogStream`] reads one file at a time, in date order, and yields a
//! [`LogEvent`] per line plus a [`LogEvent::DayStart`] marker before each
//! file. Files are decoded lossily: invalid UTF-8 is replaced, never fatal.
//!
//! # Example
//!
//! ```no_run
//! use chatlog::directory::{DateSelection, LogDirectory};
//! use chatlog::stream::{LogEvent, LogStream};
//!
//! # fn main() -> chatlog::Result<()> {
//! let logs = LogDirectory::new("/home/me/Chatterino2/Logs");
//! let days = logs.day_logs("somechannel", &DateSelection::All)?;
//!
//! for event in LogStream::new(days) {
//!     if let LogEvent::Record(record) = event? {
//!         println!("{}: {}", record.user, record.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::Path;
use std::vec;

use crate::LogRecord;
use crate::directory::DayLog;
use crate::error::Result;
use crate::parser::{ParseFailure, parse_line};
use crate::progress::{Progress, ProgressCallback};

/// One item of a [`LogStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEvent {
    /// A new day file is about to be read.
    DayStart {
        /// Day of the file, `YYYY-MM-DD`.
        date: String,
    },
    /// A well-formed line.
    Record(LogRecord),
    /// A line that did not parse.
    Skipped {
        /// Day of the file.
        date: String,
        /// 1-based line number.
        line: usize,
        /// Why the line was rejected.
        reason: ParseFailure,
    },
}

/// Reads a file as UTF-8, replacing invalid sequences.
pub fn read_file_lossy(path: &Path) -> std::io::Result<String> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

struct OpenDay {
    date: String,
    lines: vec::IntoIter<String>,
    line_no: usize,
}

/// Iterator of [`LogEvent`]s across day files.
///
/// An unreadable file yields one `Err` and the stream moves on to the next
/// day.
pub struct LogStream {
    days: vec::IntoIter<DayLog>,
    current: Option<OpenDay>,
    total_files: usize,
    files_processed: usize,
    lines_processed: usize,
    on_progress: Option<ProgressCallback>,
}

impl LogStream {
    /// Creates a stream over `days`, read in the given order.
    pub fn new(days: Vec<DayLog>) -> Self {
        Self {
            total_files: days.len(),
            days: days.into_iter(),
            current: None,
            files_processed: 0,
            lines_processed: 0,
            on_progress: None,
        }
    }

    /// Reports progress after every file.
    #[must_use]
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Current progress.
    pub fn progress(&self) -> Progress {
        Progress::new(self.files_processed, self.total_files).with_lines(self.lines_processed)
    }

    fn finish_day(&mut self) {
        if let Some(day) = self.current.take() {
            self.files_processed += 1;
            tracing::debug!(date = %day.date, lines = day.line_no, "Finished log file");
            if let Some(ref callback) = self.on_progress {
                callback(self.progress());
            }
        }
    }

    fn open_next(&mut self) -> Option<Result<LogEvent>> {
        let day = self.days.next()?;
        let date = day.date.to_string();
        match read_file_lossy(&day.path) {
            Ok(content) => {
                let lines: Vec<String> = content.lines().map(str::to_string).collect();
                self.current = Some(OpenDay {
                    date: date.clone(),
                    lines: lines.into_iter(),
                    line_no: 0,
                });
                Some(Ok(LogEvent::DayStart { date }))
            }
            Err(e) => {
                tracing::warn!(path = %day.path.display(), error = %e, "Failed to read log file");
                self.files_processed += 1;
                Some(Err(e.into()))
            }
        }
    }
}

impl Iterator for LogStream {
    type Item = Result<LogEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(day) = self.current.as_mut() {
                if let Some(raw) = day.lines.next() {
                    day.line_no += 1;
                    self.lines_processed += 1;
                    let event = match parse_line(&raw, &day.date) {
                        Ok(record) => LogEvent::Record(record),
                        Err(reason) => LogEvent::Skipped {
                            date: day.date.clone(),
                            line: day.line_no,
                            reason,
                        },
                    };
                    return Some(Ok(event));
                }
                self.finish_day();
                continue;
            }
            return self.open_next();
        }
    }
}
