//! # Chatlog
//!
//! A Rust library for querying per-day Twitch chat logs written by
//! Chatterino and computing statistics over the matching messages.
//!
//! ## Overview
//!
//! Chatterino keeps one file per channel per day:
//!
//! ```text
//! <logs>/Twitch/Channels/<channel>/<channel>-2024-01-15.log
//! [14:02:33]  some_user: message text
//! ```
//!
//! Chatlog parses those lines, filters them through a small query language
//! and aggregates per-user counts, word and character totals, purity scores,
//! per-day counts and an hour-of-day histogram.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatlog::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let lines = [
//!         "[01:02:03]  alice: hello world",
//!         "[01:05:00]  bob: !ping",
//!         "[13:00:00]  alice: HELLO AGAIN",
//!     ];
//!
//!     let query = CompoundQuery::parse("$alice", false, false, false)?;
//!     let filters = FilterConfig::new().with_exclude_commands(true);
//!
//!     let mut aggregator = Aggregator::new(&query, &filters, AggregationOptions::new());
//!     aggregator.begin_day("2024-01-15");
//!     for line in lines {
//!         aggregator.push_line(line, "2024-01-15");
//!     }
//!     let result = aggregator.finish();
//!
//!     assert_eq!(result.total_count, 2);
//!     assert_eq!(result.hours.get(13), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Reading a Logs Folder
//!
//! ```rust,no_run
//! use chatlog::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let logs = LogDirectory::new("/home/me/.local/share/chatterino/Logs");
//! let days = logs.day_logs("somechannel", &DateSelection::parse(">2024-01-01")?)?;
//!
//! let result = run_stream(
//!     LogStream::new(days),
//!     &CompoundQuery::parse("`U", false, false, false)?,
//!     &FilterConfig::new(),
//!     AggregationOptions::new(),
//! )?;
//! let ranked = rank(result.message_counts(), SortOrder::Descending);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Structure
//!
//! - [`query`] - Query descriptors, the pattern matcher and the query syntax
//! - [`parser`] - Log line parser ([`parse_line`](parser::parse_line))
//! - [`terms`] - Term lists and the purity classifier
//! - [`core`] - Filters, aggregation, reducers and word frequency
//! - [`directory`] - Channel listing and [`DateSelection`](directory::DateSelection)
//! - [`stream`] - [`LogStream`](stream::LogStream) over the selected days
//! - [`record`] - The parsed [`LogRecord`]
//! - [`progress`] - Progress reporting while files are read
//! - [`report`] - [`Report`](report::Report) building and rendering
//! - [`config`] - Persistent [`AppConfig`](config::AppConfig)
//! - [`error`] - Unified error types ([`ChatlogError`], [`Result`])
//! - [`prelude`] - Convenient re-exports

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod directory;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod parser;
pub mod progress;
pub mod query;
pub mod record;
pub mod report;
pub mod stream;
pub mod terms;

// Re-export the main types at the crate root for convenience
pub use error::{ChatlogError, Result};
pub use record::LogRecord;

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatlog::prelude::*;
/// ```
pub mod prelude {
    // Core record type
    pub use crate::LogRecord;

    // Error types
    pub use crate::error::{ChatlogError, Result};

    // Queries
    pub use crate::query::{CompoundQuery, Mode, QueryDescriptor, QueryKind, SearchType};

    // Parsing and input
    pub use crate::directory::{DateSelection, LogDirectory};
    pub use crate::parser::parse_line;
    pub use crate::stream::{LogEvent, LogStream};
    pub use crate::terms::{TermLists, TermSet};

    // Aggregation and reducers
    pub use crate::core::{
        AggregationOptions, AggregationResult, Aggregator, FilterConfig, SortOrder,
        WordCountConfig, align_to_utc, placement, purity_score, rank, run, run_stream,
    };

    // Reports and settings
    pub use crate::config::AppConfig;
    pub use crate::report::{Report, ReportOptions};
}
