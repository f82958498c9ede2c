//! Core processing logic for chatlog.
//!
//! This module contains:
//! - [`filter`] - Command, bot and minimum-messages filters
//! - [`aggregate`] - The aggregation pipeline over parsed records
//! - [`stats`] - Rankings, purity scores, averages and UTC alignment
//! - [`words`] - Word frequency over matched messages
//!
//! # Quick Start
//!
//! ```rust
//! use chatlog::core::{run, AggregationOptions, FilterConfig, rank, SortOrder};
//! use chatlog::query::CompoundQuery;
//! use chatlog::LogRecord;
//!
//! let records = vec![
//!     LogRecord::new(20, "alice", "gg"),
//!     LogRecord::new(20, "bob", "gg"),
//!     LogRecord::new(21, "bob", "gg wp"),
//! ];
//! let result = run(records, &CompoundQuery::all(), &FilterConfig::new(), AggregationOptions::new());
//! let ranked = rank(result.message_counts(), SortOrder::Descending);
//! assert_eq!(ranked[0], ("bob".to_string(), 2));
//! ```

pub mod aggregate;
pub mod filter;
pub mod stats;
pub mod words;

// Re-export main types for convenience
pub use aggregate::{
    AggregationOptions, AggregationResult, Aggregator, HourHistogram, Purity, UserAggregate, run,
    run_stream,
};
pub use filter::{FilterConfig, passes_filters};
pub use stats::{
    HourRow, PurityPolicy, SortOrder, align_to_utc, per_day_average, per_message_average,
    placement, purity_score, rank,
};
pub use words::{WordCount, WordCountConfig, word_frequency};
