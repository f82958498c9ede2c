//! The aggregation pipeline.
//!
//! Records flow through [`Aggregator`] one at a time:
//!
//! ```text
//! parse → exclude commands → exclude bots → CompoundQuery → accumulate
//! ```
//!
//! Accepted records update the total, the per-day count, the
//! [`HourHistogram`] and the record author's [`UserAggregate`]. When the
//! stream ends, [`Aggregator::finish`] applies the minimum-messages filter to
//! user-keyed data and returns the [`AggregationResult`].
//!
//! Every accepted message is kept in its author's aggregate (for random
//! sampling and word counting), so memory grows with the size of the
//! selected logs.
//!
//! # Example
//!
//! ```
//! use chatlog::core::aggregate::{run, AggregationOptions};
//! use chatlog::core::FilterConfig;
//! use chatlog::query::CompoundQuery;
//! use chatlog::LogRecord;
//!
//! let records = vec![
//!     LogRecord::new(1, "alice", "hello world"),
//!     LogRecord::new(1, "bob", "!ping"),
//! ];
//! let filters = FilterConfig::new().with_exclude_commands(true);
//! let result = run(records, &CompoundQuery::all(), &filters, AggregationOptions::new());
//!
//! assert_eq!(result.total_count, 1);
//! assert_eq!(result.users["alice"].message_count, 1);
//! assert_eq!(result.hours.get(1), 1);
//! ```

use std::collections::BTreeMap;

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::LogRecord;
use crate::core::filter::{FilterConfig, passes_filters};
use crate::core::stats::per_day_average;
use crate::error::{ChatlogError, Result};
use crate::parser::{ParseStats, parse_line};
use crate::query::CompoundQuery;
use crate::stream::LogEvent;
use crate::terms::{TermSet, is_impure};

/// What to accumulate besides counts.
///
/// Term sets are borrowed for the duration of one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationOptions<'a> {
    /// Sum the number of words per user.
    pub count_words: bool,
    /// Sum the number of non-space characters per user.
    pub count_chars: bool,
    /// Classify every accepted message against these terms.
    pub purity_terms: Option<&'a TermSet>,
    /// Usernames dropped by the bot filter.
    pub bots: Option<&'a TermSet>,
    /// Keep every accepted record, in processing order.
    pub keep_matches: bool,
}

impl<'a> AggregationOptions<'a> {
    /// Creates options that only count messages.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables per-user word totals.
    #[must_use]
    pub fn with_word_counts(mut self, enabled: bool) -> Self {
        self.count_words = enabled;
        self
    }

    /// Enables or disables per-user character totals.
    #[must_use]
    pub fn with_char_counts(mut self, enabled: bool) -> Self {
        self.count_chars = enabled;
        self
    }

    /// Enables purity classification against `terms`.
    #[must_use]
    pub fn with_purity(mut self, terms: &'a TermSet) -> Self {
        self.purity_terms = Some(terms);
        self
    }

    /// Keeps accepted records for display.
    #[must_use]
    pub fn with_matches(mut self, keep: bool) -> Self {
        self.keep_matches = keep;
        self
    }

    /// Sets the bot list used by [`FilterConfig::exclude_bots`].
    #[must_use]
    pub fn with_bots(mut self, bots: &'a TermSet) -> Self {
        self.bots = Some(bots);
        self
    }
}

/// Pure and impure message counts for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Purity {
    /// Messages without flagged vocabulary.
    pub pure: u64,
    /// Messages with flagged vocabulary.
    pub impure: u64,
}

impl Purity {
    /// Creates purity counts.
    pub fn new(pure: u64, impure: u64) -> Self {
        Self { pure, impure }
    }

    /// Total classified messages.
    pub fn total(&self) -> u64 {
        self.pure + self.impure
    }
}

/// Everything accumulated for one username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserAggregate {
    /// Accepted messages.
    pub message_count: u64,
    /// Accepted message texts, in processing order.
    pub messages: Vec<String>,
    /// Sum of words, when enabled.
    pub word_total: u64,
    /// Sum of non-space characters, when enabled.
    pub char_total: u64,
    /// Purity counts, when enabled.
    pub purity: Purity,
}

/// Message counts keyed by hour of day.
///
/// Only observed hours are present; keys iterate in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HourHistogram {
    counts: BTreeMap<u8, u64>,
}

impl HourHistogram {
    /// Creates an empty histogram.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one message at `hour`.
    pub fn increment(&mut self, hour: u8) {
        *self.counts.entry(hour % 24).or_insert(0) += 1;
    }

    /// Count for `hour`, zero when unobserved.
    pub fn get(&self, hour: u8) -> u64 {
        self.counts.get(&hour).copied().unwrap_or(0)
    }

    /// Iterates `(hour, count)` in ascending hour order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u64)> + '_ {
        self.counts.iter().map(|(h, c)| (*h, *c))
    }

    /// Number of observed hours.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` if nothing was counted.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum over all hours.
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Each count divided by `days`, truncated.
    pub fn per_day(&self, days: usize) -> Result<Self> {
        if days == 0 {
            return Err(ChatlogError::division_by_zero("per-day average"));
        }
        let counts = self
            .counts
            .iter()
            .map(|(h, c)| Ok((*h, per_day_average(*c, days)?)))
            .collect::<Result<_>>()?;
        Ok(Self { counts })
    }
}

impl FromIterator<(u8, u64)> for HourHistogram {
    fn from_iter<T: IntoIterator<Item = (u8, u64)>>(iter: T) -> Self {
        let mut hist = Self::new();
        for (hour, count) in iter {
            *hist.counts.entry(hour % 24).or_insert(0) += count;
        }
        hist
    }
}

/// Output of one query execution.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AggregationResult {
    /// Accepted messages, before the minimum-messages filter.
    pub total_count: u64,
    /// Per-user data in first-seen order.
    pub users: IndexMap<String, UserAggregate>,
    /// Accepted messages by hour, before the minimum-messages filter.
    pub hours: HourHistogram,
    /// Accepted messages per day, in processing order. Days without a match
    /// are present with zero.
    pub daily: IndexMap<String, u64>,
    /// Line counters.
    pub parse_stats: ParseStats,
    /// Whether purity counts were collected.
    pub purity_enabled: bool,
    /// Accepted records, when [`AggregationOptions::keep_matches`] is set.
    /// Not affected by the minimum-messages filter.
    pub matched: Vec<LogRecord>,
}

impl AggregationResult {
    /// Number of days processed.
    pub fn days(&self) -> usize {
        self.daily.len()
    }

    /// Returns `true` if no user is left in the results.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// `(user, message_count)` in first-seen order.
    pub fn message_counts(&self) -> Vec<(String, u64)> {
        self.user_values(|u| u.message_count)
    }

    /// `(user, word_total)` in first-seen order.
    pub fn word_totals(&self) -> Vec<(String, u64)> {
        self.user_values(|u| u.word_total)
    }

    /// `(user, char_total)` in first-seen order.
    pub fn char_totals(&self) -> Vec<(String, u64)> {
        self.user_values(|u| u.char_total)
    }

    fn user_values(&self, value: impl Fn(&UserAggregate) -> u64) -> Vec<(String, u64)> {
        self.users
            .iter()
            .map(|(name, agg)| (name.clone(), value(agg)))
            .collect()
    }

    /// Picks a random user, then one of their messages.
    pub fn random_message<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<(&str, &str)> {
        if self.users.is_empty() {
            return None;
        }
        let (user, agg) = self.users.get_index(rng.gen_range(0..self.users.len()))?;
        let message = agg.messages.choose(rng)?;
        Some((user.as_str(), message.as_str()))
    }
}

/// Incremental aggregation over a stream of records.
pub struct Aggregator<'a> {
    query: &'a CompoundQuery,
    filters: &'a FilterConfig,
    options: AggregationOptions<'a>,
    result: AggregationResult,
    current_day: Option<String>,
}

impl<'a> Aggregator<'a> {
    /// Creates an aggregator for one query execution.
    pub fn new(
        query: &'a CompoundQuery,
        filters: &'a FilterConfig,
        options: AggregationOptions<'a>,
    ) -> Self {
        let result = AggregationResult {
            purity_enabled: options.purity_terms.is_some(),
            ..AggregationResult::default()
        };
        Self {
            query,
            filters,
            options,
            result,
            current_day: None,
        }
    }

    /// Starts a new day. The day is listed in the daily counts even if
    /// nothing matches.
    pub fn begin_day(&mut self, date: &str) {
        self.result.daily.entry(date.to_string()).or_insert(0);
        self.current_day = Some(date.to_string());
    }

    /// Feeds one event from a [`LogStream`](crate::stream::LogStream).
    pub fn feed(&mut self, event: LogEvent) {
        match event {
            LogEvent::DayStart { date } => self.begin_day(&date),
            LogEvent::Record(record) => {
                self.push(record);
            }
            LogEvent::Skipped { reason, .. } => {
                self.result.parse_stats.record::<()>(&Err(reason));
            }
        }
    }

    /// Parses and pushes one raw line. Malformed lines are tallied.
    pub fn push_line(&mut self, raw: &str, date: &str) -> bool {
        match parse_line(raw, date) {
            Ok(record) => self.push(record),
            Err(reason) => {
                self.result.parse_stats.record::<()>(&Err(reason));
                false
            }
        }
    }

    /// Pushes one record. Returns `true` if it was accepted.
    pub fn push(&mut self, record: LogRecord) -> bool {
        self.result.parse_stats.parsed += 1;

        if !record.date.is_empty() && self.current_day.as_deref() != Some(record.date.as_str()) {
            self.begin_day(&record.date);
        }

        if !passes_filters(&record, self.query, self.filters, self.options.bots) {
            return false;
        }
        if !self.query.matches(&record.user, &record.message) {
            return false;
        }

        self.accept(record);
        true
    }

    fn accept(&mut self, record: LogRecord) {
        let result = &mut self.result;
        if self.options.keep_matches {
            result.matched.push(record.clone());
        }
        result.total_count += 1;
        if !record.date.is_empty() {
            *result.daily.entry(record.date).or_insert(0) += 1;
        }
        result.hours.increment(record.hour);

        let user = result.users.entry(record.user).or_default();
        user.message_count += 1;
        if self.options.count_words {
            user.word_total += record.message.split(' ').count() as u64;
        }
        if self.options.count_chars {
            user.char_total += record.message.chars().filter(|c| *c != ' ').count() as u64;
        }
        if let Some(terms) = self.options.purity_terms {
            if is_impure(&record.message, terms) {
                user.purity.impure += 1;
            } else {
                user.purity.pure += 1;
            }
        }
        user.messages.push(record.message);
    }

    /// Ends the run and applies the minimum-messages filter.
    pub fn finish(mut self) -> AggregationResult {
        if self.filters.applies_min_messages(self.query) {
            let min = self.filters.min_messages_per_user;
            let before = self.result.users.len();
            self.result.users.retain(|_, user| user.message_count >= min);
            tracing::debug!(
                min,
                dropped = before - self.result.users.len(),
                "Applied minimum message filter"
            );
        }

        let stats = self.result.parse_stats;
        if stats.skipped > 0 {
            tracing::debug!(
                skipped = stats.skipped,
                total = stats.total(),
                "Skipped malformed lines"
            );
        }
        self.result
    }
}

/// Runs a whole query over `records`.
pub fn run<I>(
    records: I,
    query: &CompoundQuery,
    filters: &FilterConfig,
    options: AggregationOptions<'_>,
) -> AggregationResult
where
    I: IntoIterator<Item = LogRecord>,
{
    let mut aggregator = Aggregator::new(query, filters, options);
    for record in records {
        aggregator.push(record);
    }
    aggregator.finish()
}

/// Runs a whole query over a [`LogStream`](crate::stream::LogStream).
///
/// # Errors
///
/// Stops at the first unreadable file.
pub fn run_stream<I>(
    events: I,
    query: &CompoundQuery,
    filters: &FilterConfig,
    options: AggregationOptions<'_>,
) -> Result<AggregationResult>
where
    I: IntoIterator<Item = Result<LogEvent>>,
{
    let mut aggregator = Aggregator::new(query, filters, options);
    for event in events {
        aggregator.feed(event?);
    }
    Ok(aggregator.finish())
}
