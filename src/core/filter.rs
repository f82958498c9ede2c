//! Record filters applied before and after query matching.
//!
//! This module provides [`FilterConfig`] for defining filter criteria and
//! [`passes_filters`] for the per-record part of it.
//!
//! # Filter Types
//!
//! | Filter | Method | When | Description |
//! |--------|--------|------|-------------|
//! | Commands | [`with_exclude_commands`](FilterConfig::with_exclude_commands) | Before query | Drops `!command` messages |
//! | Bots | [`with_exclude_bots`](FilterConfig::with_exclude_bots) | Before query | Drops messages from the bot list |
//! | Minimum messages | [`with_min_messages`](FilterConfig::with_min_messages) | After aggregation | Drops users below a message count |
//!
//! # Behavior Notes
//!
//! - Command exclusion is bypassed when the query itself asks for commands
//! - Bot exclusion is bypassed for exact-username lookups with no message
//!   part; the minimum-messages filter for any exact-username lookup
//! - The minimum-messages filter only touches user-keyed results; totals,
//!   daily counts and the hour histogram keep every accepted message
//!
//! # Example
//!
//! ```
//! use chatlog::core::filter::{FilterConfig, passes_filters};
//! use chatlog::query::CompoundQuery;
//! use chatlog::LogRecord;
//!
//! let config = FilterConfig::new().with_exclude_commands(true);
//! let query = CompoundQuery::all();
//!
//! assert!(passes_filters(&LogRecord::new(1, "alice", "hello"), &query, &config, None));
//! assert!(!passes_filters(&LogRecord::new(1, "bob", "!ping"), &query, &config, None));
//! ```

use serde::{Deserialize, Serialize};

use crate::LogRecord;
use crate::query::{CompoundQuery, SearchType, is_command};
use crate::terms::TermSet;

/// Configuration for filtering records.
///
/// Filters are combined with AND logic: a record must pass all active
/// filters before the query is evaluated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Drop messages that start with a `!command` token.
    pub exclude_commands: bool,

    /// Drop messages from users on the bot list.
    pub exclude_bots: bool,

    /// After aggregation, drop users with fewer accepted messages than this.
    /// Zero disables the filter.
    pub min_messages_per_user: u64,
}

impl FilterConfig {
    /// Creates a new filter configuration with every filter disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables command exclusion.
    #[must_use]
    pub fn with_exclude_commands(mut self, exclude: bool) -> Self {
        self.exclude_commands = exclude;
        self
    }

    /// Enables or disables bot exclusion.
    #[must_use]
    pub fn with_exclude_bots(mut self, exclude: bool) -> Self {
        self.exclude_bots = exclude;
        self
    }

    /// Sets the minimum number of messages a user needs to stay in results.
    #[must_use]
    pub fn with_min_messages(mut self, min: u64) -> Self {
        self.min_messages_per_user = min;
        self
    }

    /// Returns `true` if any filter is active.
    pub fn is_active(&self) -> bool {
        self.exclude_commands || self.exclude_bots || self.min_messages_per_user > 0
    }

    /// Returns `true` if the post-aggregation user filter applies to `query`.
    pub fn applies_min_messages(&self, query: &CompoundQuery) -> bool {
        self.min_messages_per_user > 0 && !query.is_exact_user_lookup()
    }
}

/// Applies the pre-query filters to one record.
///
/// `bots` is only consulted when bot exclusion is enabled; `None` excludes
/// nobody.
pub fn passes_filters(
    record: &LogRecord,
    query: &CompoundQuery,
    config: &FilterConfig,
    bots: Option<&TermSet>,
) -> bool {
    if config.exclude_commands && !query.targets_commands() && is_command(&record.message) {
        return false;
    }

    let user_only = query.search_type() == SearchType::User && query.is_exact_user_lookup();
    if config.exclude_bots && !user_only && bots.is_some_and(|bots| bots.contains(&record.user)) {
        return false;
    }

    true
}
