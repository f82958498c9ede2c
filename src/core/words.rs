//! Word frequency over matched messages.
//!
//! Messages are split on whitespace and every word is counted, optionally
//! restricted by a word query and thinned out by a few exclusion rules.
//!
//! # Example
//!
//! ```
//! use chatlog::core::words::{word_frequency, WordCountConfig};
//!
//! let messages = ["hi there", "hi HI"];
//! let config = WordCountConfig::new().with_unique_only(true);
//! let counts = word_frequency(messages.iter().copied(), &config);
//! assert_eq!(counts[0], ("hi".to_string(), 3));
//! ```

use indexmap::IndexMap;
use serde::Serialize;

use crate::core::aggregate::AggregationResult;
use crate::core::stats::{SortOrder, rank};
use crate::error::Result;
use crate::query::{CompoundQuery, QueryDescriptor, QueryKind, parse_message_query};
use crate::terms::TermSet;

/// Number of words shown in a report.
pub const TOP_WORDS: usize = 20;

/// Options for [`word_frequency`].
#[derive(Debug, Clone, Default)]
pub struct WordCountConfig {
    query: Option<QueryDescriptor>,
    excluded_literals: Vec<String>,
    excluded_common: TermSet,
    unique_only: bool,
}

impl WordCountConfig {
    /// Counts every word.
    pub fn new() -> Self {
        Self::default()
    }

    /// Only counts words matching `text` (query syntax).
    ///
    /// Word queries are never exact-word matches.
    pub fn with_query(mut self, text: &str, case_sensitive: bool) -> Result<Self> {
        let query = parse_message_query(text, case_sensitive, false)?;
        self.query = (query.kind() != QueryKind::Any).then_some(query);
        Ok(self)
    }

    /// Drops words equal (case-insensitively) to the literal of the word
    /// query or of `message_query`'s message part. Call after
    /// [`with_query`](Self::with_query).
    #[must_use]
    pub fn excluding_query_literals(mut self, message_query: &CompoundQuery) -> Self {
        let literals = message_query
            .message()
            .into_iter()
            .chain(self.query.as_ref())
            .filter(|q| q.kind().uses_literal())
            .map(|q| q.literal().to_lowercase())
            .filter(|l| !l.is_empty());
        self.excluded_literals.extend(literals);
        self
    }

    /// Drops words found (case-insensitively) in `common`.
    #[must_use]
    pub fn with_excluded_common(mut self, common: TermSet) -> Self {
        self.excluded_common = common;
        self
    }

    /// Folds case so `Hi` and `hi` count as one word.
    #[must_use]
    pub fn with_unique_only(mut self, unique_only: bool) -> Self {
        self.unique_only = unique_only;
        self
    }

    /// Returns the word query, if any.
    pub fn query(&self) -> Option<&QueryDescriptor> {
        self.query.as_ref()
    }

    /// Human-readable description used in report titles.
    pub fn describe(&self) -> String {
        let mut out = self.query.as_ref().map(QueryDescriptor::describe).unwrap_or_default();
        if !self.excluded_common.is_empty() {
            out.push_str(&format!(
                " <without top {} English words>",
                self.excluded_common.len()
            ));
        }
        if self.unique_only {
            out.push_str(" (unique only)");
        }
        out
    }

    fn accepts(&self, word: &str) -> bool {
        if let Some(ref query) = self.query {
            if !query.matches(word) {
                return false;
            }
        }
        if self.excluded_literals.is_empty() && self.excluded_common.is_empty() {
            return true;
        }
        let lower = word.to_lowercase();
        !self.excluded_literals.contains(&lower) && !self.excluded_common.contains(&lower)
    }
}

/// One ranked word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    /// The word, lowercased when counting unique words.
    pub word: String,
    /// Occurrences.
    pub count: u64,
}

/// Counts words across `messages`, most frequent first.
///
/// Ties keep the order in which words were first seen.
pub fn word_frequency<'m, I>(messages: I, config: &WordCountConfig) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'m str>,
{
    let mut counts: IndexMap<String, u64> = IndexMap::new();
    for message in messages {
        for word in message.split_whitespace() {
            if !config.accepts(word) {
                continue;
            }
            let key = if config.unique_only {
                word.to_lowercase()
            } else {
                word.to_string()
            };
            *counts.entry(key).or_insert(0) += 1;
        }
    }
    rank(counts.into_iter().collect(), SortOrder::Descending)
}

/// Counts words across every message retained in `result`.
pub fn result_word_frequency(
    result: &AggregationResult,
    config: &WordCountConfig,
) -> Vec<WordCount> {
    let messages = result
        .users
        .values()
        .flat_map(|user| user.messages.iter().map(String::as_str));
    word_frequency(messages, config)
        .into_iter()
        .map(|(word, count)| WordCount { word, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(messages: &[&str], config: &WordCountConfig) -> Vec<(String, u64)> {
        word_frequency(messages.iter().copied(), config)
    }

    #[test]
    fn test_counts_and_order() {
        let ranked = count(&["b a", "a c", "c a"], &WordCountConfig::new());
        assert_eq!(
            ranked,
            vec![
                ("a".to_string(), 3),
                ("c".to_string(), 2),
                ("b".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let ranked = count(&["z y x"], &WordCountConfig::new());
        let words: Vec<_> = ranked.into_iter().map(|(w, _)| w).collect();
        assert_eq!(words, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_case_kept_unless_unique() {
        let ranked = count(&["Hi hi"], &WordCountConfig::new());
        assert_eq!(ranked.len(), 2);
        let ranked = count(&["Hi hi"], &WordCountConfig::new().with_unique_only(true));
        assert_eq!(ranked, vec![("hi".to_string(), 2)]);
    }

    #[test]
    fn test_word_query() {
        let config = WordCountConfig::new().with_query(">po", false).unwrap();
        let ranked = count(&["pog POGGERS nope", "pog"], &config);
        assert_eq!(
            ranked,
            vec![("pog".to_string(), 2), ("POGGERS".to_string(), 1)]
        );
        assert!(!config.query().unwrap().exact_word());
    }

    #[test]
    fn test_shape_word_query() {
        let config = WordCountConfig::new().with_query("`U", false).unwrap();
        let ranked = count(&["LOL ok KEK"], &config);
        assert_eq!(ranked.len(), 2);
    }

    #[test]
    fn test_blank_word_query_counts_everything() {
        let config = WordCountConfig::new().with_query("", false).unwrap();
        assert!(config.query().is_none());
        assert_eq!(count(&["a b"], &config).len(), 2);
    }

    #[test]
    fn test_excluding_query_literals() {
        let main = CompoundQuery::parse("Kappa", false, false, false).unwrap();
        let config = WordCountConfig::new().excluding_query_literals(&main);
        let ranked = count(&["kappa KAPPA lol"], &config);
        assert_eq!(ranked, vec![("lol".to_string(), 1)]);
    }

    #[test]
    fn test_excluding_common_words() {
        let common: TermSet = ["the".to_string()].into_iter().collect();
        let config = WordCountConfig::new().with_excluded_common(common);
        let ranked = count(&["The cat the end"], &config);
        assert_eq!(ranked.len(), 2);
        assert!(config.describe().contains("without top 1 English words"));
    }
}
