//! Query reports.
//!
//! A [`Report`] collects every statistic requested through
//! [`ReportOptions`] from one [`AggregationResult`]. It serializes to JSON
//! and renders as plain text:
//!
//! ```text
//! Total messages from ??ali?? in #somechannel: 42
//!
//! Most total messages from ??ali?? in #somechannel:
//!     alice: 30
//!     kalil: 12
//! ```

use std::fmt::Write as _;

use rand::Rng;
use serde::Serialize;

use crate::LogRecord;
use crate::core::aggregate::{AggregationOptions, AggregationResult};
use crate::core::filter::FilterConfig;
use crate::core::stats::{
    HourRow, SortOrder, align_to_utc, per_day_average, per_message_average, placement,
    purity_score, rank,
};
use crate::core::words::{TOP_WORDS, WordCount, WordCountConfig, result_word_frequency};
use crate::directory::DateSelection;
use crate::error::Result;
use crate::parser::ParseStats;
use crate::query::{CompoundQuery, SearchType};
use crate::terms::TermSet;

/// Number of users shown in the purity ranking.
pub const TOP_PURITY: usize = 20;

/// Default number of users in per-user rankings.
pub const DEFAULT_USER_LIMIT: usize = 10;

/// Per-user statistics options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerUserOptions {
    /// Include word totals.
    pub words: bool,
    /// Include character totals.
    pub chars: bool,
    /// Show word and character totals per message instead.
    pub per_message_average: bool,
    /// Users shown per ranking.
    pub limit: usize,
    /// Most or least first.
    pub order: SortOrder,
}

impl Default for PerUserOptions {
    fn default() -> Self {
        Self {
            words: false,
            chars: false,
            per_message_average: false,
            limit: DEFAULT_USER_LIMIT,
            order: SortOrder::Descending,
        }
    }
}

/// What to put in a [`Report`].
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// List every matched line.
    pub show_messages: bool,
    /// Most common words.
    pub word_counts: Option<WordCountConfig>,
    /// Purity ranking order; `None` disables purity scoring.
    pub purity_order: Option<SortOrder>,
    /// Look up one user's purity placement.
    pub placement_user: Option<String>,
    /// Number of random messages to draw.
    pub random_messages: usize,
    /// Per-day message counts.
    pub daily_counts: bool,
    /// Per-user statistics.
    pub per_user: Option<PerUserOptions>,
    /// Hourly breakdown.
    pub hourly: bool,
    /// Divide counts by the number of selected days.
    pub daily_average: bool,
    /// Local offset from UTC, for the hourly breakdown.
    pub utc_offset: i32,
}

impl ReportOptions {
    /// Creates options with every section disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables the matched-lines section.
    #[must_use]
    pub fn with_messages(mut self, show: bool) -> Self {
        self.show_messages = show;
        self
    }

    /// Enables the word frequency section.
    #[must_use]
    pub fn with_word_counts(mut self, config: WordCountConfig) -> Self {
        self.word_counts = Some(config);
        self
    }

    /// Enables the purity section.
    #[must_use]
    pub fn with_purity(mut self, order: SortOrder) -> Self {
        self.purity_order = Some(order);
        self
    }

    /// Looks up `user` in the purity ranking.
    #[must_use]
    pub fn with_placement(mut self, user: impl Into<String>) -> Self {
        self.placement_user = Some(user.into().to_lowercase());
        self
    }

    /// Draws `count` random messages.
    #[must_use]
    pub fn with_random_messages(mut self, count: usize) -> Self {
        self.random_messages = count;
        self
    }

    /// Enables per-day counts.
    #[must_use]
    pub fn with_daily_counts(mut self, enabled: bool) -> Self {
        self.daily_counts = enabled;
        self
    }

    /// Enables per-user statistics.
    #[must_use]
    pub fn with_per_user(mut self, per_user: PerUserOptions) -> Self {
        self.per_user = Some(per_user);
        self
    }

    /// Enables the hourly breakdown.
    #[must_use]
    pub fn with_hourly(mut self, enabled: bool) -> Self {
        self.hourly = enabled;
        self
    }

    /// Reports daily averages instead of totals.
    #[must_use]
    pub fn with_daily_average(mut self, enabled: bool) -> Self {
        self.daily_average = enabled;
        self
    }

    /// Sets the UTC offset in hours.
    #[must_use]
    pub fn with_utc_offset(mut self, offset: i32) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Aggregation work needed to produce these sections.
    pub fn aggregation_options<'a>(
        &self,
        purity_terms: &'a TermSet,
        bots: &'a TermSet,
    ) -> AggregationOptions<'a> {
        let per_user = self.per_user.unwrap_or_default();
        let mut options = AggregationOptions::new()
            .with_word_counts(per_user.words)
            .with_char_counts(per_user.chars)
            .with_matches(self.show_messages)
            .with_bots(bots);
        if self.purity_order.is_some() {
            options = options.with_purity(purity_terms);
        }
        options
    }
}

/// Title fragment shared by every section, such as
/// ` from ??bob?? [containing "hi"] (from users with >=5 messages) on 2024-01-01`.
pub fn describe_run(
    query: &CompoundQuery,
    filters: &FilterConfig,
    dates: &DateSelection,
) -> String {
    let mut out = query.describe();
    if filters.applies_min_messages(query) {
        let _ = write!(
            out,
            " (from users with >={} messages)",
            filters.min_messages_per_user
        );
    }
    out.push_str(&dates.describe());
    out
}

/// A `(user, value)` pair in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserValue {
    /// Username.
    pub user: String,
    /// Count, total or average.
    pub value: u64,
}

/// One purity ranking line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurityEntry {
    /// Username.
    pub user: String,
    /// Score from 0 to 100.
    pub score: u32,
    /// Impure messages.
    pub impure: u64,
    /// All classified messages.
    pub total: u64,
}

/// Where one user landed in the purity ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurityPlacement {
    /// The user that was looked up.
    pub user: String,
    /// 1-based rank, `None` if the user is not in the results.
    pub rank: Option<usize>,
    /// Number of ranked users.
    pub of: usize,
    /// The user's entry, if found.
    pub entry: Option<PurityEntry>,
}

/// Purity scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuritySection {
    /// Ranking order.
    pub order: SortOrder,
    /// Ranked entries.
    pub entries: Vec<PurityEntry>,
    /// Placement lookup, if requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<PurityPlacement>,
}

/// A randomly drawn message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RandomPick {
    /// Author.
    pub user: String,
    /// Message text.
    pub message: String,
}

/// Messages on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    /// Day, `YYYY-MM-DD`.
    pub date: String,
    /// Accepted messages.
    pub count: u64,
}

/// Per-user rankings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSection {
    /// Most or least first.
    pub order: SortOrder,
    /// Message counts.
    pub messages: Vec<UserValue>,
    /// Word totals or per-message averages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<UserValue>>,
    /// Character totals or per-message averages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chars: Option<Vec<UserValue>>,
    /// Whether words and characters are per-message averages.
    pub per_message: bool,
}

/// Everything one query produced.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Channel name.
    pub channel: String,
    /// Query, filter and date description.
    pub description: String,
    /// Which query parts were active.
    pub search_type: SearchType,
    /// Number of days read.
    pub days: usize,
    /// Whether counts are daily averages.
    pub daily_average: bool,
    /// Accepted messages (or their daily average).
    pub total_messages: u64,
    /// Line counters.
    pub parse_stats: ParseStats,
    /// Matched lines.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<LogRecord>,
    /// Most common words, with the word query description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_words: Option<(String, Vec<WordCount>)>,
    /// Purity scores.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub purity: Option<PuritySection>,
    /// Random messages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub random: Vec<RandomPick>,
    /// Per-day counts.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub daily: Vec<DailyCount>,
    /// Per-user rankings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<UserSection>,
    /// Hourly breakdown.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hours: Vec<HourRow>,
}

impl Report {
    /// Builds a report from an aggregation result.
    ///
    /// # Errors
    ///
    /// Returns [`DivisionByZero`](crate::ChatlogError::DivisionByZero) when
    /// daily averages are requested over zero days.
    pub fn build<R: Rng + ?Sized>(
        channel: &str,
        description: String,
        search_type: SearchType,
        result: &AggregationResult,
        options: &ReportOptions,
        rng: &mut R,
    ) -> Result<Self> {
        let days = result.days();
        let averaged = options.daily_average;
        let average = |value: u64| -> Result<u64> {
            if averaged {
                per_day_average(value, days)
            } else {
                Ok(value)
            }
        };

        let top_words = options.word_counts.as_ref().map(|config| {
            let mut words = result_word_frequency(result, config);
            words.truncate(TOP_WORDS);
            (config.describe(), words)
        });

        let purity = match options.purity_order {
            Some(order) if result.purity_enabled => Some(purity_section(
                result,
                order,
                options.placement_user.as_deref(),
                search_type == SearchType::User,
            )?),
            _ => None,
        };

        let random = (0..options.random_messages)
            .filter_map(|_| result.random_message(&mut *rng))
            .map(|(user, message)| RandomPick {
                user: user.to_string(),
                message: message.to_string(),
            })
            .collect();

        let daily = if options.daily_counts {
            result
                .daily
                .iter()
                .map(|(date, count)| DailyCount {
                    date: date.clone(),
                    count: *count,
                })
                .collect()
        } else {
            Vec::new()
        };

        let users = match options.per_user {
            Some(per_user) => Some(user_section(result, per_user, search_type, &average)?),
            None => None,
        };

        let hours = if options.hourly {
            let hist = if averaged {
                result.hours.per_day(days)?
            } else {
                result.hours.clone()
            };
            align_to_utc(&hist, options.utc_offset)
        } else {
            Vec::new()
        };

        Ok(Self {
            channel: channel.to_string(),
            description,
            search_type,
            days,
            daily_average: averaged,
            total_messages: average(result.total_count)?,
            parse_stats: result.parse_stats,
            messages: if options.show_messages {
                result.matched.clone()
            } else {
                Vec::new()
            },
            top_words,
            purity,
            random,
            daily,
            users,
            hours,
        })
    }

    /// Returns `true` if no message matched.
    pub fn is_empty(&self) -> bool {
        self.total_messages == 0 && self.messages.is_empty()
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let desc = &self.description;
        let chan = &self.channel;
        let user_search = self.search_type == SearchType::User;
        let (title, span) = if self.daily_average {
            ("Daily", "daily")
        } else {
            ("Total", "total")
        };

        for record in &self.messages {
            let _ = writeln!(
                out,
                "{} [{:02}]  {}: {}",
                record.date, record.hour, record.user, record.message
            );
        }

        if self.total_messages == 0 && self.messages.is_empty() {
            out.push_str("No results found!\n");
        }

        if let Some((ref word_desc, ref words)) = self.top_words {
            let _ = writeln!(out, "\nMost common words{word_desc} in messages{desc} in #{chan}:");
            for w in words {
                let _ = writeln!(out, "    {}: {}", w.word, w.count);
            }
        }

        if let Some(ref purity) = self.purity {
            let label = purity_label(purity.order, user_search);
            let _ = writeln!(out, "\n{label} purity score in messages{desc} in #{chan}:");
            for e in &purity.entries {
                let head = format!("{}: {}", e.user, e.score);
                let _ = writeln!(out, "    {head:<30} [{}/{} impure]", e.impure, e.total);
            }
            if let Some(ref p) = purity.placement {
                match (p.rank, &p.entry) {
                    (Some(rank), Some(e)) => {
                        let _ = writeln!(
                            out,
                            "{label} purity placement{desc} for \"{}\" in #{chan}: {rank}/{}",
                            p.user, p.of
                        );
                        let _ = writeln!(
                            out,
                            "Purity for {} in #{chan}: {} [{}/{} impure]",
                            p.user, e.score, e.impure, e.total
                        );
                    }
                    _ => {
                        let _ = writeln!(out, "User \"{}\" not found in results!", p.user);
                    }
                }
            }
        }

        for pick in &self.random {
            let _ = writeln!(
                out,
                "\nRandom message from {} in #{chan}: {}",
                pick.user, pick.message
            );
        }

        if !self.daily.is_empty() {
            let _ = writeln!(out, "\nMessages{desc} by day in #{chan}:");
            for d in &self.daily {
                let _ = writeln!(out, "    {}: {}", d.date, d.count);
            }
        }

        if !user_search || self.users.is_none() {
            let _ = writeln!(out, "\n{title} messages{desc} in #{chan}: {}", self.total_messages);
        }

        if let Some(ref users) = self.users {
            let label = if user_search {
                "User"
            } else if users.order == SortOrder::Ascending {
                "Least"
            } else {
                "Most"
            };
            let per = if users.per_message { "per message" } else { "total" };
            let _ = writeln!(out, "\n{label} {span} messages{desc} in #{chan}:");
            write_values(&mut out, &users.messages);
            if let Some(ref words) = users.words {
                let _ = writeln!(out, "{label} words {per} in messages{desc} in #{chan}:");
                write_values(&mut out, words);
            }
            if let Some(ref chars) = users.chars {
                let _ = writeln!(out, "{label} characters {per} in messages{desc} in #{chan}:");
                write_values(&mut out, chars);
            }
        }

        if !self.hours.is_empty() {
            let _ = writeln!(out, "\n{title} message frequency{desc} by hour in #{chan}:");
            for row in &self.hours {
                let _ = writeln!(out, "    {row}");
            }
        }

        out
    }
}

fn purity_label(order: SortOrder, user_search: bool) -> &'static str {
    match (user_search, order) {
        (true, _) => "User",
        (false, SortOrder::Descending) => "Highest",
        (false, SortOrder::Ascending) => "Lowest",
    }
}

fn write_values(out: &mut String, values: &[UserValue]) {
    for v in values {
        let _ = writeln!(out, "    {}: {}", v.user, v.value);
    }
}

fn purity_section(
    result: &AggregationResult,
    order: SortOrder,
    lookup: Option<&str>,
    user_search: bool,
) -> Result<PuritySection> {
    let mut scores = Vec::with_capacity(result.users.len());
    for (user, agg) in &result.users {
        scores.push((user.clone(), purity_score(agg.purity)?));
    }
    let ranked = rank(scores, order);

    let entry = |user: &str, score: u32| {
        let purity = result.users[user].purity;
        PurityEntry {
            user: user.to_string(),
            score,
            impure: purity.impure,
            total: purity.total(),
        }
    };

    let placement = match lookup {
        Some(user) => Some(match placement(&ranked, user) {
            Ok(rank) => PurityPlacement {
                user: user.to_string(),
                rank: Some(rank),
                of: ranked.len(),
                entry: Some(entry(user, ranked[rank - 1].1)),
            },
            Err(e) if e.is_not_found() => PurityPlacement {
                user: user.to_string(),
                rank: None,
                of: ranked.len(),
                entry: None,
            },
            Err(e) => return Err(e),
        }),
        None => None,
    };

    let shown = if user_search { ranked.len() } else { TOP_PURITY };
    let entries = ranked
        .iter()
        .take(shown)
        .map(|(user, score)| entry(user, *score))
        .collect();

    Ok(PuritySection {
        order,
        entries,
        placement,
    })
}

fn user_section(
    result: &AggregationResult,
    options: PerUserOptions,
    search_type: SearchType,
    average: &dyn Fn(u64) -> Result<u64>,
) -> Result<UserSection> {
    let per_message = options.per_message_average && (options.words || options.chars);
    let limit = if search_type == SearchType::User {
        usize::MAX
    } else {
        options.limit
    };

    let finish = |pairs: Vec<(String, u64)>| -> Vec<UserValue> {
        rank(pairs, options.order)
            .into_iter()
            .take(limit)
            .map(|(user, value)| UserValue { user, value })
            .collect()
    };

    let per_message_values = |pairs: Vec<(String, u64)>| -> Result<Vec<(String, u64)>> {
        if !per_message {
            return Ok(pairs);
        }
        pairs
            .into_iter()
            .map(|(user, total)| {
                let count = result.users[&user].message_count;
                Ok((user, per_message_average(total, count)?))
            })
            .collect()
    };

    let messages = result
        .message_counts()
        .into_iter()
        .map(|(user, count)| Ok((user, average(count)?)))
        .collect::<Result<Vec<_>>>()?;

    let words = if options.words {
        Some(finish(per_message_values(result.word_totals())?))
    } else {
        None
    };
    let chars = if options.chars {
        Some(finish(per_message_values(result.char_totals())?))
    } else {
        None
    };

    Ok(UserSection {
        order: options.order,
        messages: finish(messages),
        words,
        chars,
        per_message,
    })
}
