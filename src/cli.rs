//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure
//! - [`PurityOrder`] / [`UserOrder`] - Ranking directions
//! - [`OutputFormat`] - Text or JSON report output
//!
//! [`Args`] also knows how to turn itself into library settings
//! ([`Args::apply_to`], [`Args::report_options`]), so the binary stays thin.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, CONFIG_FILE};
use crate::core::{SortOrder, WordCountConfig};
use crate::error::Result;
use crate::query::CompoundQuery;
use crate::report::{DEFAULT_USER_LIMIT, PerUserOptions, ReportOptions};
use crate::terms::TermLists;

/// Query Chatterino Twitch chat logs: who said what, when, and how often.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatlog")]
#[command(version, about, long_about = None)]
#[command(after_help = "QUERY SYNTAX:
    `U `L `T `Ts `C    UPPER, lower, TiTLE, Title (strict), !command messages
    >xyz               starts with xyz
    xyz<               ends with xyz
    ~xyz               does not contain xyz
    xyz                contains xyz
    $user [query]      only messages from users matching 'user'

EXAMPLES:
    chatlog --list-channels
    chatlog somechannel '$nightbot' --exact-user --per-user
    chatlog 2 '>hello' --dates '>2024-01-01 2024-01-31<' --hourly
    chatlog somechannel '`U' --purity --placement alice --json")]
pub struct Args {
    /// Channel name or its number in --list-channels
    #[arg(required_unless_present_any = ["list_channels", "save_config"])]
    pub channel: Option<String>,

    /// Query: [$user] [message query]; blank matches everything
    #[arg(default_value = "", allow_hyphen_values = true)]
    pub query: String,

    /// Settings file
    #[arg(long, value_name = "FILE", default_value = CONFIG_FILE)]
    pub config: PathBuf,

    /// Chatterino logs folder (overrides the settings file)
    #[arg(long, value_name = "DIR")]
    pub logs: Option<PathBuf>,

    /// Local offset from UTC in hours, e.g. -6 for UTC-6
    #[arg(long, value_name = "HOURS", allow_negative_numbers = true)]
    pub utc_offset: Option<i32>,

    /// Directory holding the term list files
    #[arg(long, value_name = "DIR")]
    pub terms: Option<PathBuf>,

    /// Drop !command messages unless the query asks for commands
    #[arg(long, overrides_with = "keep_commands")]
    pub exclude_commands: bool,

    /// Keep !command messages
    #[arg(long)]
    pub keep_commands: bool,

    /// Drop bot messages unless the query names an exact user
    #[arg(long, overrides_with = "keep_bots")]
    pub exclude_bots: bool,

    /// Keep bot messages
    #[arg(long)]
    pub keep_bots: bool,

    /// Dates: YYYY-MM-DD list, '>start', 'end<' or '>start end<'; blank for all
    #[arg(short, long, value_name = "DATES", default_value = "", allow_hyphen_values = true)]
    pub dates: String,

    /// Match the $user token exactly instead of as a substring
    #[arg(short = 'x', long)]
    pub exact_user: bool,

    /// Case-sensitive message query
    #[arg(short, long)]
    pub case_sensitive: bool,

    /// Match the message query on word boundaries
    #[arg(short = 'w', long)]
    pub exact_word: bool,

    /// Drop users with fewer matched messages
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub min_messages: u64,

    /// Print every matched line
    #[arg(short, long)]
    pub show_messages: bool,

    /// Show the most common words
    #[arg(long)]
    pub words: bool,

    /// Only count words matching this query (implies --words)
    #[arg(long, value_name = "QUERY", allow_hyphen_values = true)]
    pub word_query: Option<String>,

    /// Case-sensitive word query
    #[arg(long)]
    pub word_case_sensitive: bool,

    /// Do not count the query literals themselves
    #[arg(long)]
    pub exclude_query_words: bool,

    /// Do not count the N most common English words
    #[arg(long, value_name = "N")]
    pub exclude_common: Option<usize>,

    /// Count words case-insensitively
    #[arg(long)]
    pub unique_words: bool,

    /// Score users by purity
    #[arg(long, value_enum, value_name = "ORDER", num_args = 0..=1, default_missing_value = "pure")]
    pub purity: Option<PurityOrder>,

    /// Look up one user's purity placement (implies --purity)
    #[arg(long, value_name = "USER")]
    pub placement: Option<String>,

    /// Draw N random matched messages
    #[arg(short, long, value_name = "N", default_value_t = 0)]
    pub random: usize,

    /// Count messages per day
    #[arg(long)]
    pub daily: bool,

    /// Rank users by message count
    #[arg(short = 'u', long)]
    pub per_user: bool,

    /// Also rank users by words (implies --per-user)
    #[arg(long)]
    pub user_words: bool,

    /// Also rank users by characters (implies --per-user)
    #[arg(long)]
    pub user_chars: bool,

    /// Show words and characters per message instead of totals
    #[arg(long)]
    pub per_message_average: bool,

    /// Users shown per ranking
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_USER_LIMIT)]
    pub limit: usize,

    /// Show most or least active users first
    #[arg(long, value_enum, default_value = "most")]
    pub order: UserOrder,

    /// Count messages per hour of day
    #[arg(long)]
    pub hourly: bool,

    /// Divide counts by the number of selected days
    #[arg(long)]
    pub daily_average: bool,

    /// List channels and exit
    #[arg(long)]
    pub list_channels: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long)]
    pub json: bool,

    /// Write the effective settings back to the settings file
    #[arg(long)]
    pub save_config: bool,

    /// Hide the progress line
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Applies command-line overrides on top of loaded settings.
    pub fn apply_to(&self, mut config: AppConfig) -> AppConfig {
        if let Some(ref logs) = self.logs {
            config.logs_folder.clone_from(logs);
        }
        if let Some(offset) = self.utc_offset {
            config.utc_offset = offset;
        }
        if let Some(ref terms) = self.terms {
            config.terms_dir.clone_from(terms);
        }
        if self.exclude_commands {
            config.exclude_commands = true;
        } else if self.keep_commands {
            config.exclude_commands = false;
        }
        if self.exclude_bots {
            config.exclude_bots = true;
        } else if self.keep_bots {
            config.exclude_bots = false;
        }
        config
    }

    /// Parses the positional query.
    pub fn compound_query(&self) -> Result<CompoundQuery> {
        CompoundQuery::parse(
            &self.query,
            self.exact_user,
            self.case_sensitive,
            self.exact_word,
        )
    }

    /// Returns the requested output format.
    pub fn output_format(&self) -> OutputFormat {
        if self.json {
            OutputFormat::Json
        } else {
            self.format
        }
    }

    /// Word frequency settings, if requested.
    pub fn word_count_config(
        &self,
        query: &CompoundQuery,
        terms: &TermLists,
    ) -> Result<Option<WordCountConfig>> {
        if !self.words && self.word_query.is_none() {
            return Ok(None);
        }
        let mut config = WordCountConfig::new().with_unique_only(self.unique_words);
        if let Some(ref text) = self.word_query {
            config = config.with_query(text, self.word_case_sensitive)?;
        }
        if self.exclude_query_words {
            config = config.excluding_query_literals(query);
        }
        if let Some(n) = self.exclude_common {
            config = config.with_excluded_common(terms.common_top(n));
        }
        Ok(Some(config))
    }

    /// Report sections requested on the command line.
    pub fn report_options(
        &self,
        query: &CompoundQuery,
        terms: &TermLists,
        utc_offset: i32,
    ) -> Result<ReportOptions> {
        let mut options = ReportOptions::new()
            .with_messages(self.show_messages)
            .with_random_messages(self.random)
            .with_daily_counts(self.daily)
            .with_hourly(self.hourly)
            .with_daily_average(self.daily_average)
            .with_utc_offset(utc_offset);

        if let Some(words) = self.word_count_config(query, terms)? {
            options = options.with_word_counts(words);
        }

        if self.purity.is_some() || self.placement.is_some() {
            let order = self.purity.unwrap_or_default();
            options = options.with_purity(order.into());
        }
        if let Some(ref user) = self.placement {
            options = options.with_placement(user);
        }

        if self.per_user || self.user_words || self.user_chars {
            options = options.with_per_user(PerUserOptions {
                words: self.user_words,
                chars: self.user_chars,
                per_message_average: self.per_message_average,
                limit: self.limit,
                order: self.order.into(),
            });
        }
        Ok(options)
    }

    /// Returns `true` if the word query asks for `!command` messages.
    pub fn word_query_targets_commands(&self) -> bool {
        self.word_query.as_deref() == Some("`C")
    }
}

/// Purity ranking direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PurityOrder {
    /// Most pure first.
    #[default]
    #[value(alias = "p")]
    Pure,
    /// Least pure first.
    #[value(alias = "i")]
    Impure,
}

impl From<PurityOrder> for SortOrder {
    fn from(order: PurityOrder) -> Self {
        match order {
            PurityOrder::Pure => SortOrder::Descending,
            PurityOrder::Impure => SortOrder::Ascending,
        }
    }
}

/// Per-user ranking direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserOrder {
    /// Most active first.
    #[default]
    #[value(alias = "m")]
    Most,
    /// Least active first.
    #[value(alias = "l")]
    Least,
}

impl From<UserOrder> for SortOrder {
    fn from(order: UserOrder) -> Self {
        match order {
            UserOrder::Most => SortOrder::Descending,
            UserOrder::Least => SortOrder::Ascending,
        }
    }
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "JSON"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chatlog").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_minimal_args() {
        let args = parse(&["somechannel"]);
        assert_eq!(args.channel.as_deref(), Some("somechannel"));
        assert_eq!(args.query, "");
        assert_eq!(args.limit, DEFAULT_USER_LIMIT);
        assert_eq!(args.output_format(), OutputFormat::Text);
    }

    #[test]
    fn test_channel_required() {
        assert!(Args::try_parse_from(["chatlog"]).is_err());
        assert!(Args::try_parse_from(["chatlog", "--list-channels"]).is_ok());
    }

    #[test]
    fn test_query_and_flags() {
        let args = parse(&["chan", "$bob >hi", "-x", "-c", "-w", "--json"]);
        let query = args.compound_query().unwrap();
        assert!(query.is_exact_user_lookup());
        assert!(query.message().unwrap().case_sensitive());
        assert_eq!(args.output_format(), OutputFormat::Json);
    }

    #[test]
    fn test_negative_offset() {
        let args = parse(&["chan", "--utc-offset", "-6"]);
        let config = args.apply_to(AppConfig::new());
        assert_eq!(config.utc_offset, -6);
    }

    #[test]
    fn test_overrides() {
        let base = AppConfig::new().with_exclude_bots(true);
        let config = parse(&["chan", "--keep-bots", "--exclude-commands"]).apply_to(base.clone());
        assert!(!config.exclude_bots);
        assert!(config.exclude_commands);

        let untouched = parse(&["chan"]).apply_to(base);
        assert!(untouched.exclude_bots);
    }

    #[test]
    fn test_purity_flag_forms() {
        assert_eq!(parse(&["chan", "--purity"]).purity, Some(PurityOrder::Pure));
        assert_eq!(
            parse(&["chan", "--purity", "impure"]).purity,
            Some(PurityOrder::Impure)
        );
        assert_eq!(parse(&["chan"]).purity, None);
    }

    #[test]
    fn test_report_options() {
        let args = parse(&[
            "chan",
            "--placement",
            "Alice",
            "--user-words",
            "--order",
            "least",
            "--hourly",
            "--word-query",
            "`U",
        ]);
        let query = args.compound_query().unwrap();
        let options = args.report_options(&query, &TermLists::new(), 3).unwrap();

        assert_eq!(options.purity_order, Some(SortOrder::Descending));
        assert_eq!(options.placement_user.as_deref(), Some("alice"));
        let per_user = options.per_user.unwrap();
        assert!(per_user.words);
        assert_eq!(per_user.order, SortOrder::Ascending);
        assert!(options.hourly);
        assert_eq!(options.utc_offset, 3);
        assert!(options.word_counts.is_some());
    }

    #[test]
    fn test_word_query_targets_commands() {
        assert!(parse(&["chan", "--word-query", "`C"]).word_query_targets_commands());
        assert!(!parse(&["chan"]).word_query_targets_commands());
    }
}
