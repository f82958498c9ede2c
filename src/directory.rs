//! Chatterino log directory layout and date selection.
//!
//! ```text
//! <logs>/Twitch/Channels/<channel>/<channel>-<YYYY-MM-DD>.log
//! ```
//!
//! [`LogDirectory`] lists channels and resolves the per-day files for a
//! [`DateSelection`].

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::error::{ChatlogError, Result};

/// Canonical date format of log file names.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Pads single-digit month and day components: `2024-1-5` → `2024-01-05`.
static SHORT_COMPONENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d)\b").expect("valid date regex"));

/// `>start`, `end<` or `>start end<`.
static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:>(?P<start>\S+))? ?(?:(?P<end>\S+)<)?$").expect("valid range regex")
});

/// Parses `YYYY-MM-DD`, accepting single-digit month and day.
///
/// ```
/// use chatlog::directory::parse_date;
///
/// assert_eq!(parse_date("2024-3-7").unwrap().to_string(), "2024-03-07");
/// assert!(parse_date("2024-13-01").is_err());
/// ```
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let normalized = SHORT_COMPONENT.replace_all(input.trim(), "-0${1}");
    NaiveDate::parse_from_str(&normalized, DATE_FORMAT)
        .map_err(|_| ChatlogError::invalid_date(input))
}

/// Which days of a channel to read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateSelection {
    /// Every available day.
    #[default]
    All,
    /// An inclusive range; a missing bound is open.
    Range {
        /// First day, inclusive.
        start: Option<NaiveDate>,
        /// Last day, inclusive.
        end: Option<NaiveDate>,
    },
    /// Exactly these days.
    List(Vec<NaiveDate>),
}

impl DateSelection {
    /// Parses a date selection.
    ///
    /// | Input | Selection |
    /// |-------|-----------|
    /// | *(blank)* | [`All`](Self::All) |
    /// | `>2024-01-01` | from that day on |
    /// | `2024-01-31<` | up to that day |
    /// | `>2024-01-01 2024-01-31<` | both bounds |
    /// | `2024-01-01 2024-1-3` | those days |
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InvalidDate`] for any date that is not a real
    /// calendar day.
    pub fn parse(input: &str) -> Result<Self> {
        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(Self::All);
        }

        let joined = tokens.join(" ");
        if let Some(caps) = RANGE_PATTERN.captures(&joined) {
            let start = caps.name("start").map(|m| parse_date(m.as_str())).transpose()?;
            let end = caps.name("end").map(|m| parse_date(m.as_str())).transpose()?;
            if start.is_some() || end.is_some() {
                return Ok(Self::Range { start, end });
            }
        }

        let dates = tokens
            .into_iter()
            .map(parse_date)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::List(dates))
    }

    /// Returns `true` if `date` is selected.
    pub fn contains(&self, date: NaiveDate) -> bool {
        match self {
            Self::All => true,
            Self::Range { start, end } => {
                start.is_none_or(|s| date >= s) && end.is_none_or(|e| date <= e)
            }
            Self::List(dates) => dates.contains(&date),
        }
    }

    /// Suffix used in report titles, such as ` from 2024-01-01 to 2024-01-31`.
    pub fn describe(&self) -> String {
        match self {
            Self::All => String::new(),
            Self::Range {
                start: Some(s),
                end: Some(e),
            } => format!(" from {s} to {e}"),
            Self::Range { start: Some(s), .. } => format!(" starting at {s}"),
            Self::Range { end: Some(e), .. } => format!(" ending at {e}"),
            Self::Range { .. } => String::new(),
            Self::List(dates) => {
                let list: Vec<String> = dates.iter().map(ToString::to_string).collect();
                format!(" on {}", list.join(", "))
            }
        }
    }
}

impl fmt::Display for DateSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Range { start, end } => {
                let from = start.map_or_else(|| "earliest".to_string(), |d| d.to_string());
                let to = end.map_or_else(|| "latest".to_string(), |d| d.to_string());
                write!(f, "{from} -> {to}")
            }
            Self::List(_) => write!(f, "listed above"),
        }
    }
}

/// One selected day and its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayLog {
    /// Day of the file.
    pub date: NaiveDate,
    /// Path of the file.
    pub path: PathBuf,
}

/// The root of a Chatterino logs folder.
#[derive(Debug, Clone)]
pub struct LogDirectory {
    root: PathBuf,
}

impl LogDirectory {
    /// Wraps a logs folder.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the logs folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<logs>/Twitch/Channels`.
    pub fn channels_dir(&self) -> PathBuf {
        self.root.join("Twitch").join("Channels")
    }

    /// Directory of one channel.
    pub fn channel_dir(&self, channel: &str) -> PathBuf {
        self.channels_dir().join(channel)
    }

    /// Lists channel names, sorted.
    pub fn channels(&self) -> Result<Vec<String>> {
        let mut channels = Vec::new();
        for entry in fs::read_dir(self.channels_dir())? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                channels.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        channels.sort();
        Ok(channels)
    }

    /// Resolves a channel by name or by 1-based index into [`channels`].
    ///
    /// Names are case-insensitive.
    ///
    /// [`channels`]: Self::channels
    pub fn resolve_channel(&self, input: &str) -> Result<String> {
        let channels = self.channels()?;
        let wanted = input.trim().to_lowercase();

        let by_index = wanted
            .parse::<usize>()
            .ok()
            .and_then(|i| i.checked_sub(1))
            .and_then(|i| channels.get(i));
        if let Some(channel) = by_index {
            return Ok(channel.clone());
        }
        if channels.contains(&wanted) {
            return Ok(wanted);
        }

        Err(ChatlogError::UnknownChannel {
            input: input.to_string(),
            available: channels.join(", "),
        })
    }

    /// Selected day files of `channel`, in ascending date order.
    ///
    /// File names that are not `<channel>-<date>.log` are ignored. Listed
    /// days without a file are skipped with a warning.
    pub fn day_logs(&self, channel: &str, selection: &DateSelection) -> Result<Vec<DayLog>> {
        let dir = self.channel_dir(channel);
        let prefix = format!("{channel}-");

        let mut days = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(date) = name
                .to_str()
                .and_then(|n| n.strip_prefix(&prefix))
                .and_then(|n| n.strip_suffix(".log"))
                .and_then(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok())
            else {
                tracing::trace!(file = ?name, "Ignoring non-log file");
                continue;
            };
            if selection.contains(date) {
                days.push(DayLog {
                    date,
                    path: entry.path(),
                });
            }
        }
        days.sort_by_key(|d| d.date);
        days.dedup_by_key(|d| d.date);

        if let DateSelection::List(wanted) = selection {
            for date in wanted {
                if !days.iter().any(|d| d.date == *date) {
                    tracing::warn!(%channel, %date, "No log file for date, skipping");
                }
            }
        }

        tracing::debug!(%channel, files = days.len(), selection = %selection, "Selected log files");
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn fixture() -> (tempfile::TempDir, LogDirectory) {
        let tmp = tempdir().unwrap();
        let logs = LogDirectory::new(tmp.path());
        for channel in ["zeta", "alpha"] {
            let dir = logs.channel_dir(channel);
            fs::create_dir_all(&dir).unwrap();
            for day in ["2024-01-02", "2024-01-01", "2024-01-05"] {
                fs::write(dir.join(format!("{channel}-{day}.log")), "").unwrap();
            }
            fs::write(dir.join("notes.txt"), "").unwrap();
        }
        (tmp, logs)
    }

    #[test]
    fn test_parse_date_normalizes() {
        assert_eq!(parse_date("2024-1-5").unwrap(), date("2024-01-05"));
        assert_eq!(parse_date("2024-11-15").unwrap(), date("2024-11-15"));
        assert!(parse_date("2024-02-30").unwrap_err().is_invalid_date());
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_selection_blank_is_all() {
        assert_eq!(DateSelection::parse("  ").unwrap(), DateSelection::All);
    }

    #[test]
    fn test_selection_ranges() {
        assert_eq!(
            DateSelection::parse(">2024-01-02").unwrap(),
            DateSelection::Range {
                start: Some(date("2024-01-02")),
                end: None
            }
        );
        assert_eq!(
            DateSelection::parse("2024-1-2<").unwrap(),
            DateSelection::Range {
                start: None,
                end: Some(date("2024-01-02"))
            }
        );
        let both = DateSelection::parse(">2024-01-01 2024-01-03<").unwrap();
        assert!(both.contains(date("2024-01-01")));
        assert!(both.contains(date("2024-01-03")));
        assert!(!both.contains(date("2024-01-04")));
        assert_eq!(both.describe(), " from 2024-01-01 to 2024-01-03");
        assert_eq!(both.to_string(), "2024-01-01 -> 2024-01-03");
    }

    #[test]
    fn test_selection_list() {
        let list = DateSelection::parse("2024-01-05 2024-1-1").unwrap();
        assert_eq!(
            list,
            DateSelection::List(vec![date("2024-01-05"), date("2024-01-01")])
        );
        assert_eq!(list.describe(), " on 2024-01-05, 2024-01-01");
        assert!(DateSelection::parse("2024-01-01 nope").is_err());
    }

    #[test]
    fn test_channels_sorted_and_resolved() {
        let (_tmp, logs) = fixture();
        assert_eq!(logs.channels().unwrap(), vec!["alpha", "zeta"]);
        assert_eq!(logs.resolve_channel("2").unwrap(), "zeta");
        assert_eq!(logs.resolve_channel("ALPHA").unwrap(), "alpha");

        let err = logs.resolve_channel("3").unwrap_err();
        assert!(err.is_config());
        assert!(err.to_string().contains("alpha, zeta"));
        assert!(logs.resolve_channel("0").is_err());
    }

    #[test]
    fn test_day_logs_sorted_and_filtered() {
        let (_tmp, logs) = fixture();
        let all = logs.day_logs("alpha", &DateSelection::All).unwrap();
        let dates: Vec<String> = all.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-02", "2024-01-05"]);
        assert!(all[0].path.ends_with("alpha-2024-01-01.log"));

        let range = DateSelection::parse(">2024-01-02").unwrap();
        assert_eq!(logs.day_logs("alpha", &range).unwrap().len(), 2);
    }

    #[test]
    fn test_day_logs_missing_listed_date_skipped() {
        let (_tmp, logs) = fixture();
        let list = DateSelection::parse("2024-01-05 2024-01-09 2024-01-01").unwrap();
        let days = logs.day_logs("zeta", &list).unwrap();
        let dates: Vec<String> = days.iter().map(|d| d.date.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-05"]);
    }

    #[test]
    fn test_unknown_channel_dir_is_io_error() {
        let (_tmp, logs) = fixture();
        assert!(logs.day_logs("nobody", &DateSelection::All).unwrap_err().is_io());
    }
}
