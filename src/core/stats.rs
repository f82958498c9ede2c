//! Reducers over aggregated results.
//!
//! Everything here is a pure function of its inputs: rankings, placements,
//! purity scores, average conversion and UTC alignment of the hour
//! histogram. Zero divisors are reported as
//! [`DivisionByZero`](crate::ChatlogError::DivisionByZero).

use serde::{Deserialize, Serialize};

use crate::core::aggregate::{HourHistogram, Purity};
use crate::error::{ChatlogError, Result};

/// Direction of a ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Largest values first.
    #[default]
    Descending,
    /// Smallest values first.
    Ascending,
}

/// Sorts `(key, value)` pairs by value.
///
/// The sort is stable: equal values keep their input order.
///
/// ```
/// use chatlog::core::stats::{rank, SortOrder};
///
/// let ranked = rank(vec![("a", 1), ("b", 3), ("c", 1)], SortOrder::Descending);
/// assert_eq!(ranked, vec![("b", 3), ("a", 1), ("c", 1)]);
/// ```
pub fn rank<K, V: Ord>(mut pairs: Vec<(K, V)>, order: SortOrder) -> Vec<(K, V)> {
    match order {
        SortOrder::Descending => pairs.sort_by(|a, b| b.1.cmp(&a.1)),
        SortOrder::Ascending => pairs.sort_by(|a, b| a.1.cmp(&b.1)),
    }
    pairs
}

/// 1-based position of `key` in a ranking.
///
/// # Errors
///
/// Returns [`ChatlogError::UserNotFound`] if `key` is not ranked.
pub fn placement<K: AsRef<str>, V>(ranking: &[(K, V)], key: &str) -> Result<usize> {
    ranking
        .iter()
        .position(|(k, _)| k.as_ref() == key)
        .map(|i| i + 1)
        .ok_or_else(|| ChatlogError::user_not_found(key))
}

/// Constants of the purity formula.
///
/// ```text
/// score = floor(scale * (pure / m) ^ (base_exponent * m ^ volume_exponent))
/// ```
///
/// where `m = pure + impure`. The volume term makes a single impure message
/// cost more for chatty users.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurityPolicy {
    /// Score of a user without impure messages.
    pub scale: f64,
    /// Exponent applied to the pure ratio.
    pub base_exponent: f64,
    /// How strongly message volume sharpens the exponent.
    pub volume_exponent: f64,
}

impl Default for PurityPolicy {
    fn default() -> Self {
        Self {
            scale: 100.0,
            base_exponent: 4.25,
            volume_exponent: 0.05,
        }
    }
}

impl PurityPolicy {
    /// Scores one user's purity counts.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::DivisionByZero`] when both counts are zero.
    pub fn score(&self, purity: Purity) -> Result<u32> {
        let m = purity.total();
        if m == 0 {
            return Err(ChatlogError::division_by_zero("purity score"));
        }
        let m = m as f64;
        let ratio = purity.pure as f64 / m;
        let exponent = self.base_exponent * m.powf(self.volume_exponent);
        Ok((self.scale * ratio.powf(exponent)).floor() as u32)
    }
}

/// Scores `purity` with the default [`PurityPolicy`].
///
/// ```
/// use chatlog::core::aggregate::Purity;
/// use chatlog::core::stats::purity_score;
///
/// assert_eq!(purity_score(Purity::new(10, 0)).unwrap(), 100);
/// assert_eq!(purity_score(Purity::new(0, 4)).unwrap(), 0);
/// assert!(purity_score(Purity::new(0, 0)).is_err());
/// ```
pub fn purity_score(purity: Purity) -> Result<u32> {
    PurityPolicy::default().score(purity)
}

/// `total / message_count`, truncated.
pub fn per_message_average(total: u64, message_count: u64) -> Result<u64> {
    if message_count == 0 {
        return Err(ChatlogError::division_by_zero("per-message average"));
    }
    Ok(total / message_count)
}

/// `value / days`, truncated.
pub fn per_day_average(value: u64, days: usize) -> Result<u64> {
    if days == 0 {
        return Err(ChatlogError::division_by_zero("per-day average"));
    }
    Ok(value / days as u64)
}

/// One line of the hourly breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HourRow {
    /// Hour in the configured local time.
    pub local_hour: u8,
    /// The same hour in UTC.
    pub utc_hour: u8,
    /// Messages in that hour.
    pub count: u64,
}

impl HourRow {
    /// 12-hour clock label of the local hour, such as `12 AM` or `5 PM`.
    pub fn label(&self) -> String {
        let h = self.local_hour % 24;
        let twelve = if h % 12 == 0 { 12 } else { h % 12 };
        let suffix = if h < 12 { "AM" } else { "PM" };
        format!("{twelve} {suffix}")
    }
}

impl std::fmt::Display for HourRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({} UTC): {}", self.label(), self.utc_hour, self.count)
    }
}

/// Pairs every observed local hour with its UTC hour.
///
/// `offset` is the local zone's offset from UTC in hours (UTC-6 is `-6`).
/// Keys are walked in ascending order and the UTC cursor advances by the
/// gap between consecutive keys, so missing hours never shift later rows.
///
/// ```
/// use chatlog::core::aggregate::HourHistogram;
/// use chatlog::core::stats::align_to_utc;
///
/// let hist: HourHistogram = [(0, 4), (5, 2)].into_iter().collect();
/// let rows = align_to_utc(&hist, -6);
/// assert_eq!(rows[0].utc_hour, 6);
/// assert_eq!(rows[1].utc_hour, 11);
/// ```
pub fn align_to_utc(hours: &HourHistogram, offset: i32) -> Vec<HourRow> {
    let mut rows = Vec::with_capacity(hours.len());
    let mut cursor: Option<(i32, i32)> = None;

    for (hour, count) in hours.iter() {
        let key = i32::from(hour);
        let index = match cursor {
            None => key,
            Some((index, last)) => index + (key - last),
        };
        cursor = Some((index, key));

        rows.push(HourRow {
            local_hour: hour,
            utc_hour: (index - offset).rem_euclid(24) as u8,
            count,
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_descending_stable() {
        let pairs = vec![("x", 2), ("y", 5), ("z", 2), ("w", 5)];
        let ranked = rank(pairs, SortOrder::Descending);
        assert_eq!(ranked, vec![("y", 5), ("w", 5), ("x", 2), ("z", 2)]);
    }

    #[test]
    fn test_rank_ascending_stable() {
        let pairs = vec![("x", 2), ("y", 1), ("z", 2)];
        let ranked = rank(pairs, SortOrder::Ascending);
        assert_eq!(ranked, vec![("y", 1), ("x", 2), ("z", 2)]);
    }

    #[test]
    fn test_placement() {
        let ranking = vec![("bob".to_string(), 9), ("amy".to_string(), 3)];
        assert_eq!(placement(&ranking, "bob").unwrap(), 1);
        assert_eq!(placement(&ranking, "amy").unwrap(), 2);
        let err = placement(&ranking, "zed").unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "User \"zed\" not found in results");
    }

    #[test]
    fn test_purity_known_values() {
        assert_eq!(purity_score(Purity::new(9, 1)).unwrap(), 60);
        assert_eq!(purity_score(Purity::new(19, 1)).unwrap(), 77);
        assert_eq!(purity_score(Purity::new(1, 0)).unwrap(), 100);
    }

    #[test]
    fn test_purity_zero_messages() {
        let err = purity_score(Purity::default()).unwrap_err();
        assert!(matches!(err, ChatlogError::DivisionByZero { .. }));
    }

    #[test]
    fn test_purity_monotonic_for_fixed_total() {
        let m = 40;
        let scores: Vec<u32> = (0..=m)
            .map(|pure| purity_score(Purity::new(pure, m - pure)).unwrap())
            .collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(scores[0], 0);
        assert_eq!(scores[m as usize], 100);
    }

    #[test]
    fn test_custom_policy() {
        let flat = PurityPolicy {
            scale: 10.0,
            base_exponent: 1.0,
            volume_exponent: 0.0,
        };
        assert_eq!(flat.score(Purity::new(1, 1)).unwrap(), 5);
    }

    #[test]
    fn test_averages() {
        assert_eq!(per_message_average(17, 4).unwrap(), 4);
        assert_eq!(per_day_average(10, 3).unwrap(), 3);
        assert!(per_message_average(1, 0).is_err());
        assert!(per_day_average(1, 0).is_err());
    }

    #[test]
    fn test_hour_labels() {
        let row = |h| HourRow {
            local_hour: h,
            utc_hour: 0,
            count: 0,
        };
        assert_eq!(row(0).label(), "12 AM");
        assert_eq!(row(5).label(), "5 AM");
        assert_eq!(row(12).label(), "12 PM");
        assert_eq!(row(17).label(), "5 PM");
        assert_eq!(row(23).label(), "11 PM");
    }

    #[test]
    fn test_align_negative_offset() {
        let hist: HourHistogram = [(0, 4), (5, 2)].into_iter().collect();
        let rows = align_to_utc(&hist, -6);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].local_hour, rows[0].utc_hour), (0, 6));
        assert_eq!((rows[1].local_hour, rows[1].utc_hour), (5, 11));
        assert_eq!(rows[1].to_string(), "5 AM (11 UTC): 2");
    }

    #[test]
    fn test_align_wraps_around() {
        let hist: HourHistogram = [(1, 1), (22, 1)].into_iter().collect();
        let rows = align_to_utc(&hist, 3);
        assert_eq!(rows[0].utc_hour, 22);
        assert_eq!(rows[1].utc_hour, 19);

        let rows = align_to_utc(&hist, 0);
        assert_eq!(rows[0].utc_hour, 1);
        assert_eq!(rows[1].utc_hour, 22);
    }

    #[test]
    fn test_align_empty() {
        assert!(align_to_utc(&HourHistogram::new(), 5).is_empty());
    }
}
