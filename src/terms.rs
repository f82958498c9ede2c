//! Term lists and the purity classifier.
//!
//! Five plain-text lists live in a terms directory, one lowercase term per
//! line:
//!
//! | File | Used for |
//! |------|----------|
//! | `bots.txt` | Bot exclusion filter |
//! | `common_eng.txt` | Top-N common word exclusion (ordered by rank) |
//! | `strong_curse.txt` | Purity scoring |
//! | `mild_curse.txt` | Purity scoring |
//! | `sexual.txt` | Purity scoring |
//!
//! The lists are loaded once at startup and only ever borrowed afterwards.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChatlogError, Result};

/// A set of lowercase terms.
pub type TermSet = HashSet<String>;

/// File names of the five term lists, in load order.
pub const TERM_FILES: [&str; 5] = [
    "bots.txt",
    "common_eng.txt",
    "strong_curse.txt",
    "mild_curse.txt",
    "sexual.txt",
];

/// Returns `true` if any whitespace-separated token of the lowercased
/// message is in `terms`.
///
/// ```
/// use chatlog::terms::{is_impure, TermSet};
///
/// let terms: TermSet = ["heck".to_string()].into_iter().collect();
/// assert!(is_impure("oh HECK no", &terms));
/// assert!(!is_impure("heckin good", &terms));
/// ```
pub fn is_impure(message: &str, terms: &TermSet) -> bool {
    if terms.is_empty() {
        return false;
    }
    message
        .to_lowercase()
        .split_whitespace()
        .any(|token| terms.contains(token))
}

/// The five term lists.
#[derive(Debug, Clone, Default)]
pub struct TermLists {
    /// Usernames of bots.
    pub bots: TermSet,
    /// Common English words, most frequent first.
    pub common_eng: Vec<String>,
    /// Strong profanity.
    pub strong_curse: TermSet,
    /// Mild profanity.
    pub mild_curse: TermSet,
    /// Sexual vocabulary.
    pub sexual: TermSet,
}

impl TermLists {
    /// Creates empty lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every list from `dir`.
    ///
    /// # Errors
    ///
    /// If any file is missing, all missing files are created empty and
    /// [`ChatlogError::MissingTermLists`] is returned so the user can fill
    /// them in before running again.
    pub fn load(dir: &Path) -> Result<Self> {
        let missing: Vec<PathBuf> = TERM_FILES
            .iter()
            .map(|name| dir.join(name))
            .filter(|path| !path.is_file())
            .collect();

        if !missing.is_empty() {
            fs::create_dir_all(dir)?;
            for path in &missing {
                fs::write(path, "")?;
                tracing::warn!(path = %path.display(), "Created empty term list");
            }
            return Err(ChatlogError::MissingTermLists { created: missing });
        }

        let lists = Self {
            bots: read_terms(&dir.join("bots.txt"))?.into_iter().collect(),
            common_eng: read_terms(&dir.join("common_eng.txt"))?,
            strong_curse: read_terms(&dir.join("strong_curse.txt"))?.into_iter().collect(),
            mild_curse: read_terms(&dir.join("mild_curse.txt"))?.into_iter().collect(),
            sexual: read_terms(&dir.join("sexual.txt"))?.into_iter().collect(),
        };

        tracing::debug!(
            bots = lists.bots.len(),
            common = lists.common_eng.len(),
            purity = lists.purity_terms().len(),
            "Loaded term lists"
        );
        Ok(lists)
    }

    /// Union of the strong, mild and sexual lists.
    pub fn purity_terms(&self) -> TermSet {
        self.strong_curse
            .iter()
            .chain(&self.mild_curse)
            .chain(&self.sexual)
            .cloned()
            .collect()
    }

    /// The `n` most common English words.
    pub fn common_top(&self, n: usize) -> TermSet {
        self.common_eng.iter().take(n).cloned().collect()
    }
}

fn read_terms(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
