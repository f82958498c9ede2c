//! Query descriptors and the pattern matcher.
//!
//! A query is compiled once into a [`QueryDescriptor`] and then evaluated
//! against every message with [`matches`]. Descriptors come in two flavors:
//!
//! | Kind | Example syntax | Meaning |
//! |------|----------------|---------|
//! | [`Mode`] | `` `U `` `` `L `` `` `T `` `` `Ts `` `` `C `` | Message *shape* (casing, command syntax) |
//! | [`Prefix`](QueryKind::Prefix) | `>hello` | Starts with the literal |
//! | [`Suffix`](QueryKind::Suffix) | `hello<` | Ends with the literal |
//! | [`Exclude`](QueryKind::Exclude) | `~hello` | Does not contain the literal |
//! | [`Include`](QueryKind::Include) | `hello` | Contains the literal |
//! | [`Any`](QueryKind::Any) | *(blank)* | Everything |
//!
//! Literal kinds honor two flags: `case_sensitive` and `exact_word`
//! (match on word boundaries instead of raw substrings).
//!
//! # Example
//!
//! ```
//! use chatlog::query::{QueryDescriptor, QueryKind, Mode};
//!
//! # fn main() -> chatlog::Result<()> {
//! let prefix = QueryDescriptor::new(QueryKind::Prefix, "alpha", false, true)?;
//! assert!(prefix.matches("Alpha bravo"));
//! assert!(!prefix.matches("alphabravo"));
//!
//! let shouting = QueryDescriptor::mode(Mode::Upper);
//! assert!(shouting.matches("TEST MESSAGE"));
//! # Ok(())
//! # }
//! ```

mod compound;
mod matcher;
mod syntax;

pub use compound::{CompoundQuery, SearchType, UserQuery};
pub use matcher::{is_command, matches};
pub use syntax::parse_message_query;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ChatlogError, Result};

/// Shape predicates that classify a message by casing or structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// `` `U ``: ALL CAPS
    Upper,
    /// `` `L ``: all lowercase
    Lower,
    /// `` `T ``: Leading capital followed by a lowercase letter
    Title,
    /// `` `Ts ``: Leading capital, everything after it lowercase
    TitleStrict,
    /// `` `C ``: `!command` syntax
    Command,
}

impl Mode {
    /// Returns the query token for this mode.
    pub fn token(self) -> &'static str {
        match self {
            Mode::Upper => "`U",
            Mode::Lower => "`L",
            Mode::Title => "`T",
            Mode::TitleStrict => "`Ts",
            Mode::Command => "`C",
        }
    }

    /// Parses a query token such as `` `Ts ``.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "`U" => Some(Mode::Upper),
            "`L" => Some(Mode::Lower),
            "`T" => Some(Mode::Title),
            "`Ts" => Some(Mode::TitleStrict),
            "`C" => Some(Mode::Command),
            _ => None,
        }
    }

    /// Returns all modes.
    pub fn all() -> &'static [Mode] {
        &[
            Mode::Upper,
            Mode::Lower,
            Mode::Title,
            Mode::TitleStrict,
            Mode::Command,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Mode::Upper => "uppercase only",
            Mode::Lower => "lowercase only",
            Mode::Title => "title only",
            Mode::TitleStrict => "title (strict) only",
            Mode::Command => "command only",
        }
    }
}

/// What a [`QueryDescriptor`] tests for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    /// Shape predicate, ignores the literal and both flags.
    Mode(Mode),
    /// Message starts with the literal.
    Prefix,
    /// Message ends with the literal.
    Suffix,
    /// Message does not contain the literal.
    Exclude,
    /// Message contains the literal.
    Include,
    /// Matches every message.
    Any,
}

impl QueryKind {
    /// Returns `true` for kinds that compare against a literal.
    pub fn uses_literal(self) -> bool {
        matches!(
            self,
            QueryKind::Prefix | QueryKind::Suffix | QueryKind::Exclude | QueryKind::Include
        )
    }
}

/// A compiled, immutable message query.
///
/// The original `literal` is kept as typed. Matching uses a separately
/// stored needle (lowercased unless the query is case-sensitive) and, for
/// exact-word queries, a word-boundary regex compiled at construction time.
/// A literal that cannot be compiled is rejected by [`QueryDescriptor::new`]
/// so errors surface before any log is read.
#[derive(Debug, Clone)]
pub struct QueryDescriptor {
    kind: QueryKind,
    literal: String,
    case_sensitive: bool,
    exact_word: bool,
    needle: String,
    word_pattern: Option<Regex>,
}

impl QueryDescriptor {
    /// Builds a descriptor.
    ///
    /// For [`QueryKind::Mode`] and [`QueryKind::Any`] the literal and flags
    /// are stored but never consulted.
    ///
    /// # Errors
    ///
    /// Returns [`ChatlogError::InvalidPattern`] if an exact-word literal
    /// cannot be turned into a word-boundary pattern.
    pub fn new(
        kind: QueryKind,
        literal: impl Into<String>,
        case_sensitive: bool,
        exact_word: bool,
    ) -> Result<Self> {
        let literal = literal.into();
        let needle = if case_sensitive {
            literal.clone()
        } else {
            literal.to_lowercase()
        };

        let word_pattern = if exact_word && kind.uses_literal() {
            let escaped = regex::escape(&needle);
            let pattern = match kind {
                QueryKind::Prefix => format!(r"^{escaped}\b"),
                QueryKind::Suffix => format!(r"\b{escaped}$"),
                _ => format!(r"\b{escaped}\b"),
            };
            Some(Regex::new(&pattern).map_err(|e| ChatlogError::invalid_pattern(&literal, e))?)
        } else {
            None
        };

        Ok(Self {
            kind,
            literal,
            case_sensitive,
            exact_word,
            needle,
            word_pattern,
        })
    }

    /// A descriptor that matches every message.
    pub fn any() -> Self {
        Self {
            kind: QueryKind::Any,
            literal: String::new(),
            case_sensitive: false,
            exact_word: false,
            needle: String::new(),
            word_pattern: None,
        }
    }

    /// A shape-mode descriptor.
    pub fn mode(mode: Mode) -> Self {
        Self {
            kind: QueryKind::Mode(mode),
            ..Self::any()
        }
    }

    /// Returns the query kind.
    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Returns the literal exactly as it was supplied.
    pub fn literal(&self) -> &str {
        &self.literal
    }

    /// Returns `true` if literal matching is case-sensitive.
    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// Returns `true` if literal matching is anchored on word boundaries.
    pub fn exact_word(&self) -> bool {
        self.exact_word
    }

    /// Returns the literal as it is compared (case-folded when insensitive).
    pub(crate) fn needle(&self) -> &str {
        &self.needle
    }

    pub(crate) fn word_pattern(&self) -> Option<&Regex> {
        self.word_pattern.as_ref()
    }

    /// Returns `true` if `message` satisfies this query.
    pub fn matches(&self, message: &str) -> bool {
        matches(message, self)
    }

    /// Returns `true` if this is a COMMAND shape query.
    pub fn is_command_mode(&self) -> bool {
        self.kind == QueryKind::Mode(Mode::Command)
    }

    /// Human-readable description used in report titles.
    ///
    /// ```
    /// use chatlog::query::{QueryDescriptor, QueryKind};
    ///
    /// let q = QueryDescriptor::new(QueryKind::Suffix, "echo", true, false).unwrap();
    /// assert_eq!(q.describe(), r#" [ending with "echo" (case-sensitive)]"#);
    /// ```
    pub fn describe(&self) -> String {
        let verb = match self.kind {
            QueryKind::Any => return String::new(),
            QueryKind::Mode(mode) => return format!(" [{}]", mode.label()),
            QueryKind::Prefix => "starting with",
            QueryKind::Suffix => "ending with",
            QueryKind::Exclude => "excluding",
            QueryKind::Include => "containing",
        };

        let mut out = format!(" [{verb} \"{}\"", self.literal);
        if self.case_sensitive {
            out.push_str(" (case-sensitive)");
        }
        if self.exact_word {
            out.push_str(" <exact word match>");
        }
        out.push(']');
        out
    }
}

impl PartialEq for QueryDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.literal == other.literal
            && self.case_sensitive == other.case_sensitive
            && self.exact_word == other.exact_word
    }
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::any()
    }
}
