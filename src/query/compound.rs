//! User + message queries combined with AND semantics.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::{QueryDescriptor, QueryKind, parse_message_query};
use crate::error::Result;

static COMPOUND_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:\$(?P<user>\S+) ?)?(?P<message>.*)$").expect("valid compound regex")
});

/// Match on the username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    name: String,
    exact: bool,
}

impl UserQuery {
    /// Creates a user query. The name is lowercased, matching log usernames.
    pub fn new(name: impl Into<String>, exact: bool) -> Self {
        Self {
            name: name.into().to_lowercase(),
            exact,
        }
    }

    /// Returns the lowercased name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for exact-username lookups.
    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Exact lookups compare for equality, others test containment.
    pub fn matches(&self, user: &str) -> bool {
        if self.exact {
            user == self.name
        } else {
            user.to_lowercase().contains(&self.name)
        }
    }
}

/// Which parts of a [`CompoundQuery`] are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// No user and no message query.
    All,
    /// User query only.
    User,
    /// Message query only.
    Message,
    /// Both.
    Hybrid,
}

/// An optional user query AND an optional message query.
///
/// With neither part every record matches.
///
/// # Example
///
/// ```
/// use chatlog::query::{CompoundQuery, SearchType};
///
/// # fn main() -> chatlog::Result<()> {
/// let query = CompoundQuery::parse("$alice >hello", true, false, false)?;
/// assert_eq!(query.search_type(), SearchType::Hybrid);
/// assert!(query.matches("alice", "Hello there"));
/// assert!(!query.matches("bob", "hello there"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundQuery {
    user: Option<UserQuery>,
    message: Option<QueryDescriptor>,
}

impl CompoundQuery {
    /// A query that matches everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Builder method to set the user part.
    #[must_use]
    pub fn with_user(mut self, user: UserQuery) -> Self {
        self.user = Some(user);
        self
    }

    /// Builder method to set the message part.
    ///
    /// An [`Any`](QueryKind::Any) descriptor clears the message part.
    #[must_use]
    pub fn with_message(mut self, message: QueryDescriptor) -> Self {
        self.message = (message.kind() != QueryKind::Any).then_some(message);
        self
    }

    /// Parses `[$user] [message query]`.
    ///
    /// `exact_user` applies to the `$user` token; `case_sensitive` and
    /// `exact_word` apply to the message query.
    pub fn parse(
        text: &str,
        exact_user: bool,
        case_sensitive: bool,
        exact_word: bool,
    ) -> Result<Self> {
        let text = text.trim();
        let mut query = Self::all();
        let Some(caps) = COMPOUND_PATTERN.captures(text) else {
            return Ok(query);
        };

        if let Some(user) = caps.name("user") {
            query = query.with_user(UserQuery::new(user.as_str(), exact_user));
        }
        let message = caps.name("message").map_or("", |m| m.as_str());
        if !message.is_empty() {
            query = query.with_message(parse_message_query(message, case_sensitive, exact_word)?);
        }
        Ok(query)
    }

    /// Returns the user part.
    pub fn user(&self) -> Option<&UserQuery> {
        self.user.as_ref()
    }

    /// Returns the message part.
    pub fn message(&self) -> Option<&QueryDescriptor> {
        self.message.as_ref()
    }

    /// Classifies the query.
    pub fn search_type(&self) -> SearchType {
        match (&self.user, &self.message) {
            (None, None) => SearchType::All,
            (Some(_), None) => SearchType::User,
            (None, Some(_)) => SearchType::Message,
            (Some(_), Some(_)) => SearchType::Hybrid,
        }
    }

    /// Returns `true` if the query names one exact username.
    ///
    /// The minimum-messages filter does not apply to such lookups, and bot
    /// exclusion does not apply when there is no message part.
    pub fn is_exact_user_lookup(&self) -> bool {
        self.user.as_ref().is_some_and(UserQuery::is_exact)
    }

    /// Returns `true` if the message part is the COMMAND shape.
    pub fn targets_commands(&self) -> bool {
        self.message
            .as_ref()
            .is_some_and(QueryDescriptor::is_command_mode)
    }

    /// Evaluates the query against one record's user and message.
    pub fn matches(&self, user: &str, message: &str) -> bool {
        if let Some(ref user_query) = self.user {
            if !user_query.matches(user) {
                return false;
            }
        }
        self.message.as_ref().is_none_or(|q| q.matches(message))
    }

    /// Human-readable description used in report titles.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        if let Some(ref user) = self.user {
            if user.exact {
                out.push_str(&format!(" from {}", user.name));
            } else {
                out.push_str(&format!(" from ??{}??", user.name));
            }
        }
        if let Some(ref message) = self.message {
            out.push_str(&message.describe());
        }
        out
    }
}
