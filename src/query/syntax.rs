//! The query mini-language.
//!
//! | Syntax | Descriptor |
//! |--------|------------|
//! | `` `U `` `` `L `` `` `T `` `` `Ts `` `` `C `` | [`QueryKind::Mode`] |
//! | `>xyz` | [`QueryKind::Prefix`] `xyz` |
//! | `xyz<` | [`QueryKind::Suffix`] `xyz` |
//! | `~xyz` | [`QueryKind::Exclude`] `xyz` |
//! | `xyz` | [`QueryKind::Include`] `xyz` |
//! | *(blank)* | [`QueryKind::Any`] |
//!
//! The `>` marker is checked before `<`, so `>xyz<` is a prefix query for
//! `xyz<`.

use super::{Mode, QueryDescriptor, QueryKind};
use crate::error::Result;

/// Parses a message query into a [`QueryDescriptor`].
///
/// `case_sensitive` and `exact_word` only affect literal kinds.
///
/// ```
/// use chatlog::query::{parse_message_query, QueryKind, Mode};
///
/// # fn main() -> chatlog::Result<()> {
/// assert_eq!(parse_message_query(">hi", false, false)?.kind(), QueryKind::Prefix);
/// assert_eq!(parse_message_query("`Ts", true, true)?.kind(), QueryKind::Mode(Mode::TitleStrict));
/// assert_eq!(parse_message_query("~lol", false, false)?.literal(), "lol");
/// # Ok(())
/// # }
/// ```
pub fn parse_message_query(
    text: &str,
    case_sensitive: bool,
    exact_word: bool,
) -> Result<QueryDescriptor> {
    if text.is_empty() {
        return Ok(QueryDescriptor::any());
    }
    if let Some(mode) = Mode::from_token(text) {
        return Ok(QueryDescriptor::mode(mode));
    }

    let (kind, literal) = if let Some(rest) = text.strip_prefix('>') {
        (QueryKind::Prefix, rest)
    } else if let Some(rest) = text.strip_suffix('<') {
        (QueryKind::Suffix, rest)
    } else if let Some(rest) = text.strip_prefix('~') {
        (QueryKind::Exclude, rest)
    } else {
        (QueryKind::Include, text)
    };

    QueryDescriptor::new(kind, literal, case_sensitive, exact_word)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> QueryDescriptor {
        parse_message_query(text, false, false).unwrap()
    }

    #[test]
    fn test_blank_is_any() {
        assert_eq!(parse("").kind(), QueryKind::Any);
    }

    #[test]
    fn test_shape_tokens() {
        assert_eq!(parse("`U").kind(), QueryKind::Mode(Mode::Upper));
        assert_eq!(parse("`L").kind(), QueryKind::Mode(Mode::Lower));
        assert_eq!(parse("`T").kind(), QueryKind::Mode(Mode::Title));
        assert_eq!(parse("`Ts").kind(), QueryKind::Mode(Mode::TitleStrict));
        assert_eq!(parse("`C").kind(), QueryKind::Mode(Mode::Command));
    }

    #[test]
    fn test_unknown_backtick_is_literal() {
        let q = parse("`X");
        assert_eq!(q.kind(), QueryKind::Include);
        assert_eq!(q.literal(), "`X");
    }

    #[test]
    fn test_markers() {
        let q = parse(">alpha");
        assert_eq!((q.kind(), q.literal()), (QueryKind::Prefix, "alpha"));
        let q = parse("echo<");
        assert_eq!((q.kind(), q.literal()), (QueryKind::Suffix, "echo"));
        let q = parse("~charlie");
        assert_eq!((q.kind(), q.literal()), (QueryKind::Exclude, "charlie"));
        let q = parse("delta");
        assert_eq!((q.kind(), q.literal()), (QueryKind::Include, "delta"));
    }

    #[test]
    fn test_prefix_wins_over_suffix() {
        let q = parse(">both<");
        assert_eq!((q.kind(), q.literal()), (QueryKind::Prefix, "both<"));
    }

    #[test]
    fn test_flags_are_carried() {
        let q = parse_message_query("~Word", true, true).unwrap();
        assert!(q.case_sensitive());
        assert!(q.exact_word());
        assert!(q.matches("a sword here"));
        assert!(!q.matches("a Word here"));
    }
}
