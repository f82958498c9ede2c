//! Evaluation of a [`QueryDescriptor`] against one message.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

use super::{Mode, QueryDescriptor, QueryKind};

static COMMAND_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\w+").expect("valid command regex"));

/// Returns `true` if the message begins with a `!command` token.
///
/// ```
/// use chatlog::query::is_command;
///
/// assert!(is_command("!ping"));
/// assert!(!is_command("! ping"));
/// assert!(!is_command("ping!"));
/// ```
pub fn is_command(message: &str) -> bool {
    COMMAND_PATTERN.is_match(message)
}

/// Returns `true` if `message` satisfies `query`.
pub fn matches(message: &str, query: &QueryDescriptor) -> bool {
    let kind = query.kind();
    let mode = match kind {
        QueryKind::Any => return true,
        QueryKind::Mode(mode) => mode,
        QueryKind::Prefix | QueryKind::Suffix | QueryKind::Exclude | QueryKind::Include => {
            return matches_literal(message, query);
        }
    };

    shape_matches(message, mode)
}

fn shape_matches(message: &str, mode: Mode) -> bool {
    if matches!(mode, Mode::Title | Mode::TitleStrict | Mode::Command)
        && message.chars().count() < 2
    {
        return false;
    }

    if mode == Mode::Command {
        // The shape gate below does not apply to commands.
        let first_token = message.split(' ').next().unwrap_or_default();
        return is_command(message) && !first_token[1..].contains('!');
    }

    if is_command(message) || !message.chars().all(|c| c.is_alphabetic() || c.is_whitespace()) {
        return false;
    }

    let mut chars = message.chars();
    match mode {
        Mode::Upper => all_cased(message, char::is_uppercase),
        Mode::Lower => all_cased(message, char::is_lowercase),
        Mode::Title => {
            let first = chars.next();
            let second = chars.next();
            first.is_some_and(char::is_uppercase)
                && second.is_some_and(|c| c.is_alphabetic() && c.is_lowercase())
        }
        Mode::TitleStrict => {
            chars.next().is_some_and(char::is_uppercase)
                && chars.filter(|c| c.is_alphabetic()).all(char::is_lowercase)
        }
        Mode::Command => unreachable!("handled above"),
    }
}

/// At least one cased character, and every cased character passes `case`.
fn all_cased(message: &str, case: fn(char) -> bool) -> bool {
    let mut cased = message
        .chars()
        .filter(|c| c.is_uppercase() || c.is_lowercase())
        .peekable();
    cased.peek().is_some() && cased.all(case)
}

fn matches_literal(message: &str, query: &QueryDescriptor) -> bool {
    let haystack: Cow<'_, str> = if query.case_sensitive() {
        Cow::Borrowed(message)
    } else {
        Cow::Owned(message.to_lowercase())
    };
    let needle = query.needle();

    let contains = |hay: &str| match query.word_pattern() {
        Some(pattern) => pattern.is_match(hay),
        None => hay.contains(needle),
    };

    match query.kind() {
        QueryKind::Prefix => match query.word_pattern() {
            Some(pattern) => pattern.is_match(&haystack),
            None => haystack.starts_with(needle),
        },
        QueryKind::Suffix => match query.word_pattern() {
            Some(pattern) => pattern.is_match(&haystack),
            None => haystack.ends_with(needle),
        },
        QueryKind::Include => contains(&haystack),
        QueryKind::Exclude => !contains(&haystack),
        QueryKind::Mode(_) | QueryKind::Any => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(message: &str, kind: QueryKind, literal: &str, case: bool, exact: bool) -> bool {
        let query = QueryDescriptor::new(kind, literal, case, exact).unwrap();
        matches(message, &query)
    }

    fn shape(message: &str, mode: Mode) -> bool {
        matches(message, &QueryDescriptor::mode(mode))
    }

    // =========================================================================
    // Shape modes
    // =========================================================================

    #[test]
    fn test_modes() {
        assert!(shape("TEST MESSAGE", Mode::Upper));
        assert!(!shape("TEST MESSAGe", Mode::Upper));
        assert!(shape("test message", Mode::Lower));
        assert!(!shape("test messagE", Mode::Lower));
        assert!(shape("Test Message", Mode::Title));
        assert!(!shape("test Message", Mode::Title));
        assert!(shape("Test message", Mode::TitleStrict));
        assert!(!shape("Test messagE", Mode::TitleStrict));
        assert!(shape("!test message", Mode::Command));
        assert!(!shape("test message", Mode::Command));
    }

    #[test]
    fn test_command_embedded_bang() {
        assert!(!shape("!te!st message", Mode::Command));
        // Only the first token is inspected
        assert!(shape("!test mess!age", Mode::Command));
    }

    #[test]
    fn test_command_requires_word_after_bang() {
        assert!(!shape("! test", Mode::Command));
        assert!(!shape("!", Mode::Command));
        assert!(shape("!a", Mode::Command));
    }

    #[test]
    fn test_shape_gate_rejects_punctuation_and_digits() {
        assert!(!shape("HELLO!", Mode::Upper));
        assert!(!shape("HELLO 2", Mode::Upper));
        assert!(!shape("hi.", Mode::Lower));
        assert!(!shape("Hello, world", Mode::TitleStrict));
        assert!(!shape("Ok!", Mode::Title));
    }

    #[test]
    fn test_command_mode_skips_shape_gate() {
        // Punctuation and digits are fine for commands, and only for commands
        assert!(shape("!roll 2d6, please", Mode::Command));
        assert!(!shape("Roll 2d6, please", Mode::TitleStrict));
    }

    #[test]
    fn test_commands_rejected_by_other_modes() {
        assert!(!shape("!hello", Mode::Lower));
        assert!(!shape("!HELLO", Mode::Upper));
    }

    #[test]
    fn test_upper_needs_a_cased_letter() {
        assert!(!shape("", Mode::Upper));
        assert!(!shape("   ", Mode::Upper));
        assert!(!shape("", Mode::Lower));
    }

    #[test]
    fn test_title_length_rules() {
        assert!(shape("Ok", Mode::Title));
        assert!(!shape("A", Mode::Title));
        assert!(!shape("A", Mode::TitleStrict));
        assert!(!shape("A b", Mode::Title));
        assert!(shape("A b", Mode::TitleStrict));
    }

    #[test]
    fn test_unicode_letters() {
        assert!(shape("ПРИВЕТ МИР", Mode::Upper));
        assert!(shape("Привет мир", Mode::TitleStrict));
    }

    // =========================================================================
    // Literal kinds
    // =========================================================================

    #[test]
    fn test_prefix() {
        let p = QueryKind::Prefix;
        assert!(check("alphabravo charlie deltaecho", p, "alpha", false, false));
        assert!(!check("alphbravo charlie deltaecho", p, "alpha", false, false));
        assert!(check("alpha bravo charlie deltaecho", p, "alpha", false, true));
        assert!(!check("alphabravo charlie deltaecho", p, "alpha", false, true));
        assert!(check("alphabravo charlie deltaecho", p, "alpha", true, false));
        assert!(!check("Alphabravo charlie deltaecho", p, "alpha", true, false));
        assert!(check("alpha bravo charlie deltaecho", p, "alpha", true, true));
        assert!(!check("Alpha bravo charlie deltaecho", p, "alpha", true, true));
    }

    #[test]
    fn test_suffix() {
        let s = QueryKind::Suffix;
        assert!(check("alphabravo charlie deltaecho", s, "echo", false, false));
        assert!(!check("alphabravo charlie deltacho", s, "echo", false, false));
        assert!(check("alphabravo charlie delta echo", s, "echo", false, true));
        assert!(!check("alphabravo charlie deltaecho", s, "echo", false, true));
        assert!(check("alphabravo charlie deltaecho", s, "echo", true, false));
        assert!(!check("alphabravo charlie deltaEcho", s, "echo", true, false));
        assert!(check("alphabravo charlie delta echo", s, "echo", true, true));
        assert!(!check("alphabravo charlie delta Echo", s, "echo", true, true));
    }

    #[test]
    fn test_exclude() {
        let x = QueryKind::Exclude;
        assert!(check("alpha bravo charli delta echo", x, "charlie", false, false));
        assert!(!check("alpha bravo charlie delta echo", x, "charlie", false, false));
        assert!(check("alpha bravocharlie delta echo", x, "charlie", false, true));
        assert!(!check("alpha bravo charlie delta echo", x, "charlie", false, true));
        assert!(check("alpha bravo Charlie delta echo", x, "charlie", true, false));
        assert!(!check("alpha bravo charlie delta echo", x, "charlie", true, false));
        assert!(check("alpha bravoCharlie delta echo", x, "charlie", true, true));
        assert!(!check("alpha bravo charlie delta echo", x, "charlie", true, true));
    }

    #[test]
    fn test_include() {
        let i = QueryKind::Include;
        assert!(check("alpha bravo charlie delta echo", i, "charlie", false, false));
        assert!(!check("alpha bravo charli delta echo", i, "charlie", false, false));
        assert!(check("alpha bravo charlie delta echo", i, "charlie", false, true));
        assert!(!check("alpha bravocharlie delta echo", i, "charlie", false, true));
        assert!(check("alpha bravo charlie delta echo", i, "charlie", true, false));
        assert!(!check("alpha bravo Charlie delta echo", i, "charlie", true, false));
        assert!(check("alpha bravo charlie delta echo", i, "charlie", true, true));
        assert!(!check("alpha bravo Charlie delta echo", i, "charlie", true, true));
    }

    #[test]
    fn test_case_insensitive_literal_is_folded() {
        assert!(check("hello WORLD", QueryKind::Include, "World", false, false));
        assert!(!check("hello WORLD", QueryKind::Include, "World", true, false));
    }

    #[test]
    fn test_empty_literal() {
        assert!(check("anything", QueryKind::Include, "", false, false));
        assert!(!check("anything", QueryKind::Exclude, "", false, false));
    }

    #[test]
    fn test_any() {
        assert!(matches("", &QueryDescriptor::any()));
        assert!(matches("!cmd", &QueryDescriptor::any()));
    }
}
