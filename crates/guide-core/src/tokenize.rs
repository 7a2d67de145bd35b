//! Text normalization shared by the scorer and highlighter.

use std::sync::LazyLock;

use regex::Regex;

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

/// Tokens of this many chars or fewer are dropped as noise.
const MAX_NOISE_TOKEN_LEN: usize = 2;

pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Split text into lowercase tokens on whitespace and common punctuation.
///
/// Returns a fresh lazy iterator per call; tokens of two chars or fewer are skipped.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(is_separator)
        .filter(|t| t.chars().count() > MAX_NOISE_TOKEN_LEN)
        .map(str::to_lowercase)
}

fn is_separator(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            ',' | '.' | ';' | ':' | '!' | '?' | '(' | ')' | '[' | ']' | '{' | '}' | '"' | '\''
                | '/' | '\\' | '|' | '<' | '>'
        )
}

/// Replace markup tags with a space, collapse whitespace runs, trim.
pub fn strip_markup(rich: &str) -> String {
    if rich.is_empty() {
        return String::new();
    }
    let without_tags = MARKUP_TAG.replace_all(rich, " ");
    collapse_whitespace(&without_tags)
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Count non-overlapping literal occurrences of `needle` in `haystack`.
pub fn count_occurrences(haystack: &str, needle: &str) -> usize {
    if needle.is_empty() {
        return 0;
    }
    haystack.matches(needle).count()
}
