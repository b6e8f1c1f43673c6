//! Typing accuracy scoring against a reference verse.
//!
//! Both inputs are normalized before comparison: whitespace and punctuation
//! are dropped and the remaining characters are lowercased. Scoring is a
//! strict positional comparison, not an edit distance.

use regex::Regex;
use std::sync::LazyLock;

/// Whitespace, Unicode punctuation and the ASCII punctuation set.
static SKIPPED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s\p{P}[:punct:]]").expect("skip pattern is valid"));

/// Whether a character is ignored when comparing texts.
pub fn is_skipped(c: char) -> bool {
    let mut buf = [0u8; 4];
    SKIPPED.is_match(c.encode_utf8(&mut buf))
}

/// Strip whitespace and punctuation, then lowercase.
pub fn normalize(text: &str) -> String {
    normalized_chars(text).into_iter().collect()
}

fn normalized_chars(text: &str) -> Vec<char> {
    text.chars()
        .filter(|&c| !is_skipped(c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn common_prefix_len(a: &[char], b: &[char]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

/// Percentage (0.0 to 100.0) of positionally matching normalized characters,
/// relative to the longer of the two normalized texts.
///
/// Returns `0.0` when either text is empty, before or after normalization.
pub fn compute_accuracy(reference: &str, typed: &str) -> f64 {
    if reference.is_empty() || typed.is_empty() {
        return 0.0;
    }

    let reference = normalized_chars(reference);
    let typed = normalized_chars(typed);
    if reference.is_empty() || typed.is_empty() {
        return 0.0;
    }

    let max_len = reference.len().max(typed.len());
    let matches = reference
        .iter()
        .zip(&typed)
        .filter(|(expected, actual)| expected == actual)
        .count();

    (matches as f64 / max_len as f64) * 100.0
}

/// Character index into `reference` separating the part already reproduced
/// by `typed` from the part still to be typed.
///
/// The common prefix is measured on normalized text and mapped back onto the
/// original reference by counting only the characters normalization keeps.
/// Once the whole reference has been matched the split covers any trailing
/// punctuation as well. The result lies within `0..=reference.chars().count()`.
pub fn compute_display_split(reference: &str, typed: &str) -> usize {
    let normalized_reference = normalized_chars(reference);
    let prefix = common_prefix_len(&normalized_reference, &normalized_chars(typed));

    if prefix == 0 {
        return 0;
    }
    if prefix == normalized_reference.len() {
        return reference.chars().count();
    }

    let mut counted = 0;
    for (idx, c) in reference.chars().enumerate() {
        if is_skipped(c) {
            continue;
        }
        // a character can lowercase to several chars
        counted += c.to_lowercase().count();
        if counted >= prefix {
            return idx + 1;
        }
    }

    reference.chars().count()
}

/// Reference text split into the matched and the remaining portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySplit<'a> {
    /// Already reproduced by the user.
    pub typed: &'a str,
    /// Still to be typed; rendered with emphasis.
    pub remaining: &'a str,
}

/// Split `reference` at [`compute_display_split`].
pub fn split_for_display<'a>(reference: &'a str, typed: &str) -> DisplaySplit<'a> {
    let split = compute_display_split(reference, typed);
    let at = reference
        .char_indices()
        .nth(split)
        .map_or(reference.len(), |(idx, _)| idx);
    let (typed, remaining) = reference.split_at(at);
    DisplaySplit { typed, remaining }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_strips_and_lowercases() {
        assert_eq!(normalize("Hello, World!"), "helloworld");
        assert_eq!(normalize("  a\tb\nc  "), "abc");
        assert_eq!(normalize("$1+1=2"), "112");
    }

    #[test]
    fn test_normalize_unicode_punctuation() {
        assert_eq!(normalize("「마음이 모든 것의 근본이다」…"), "마음이모든것의근본이다");
        assert_eq!(normalize("¿Qué? ¡Sí!"), "quésí");
        assert_eq!(normalize("— “quoted” —"), "quoted");
    }

    #[test]
    fn test_accuracy_empty_inputs() {
        assert_eq!(compute_accuracy("", "anything"), 0.0);
        assert_eq!(compute_accuracy("anything", ""), 0.0);
        assert_eq!(compute_accuracy("", ""), 0.0);
    }

    #[test]
    fn test_accuracy_punctuation_only() {
        assert_eq!(compute_accuracy("...", "..."), 0.0);
        assert_eq!(compute_accuracy("...", "abc"), 0.0);
        assert_eq!(compute_accuracy("abc", " , "), 0.0);
    }

    #[test]
    fn test_accuracy_exact_match() {
        assert_eq!(compute_accuracy("hello world", "hello world"), 100.0);
        assert_eq!(compute_accuracy("Hello, World!", "hello world"), 100.0);
    }

    #[test]
    fn test_accuracy_positional() {
        assert_eq!(compute_accuracy("abcd", "abXY"), 50.0);
        assert_eq!(compute_accuracy("abcd", "abcdef"), 4.0 / 6.0 * 100.0);
        assert_eq!(compute_accuracy("abcd", "ab"), 50.0);
        // a missing letter shifts everything after it
        assert_eq!(compute_accuracy("abcd", "acd"), 25.0);
    }

    #[test]
    fn test_accuracy_korean() {
        let verse = "마음은 모든 일의 근본이다.";
        assert_eq!(compute_accuracy(verse, "마음은 모든 일의 근본이다"), 100.0);
        assert_eq!(compute_accuracy(verse, "마음은"), 3.0 / 11.0 * 100.0);
    }

    #[test]
    fn test_split_full_match_covers_trailing_punctuation() {
        assert_eq!(compute_display_split("ab, cd.", "abcd"), 7);
    }

    #[test]
    fn test_split_no_common_prefix() {
        assert_eq!(compute_display_split("abcd", "xyz"), 0);
        assert_eq!(compute_display_split("abcd", ""), 0);
        assert_eq!(compute_display_split("", "abcd"), 0);
    }

    #[test]
    fn test_split_partial_prefix_skips_punctuation() {
        // "ab" matched; split lands right after 'b'
        assert_eq!(compute_display_split("ab, cd.", "ab"), 2);
        // "abc" matched; ", " passes through between 'b' and 'c'
        assert_eq!(compute_display_split("ab, cd.", "a b c"), 5);
        // prefix stops at the first mismatch
        assert_eq!(compute_display_split("ab, cd.", "abx"), 2);
    }

    #[test]
    fn test_split_counts_chars_for_multibyte() {
        let verse = "마음은 모든 일의 근본이다.";
        assert_eq!(compute_display_split(verse, "마음은 모"), 5);
        assert_eq!(compute_display_split(verse, "마음은 모든 일의 근본이다"), 15);

        let parts = split_for_display(verse, "마음은 모");
        assert_eq!(parts.typed, "마음은 모");
        assert_eq!(parts.remaining, "든 일의 근본이다.");
    }

    #[test]
    fn test_split_counts_lowercase_expansion() {
        // 'İ' lowercases to 'i' plus a combining dot
        assert_eq!(normalize("İx"), "i\u{307}x");
        assert_eq!(compute_display_split("İx", "i"), 1);
        assert_eq!(compute_display_split("İx", "i\u{307}"), 1);
        assert_eq!(compute_display_split("İx", "i\u{307}x"), 2);
        assert_eq!(compute_accuracy("İx", "i\u{307}x"), 100.0);

        let parts = split_for_display("İx", "i");
        assert_eq!(parts.typed, "İ");
        assert_eq!(parts.remaining, "x");
    }

    #[test]
    fn test_split_for_display() {
        let parts = split_for_display("Hello, world.", "hello");
        assert_eq!(parts.typed, "Hello");
        assert_eq!(parts.remaining, ", world.");

        let parts = split_for_display("Hello, world.", "nope");
        assert_eq!(parts.typed, "");
        assert_eq!(parts.remaining, "Hello, world.");
    }
}
