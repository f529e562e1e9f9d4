// File: sumomask-core/src/validators.rs
//! Programmatic validation beyond regular expression matching.
//!
//! Phone-shaped patterns are deliberately loose, so every candidate match
//! goes through two positional/structural checks before it is committed:
//! a digit-count plausibility window and an URL-boundary suppression test.
//!
//! License: MIT OR Apache-2.0

use once_cell::sync::Lazy;
use regex::Regex;

/// Matches an unterminated URL scheme prefix ending at the end of the
/// haystack, i.e. `http(s)://` followed by non-whitespace up to the cut.
static URL_PREFIX_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://[^\s]*$").unwrap());

/// Counts the ASCII digits in `s`, ignoring every other character.
pub fn digit_count(s: &str) -> usize {
    s.chars().filter(|c| c.is_ascii_digit()).count()
}

/// Plausibility filter for phone-shaped matches: after stripping all
/// non-digit characters the remaining count must fall in `[min, max]`.
///
/// This is a normalized digit-count window, not a phone-format validator.
pub fn is_plausible_digit_count(s: &str, min: usize, max: usize) -> bool {
    let digits = digit_count(s);
    digits >= min && digits <= max
}

/// Returns true when the span starting at byte offset `match_start` lies
/// inside the path or query of an URL, i.e. the text immediately before it
/// contains an URL scheme with no intervening whitespace.
///
/// The check is positional: it looks at the exact prefix of the text being
/// scanned, so replacements elsewhere in the string cannot confuse it.
pub fn is_inside_url(text: &str, match_start: usize) -> bool {
    URL_PREFIX_RE.is_match(&text[..match_start])
}
