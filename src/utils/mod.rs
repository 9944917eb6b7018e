//! Utility functions and helpers.

pub mod http;

use unicode_segmentation::UnicodeSegmentation;
use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> String {
    base.join(href)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| href.to_string())
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of user-perceived characters in `s`.
pub fn char_len(s: &str) -> usize {
    s.graphemes(true).count()
}

/// Cut `s` to at most `max` user-perceived characters.
pub fn truncate_chars(s: &str, max: usize) -> String {
    s.graphemes(true).take(max).collect()
}

/// Cut `s` to `max` characters and append `...` if anything was removed.
pub fn ellipsize(s: &str, max: usize) -> String {
    if char_len(s) <= max {
        s.to_string()
    } else {
        format!("{}...", truncate_chars(s, max))
    }
}
