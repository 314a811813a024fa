//! Markup sanitization
//!
//! Strips script-bearing elements, comments and tags from strings before they
//! reach a presentation layer or an exported report. Plain text that merely
//! contains `<` or `>` (e.g. "a < b") is left alone.

use once_cell::sync::Lazy;
use regex::Regex;

/// Removal passes, applied in order on every iteration
const MARKUP_PATTERNS: &[&str] = &[
    // Elements whose content is executable or invisible
    r"(?is)<\s*(?:script|style|iframe|object|embed|noscript|template)\b[^>]*>.*?<\s*/\s*(?:script|style|iframe|object|embed|noscript|template)\s*>",
    // Comments
    r"(?s)<!--.*?-->",
    // Any remaining start/end tag or declaration
    r"</?[A-Za-z][^<>]*>",
    r"<![^<>]*>",
];

static MARKUP: Lazy<Vec<Regex>> = Lazy::new(|| {
    MARKUP_PATTERNS
        .iter()
        .filter_map(|pattern| match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(e) => {
                tracing::error!("Invalid sanitizer pattern {}: {}", pattern, e);
                None
            }
        })
        .collect()
});

/// Strip unsafe markup from a string.
///
/// Passes repeat until the output stops changing, so removing one tag can never
/// leave behind a new one (`<scr<b>ipt>`), and `sanitize(sanitize(s)) == sanitize(s)`.
pub fn sanitize(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }

    let mut current = input.to_string();
    loop {
        let mut next = current.clone();
        for regex in MARKUP.iter() {
            if regex.is_match(&next) {
                next = regex.replace_all(&next, "").into_owned();
            }
        }

        if next == current {
            return next;
        }
        current = next;
    }
}
