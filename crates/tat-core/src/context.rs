//! Context-window extraction
//!
//! Produces the bounded, sanitized excerpt attached to every annotation record.

use crate::sanitize::sanitize;

/// Characters kept on each side of a match
pub const DEFAULT_CONTEXT_WINDOW: usize = 30;

const ELLIPSIS: &str = "...";

/// Excerpt around the first occurrence of `match_text` using the default window.
pub fn get_context(full_text: &str, match_text: &str) -> String {
    get_context_with_window(full_text, match_text, DEFAULT_CONTEXT_WINDOW)
}

/// Excerpt around the first occurrence of `match_text`.
///
/// Lookup is an exact, case-sensitive substring search. When `match_text` does
/// not occur, the match itself is returned (sanitized) instead of an excerpt.
/// Later duplicates always receive the first occurrence's excerpt. The window is
/// measured in characters and never splits a code point.
pub fn get_context_with_window(full_text: &str, match_text: &str, window: usize) -> String {
    let Some(index) = full_text.find(match_text) else {
        tracing::trace!("No context found for {:?}", match_text);
        return sanitize(match_text);
    };

    let start = full_text[..index]
        .char_indices()
        .rev()
        .take(window)
        .last()
        .map_or(index, |(i, _)| i);

    let match_end = index + match_text.len();
    let end = full_text[match_end..]
        .char_indices()
        .nth(window)
        .map_or(full_text.len(), |(i, _)| match_end + i);

    let mut context = String::with_capacity(end - start + 2 * ELLIPSIS.len());
    if start > 0 {
        context.push_str(ELLIPSIS);
    }
    context.push_str(&full_text[start..end]);
    if end < full_text.len() {
        context.push_str(ELLIPSIS);
    }

    sanitize(&context)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = "Apple Inc. announced on Monday that Tim Cook, the CEO, will visit their new headquarters in Cupertino next month.";

    #[test]
    fn test_missing_match_returns_match() {
        assert_eq!(get_context(SAMPLE, "Tim Cook Apple Inc."), "Tim Cook Apple Inc.");
        assert_eq!(get_context(SAMPLE, "tim cook"), "tim cook");
    }

    #[test]
    fn test_match_at_start_has_no_prefix() {
        let context = get_context(SAMPLE, "Apple Inc.");
        assert!(!context.starts_with("..."));
        assert!(context.starts_with("Apple Inc. announced"));
        assert!(context.ends_with("..."));
    }

    #[test]
    fn test_window_is_clipped_both_sides() {
        let context = get_context(SAMPLE, "Tim Cook");
        assert!(context.starts_with("..."));
        assert!(context.ends_with("..."));
        // 30 chars on each side plus the match and both markers
        assert_eq!(context.chars().count(), 30 + "Tim Cook".len() + 30 + 6);
        assert!(context.contains("Tim Cook, the CEO"));
    }

    #[test]
    fn test_match_near_end_has_no_suffix() {
        let context = get_context(SAMPLE, "next month.");
        assert!(context.starts_with("..."));
        assert!(context.ends_with("next month."));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let text = "Paris is big. Later we return to Paris again and again and again.";
        let first = get_context_with_window(text, "Paris", 5);
        assert_eq!(first, "Paris is b...");
    }

    #[test]
    fn test_multibyte_text_respects_char_boundaries() {
        let text = "Zoë met José in Zürich on Montag.";
        let context = get_context_with_window(text, "José", 3);
        assert_eq!(context, "...et José in...");
    }

    #[test]
    fn test_context_is_sanitized() {
        let text = "<b>Tim Cook</b> spoke";
        assert_eq!(get_context(text, "Tim Cook"), "Tim Cook spoke");
    }

    #[test]
    fn test_absent_match_is_sanitized() {
        assert_eq!(get_context("nothing here", "<b>Apple</b>"), "Apple");
    }

    proptest! {
        #[test]
        fn prop_absent_match_returned_unchanged(m in "[A-Za-z ]{1,20}") {
            let text = "0123456789-0123456789";
            prop_assert_eq!(get_context(text, &m), m);
        }

        #[test]
        fn prop_prefix_iff_clipped(prefix in "[a-z ]{0,60}", suffix in "[a-z ]{0,60}") {
            let text = format!("{prefix}MATCH{suffix}");
            let context = get_context(&text, "MATCH");
            prop_assert_eq!(context.starts_with("..."), prefix.chars().count() > 30);
            prop_assert_eq!(context.ends_with("..."), suffix.chars().count() > 30);
        }
    }
}
