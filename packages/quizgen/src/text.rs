//! Text normalization utilities.
//!
//! Pure functions, shared by the content extractor (cleaning paragraph text)
//! and the generation client (bounding prompt size).

use std::sync::LazyLock;

use regex::Regex;

static RE_CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?:\d+|edit|citation needed)\]").expect("valid citation regex")
});

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Approximate characters per token.
pub const CHARS_PER_TOKEN: usize = 4;

/// Appended when a truncation could not end on a sentence.
pub const ELLIPSIS: &str = "...";

/// Strip citation markers (`[12]`, `[edit]`, `[citation needed]`), collapse
/// whitespace runs to single spaces and trim.
pub fn clean(text: &str) -> String {
    let stripped = RE_CITATION.replace_all(text, "");
    RE_WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Truncate `text` to roughly `max_tokens` tokens.
///
/// The budget is `max_tokens * 4` characters. Over-budget text is cut at the
/// budget, then backed up to the last `.` if that period falls inside the
/// final 20% of the window. Otherwise the raw cut is returned with an
/// ellipsis appended.
pub fn truncate_by_budget(text: &str, max_tokens: usize) -> String {
    let max_chars = max_tokens * CHARS_PER_TOKEN;

    let cut = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };
    let window = &text[..cut];

    if let Some(period) = window.rfind('.') {
        let period_chars = window[..period].chars().count();
        // period_chars > 0.8 * max_chars, in integers
        if period_chars * 5 > max_chars * 4 {
            return window[..=period].to_string();
        }
    }

    format!("{window}{ELLIPSIS}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_clean_strips_citations() {
        let raw = "Rust[1] is a language[edit]  that\n\tcompiles[citation needed]. ";
        assert_eq!(clean(raw), "Rust is a language that compiles.");
    }

    #[test]
    fn test_clean_keeps_other_brackets() {
        assert_eq!(clean("an array [a, b] value"), "an array [a, b] value");
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("  one two\nthree  "), 3);
        assert_eq!(word_count(""), 0);
    }

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate_by_budget("Short text.", 10), "Short text.");
    }

    #[test]
    fn test_truncate_without_late_period_appends_ellipsis() {
        let text = format!("A. B. {}", "x".repeat(10_000));
        // 8-char window "A. B. xx": last period at index 4, not past 6.4
        assert_eq!(truncate_by_budget(&text, 2), "A. B. xx...");
    }

    #[test]
    fn test_truncate_prefers_sentence_boundary() {
        let text = format!("{}. {}", "a".repeat(90), "b".repeat(200));
        let out = truncate_by_budget(&text, 25);
        assert_eq!(out, format!("{}.", "a".repeat(90)));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let text = "日本語のテキスト".repeat(100);
        let out = truncate_by_budget(&text, 3);
        assert!(out.ends_with(ELLIPSIS));
        assert_eq!(out.chars().count(), 12 + ELLIPSIS.len());
    }

    proptest! {
        #[test]
        fn prop_clean_collapses_whitespace(s in "\\PC{0,200}") {
            let out = clean(&s);
            prop_assert!(!out.contains("  "));
            prop_assert_eq!(out.trim(), out.as_str());
        }

        #[test]
        fn prop_truncate_respects_budget(s in "[a-z. ]{0,400}", tokens in 1usize..50) {
            let out = truncate_by_budget(&s, tokens);
            prop_assert!(out.chars().count() <= tokens * CHARS_PER_TOKEN + ELLIPSIS.len());
        }

        #[test]
        fn prop_truncate_is_deterministic(s in "\\PC{0,300}", tokens in 1usize..40) {
            prop_assert_eq!(truncate_by_budget(&s, tokens), truncate_by_budget(&s, tokens));
        }
    }
}
