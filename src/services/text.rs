//! Text shaping for Wikipedia extracts and popularity summaries.
//!
//! Lengths are counted in `char`s so Persian and other non-Latin extracts
//! are never split inside a code point.

/// Shortens an extract longer than `max_chars` to its first sentence (up to and
/// including the first '.'); if that sentence is itself longer than
/// `max_chars`, keeps only the first `hard_chars` characters.
#[must_use]
pub fn truncate_extract(extract: &str, max_chars: usize, hard_chars: usize) -> String {
    if extract.chars().count() <= max_chars {
        return extract.to_string();
    }

    let first_sentence = extract
        .find('.')
        .map_or(extract, |idx| &extract[..=idx])
        .trim();

    if first_sentence.chars().count() <= max_chars {
        first_sentence.to_string()
    } else {
        extract.chars().take(hard_chars).collect()
    }
}

/// First `count` whitespace-separated words of `text`, joined by single spaces.
#[must_use]
pub fn first_words(text: &str, count: usize) -> String {
    text.split_whitespace()
        .take(count)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_extract_is_untouched() {
        let extract = "Rust is a language. It is fast.";
        assert_eq!(truncate_extract(extract, 390, 300), extract);
    }

    #[test]
    fn long_extract_is_cut_to_first_sentence() {
        let extract = format!("Rust is a language. {}", "More words here. ".repeat(40));
        assert!(extract.chars().count() > 390);
        assert_eq!(truncate_extract(&extract, 390, 300), "Rust is a language.");
    }

    #[test]
    fn limit_is_inclusive() {
        let at_limit = format!("First sentence. {}", "x".repeat(374));
        assert_eq!(at_limit.chars().count(), 390);
        assert_eq!(truncate_extract(&at_limit, 390, 300), at_limit);

        let over_limit = format!("First sentence. {}", "x".repeat(375));
        assert_eq!(over_limit.chars().count(), 391);
        assert_eq!(truncate_extract(&over_limit, 390, 300), "First sentence.");
    }

    #[test]
    fn long_first_sentence_is_hard_truncated() {
        let extract = format!("{}. Tail.", "a".repeat(400));
        let truncated = truncate_extract(&extract, 390, 300);
        assert_eq!(truncated.chars().count(), 300);
        assert!(truncated.chars().all(|c| c == 'a'));
    }

    #[test]
    fn long_extract_without_period_is_hard_truncated() {
        let extract = "word ".repeat(100);
        assert_eq!(truncate_extract(&extract, 390, 300).chars().count(), 300);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        // 200 Persian letters are 400 bytes but only 200 characters.
        let extract = "ب".repeat(200);
        assert_eq!(truncate_extract(&extract, 390, 300), extract);

        let long = format!("{}. {}", "ت".repeat(395), "ث".repeat(10));
        let truncated = truncate_extract(&long, 390, 300);
        assert_eq!(truncated.chars().count(), 300);
    }

    #[test]
    fn first_words_limits_word_count() {
        let text = "one two  three\nfour five six seven eight nine ten eleven twelve";
        assert_eq!(
            first_words(text, 10),
            "one two three four five six seven eight nine ten"
        );
        assert_eq!(first_words("short text", 10), "short text");
        assert_eq!(first_words("", 10), "");
    }
}
