//! Per-candidate lexical features.
//!
//! Every function here is a pure map from candidate text (plus static term
//! configuration) to a number or flag. The ranker combines them into a score;
//! nothing in this module decides anything on its own.

use aho_corasick::AhoCorasick;
use itertools::Itertools;

/// Sentence terminators used for segment splitting and candidate tidying.
pub const SENTENCE_TERMINATORS: [char; 3] = ['.', '!', '?'];

/// Character count (Unicode scalars, not bytes).
pub fn length(text: &str) -> usize {
    text.chars().count()
}

/// Count of numeric characters, any script. Non-ASCII digits count here
/// even though they also count toward the symbol gate.
pub fn digit_count(text: &str) -> usize {
    text.chars().filter(|c| c.is_numeric()).count()
}

/// Case-insensitive, non-overlapping occurrence count of a literal `term`.
pub fn mention_count(text: &str, term: &str) -> usize {
    if term.is_empty() {
        return 0;
    }
    text.to_lowercase().matches(&term.to_lowercase()).count()
}

/// Characters that are non-ASCII (code point >= 128) or the `@` sigil.
/// A proxy for garbled or mention-heavy output.
pub fn symbol_count(text: &str) -> usize {
    text.chars().filter(|&c| !c.is_ascii() || c == '@').count()
}

/// Number of distinct banned terms present in `text`.
///
/// The matcher is compiled case-insensitive by the ranker. Overlapping
/// matches are scanned so one term can never shadow another.
pub fn banned_hits(text: &str, banned: &AhoCorasick) -> usize {
    banned
        .find_overlapping_iter(text)
        .map(|m| m.pattern().as_usize())
        .unique()
        .count()
}

/// How much sentence text occurs more than once.
///
/// Split on `.`/`!`/`?`, trim each segment, then return total segments minus
/// distinct segments. Empty segments count as segments: runs of three or
/// more terminators repeat the empty segment and raise the excess. That
/// behavior is load-bearing, since any positive excess disqualifies.
pub fn repeated_sentence_excess(text: &str) -> usize {
    let counts = text.split(SENTENCE_TERMINATORS).map(str::trim).counts();
    let total: usize = counts.values().sum();
    total - counts.len()
}

/// True when the first character is ASCII punctuation.
/// Empty text has no leading character and passes.
pub fn leading_char_is_punctuation(text: &str) -> bool {
    text.chars().next().is_some_and(|c| c.is_ascii_punctuation())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(terms: &[&str]) -> AhoCorasick {
        AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(terms)
            .expect("matcher")
    }

    #[test]
    fn length_counts_chars_not_bytes() {
        assert_eq!(length("abc"), 3);
        assert_eq!(length("héllo"), 5);
        assert_eq!(length(""), 0);
    }

    #[test]
    fn digits_count_any_script() {
        assert_eq!(digit_count("a1b22c"), 3);
        assert_eq!(digit_count("no digits"), 0);
        // Arabic-Indic digits are digits too, not just symbols.
        assert_eq!(digit_count("room ٤٢ at 9"), 3);
    }

    #[test]
    fn mention_count_is_case_insensitive() {
        assert_eq!(mention_count("Trump trump TRUMP", "trump"), 3);
        assert_eq!(mention_count("harmless", "trump"), 0);
        assert_eq!(mention_count("anything", ""), 0);
    }

    #[test]
    fn symbols_cover_non_ascii_and_at() {
        assert_eq!(symbol_count("hi @you"), 1);
        assert_eq!(symbol_count("héllo ☺"), 2);
        assert_eq!(symbol_count("plain ascii"), 0);
    }

    #[test]
    fn banned_hits_count_distinct_terms() {
        let m = matcher(&["hitler", "kill"]);
        assert_eq!(banned_hits("Killer instinct", &m), 1);
        assert_eq!(banned_hits("kill Hitler kill", &m), 2);
        assert_eq!(banned_hits("peaceful text", &m), 0);
    }

    #[test]
    fn banned_hits_see_overlapping_terms() {
        // Non-overlapping search would consume "ab" and miss "ba".
        let m = matcher(&["ab", "ba"]);
        assert_eq!(banned_hits("aba", &m), 2);
    }

    #[test]
    fn repeated_sentence_excess_matches_counter_semantics() {
        assert_eq!(repeated_sentence_excess("A. A. B."), 1);
        assert_eq!(repeated_sentence_excess("A. B. C."), 0);
        assert_eq!(repeated_sentence_excess(""), 0);
        assert_eq!(repeated_sentence_excess("no terminator at all"), 0);
        // Mixed terminators compare segments after trimming.
        assert_eq!(repeated_sentence_excess("Fine! fine? Fine."), 1);
    }

    #[test]
    fn consecutive_terminators_repeat_the_empty_segment() {
        // "Hi!!! There" splits into ["Hi", "", "", " There"].
        assert_eq!(repeated_sentence_excess("Hi!!! There"), 1);
        // A single pair only yields one empty segment next to " There".
        assert_eq!(repeated_sentence_excess("Hi!! There"), 0);
    }

    #[test]
    fn leading_punctuation_check() {
        assert!(leading_char_is_punctuation(".starts with dot"));
        assert!(leading_char_is_punctuation("@mention first"));
        assert!(!leading_char_is_punctuation("word first"));
        assert!(!leading_char_is_punctuation(""));
    }
}
