//! Character-set similarity measures.
//!
//! Jaccard over character sets anchors a candidate to the exemplar style;
//! the distinct-character ratio measures how internally varied it is.

use std::collections::HashSet;

/// Jaccard similarity over character sets: |A ∩ B| / |A ∪ B|.
///
/// Two empty strings have an empty union; the result is defined as 0.0
/// rather than a division by zero.
pub fn jaccard_similarity(a: &str, b: &str) -> f64 {
    let x: HashSet<char> = a.chars().collect();
    let y: HashSet<char> = b.chars().collect();

    let union = x.union(&y).count();
    if union == 0 {
        return 0.0;
    }

    x.intersection(&y).count() as f64 / union as f64
}

/// Mean Jaccard distance from `text` to the exemplar set.
///
/// Lower means closer to the reference style. An exact duplicate of an
/// exemplar is not specially penalized here; the band keeps degenerate
/// high scorers out downstream.
pub fn jaccard_distance_to_exemplars(text: &str, exemplars: &[String]) -> f64 {
    if exemplars.is_empty() {
        return 1.0;
    }

    let mean = exemplars
        .iter()
        .map(|e| jaccard_similarity(text, e))
        .sum::<f64>()
        / exemplars.len() as f64;

    1.0 - mean
}

/// Distinct-character ratio of `text`; 1.0 for the empty string.
pub fn self_similarity(text: &str) -> f64 {
    let total = text.chars().count();
    if total == 0 {
        return 1.0;
    }

    let distinct = text.chars().collect::<HashSet<_>>().len();
    distinct as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jaccard_identical_disjoint_and_empty() {
        assert_eq!(jaccard_similarity("abc", "abc"), 1.0);
        assert_eq!(jaccard_similarity("abc", "xyz"), 0.0);
        assert_eq!(jaccard_similarity("", ""), 0.0);
    }

    #[test]
    fn jaccard_partial_overlap() {
        // {a, b} vs {b, c}: intersection {b}, union {a, b, c}.
        let sim = jaccard_similarity("ab", "bc");
        assert!((sim - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn distance_averages_over_exemplars() {
        let exemplars = vec!["abc".to_string(), "xyz".to_string()];
        // Similarities are 1.0 and 0.0, mean 0.5, distance 0.5.
        let d = jaccard_distance_to_exemplars("abc", &exemplars);
        assert!((d - 0.5).abs() < 1e-12);
    }

    #[test]
    fn distance_with_no_exemplars_is_maximal() {
        assert_eq!(jaccard_distance_to_exemplars("anything", &[]), 1.0);
    }

    #[test]
    fn self_similarity_cases() {
        assert_eq!(self_similarity(""), 1.0);
        assert_eq!(self_similarity("aabb"), 0.5);
        assert_eq!(self_similarity("abcd"), 1.0);
    }
}
