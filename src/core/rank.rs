//! Candidate ranking: hard disqualification gates plus a two-term score.
//!
//! A single policy violation (banned term, malformed structure) zeroes a
//! candidate no matter how well it scores stylistically, so no weighted-sum
//! combination can ever surface unsafe text.

use aho_corasick::AhoCorasick;
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::core::{metrics, similarity};

/// Bounds a candidate must respect to stay eligible.
mod limits {
    pub const MIN_LEN: usize = 10;
    pub const MAX_LEN: usize = 250;
    pub const MAX_SYMBOLS: usize = 2;
    pub const MAX_DIGITS: usize = 4;
}

/// Derived per-candidate features. Computed once at ranking time, never
/// mutated afterward.
#[derive(Debug, Clone, Serialize)]
pub struct Features {
    pub len: usize,
    pub digits: usize,
    pub forbidden_mentions: usize,
    pub symbols: usize,
    pub banned_hits: usize,
    pub repeated_excess: usize,
    pub leading_punct: bool,
    pub jaccard_distance: f64,
    pub self_similarity: f64,
}

impl Features {
    /// Hard gate: any single violation disqualifies.
    pub fn disqualified(&self) -> bool {
        self.len < limits::MIN_LEN
            || self.len > limits::MAX_LEN
            || self.forbidden_mentions > 0
            || self.symbols > limits::MAX_SYMBOLS
            || self.leading_punct
            || self.digits > limits::MAX_DIGITS
            || self.banned_hits > 0
            || self.repeated_excess > 0
    }
}

/// One scored candidate reply.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub text: String,
    pub features: Features,
    pub score: f64,
}

/// Static scoring configuration. Exemplars anchor style similarity; the
/// term lists drive disqualification.
#[derive(Debug, Clone, Default)]
pub struct RankConfig {
    pub exemplars: Vec<String>,
    pub banned_terms: Vec<String>,
    pub forbidden_name: String,
}

/// Scores candidate texts against a fixed configuration.
///
/// Scoring is pure and deterministic: a candidate's score depends only on
/// its text and this configuration.
pub struct CandidateRanker {
    cfg: RankConfig,
    banned: AhoCorasick,
}

impl CandidateRanker {
    /// Precompile the banned-term matcher; fails only on a degenerate
    /// term list.
    pub fn new(cfg: RankConfig) -> Result<Self> {
        let banned = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&cfg.banned_terms)
            .context("failed to compile banned-term matcher")?;

        Ok(Self { cfg, banned })
    }

    /// Score one candidate text.
    pub fn score(&self, text: &str) -> Candidate {
        let features = Features {
            len: metrics::length(text),
            digits: metrics::digit_count(text),
            forbidden_mentions: metrics::mention_count(text, &self.cfg.forbidden_name),
            symbols: metrics::symbol_count(text),
            banned_hits: metrics::banned_hits(text, &self.banned),
            repeated_excess: metrics::repeated_sentence_excess(text),
            leading_punct: metrics::leading_char_is_punctuation(text),
            jaccard_distance: similarity::jaccard_distance_to_exemplars(text, &self.cfg.exemplars),
            self_similarity: similarity::self_similarity(text),
        };

        // Both score terms lie in [0, 1]; no clamp beyond their natural range.
        let score = if features.disqualified() {
            0.0
        } else {
            features.jaccard_distance + features.self_similarity
        };

        Candidate { text: text.to_string(), features, score }
    }

    /// Rank a batch. Input order is preserved; scoring is data-parallel.
    pub fn rank(&self, texts: &[String]) -> Vec<Candidate> {
        texts.par_iter().map(|t| self.score(t)).collect()
    }
}

/// Stable descending sort by score, for diagnostics only. Selection treats
/// the candidate set as unordered.
pub fn sorted_by_score(candidates: &[Candidate]) -> Vec<Candidate> {
    let mut out = candidates.to_vec();
    out.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    out
}
