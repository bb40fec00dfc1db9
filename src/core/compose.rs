//! Prompt composition and raw-candidate tidying.
//!
//! The composed prompt is a generation seed only; scoring never sees it.
//! Tidying turns a raw generation into something shaped like a reply before
//! the ranker judges it.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::metrics::SENTENCE_TERMINATORS;

/// Reply surface ceiling. A soft constraint here: text with no usable
/// sentence terminator near the limit may still exceed it.
pub const REPLY_CHAR_LIMIT: usize = 280;

/// How many times the over-limit trailing-sentence cut is attempted.
const TRUNCATION_PASSES: usize = 2;

static URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"http\S+").expect("url pattern is valid"));

/// Remove `http…` runs (image and video links) and trim.
pub fn strip_urls(text: &str) -> String {
    URL_RE.replace_all(text, "").trim().to_string()
}

/// Interleave the URL-stripped prompt with the persona token and the
/// exemplars, closing with "{persona} is {prompt}". The template shape is a
/// tunable constant, not part of the scoring contract.
pub fn compose_prompt(prompt_text: &str, persona: &str, exemplars: &[String]) -> String {
    let prompt = strip_urls(prompt_text);

    let mut out = prompt.clone();
    for exemplar in exemplars {
        out.push(' ');
        out.push_str(persona);
        out.push(' ');
        out.push_str(exemplar);
    }
    out.push(' ');
    out.push_str(persona);
    out.push_str(" is ");
    out.push_str(&prompt);
    out
}

/// Tidy one raw generation into a candidate reply.
///
/// Steps: drop a leading echo of the composed prompt, strip URLs, keep the
/// text after the first sentence terminator through the last one (both
/// fragments at the edges are presumed incomplete; a generation with no
/// terminator tidies to empty), then shed trailing sentences while over the
/// reply limit, at most twice.
pub fn tidy_candidate(raw: &str, composed_prompt: &str) -> String {
    let stripped = raw.strip_prefix(composed_prompt).unwrap_or(raw).trim();
    let s = strip_urls(stripped);

    let mut s = match (s.find(SENTENCE_TERMINATORS), s.rfind(SENTENCE_TERMINATORS)) {
        (Some(first), Some(last)) => s[first + 1..=last].trim().to_string(),
        _ => String::new(),
    };

    for _ in 0..TRUNCATION_PASSES {
        if s.chars().count() <= REPLY_CHAR_LIMIT {
            break;
        }
        s = drop_trailing_sentence(&s);
    }
    s
}

/// Cut at the last sentence terminator strictly before the end of the text.
/// Text with no earlier terminator is returned unchanged.
fn drop_trailing_sentence(s: &str) -> String {
    // A terminator that is already the final character does not count;
    // cutting there would be a no-op.
    let scan_end = if s.ends_with(SENTENCE_TERMINATORS) {
        s.len() - 1
    } else {
        s.len()
    };

    match s[..scan_end].rfind(SENTENCE_TERMINATORS) {
        Some(idx) => s[..=idx].trim().to_string(),
        None => s.to_string(),
    }
}
