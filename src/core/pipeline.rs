//! One bot cycle: fetch, dedup, generate, tidy, rank, band-select, publish.
//!
//! The social-network client and the language model stay behind traits; the
//! pipeline owns only the decision logic between them. Fail-fast throughout:
//! a skipped cycle is cheap, silent corruption (double-posting) is the risk
//! to avoid. History is appended only after a successful publish, so a crash
//! mid-cycle leaves the same prompt eligible on the next invocation.

use std::time::Instant;

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::core::compose;
use crate::core::rank::{Candidate, CandidateRanker, sorted_by_score};
use crate::core::select::select_from_band;
use crate::infra::config::Config;
use crate::infra::history::{HistoryRecord, HistoryStore};
use crate::infra::retry::retry;

/// One unanswered post pulled from a followed account's timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub id: String,
    pub text: String,
}

/// The reply that was published, with its identifying metadata.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub prompt: Prompt,
    pub chosen: Candidate,
    pub response_id: String,
}

/// Terminal outcomes of a cycle. The first two are normal no-op runs, not
/// errors.
#[derive(Debug)]
pub enum Outcome {
    NoNewPrompt,
    NoCandidateInBand { prompt: Prompt },
    Published(SelectionResult),
}

/// Timeline access for followed accounts. Sources exclude reposts and
/// replies.
pub trait TimelineSource {
    fn followed_account_ids(&mut self) -> Result<Vec<String>, SourceError>;

    fn recent_posts(&mut self, account_id: &str, limit: usize)
    -> Result<Vec<Prompt>, SourceError>;
}

/// Opaque timeline failure. Always fatal: a partial fetch cannot safely be
/// substituted with stale data.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SourceError(pub String);

/// Raw candidate production from a composed prompt.
pub trait TextGenerator {
    fn generate(
        &mut self,
        prompt: &str,
        count: usize,
        max_length: usize,
    ) -> Result<Vec<String>, GeneratorError>;
}

/// Generator failures. Only `Acquisition` is transient and retried.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("transient acquisition failure: {0}")]
    Acquisition(String),

    #[error("generation failed: {0}")]
    Run(String),
}

impl GeneratorError {
    pub fn is_transient(&self) -> bool {
        matches!(self, GeneratorError::Acquisition(_))
    }
}

/// Publication of the selected reply.
pub trait ReplySink {
    fn publish_reply(&mut self, text: &str, in_reply_to: &str) -> Result<String, SinkError>;
}

/// Opaque publish failure. Always fatal; never retried.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct SinkError(pub String);

/// Fatal cycle failures. Each wraps the collaborator error as its source so
/// the abort message carries the original failure class and detail.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to fetch follower timelines")]
    SourceFetch(#[source] SourceError),

    #[error("failed to acquire text generator after {attempts} attempts")]
    GeneratorAcquisition {
        attempts: usize,
        #[source]
        source: GeneratorError,
    },

    #[error("text generation failed")]
    GeneratorRun(#[source] GeneratorError),

    #[error("failed to publish reply to prompt {prompt_id}")]
    Publish {
        prompt_id: String,
        #[source]
        source: SinkError,
    },

    #[error("history append failed after publish")]
    History(#[source] anyhow::Error),
}

/// Single-threaded, cron-style orchestrator: one invocation processes at
/// most one prompt and performs at most one reply submission.
pub struct ReplyPipeline<S, G, K> {
    source: S,
    generator: G,
    sink: K,
    cfg: Config,
    ranker: CandidateRanker,
}

impl<S, G, K> ReplyPipeline<S, G, K>
where
    S: TimelineSource,
    G: TextGenerator,
    K: ReplySink,
{
    pub fn new(cfg: Config, source: S, generator: G, sink: K) -> anyhow::Result<Self> {
        let ranker = CandidateRanker::new(cfg.rank_config())?;
        Ok(Self { source, generator, sink, cfg, ranker })
    }

    /// Run one cycle against the given history log.
    #[instrument(skip_all)]
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        history: &mut HistoryStore,
        rng: &mut R,
    ) -> Result<Outcome, PipelineError> {
        let prompts = self.fetch_prompts()?;
        info!(count = prompts.len(), "fetched follower posts");

        // First unprocessed prompt in source order, or a clean no-op.
        let Some(prompt) = prompts.into_iter().find(|p| !history.contains(&p.id)) else {
            info!("no new, unprocessed posts");
            return Ok(Outcome::NoNewPrompt);
        };
        debug!(prompt_id = %prompt.id, "picked prompt");

        let composed =
            compose::compose_prompt(&prompt.text, &self.cfg.persona, &self.cfg.exemplars);

        let raw = self.generate_raw(&composed)?;

        let cleaned: Vec<String> = raw
            .iter()
            .map(|r| compose::tidy_candidate(r, &composed))
            .collect();

        let ranked = self.ranker.rank(&cleaned);
        for c in sorted_by_score(&ranked).iter().take(10) {
            debug!(score = c.score, text = %c.text, "top candidate");
        }

        let Some(chosen) = select_from_band(&ranked, self.cfg.band, rng).cloned() else {
            info!("no candidate inside the score band");
            return Ok(Outcome::NoCandidateInBand { prompt });
        };
        info!(score = chosen.score, text = %chosen.text, "selected reply");

        let response_id = self
            .sink
            .publish_reply(&chosen.text, &prompt.id)
            .map_err(|e| PipelineError::Publish { prompt_id: prompt.id.clone(), source: e })?;
        info!(%response_id, "published reply");

        history
            .append(&HistoryRecord::new(&prompt, &chosen.text, &response_id))
            .map_err(PipelineError::History)?;

        Ok(Outcome::Published(SelectionResult { prompt, chosen, response_id }))
    }

    /// Flatten recent posts across all followed accounts, source order
    /// preserved. Any failure is fatal.
    fn fetch_prompts(&mut self) -> Result<Vec<Prompt>, PipelineError> {
        let accounts = self
            .source
            .followed_account_ids()
            .map_err(PipelineError::SourceFetch)?;

        let mut prompts = Vec::new();
        for account in &accounts {
            let posts = self
                .source
                .recent_posts(account, self.cfg.generate.timeline_depth)
                .map_err(PipelineError::SourceFetch)?;
            prompts.extend(posts);
        }
        Ok(prompts)
    }

    /// Invoke the generator with the bounded acquisition-retry policy.
    fn generate_raw(&mut self, composed: &str) -> Result<Vec<String>, PipelineError> {
        let attempts = self.cfg.generate.attempts;
        let count = self.cfg.generate.count;
        let max_length = self.cfg.generate.max_length;

        let started = Instant::now();
        let generator = &mut self.generator;
        let raw = retry(attempts, GeneratorError::is_transient, || {
            generator.generate(composed, count, max_length)
        })
        .map_err(|e| match e {
            GeneratorError::Acquisition(_) => {
                PipelineError::GeneratorAcquisition { attempts, source: e }
            }
            GeneratorError::Run(_) => PipelineError::GeneratorRun(e),
        })?;

        info!(
            count = raw.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "generated candidates"
        );
        Ok(raw)
    }
}
