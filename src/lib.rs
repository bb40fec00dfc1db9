//! **perch** - A reply bot core: rank language-model candidate replies and sample one from a quality band
//!
//! Candidate generation, scoring, and selection pipeline with hard
//! disqualification gates and banded uniform-random selection. The
//! social-network client and the language model stay behind traits and are
//! injected into the pipeline.

/// Command-line interface with clap integration
pub mod cli;

/// Core pipeline - metrics, similarity, ranking, selection, orchestration
pub mod core {
    /// Per-candidate lexical features (pure functions)
    pub mod metrics;

    /// Character-set similarity measures
    pub mod similarity;

    /// Composite scoring with hard disqualification gates
    pub mod rank;
    pub use rank::{Candidate, CandidateRanker, Features, RankConfig, sorted_by_score};

    /// Banded uniform-random selection with injectable randomness
    pub mod select;
    pub use select::{Band, select_from_band};

    /// Prompt composition and raw-candidate tidying
    pub mod compose;

    /// One-cycle orchestration over injected collaborators
    pub mod pipeline;
    pub use pipeline::{Outcome, Prompt, ReplyPipeline, SelectionResult};
}

/// CLI command implementations on top of the core
pub mod cli_ext {
    /// Offline score/pick diagnostics
    pub mod score_cmd;
}

/// Infrastructure - configuration, history persistence, retry policy
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Append-only processed-post history (JSON lines)
    pub mod history;
    pub use history::{HistoryRecord, HistoryStore};

    /// Bounded immediate-retry combinator
    pub mod retry;
    pub use retry::retry;
}

// Strategic re-exports for clean consumer interface
pub use cli::{AppContext, Cli, Commands};
pub use core::pipeline::{ReplySink, TextGenerator, TimelineSource};
pub use core::{Band, Candidate, CandidateRanker, Outcome, Prompt, ReplyPipeline};
pub use infra::{Config, HistoryStore, load_config};
