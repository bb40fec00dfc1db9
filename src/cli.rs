//! Command-line interface definitions.
//!
//! The network collaborators (timeline, model, reply sink) stay external;
//! the CLI is the offline surface: score diagnostics, a seeded pick, and
//! config bootstrap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Shared per-invocation context, built once in `main` and passed everywhere.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub quiet: bool,
    pub no_color: bool,
}

#[derive(Debug, Parser)]
#[command(
    name = "perch",
    version,
    about = "Rank language-model candidate replies and sample one from a quality band"
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Score candidate replies from a file and print the ranking
    Score(ScoreArgs),

    /// Tidy and rank candidates, then sample one from the acceptance band
    Pick(PickArgs),

    /// Write a default perch.toml
    Init(InitArgs),
}

#[derive(Debug, Args)]
pub struct ScoreArgs {
    /// File with one candidate per line
    pub file: PathBuf,

    /// Show only the top N rows of the table
    #[arg(long, default_value_t = 10)]
    pub top: usize,

    /// Emit the full ranking as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct PickArgs {
    /// File with one candidate per line
    pub file: PathBuf,

    /// Seed the sampler for a reproducible pick
    #[arg(long)]
    pub seed: Option<u64>,

    /// Emit the pick as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Directory to write the config into
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}
