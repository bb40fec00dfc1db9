//! Offline diagnostic commands: score a candidate file, or run the full
//! tidy-rank-and-pick over it.
//!
//! Both read one candidate per line and use the same configuration the
//! pipeline would. `score` ranks the lines as-is so individual texts can be
//! probed; `pick` first tidies each line exactly as a live cycle does.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::{AppContext, PickArgs, ScoreArgs};
use crate::core::compose;
use crate::core::rank::{Candidate, CandidateRanker, sorted_by_score};
use crate::core::select::select_from_band;
use crate::infra::config;

#[derive(Tabled)]
struct ScoreRow {
    #[tabled(rename = "score")]
    score: String,
    #[tabled(rename = "len")]
    len: usize,
    #[tabled(rename = "dq")]
    disqualified: &'static str,
    #[tabled(rename = "text")]
    text: String,
}

impl From<&Candidate> for ScoreRow {
    fn from(c: &Candidate) -> Self {
        Self {
            score: format!("{:.4}", c.score),
            len: c.features.len,
            disqualified: if c.features.disqualified() { "x" } else { "" },
            text: truncate_for_display(&c.text, 60),
        }
    }
}

fn truncate_for_display(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let cut: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// One candidate per line; blank lines are skipped.
fn read_candidates(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read candidates from {}", path.display()))?;

    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect())
}

fn rank_file(path: &Path, cfg: &config::Config) -> Result<Vec<Candidate>> {
    let ranker = CandidateRanker::new(cfg.rank_config())?;
    let texts = read_candidates(path)?;
    Ok(ranker.rank(&texts))
}

/// `perch score`: rank a candidate file and print the descending table.
pub fn score(args: ScoreArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();
    let ranked = rank_file(&args.file, &cfg)?;
    let sorted = sorted_by_score(&ranked);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&sorted)?);
        return Ok(());
    }

    if !ctx.quiet {
        println!("Top {} of {} candidates by score", args.top.min(sorted.len()), sorted.len());
    }

    let rows: Vec<ScoreRow> = sorted.iter().take(args.top).map(ScoreRow::from).collect();
    let mut table = Table::new(rows);
    table.with(Style::sharp());
    println!("{table}");
    Ok(())
}

/// `perch pick`: tidy and rank a candidate file, then sample one from the
/// band. Each line goes through the same tidy step a live cycle applies to
/// raw generations (with no composed prompt to strip for file input).
pub fn pick(args: PickArgs, ctx: &AppContext) -> Result<()> {
    let cfg = config::load_config().unwrap_or_default();
    let tidied: Vec<String> = read_candidates(&args.file)?
        .iter()
        .map(|line| compose::tidy_candidate(line, ""))
        .collect();

    let ranker = CandidateRanker::new(cfg.rank_config())?;
    let ranked = ranker.rank(&tidied);

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let Some(chosen) = select_from_band(&ranked, cfg.band, &mut rng) else {
        if args.json {
            println!("{}", serde_json::json!({ "chosen": null }));
        } else if !ctx.quiet {
            println!("No candidate inside the band ({}, {})", cfg.band.low, cfg.band.high);
        }
        return Ok(());
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(chosen)?);
    } else if ctx.no_color {
        println!("{}", chosen.text);
    } else {
        println!("{}", chosen.text.green());
    }
    Ok(())
}
