use anyhow::Result;
use clap::Parser;
use perch::cli::{AppContext, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Opt-in structured logging, e.g. PERCH_LOG=perch=debug
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_env("PERCH_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        no_color: cli.no_color,
    };

    match cli.command {
        Commands::Score(args) => perch::cli_ext::score_cmd::score(args, &ctx),
        Commands::Pick(args) => perch::cli_ext::score_cmd::pick(args, &ctx),
        Commands::Init(args) => perch::infra::config::init(args, &ctx),
    }
}
