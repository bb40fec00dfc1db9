use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cli::{AppContext, InitArgs};
use crate::core::rank::RankConfig;
use crate::core::select::Band;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config
{
    /// Terms that disqualify a candidate outright (case-insensitive substrings)
    pub banned_terms: Vec<String>,

    /// Disallowed name; any mention disqualifies
    pub forbidden_name: String,

    /// Persona token woven into the composed prompt
    pub persona: String,

    /// Reference texts anchoring the bot's tone
    pub exemplars: Vec<String>,

    /// Path of the processed-history log
    pub history_file: String,

    /// Score interval a candidate must fall strictly inside
    pub band: Band,

    /// Default generation settings
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig
{
    /// Raw candidates requested per cycle
    pub count: usize,
    /// Maximum generation length passed to the model
    pub max_length: usize,
    /// Attempt budget for transient generator-acquisition failures
    pub attempts: usize,
    /// Recent posts fetched per followed account
    pub timeline_depth: usize,
}

impl Default for Config
{
    fn default() -> Self
    {
        Self {
            banned_terms: vec!["hitler".to_string(), "kill".to_string()],
            forbidden_name: "trump".to_string(),
            persona: "Perry".to_string(),
            exemplars: vec![
                "They are a good player in video games, and a wonderful person!".to_string(),
                "Gamers should not think over playing video games, It's all the matter of \
                 perfection!"
                    .to_string(),
                "The village called. They'd like their idiot back. You better get going."
                    .to_string(),
            ],
            history_file: "processed.jsonl".to_string(),
            band: Band::default(),
            generate: GenerateConfig {
                count: 60,
                max_length: 220,
                attempts: 5,
                timeline_depth: 10,
            },
        }
    }
}

impl Config
{
    /// Scoring slice of the configuration, for the ranker.
    pub fn rank_config(&self) -> RankConfig
    {
        RankConfig {
            exemplars: self
                .exemplars
                .clone(),
            banned_terms: self
                .banned_terms
                .clone(),
            forbidden_name: self
                .forbidden_name
                .clone(),
        }
    }
}

pub fn load_config() -> Result<Config>
{
    let mut builder = config::Config::builder();

    // Load from config files in priority order
    let config_paths = ["perch.toml", "perch.yaml", "perch.json", ".perch.toml"];

    for path in &config_paths
    {
        if Path::new(path).exists()
        {
            builder = builder.add_source(config::File::with_name(path));
            break;
        }
    }

    // Add environment variables with PERCH_ prefix. Nested keys use a
    // double underscore (PERCH_BAND__LOW) so multi-word top-level fields
    // like PERCH_BANNED_TERMS stay addressable.
    builder = builder.add_source(
        config::Environment::with_prefix("PERCH")
            .prefix_separator("_")
            .separator("__"),
    );

    let cfg = builder
        .build()
        .context("Failed to load configuration")?;
    let parsed: Config = cfg
        .try_deserialize()
        .context("Failed to parse configuration")?;

    Ok(parsed)
}

pub fn init(
    args: InitArgs,
    ctx: &AppContext,
) -> Result<()>
{
    let config_path = args
        .path
        .join("perch.toml");

    if config_path.exists() && !args.force
    {
        anyhow::bail!(
            "Config file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    let config = Config::default();
    let toml_string =
        toml::to_string_pretty(&config).context("Failed to serialize default config")?;

    std::fs::write(&config_path, toml_string).context("Failed to write config file")?;

    if !ctx.quiet
    {
        println!("Created config file at {}", config_path.display());
    }
    Ok(())
}
