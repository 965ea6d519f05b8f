use blockeval_core::config::DEFAULT_MODEL;
use blockeval_core::dataset::hub::{DEFAULT_CONFIG, DEFAULT_DATASET};
use blockeval_core::DEFAULT_BLOCK_SIZE;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Largest block a single prompt may carry.
pub const MAX_BLOCK_SIZE: usize = 64;

#[derive(Parser)]
#[command(
    name = "blockeval",
    version,
    about = "Score a generative model on the emotion dataset, several sentences per request"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Classify dataset blocks with the model and print a JSON summary
    Run(RunArgs),
    /// Recompute accuracy from a saved summary JSON
    Score(ScoreArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct RunArgs {
    /// Number of blocks to process
    #[arg(long, default_value_t = 1)]
    pub blocks: usize,

    /// Sentences per block
    #[arg(long, default_value_t = DEFAULT_BLOCK_SIZE, value_parser = parse_block_size)]
    pub block_size: usize,

    /// Gemini model to invoke
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Dataset split to read
    #[arg(long, default_value = "test")]
    pub split: String,

    /// Gemini API key (falls back to GEMINI_API_KEY, then VITE_GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Hugging Face dataset id
    #[arg(long, default_value = DEFAULT_DATASET)]
    pub dataset: String,

    /// Hugging Face dataset config
    #[arg(long, default_value = DEFAULT_CONFIG)]
    pub dataset_config: String,

    /// Read `<DIR>/<split>.jsonl` instead of the Hugging Face hub
    #[arg(long)]
    pub dataset_dir: Option<PathBuf>,

    /// Also write the summary JSON to this file
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Summary JSON produced by `blockeval run`
    pub input: PathBuf,
}

fn parse_block_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a number"))?;
    if !(1..=MAX_BLOCK_SIZE).contains(&size) {
        return Err(format!("block size must be between 1 and {MAX_BLOCK_SIZE}"));
    }
    Ok(size)
}
