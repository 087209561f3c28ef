//! Interactive pronunciation generation with a trained FST
//!
//! **Usage:**
//! ```bash
//! demo-fst --fst work_dir/pronunciation.fst
//! ```
//!
//! Reads words from stdin, one per line, and prints their pronunciation.

use anyhow::{Context, Result};
use clap::Parser;
use ltp_addon::services::{phoneticize, PhonetisaurusGenerator};
use ltp_common::config::load_config;
use std::path::PathBuf;
use tracing::info;

/// Generates pronunciations with a trained FST model
#[derive(Parser, Debug)]
#[command(name = "demo-fst")]
#[command(about = "Generates pronunciations with a trained FST model")]
#[command(version)]
struct Args {
    /// Path to FST model
    #[arg(long)]
    fst: PathBuf,

    /// Directory for the generator's word list
    #[arg(long, env = "LTP_WORK_DIR")]
    work_dir: Option<PathBuf>,

    /// TOML config file (generator command)
    #[arg(long, env = "LTP_CONFIG")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if !args.fst.is_file() {
        anyhow::bail!("FST model {} not found", args.fst.display());
    }
    let config = load_config(args.config.as_deref()).context("Failed to load configuration")?;

    let work_dir = args.work_dir.unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&work_dir)
        .with_context(|| format!("Failed to create {}", work_dir.display()))?;
    let generator = PhonetisaurusGenerator::new(config.generator, work_dir);

    info!("Enter words, one per line (Ctrl-D to stop)");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let count = phoneticize(&generator, &args.fst, stdin.lock(), stdout.lock())
        .context("Pronunciation generation failed")?;
    info!("Generated {} pronunciations", count);

    Ok(())
}
