//! learn-to-pronounce - pronunciation addon builder
//!
//! Learns how to pronounce words from a resources directory and packs the
//! lexicon and trained models into `<work_dir>/pronunciation.addon`.
//!
//! Stages:
//! - lexicon: pack the dictionary for pronunciation look up
//! - spelling: train a small FST model that spells words
//! - pronunciation: train the FST pronunciation model
//! - evaluation: score the pronunciation model on held-out words
//! - all: all of the above, in that order

use anyhow::{Context, Result};
use clap::Parser;
use ltp_addon::services::{PhonetisaurusGenerator, PhonetisaurusTrainer};
use ltp_addon::{get_provider, Pipeline, PipelineConfig, StageSelector};
use ltp_common::config::load_config;
use ltp_common::PhonemeSet;
use std::path::PathBuf;
use tracing::info;

/// Command-line arguments for learn-to-pronounce
#[derive(Parser, Debug)]
#[command(name = "learn-to-pronounce")]
#[command(about = "Learns how to pronounce words and builds a pronunciation addon")]
#[command(version)]
struct Args {
    /// Directory with pronunciation resources (lexicon, phonemes, graphemes, ...)
    #[arg(long)]
    resources: PathBuf,

    /// Locale of the resources, stored in the addon
    #[arg(long)]
    locale: String,

    /// Working directory for intermediate artifacts and the addon
    #[arg(long, default_value = "work_dir", env = "LTP_WORK_DIR")]
    work_dir: PathBuf,

    /// Copy the produced addon here (it also stays at work_dir/pronunciation.addon)
    #[arg(long)]
    out: Option<PathBuf>,

    /// Stage to execute: lexicon, spelling, pronunciation, evaluation or all
    #[arg(long, default_value = "all")]
    stage: StageSelector,

    /// N-gram order of the pronunciation model [default: 8]
    #[arg(long)]
    fst_order: Option<usize>,

    /// N-gram order of the spelling model [default: 3]
    #[arg(long)]
    fst_spelling_order: Option<usize>,

    /// TOML config file
    #[arg(long, env = "LTP_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // config messages go out before the configured level is known
    let startup_level = args.log_level.as_deref().unwrap_or("info");
    let startup = tracing_subscriber::fmt()
        .with_env_filter(env_filter(startup_level))
        .finish();
    let config = tracing::subscriber::with_default(startup, || load_config(args.config.as_deref()))
        .context("Failed to load configuration")?;

    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| config.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(&level))
        .init();

    info!("learn-to-pronounce {}", env!("CARGO_PKG_VERSION"));
    info!("Resources: {}", args.resources.display());
    info!("Work dir: {}", args.work_dir.display());

    let normalize_to = config
        .evaluation
        .normalize_to
        .as_deref()
        .map(str::parse::<PhonemeSet>)
        .transpose()
        .context("Invalid evaluation.normalize_to")?;

    let pipeline_config = PipelineConfig {
        work_dir: args.work_dir.clone(),
        pronunciation_order: args.fst_order.unwrap_or(config.ngram.pronunciation_order),
        spelling_order: args
            .fst_spelling_order
            .unwrap_or(config.ngram.spelling_order),
        export_path: args.out.clone(),
        normalize_to,
    };

    let pipeline = Pipeline::new(
        pipeline_config,
        &args.locale,
        get_provider(&args.resources),
        Box::new(PhonetisaurusTrainer::new(config.trainer.clone())),
        Box::new(PhonetisaurusGenerator::new(
            config.generator.clone(),
            args.work_dir.clone(),
        )),
    )
    .with_context(|| format!("Failed to open addon in {}", args.work_dir.display()))?;

    let report = pipeline
        .run(args.stage)
        .with_context(|| format!("Stage '{}' failed", args.stage))?;

    let completed: Vec<&str> = report.completed.iter().map(|s| s.as_str()).collect();
    info!("Completed stages: {}", completed.join(", "));
    info!("Addon: {}", pipeline.store().path().display());
    if let Some(path) = &report.exported_to {
        info!("Exported to {}", path.display());
    }

    Ok(())
}
