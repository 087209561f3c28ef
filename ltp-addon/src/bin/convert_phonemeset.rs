//! Lexicon phoneme-set conversion utility
//!
//! **Usage:**
//! ```bash
//! convert-phonemeset lexicon lexicon.xsampa [--source arpa] [--target xsampa|ipa]
//! ```

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use ltp_addon::services::convert_lexicon_file;
use ltp_common::PhonemeSet;
use std::path::PathBuf;
use tracing::info;

/// Phoneme sets lexicons can be converted from
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SourceSet {
    Arpa,
}

/// Converts the phoneme set of a lexicon
#[derive(Parser, Debug)]
#[command(name = "convert-phonemeset")]
#[command(about = "Converts the phoneme set of a lexicon")]
#[command(version)]
struct Args {
    /// Lexicon to convert
    in_path: PathBuf,

    /// Path to put the converted lexicon to
    out_path: PathBuf,

    /// Source phoneme set
    #[arg(long, value_enum, default_value = "arpa")]
    source: SourceSet,

    /// Target phoneme set (xsampa or ipa)
    #[arg(long, default_value = "xsampa")]
    target: PhonemeSet,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!("Converting {:?} to {:?}", args.source, args.target);

    convert_lexicon_file(&args.in_path, &args.out_path, args.target)
        .with_context(|| format!("Failed to convert {}", args.in_path.display()))?;
    Ok(())
}
