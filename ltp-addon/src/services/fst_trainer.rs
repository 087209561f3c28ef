//! FST model training
//!
//! Pronunciation and spelling models are trained by an external tool
//! (phonetisaurus by default). This module writes the training corpus,
//! runs the tool as a subprocess and hands back the path of the model it
//! produced.

use ltp_common::config::ToolConfig;
use ltp_common::{Error, Lexicon, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Everything the external trainer needs for one model
#[derive(Debug, Clone)]
pub struct TrainingRequest<'a> {
    /// `word<TAB>pronunciation` file
    pub training_data: &'a Path,
    /// Directory the model is written to
    pub work_dir: &'a Path,
    /// Model file name without extension
    pub model_prefix: &'a str,
    /// Maximum n-gram order
    pub ngram_order: usize,
}

/// External model trainer
pub trait ModelTrainer {
    /// Train a model and return the path of the produced file
    fn train(&self, request: &TrainingRequest<'_>) -> Result<PathBuf>;
}

/// Where a trainer leaves the model for `model_prefix`
pub fn model_path(work_dir: &Path, model_prefix: &str) -> PathBuf {
    work_dir.join(format!("{}.fst", model_prefix))
}

/// Render a lexicon as trainer input, words sorted by identifier
///
/// The trained model depends on input order, so the output has to be
/// deterministic for identical lexicons.
pub fn format_training_data(lexicon: &Lexicon) -> String {
    let mut words: Vec<_> = lexicon.words().collect();
    words.sort_by(|a, b| a.name().cmp(b.name()));

    let mut out = String::new();
    for word in words {
        for pronunciation in word.pronunciations() {
            // writing to a String can't fail
            let _ = writeln!(out, "{}\t{}", word.name(), pronunciation);
        }
    }
    out
}

pub fn write_training_data(lexicon: &Lexicon, path: &Path) -> Result<()> {
    std::fs::write(path, format_training_data(lexicon))?;
    debug!("Wrote training data for {} words to {}", lexicon.len(), path.display());
    Ok(())
}

/// Write training data for `lexicon` and train a model on it
pub fn train_model(
    trainer: &dyn ModelTrainer,
    lexicon: &Lexicon,
    work_dir: &Path,
    train_data_name: &str,
    model_prefix: &str,
    ngram_order: usize,
) -> Result<PathBuf> {
    let training_data = work_dir.join(train_data_name);
    write_training_data(lexicon, &training_data)?;

    // a model left by an earlier run must not pass for a fresh one
    let previous = model_path(work_dir, model_prefix);
    if previous.is_file() {
        debug!("Removing previous model {}", previous.display());
        std::fs::remove_file(&previous)?;
    }

    let request = TrainingRequest {
        training_data: &training_data,
        work_dir,
        model_prefix,
        ngram_order,
    };
    let path = trainer.train(&request)?;
    if !path.is_file() {
        return Err(Error::Trainer(format!(
            "Trainer finished but model {} was not produced",
            path.display()
        )));
    }
    Ok(path)
}

/// Runs `phonetisaurus-train` as a subprocess
pub struct PhonetisaurusTrainer {
    tool: ToolConfig,
}

impl PhonetisaurusTrainer {
    pub fn new(tool: ToolConfig) -> Self {
        Self { tool }
    }

    fn command(&self, request: &TrainingRequest<'_>) -> Command {
        let mut command = Command::new(&self.tool.command);
        command
            .arg("--lexicon")
            .arg(request.training_data)
            .arg("--dir_prefix")
            .arg(request.work_dir)
            .arg("--model_prefix")
            .arg(request.model_prefix)
            .arg("--ngram_order")
            .arg(request.ngram_order.to_string())
            .arg("--seq2_del")
            .args(&self.tool.args);
        command
    }
}

impl ModelTrainer for PhonetisaurusTrainer {
    fn train(&self, request: &TrainingRequest<'_>) -> Result<PathBuf> {
        let mut command = self.command(request);
        debug!("Running {:?}", command);
        info!(
            "Training {} model (n-gram order {})",
            request.model_prefix, request.ngram_order
        );

        let output = command.output().map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::Trainer(format!("{} not found in PATH", self.tool.command))
            }
            _ => Error::Trainer(format!("Failed to execute {}: {}", self.tool.command, e)),
        })?;

        if !output.status.success() {
            return Err(Error::Trainer(format!(
                "{} failed. Exit code: {:?}, stderr: {}",
                self.tool.command,
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            )));
        }

        Ok(model_path(request.work_dir, request.model_prefix))
    }
}
