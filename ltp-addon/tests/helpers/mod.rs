//! Test Helper Utilities
//!
//! Resource directory fixtures and in-process stand-ins for the external
//! trainer and generator.

#![allow(dead_code)]

pub mod log_capture;

pub use log_capture::{capture_logs, LogCapture};

use ltp_addon::services::fst_trainer::{model_path, ModelTrainer, TrainingRequest};
use ltp_addon::PronunciationGenerator;
use ltp_common::{Error, Lexicon, Pronunciation, Result};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tempfile::TempDir;

pub const LEXICON: &str = "hello\th @ l \"o U\nworld\tw \"3: l d\nread\tr\\ \"i: d\nread\tpast\tr\\ \"E d\n";
pub const SPELLING_LEXICON: &str = "h\t\"e I t S\ne\t\"i:\n";

/// Which optional files a fixture resources directory gets
#[derive(Debug, Clone, Copy)]
pub struct ResourceOptions {
    pub with_spelling: bool,
    pub with_word_lists: bool,
    pub with_unit_lists: bool,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            with_spelling: true,
            with_word_lists: true,
            with_unit_lists: true,
        }
    }
}

/// Resources directory with the fixture lexicon
pub fn create_resources(options: ResourceOptions) -> TempDir {
    let dir = TempDir::new().unwrap();
    write(&dir, "lexicon", LEXICON);
    if options.with_spelling {
        write(&dir, "spelling_lexicon", SPELLING_LEXICON);
    }
    if options.with_unit_lists {
        write(&dir, "phonemes", "h\n@\nl\n\"o\nU\nw\n\"3:\nd\nr\\\n\"i:\n\"E\n");
        write(&dir, "graphemes", "h\ne\nl\no\nw\nr\nd\na\n");
    }
    if options.with_word_lists {
        write(&dir, "train_words", "hello\nread\n");
        write(&dir, "test_words", "world\n");
    }
    dir
}

pub fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// One call received by [`FakeTrainer`]
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingCall {
    pub model_prefix: String,
    pub ngram_order: usize,
    pub training_data: String,
}

/// Writes a "model" holding the n-gram order and the training data
#[derive(Clone, Default)]
pub struct FakeTrainer {
    pub calls: Rc<RefCell<Vec<TrainingCall>>>,
}

impl ModelTrainer for FakeTrainer {
    fn train(&self, request: &TrainingRequest<'_>) -> Result<PathBuf> {
        let training_data = std::fs::read_to_string(request.training_data)?;
        let path = model_path(request.work_dir, request.model_prefix);
        std::fs::write(&path, format!("order={}\n{}", request.ngram_order, training_data))?;

        self.calls.borrow_mut().push(TrainingCall {
            model_prefix: request.model_prefix.to_string(),
            ngram_order: request.ngram_order,
            training_data,
        });
        Ok(path)
    }
}

/// Trainer that always fails like a crashed subprocess
pub struct FailingTrainer;

impl ModelTrainer for FailingTrainer {
    fn train(&self, _request: &TrainingRequest<'_>) -> Result<PathBuf> {
        Err(Error::Trainer("phonetisaurus-train failed. Exit code: Some(1)".to_string()))
    }
}

/// Trainer that exits cleanly without producing a model
pub struct SilentTrainer;

impl ModelTrainer for SilentTrainer {
    fn train(&self, request: &TrainingRequest<'_>) -> Result<PathBuf> {
        Ok(model_path(request.work_dir, request.model_prefix))
    }
}

/// Generator answering from a fixed table
#[derive(Clone, Default)]
pub struct TableGenerator {
    pub table: BTreeMap<String, Pronunciation>,
}

impl TableGenerator {
    /// Generator that reproduces the first pronunciation of every word
    pub fn perfect(lexicon: &Lexicon) -> Self {
        Self {
            table: lexicon
                .words()
                .map(|w| (w.name().to_string(), w.pronunciation().clone()))
                .collect(),
        }
    }

    pub fn with(mut self, word: &str, pronunciation: &str) -> Self {
        self.table
            .insert(word.to_string(), Pronunciation::parse(pronunciation));
        self
    }
}

impl PronunciationGenerator for TableGenerator {
    fn generate(&self, _model: &Path, words: &[String]) -> Result<BTreeMap<String, Pronunciation>> {
        Ok(words
            .iter()
            .filter_map(|w| self.table.get(w).map(|p| (w.clone(), p.clone())))
            .collect())
    }
}

pub fn fixture_lexicon() -> Lexicon {
    Lexicon::parse_text(LEXICON, None).unwrap()
}
