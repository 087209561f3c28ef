//! Pipeline Orchestrator
//!
//! Runs the selected stages against one addon. Each stage derives its
//! inputs from the resource provider and the work directory, does all of
//! its computation first and only then writes to the addon, so a failed
//! stage never leaves a partially updated record behind.
//!
//! # Example
//! ```rust,ignore
//! let pipeline = Pipeline::new(config, "en_us", provider, trainer, generator)?;
//! let report = pipeline.run(StageSelector::All)?;
//! ```

use super::{Stage, StageSelector};
use crate::resources::ResourceProvider;
use crate::services::addon_store::{AddonStore, ModelKind};
use crate::services::fst_evaluator::{EvaluationReport, FstEvaluator, PronunciationGenerator};
use crate::services::fst_trainer::{model_path, train_model, ModelTrainer};
use ltp_common::config::{DEFAULT_PRONUNCIATION_ORDER, DEFAULT_SPELLING_ORDER};
use ltp_common::{Error, PhonemeSet, Result};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Training corpus for the pronunciation model
pub const PRONUNCIATION_TRAINING_DATA: &str = "pronunciation_training_data";
/// Training corpus for the spelling model
pub const SPELLING_TRAINING_DATA: &str = "spelling_training_data";
/// Model prefix of the pronunciation model
pub const PRONUNCIATION_MODEL_PREFIX: &str = "pronunciation";
/// Model prefix of the spelling model
pub const SPELLING_MODEL_PREFIX: &str = "spelling";

/// Pipeline configuration
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory for the addon and intermediate artifacts
    pub work_dir: PathBuf,
    /// N-gram order of the pronunciation model
    pub pronunciation_order: usize,
    /// N-gram order of the spelling model
    pub spelling_order: usize,
    /// Copy the addon here after the selected stages
    pub export_path: Option<PathBuf>,
    /// Compare pronunciations in this phoneme set during evaluation
    pub normalize_to: Option<PhonemeSet>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("work_dir"),
            pronunciation_order: DEFAULT_PRONUNCIATION_ORDER,
            spelling_order: DEFAULT_SPELLING_ORDER,
            export_path: None,
            normalize_to: None,
        }
    }
}

/// Outcome of [`Pipeline::run`]
#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    /// Stages that finished, in execution order
    pub completed: Vec<Stage>,
    /// Metrics, if evaluation ran and was not skipped
    pub evaluation: Option<EvaluationReport>,
    /// Where the addon was exported to
    pub exported_to: Option<PathBuf>,
}

/// Orchestrates the addon build stages
pub struct Pipeline {
    config: PipelineConfig,
    store: AddonStore,
    provider: Box<dyn ResourceProvider>,
    trainer: Box<dyn ModelTrainer>,
    generator: Box<dyn PronunciationGenerator>,
}

impl Pipeline {
    /// Open (or create) the addon for `locale` in the configured work directory
    ///
    /// Fails with [`Error::ConfigMismatch`] if the existing addon was built
    /// for another locale.
    pub fn new(
        config: PipelineConfig,
        locale: &str,
        provider: Box<dyn ResourceProvider>,
        trainer: Box<dyn ModelTrainer>,
        generator: Box<dyn PronunciationGenerator>,
    ) -> Result<Self> {
        let store = AddonStore::open(&config.work_dir, locale)?;
        Ok(Self {
            config,
            store,
            provider,
            trainer,
            generator,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn store(&self) -> &AddonStore {
        &self.store
    }

    /// Run the selected stages in order, then export if configured
    pub fn run(&self, selector: StageSelector) -> Result<PipelineReport> {
        let mut report = PipelineReport::default();

        for stage in selector.stages() {
            let evaluation = self.run_stage(stage).map_err(|e| {
                error!("Stage {} failed: {}", stage, e);
                e
            })?;
            if evaluation.is_some() {
                report.evaluation = evaluation;
            }
            report.completed.push(stage);
        }

        if let Some(export_path) = &self.config.export_path {
            self.store.export_to(export_path)?;
            report.exported_to = Some(export_path.clone());
        }

        Ok(report)
    }

    /// Run a single stage; only evaluation produces a report
    pub fn run_stage(&self, stage: Stage) -> Result<Option<EvaluationReport>> {
        match stage {
            Stage::Lexicon => {
                info!("Packing pronunciation dictionary");
                self.pack_lexicon()?;
                Ok(None)
            }
            Stage::Spelling => {
                info!("Training small FST-based spelling model");
                self.train_spelling()?;
                Ok(None)
            }
            Stage::Pronunciation => {
                info!("Training FST-based pronunciation model");
                self.train_pronunciation()?;
                Ok(None)
            }
            Stage::Evaluation => {
                info!("Evaluating FST-based pronunciation model");
                self.evaluate()
            }
        }
    }

    /// Validate the lexicon against the declared inventories and store all three
    pub fn pack_lexicon(&self) -> Result<()> {
        let lexicon = self.provider.lexicon(None)?;
        let graphemes = self.provider.graphemes()?;
        let phonemes = self.provider.phonemes()?;

        if let Err(e) = lexicon.validate(&graphemes, &phonemes) {
            if let Error::VocabularyMismatch {
                graphemes: bad_graphemes,
                phonemes: bad_phonemes,
            } = &e
            {
                if !bad_graphemes.is_empty() {
                    error!("Graphemes not in the grapheme list: {}", bad_graphemes.join(" "));
                }
                if !bad_phonemes.is_empty() {
                    error!("Phonemes not in the phoneme list: {}", bad_phonemes.join(" "));
                }
            }
            return Err(e);
        }

        self.store.add_lexicon(&lexicon, &graphemes, &phonemes)?;
        info!(
            "Packed lexicon with {} words. Consists of {} graphemes and {} phonemes",
            lexicon.len(),
            graphemes.len(),
            phonemes.len()
        );
        Ok(())
    }

    /// Train the spelling model and store it
    pub fn train_spelling(&self) -> Result<PathBuf> {
        let lexicon = self.provider.spelling_lexicon()?;
        info!("Spelling lexicon has {} words", lexicon.len());

        let path = train_model(
            self.trainer.as_ref(),
            &lexicon,
            &self.config.work_dir,
            SPELLING_TRAINING_DATA,
            SPELLING_MODEL_PREFIX,
            self.config.spelling_order,
        )?;
        self.store.add_model(ModelKind::Spelling, &path)?;
        Ok(path)
    }

    /// Train the pronunciation model on the training words and store it
    pub fn train_pronunciation(&self) -> Result<PathBuf> {
        let train_words = self.provider.train_words()?;
        let lexicon = self.provider.lexicon(Some(train_words.as_slice()))?;
        info!("Training pronunciation model on {} words", lexicon.len());

        let path = train_model(
            self.trainer.as_ref(),
            &lexicon,
            &self.config.work_dir,
            PRONUNCIATION_TRAINING_DATA,
            PRONUNCIATION_MODEL_PREFIX,
            self.config.pronunciation_order,
        )?;
        self.store.add_model(ModelKind::Pronunciation, &path)?;
        Ok(path)
    }

    /// Path the pronunciation stage leaves its model at
    pub fn pronunciation_model_path(&self) -> PathBuf {
        model_path(&self.config.work_dir, PRONUNCIATION_MODEL_PREFIX)
    }

    /// Score the pronunciation model on the test words
    ///
    /// Returns `Ok(None)` when the resources declare no test words.
    pub fn evaluate(&self) -> Result<Option<EvaluationReport>> {
        let model = self.pronunciation_model_path();
        require_file(
            &model,
            "run the pronunciation stage first to train the pronunciation model",
        )?;

        let test_words = match self.provider.test_words()? {
            Some(words) if !words.is_empty() => words,
            _ => {
                warn!("Test words are not specified in resources, can't evaluate pronunciation generation");
                return Ok(None);
            }
        };

        let lexicon = self.provider.lexicon(Some(test_words.as_slice()))?;
        info!("Evaluating on {} held-out words", lexicon.len());

        let mut evaluator = FstEvaluator::new(self.generator.as_ref());
        if let Some(target) = self.config.normalize_to {
            evaluator = evaluator.with_normalization(target);
        }
        evaluator.evaluate(&model, &lexicon).map(Some)
    }
}

fn require_file(path: &Path, hint: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingDependency {
            path: path.to_path_buf(),
            hint: hint.to_string(),
        })
    }
}
