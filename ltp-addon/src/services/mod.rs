//! Service modules for the addon build
//!
//! Storage, external model training and evaluation, lexicon phoneme-set
//! conversion and interactive lookup.

pub mod addon_store;
pub mod fst_evaluator;
pub mod fst_trainer;
pub mod lexicon_converter;
pub mod phoneticizer;

pub use addon_store::{AddonField, AddonRecord, AddonStore, AddonValue, ModelKind, ADDON_FILE_NAME};
pub use fst_evaluator::{
    ErrorRates, EvaluationReport, FstEvaluator, PhonetisaurusGenerator, PronunciationComparator,
    PronunciationGenerator,
};
pub use fst_trainer::{train_model, ModelTrainer, PhonetisaurusTrainer, TrainingRequest};
pub use lexicon_converter::{convert_lexicon, convert_lexicon_file};
pub use phoneticizer::phoneticize;
