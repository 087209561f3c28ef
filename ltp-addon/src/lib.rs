//! ltp-addon library interface
//!
//! Builds the pronunciation addon: packs the lexicon, trains spelling and
//! pronunciation models through an external trainer and evaluates the
//! pronunciation model on held-out words.

pub mod resources;
pub mod services;
pub mod workflow;

pub use resources::{get_provider, DefaultProvider, ProviderRegistry, ResourceProvider};
pub use services::{AddonStore, ModelTrainer, PronunciationGenerator};
pub use workflow::{Pipeline, PipelineConfig, PipelineReport, Stage, StageSelector};
