//! # learn-to-pronounce common library
//!
//! Shared code for the addon builder and its tools:
//! - Lexicon data model (words, pronunciations, stress-marked phonemes)
//! - Phoneme-set conversion (ARPAbet → IPA → X-SAMPA)
//! - Configuration loading
//! - Error taxonomy

pub mod config;
pub mod error;
pub mod lexicon;
pub mod phonetics;

pub use error::{Error, Result};
pub use lexicon::{Lexicon, Phoneme, Pronunciation, Stress, Word};
pub use phonetics::{ArpabetConverter, PhonemeSet};
