//! Staged addon build
//!
//! The build runs in four stages, always in this order when all are
//! selected:
//! LEXICON → SPELLING → PRONUNCIATION → EVALUATION
//!
//! Each stage reads its inputs fresh from the resources and the work
//! directory, so any single stage can be re-run against an existing
//! addon.

pub mod pipeline;

pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};

use ltp_common::Error;
use std::fmt;
use std::str::FromStr;

/// One stage of the addon build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Pack the lexicon with its grapheme and phoneme inventories
    Lexicon,
    /// Train the letter-by-letter spelling model
    Spelling,
    /// Train the pronunciation model
    Pronunciation,
    /// Score the pronunciation model on held-out words
    Evaluation,
}

impl Stage {
    /// All stages in execution order
    pub const ALL: [Stage; 4] = [
        Stage::Lexicon,
        Stage::Spelling,
        Stage::Pronunciation,
        Stage::Evaluation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Lexicon => "lexicon",
            Stage::Spelling => "spelling",
            Stage::Pronunciation => "pronunciation",
            Stage::Evaluation => "evaluation",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stages requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageSelector {
    Single(Stage),
    #[default]
    All,
}

impl StageSelector {
    /// Stages to run, in execution order
    pub fn stages(&self) -> Vec<Stage> {
        match self {
            StageSelector::Single(stage) => vec![*stage],
            StageSelector::All => Stage::ALL.to_vec(),
        }
    }
}

impl FromStr for StageSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("all") {
            return Ok(StageSelector::All);
        }
        Stage::ALL
            .iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(s))
            .map(|stage| StageSelector::Single(*stage))
            .ok_or_else(|| {
                Error::InvalidInput(format!(
                    "Unknown stage '{}' (expected lexicon, spelling, pronunciation, evaluation or all)",
                    s
                ))
            })
    }
}

impl fmt::Display for StageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageSelector::Single(stage) => stage.fmt(f),
            StageSelector::All => f.write_str("all"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selector() {
        assert_eq!("all".parse::<StageSelector>().unwrap(), StageSelector::All);
        assert_eq!(
            "spelling".parse::<StageSelector>().unwrap(),
            StageSelector::Single(Stage::Spelling)
        );
        assert!("train".parse::<StageSelector>().is_err());
    }

    #[test]
    fn test_all_runs_in_fixed_order() {
        assert_eq!(
            StageSelector::All.stages(),
            vec![
                Stage::Lexicon,
                Stage::Spelling,
                Stage::Pronunciation,
                Stage::Evaluation
            ]
        );
        assert_eq!(
            StageSelector::Single(Stage::Evaluation).stages(),
            vec![Stage::Evaluation]
        );
    }

    #[test]
    fn test_display_round_trips() {
        for stage in Stage::ALL {
            let selector = StageSelector::Single(stage);
            assert_eq!(selector.to_string().parse::<StageSelector>().unwrap(), selector);
        }
    }
}
