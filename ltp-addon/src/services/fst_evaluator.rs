//! Pronunciation model evaluation
//!
//! Follows the phonetisaurus evaluation strategy: the top-1 generated
//! pronunciation is compared with every reference pronunciation of the
//! word and the closest pair is scored. Results are reported as word
//! error rate and phoneme error rate, with and without stress marks.

use ltp_common::config::ToolConfig;
use ltp_common::{ArpabetConverter, Error, Lexicon, PhonemeSet, Phoneme, Pronunciation, Result};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Word and phoneme error rates, in percent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ErrorRates {
    pub wer: f64,
    pub per: f64,
}

/// Accumulates WER/PER over compared pronunciations
///
/// The phoneme total counts the first reference once per word and then
/// the selected reference again, for exact and inexact matches alike.
/// This matches the metric the existing addons were scored with.
#[derive(Debug, Clone)]
pub struct PronunciationComparator {
    with_stress: bool,
    total_words: usize,
    correct_words: usize,
    total_phonemes: usize,
    incorrect_phonemes: usize,
}

impl PronunciationComparator {
    pub fn new(with_stress: bool) -> Self {
        Self {
            with_stress,
            total_words: 0,
            correct_words: 0,
            total_phonemes: 0,
            incorrect_phonemes: 0,
        }
    }

    pub fn with_stress(&self) -> bool {
        self.with_stress
    }

    pub fn total_words(&self) -> usize {
        self.total_words
    }

    pub fn correct_words(&self) -> usize {
        self.correct_words
    }

    pub fn total_phonemes(&self) -> usize {
        self.total_phonemes
    }

    pub fn incorrect_phonemes(&self) -> usize {
        self.incorrect_phonemes
    }

    /// Score one hypothesis against all references of a word
    ///
    /// Returns whether some reference matched exactly.
    pub fn compare(&mut self, references: &[Pronunciation], hypothesis: &Pronunciation) -> Result<bool> {
        let Some(first) = references.first() else {
            return Err(Error::InvalidInput(
                "no reference pronunciations to compare with".to_string(),
            ));
        };

        self.total_words += 1;
        self.total_phonemes += first.len();

        let hypothesis_phonemes = hypothesis.symbols(self.with_stress);
        let mut min_distance = usize::MAX;
        let mut min_distance_index = 0;

        for (i, reference) in references.iter().enumerate() {
            let reference_phonemes = reference.symbols(self.with_stress);
            let distance = strsim::generic_levenshtein(&hypothesis_phonemes, &reference_phonemes);
            if distance < min_distance {
                min_distance = distance;
                min_distance_index = i;
            }
            if distance == 0 {
                self.correct_words += 1;
                self.total_phonemes += reference_phonemes.len();
                return Ok(true);
            }
        }

        self.incorrect_phonemes += min_distance;
        self.total_phonemes += references[min_distance_index].len();
        Ok(false)
    }

    /// WER and PER over everything compared so far; `None` before any word
    pub fn metrics(&self) -> Option<ErrorRates> {
        if self.total_words == 0 {
            return None;
        }
        let wer = 100.0 * (self.total_words - self.correct_words) as f64 / self.total_words as f64;
        let per = if self.total_phonemes == 0 {
            0.0
        } else {
            100.0 * self.incorrect_phonemes as f64 / self.total_phonemes as f64
        };
        Some(ErrorRates { wer, per })
    }
}

/// Produces pronunciations for words from a trained model
pub trait PronunciationGenerator {
    /// Top-1 pronunciation per word; words the model can't handle may be
    /// missing from the result
    fn generate(&self, model: &Path, words: &[String]) -> Result<BTreeMap<String, Pronunciation>>;
}

/// Runs `phonetisaurus-apply` over a word list
pub struct PhonetisaurusGenerator {
    tool: ToolConfig,
    work_dir: PathBuf,
}

impl PhonetisaurusGenerator {
    pub fn new(tool: ToolConfig, work_dir: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            work_dir: work_dir.into(),
        }
    }
}

/// Parse `word<TAB>phonemes` lines, keeping the first hypothesis per word
pub fn parse_generator_output(output: &str) -> BTreeMap<String, Pronunciation> {
    let mut hypotheses = BTreeMap::new();
    for line in output.lines() {
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split('\t');
        let word = parts.next().unwrap_or_default();
        // n-best output puts a score column before the phonemes
        let phonemes = parts.last().unwrap_or_default();
        hypotheses
            .entry(word.to_string())
            .or_insert_with(|| Pronunciation::parse(phonemes));
    }
    hypotheses
}

impl PronunciationGenerator for PhonetisaurusGenerator {
    fn generate(&self, model: &Path, words: &[String]) -> Result<BTreeMap<String, Pronunciation>> {
        let word_list = self.work_dir.join("evaluation_word_list");
        std::fs::write(&word_list, words.join("\n") + "\n")?;

        let mut command = Command::new(&self.tool.command);
        command
            .arg("--model")
            .arg(model)
            .arg("--word_list")
            .arg(&word_list)
            .args(&self.tool.args);
        debug!("Running {:?}", command);

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

        Ok(parse_generator_output(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Metrics of one evaluation run
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub words: usize,
    pub with_stress: Option<ErrorRates>,
    pub without_stress: Option<ErrorRates>,
}

/// Evaluates a trained model against held-out lexicon entries
pub struct FstEvaluator<'a> {
    generator: &'a dyn PronunciationGenerator,
    normalizer: Option<(ArpabetConverter, PhonemeSet)>,
}

impl<'a> FstEvaluator<'a> {
    pub fn new(generator: &'a dyn PronunciationGenerator) -> Self {
        Self {
            generator,
            normalizer: None,
        }
    }

    /// Convert references and hypotheses from ARPAbet before comparing
    pub fn with_normalization(mut self, target: PhonemeSet) -> Self {
        self.normalizer = Some((ArpabetConverter::new(), target));
        self
    }

    fn normalize(&self, pronunciation: &Pronunciation) -> Result<Pronunciation> {
        match &self.normalizer {
            None => Ok(pronunciation.clone()),
            Some((converter, target)) => {
                let converted = converter.convert(&pronunciation.symbols(true), *target)?;
                Ok(Pronunciation::new(
                    converted.iter().map(|s| Phoneme::parse(s)).collect(),
                ))
            }
        }
    }

    pub fn evaluate(&self, model: &Path, lexicon: &Lexicon) -> Result<EvaluationReport> {
        let words = lexicon.word_names();
        let hypotheses = self.generator.generate(model, &words)?;

        let mut comparator = PronunciationComparator::new(true);
        let mut comparator_wo_stress = PronunciationComparator::new(false);
        let empty = Pronunciation::default();

        for word in lexicon.words() {
            let hypothesis = match hypotheses.get(word.name()) {
                Some(hypothesis) => hypothesis,
                None => {
                    warn!("No pronunciation generated for [{}]", word.name());
                    &empty
                }
            };
            let hypothesis = self.normalize(hypothesis)?;
            let references = word
                .pronunciations()
                .iter()
                .map(|p| self.normalize(p))
                .collect::<Result<Vec<_>>>()?;

            comparator.compare(&references, &hypothesis)?;
            comparator_wo_stress.compare(&references, &hypothesis)?;
        }

        let report = EvaluationReport {
            words: lexicon.len(),
            with_stress: comparator.metrics(),
            without_stress: comparator_wo_stress.metrics(),
        };

        if let Some(rates) = report.with_stress {
            info!("Performance taking into account stress marks:");
            info!("WER,%: {:.2}; PER,%: {:.2}", rates.wer, rates.per);
        }
        if let Some(rates) = report.without_stress {
            info!("Performance WITHOUT taking into account stress marks (stressless):");
            info!("WER,%: {:.2}; PER,%: {:.2}", rates.wer, rates.per);
        }

        Ok(report)
    }
}
