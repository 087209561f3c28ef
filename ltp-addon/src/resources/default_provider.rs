//! File-based resource provider
//!
//! Expects fixed file names inside the resources directory:
//! - `lexicon`: `word<TAB>[tag<TAB>]pronunciation` per line (required)
//! - `spelling_lexicon`: same format, words spelled letter by letter (required)
//! - `phonemes`, `graphemes`: one symbol per line, derived from the lexicon if missing
//! - `train_words`: words to train on, whole lexicon if missing
//! - `test_words`: held-out words, evaluation is skipped if missing

use super::json_lexicon::parse_json_lexicon;
use super::ResourceProvider;
use ltp_common::{Error, Lexicon, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const LEXICON_FILE_NAME: &str = "lexicon";
pub const SPELLING_LEXICON_FILE_NAME: &str = "spelling_lexicon";
pub const PHONEMES_FILE_NAME: &str = "phonemes";
pub const GRAPHEMES_FILE_NAME: &str = "graphemes";
pub const TRAIN_WORDS_FILE_NAME: &str = "train_words";
pub const TEST_WORDS_FILE_NAME: &str = "test_words";

/// On-disk format of the lexicon files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexiconFormat {
    /// Tab-separated text lines
    #[default]
    Text,
    /// JSON list of `{"word": ["pronunciation", ...]}` objects
    Json,
}

/// Reads pronunciation resources from a directory
#[derive(Debug, Clone)]
pub struct DefaultProvider {
    resources_dir: PathBuf,
    lexicon_file: String,
    format: LexiconFormat,
}

impl DefaultProvider {
    pub fn new(resources_dir: impl Into<PathBuf>) -> Self {
        Self {
            resources_dir: resources_dir.into(),
            lexicon_file: LEXICON_FILE_NAME.to_string(),
            format: LexiconFormat::Text,
        }
    }

    /// Read the main lexicon from a different file name
    pub fn with_lexicon_file(mut self, name: impl Into<String>) -> Self {
        self.lexicon_file = name.into();
        self
    }

    pub fn with_format(mut self, format: LexiconFormat) -> Self {
        self.format = format;
        self
    }

    pub fn resources_dir(&self) -> &Path {
        &self.resources_dir
    }

    pub fn lexicon_file(&self) -> &str {
        &self.lexicon_file
    }

    pub fn format(&self) -> LexiconFormat {
        self.format
    }

    fn read_lines(path: &Path) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(path)?;
        Ok(content
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Optional list file; `None` if it doesn't exist
    fn read_optional_list(&self, name: &str) -> Result<Option<Vec<String>>> {
        let path = self.resources_dir.join(name);
        if !path.is_file() {
            return Ok(None);
        }
        debug!("Reading {}", path.display());
        Self::read_lines(&path).map(Some)
    }

    fn parse_lexicon_file(&self, name: &str, words: Option<&[String]>) -> Result<Lexicon> {
        let path = self.resources_dir.join(name);
        if !path.is_file() {
            return Err(Error::NotFound(format!(
                "{} is not found in {}",
                name,
                self.resources_dir.display()
            )));
        }
        debug!("Parsing lexicon {}", path.display());

        // an empty allowlist means no filtering
        let filter: Option<HashSet<String>> = words
            .filter(|w| !w.is_empty())
            .map(|w| w.iter().cloned().collect());

        let text = std::fs::read_to_string(&path)?;
        match self.format {
            LexiconFormat::Text => Lexicon::parse_text(&text, filter.as_ref()),
            LexiconFormat::Json => parse_json_lexicon(&text, filter.as_ref()),
        }
    }
}

impl ResourceProvider for DefaultProvider {
    fn phonemes(&self) -> Result<Vec<String>> {
        if let Some(phonemes) = self.read_optional_list(PHONEMES_FILE_NAME)? {
            return Ok(phonemes);
        }
        info!("File with phonemes is not available, deriving unique phonemes from lexicon");
        Ok(self.lexicon(None)?.phonemes().into_iter().collect())
    }

    fn graphemes(&self) -> Result<Vec<String>> {
        if let Some(graphemes) = self.read_optional_list(GRAPHEMES_FILE_NAME)? {
            return Ok(graphemes);
        }
        info!("File with graphemes is not available, deriving unique graphemes from lexicon");
        Ok(self.lexicon(None)?.graphemes().into_iter().collect())
    }

    fn lexicon(&self, words: Option<&[String]>) -> Result<Lexicon> {
        self.parse_lexicon_file(&self.lexicon_file, words)
    }

    fn spelling_lexicon(&self) -> Result<Lexicon> {
        self.parse_lexicon_file(SPELLING_LEXICON_FILE_NAME, None)
    }

    fn train_words(&self) -> Result<Vec<String>> {
        if let Some(words) = self.read_optional_list(TRAIN_WORDS_FILE_NAME)? {
            return Ok(words);
        }
        info!("File with words for pronunciation training is not available, using whole lexicon");
        Ok(self.lexicon(None)?.word_names())
    }

    fn test_words(&self) -> Result<Option<Vec<String>>> {
        let words = self.read_optional_list(TEST_WORDS_FILE_NAME)?;
        if words.is_none() {
            info!("File with words for pronunciation evaluation is not available");
        }
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_blank_lines_skipped() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("lexicon"), "\nhi\th aI\n\n  \n").unwrap();

        let provider = DefaultProvider::new(temp_dir.path());
        assert_eq!(provider.lexicon(None).unwrap().len(), 1);
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("lexicon"), "hi\th aI\nbroken line\n").unwrap();

        let provider = DefaultProvider::new(temp_dir.path());
        match provider.lexicon(None) {
            Err(Error::MalformedRecord { line_number, line }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "broken line");
            }
            other => panic!("expected MalformedRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("lexicon"), "a\tA\nb\tB\n").unwrap();

        let provider = DefaultProvider::new(temp_dir.path());
        assert_eq!(provider.lexicon(Some(&[][..])).unwrap().len(), 2);
        assert_eq!(provider.lexicon(Some(&["b".to_string()][..])).unwrap().len(), 1);
    }
}
