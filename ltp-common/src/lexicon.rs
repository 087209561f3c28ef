//! Lexicon data model
//!
//! A [`Lexicon`] maps word identifiers to [`Word`]s, each holding one or
//! more [`Pronunciation`]s. Pronunciations are sequences of [`Phoneme`]s
//! that may carry a stress mark in one of the notations found in
//! resource lexicons:
//!
//! - ARPAbet digit suffix: `AH0`, `EY1`, `OW2`
//! - X-SAMPA prefix: `"o`, `%e`
//! - IPA prefix: `ˈæ`, `ˌə`
//!
//! Words are kept in identifier order, which is what the training data
//! writer relies on.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;

/// Stress level carried by a phoneme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stress {
    Unstressed,
    Primary,
    Secondary,
}

/// How a stress mark was written in the source lexicon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StressNotation {
    /// Trailing digit 0/1/2 (ARPAbet)
    Digit,
    /// Leading `"` or `%` (X-SAMPA)
    XSampa,
    /// Leading `ˈ` or `ˌ` (IPA)
    Ipa,
}

/// Stress level together with the notation used to write it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StressMark {
    pub level: Stress,
    pub notation: StressNotation,
}

impl StressMark {
    fn render(&self, symbol: &str) -> String {
        match (self.notation, self.level) {
            (StressNotation::Digit, Stress::Unstressed) => format!("{}0", symbol),
            (StressNotation::Digit, Stress::Primary) => format!("{}1", symbol),
            (StressNotation::Digit, Stress::Secondary) => format!("{}2", symbol),
            (StressNotation::XSampa, Stress::Primary) => format!("\"{}", symbol),
            (StressNotation::XSampa, Stress::Secondary) => format!("%{}", symbol),
            (StressNotation::Ipa, Stress::Primary) => format!("ˈ{}", symbol),
            (StressNotation::Ipa, Stress::Secondary) => format!("ˌ{}", symbol),
            // prefix notations have no mark for unstressed
            (_, Stress::Unstressed) => symbol.to_string(),
        }
    }
}

/// Single phoneme symbol with optional stress
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Phoneme {
    symbol: String,
    stress: Option<StressMark>,
}

impl Phoneme {
    /// Phoneme without stress
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            stress: None,
        }
    }

    /// Phoneme with an explicit stress mark
    pub fn with_stress(symbol: impl Into<String>, level: Stress, notation: StressNotation) -> Self {
        Self {
            symbol: symbol.into(),
            stress: Some(StressMark { level, notation }),
        }
    }

    /// Parse a symbol as written in a lexicon, detecting its stress mark
    ///
    /// Digit suffixes are only split off alphabetic bases, so X-SAMPA
    /// symbols such as `@` or `r\` stay intact.
    pub fn parse(raw: &str) -> Self {
        let prefixes = [
            ('"', Stress::Primary, StressNotation::XSampa),
            ('%', Stress::Secondary, StressNotation::XSampa),
            ('ˈ', Stress::Primary, StressNotation::Ipa),
            ('ˌ', Stress::Secondary, StressNotation::Ipa),
        ];
        for (mark, level, notation) in prefixes {
            if let Some(rest) = raw.strip_prefix(mark) {
                if !rest.is_empty() {
                    return Self::with_stress(rest, level, notation);
                }
            }
        }

        if let Some(last) = raw.chars().last() {
            let base = &raw[..raw.len() - last.len_utf8()];
            let is_arpabet_base =
                !base.is_empty() && base.chars().all(|c| c.is_ascii_alphabetic());
            if is_arpabet_base {
                let level = match last {
                    '0' => Some(Stress::Unstressed),
                    '1' => Some(Stress::Primary),
                    '2' => Some(Stress::Secondary),
                    _ => None,
                };
                if let Some(level) = level {
                    return Self::with_stress(base, level, StressNotation::Digit);
                }
            }
        }

        Self::new(raw)
    }

    /// Bare symbol without any stress mark
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn stress(&self) -> Option<Stress> {
        self.stress.map(|s| s.level)
    }

    /// Render the phoneme, optionally including its stress mark
    pub fn render(&self, with_stress: bool) -> String {
        match (&self.stress, with_stress) {
            (Some(mark), true) => mark.render(&self.symbol),
            _ => self.symbol.clone(),
        }
    }
}

impl fmt::Display for Phoneme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(true))
    }
}

/// Ordered sequence of phonemes, optionally tagged
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pronunciation {
    phonemes: Vec<Phoneme>,
    #[serde(default)]
    tag: String,
}

impl Pronunciation {
    pub fn new(phonemes: Vec<Phoneme>) -> Self {
        Self {
            phonemes,
            tag: String::new(),
        }
    }

    /// Parse a space-delimited pronunciation string
    pub fn parse(text: &str) -> Self {
        Self::new(text.split_whitespace().map(Phoneme::parse).collect())
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn phonemes(&self) -> &[Phoneme] {
        &self.phonemes
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Number of phonemes
    pub fn len(&self) -> usize {
        self.phonemes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phonemes.is_empty()
    }

    /// Phoneme symbols, with or without stress marks
    pub fn symbols(&self, with_stress: bool) -> Vec<String> {
        self.phonemes.iter().map(|p| p.render(with_stress)).collect()
    }

    /// Space-delimited rendering
    pub fn to_string_with(&self, with_stress: bool) -> String {
        self.symbols(with_stress).join(" ")
    }
}

impl fmt::Display for Pronunciation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(true))
    }
}

/// Word identifier with its pronunciations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    name: String,
    pronunciations: Vec<Pronunciation>,
}

impl Word {
    pub fn new(name: impl Into<String>, pronunciation: Pronunciation) -> Self {
        Self {
            name: name.into(),
            pronunciations: vec![pronunciation],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pronunciations(&self) -> &[Pronunciation] {
        &self.pronunciations
    }

    /// First (preferred) pronunciation
    pub fn pronunciation(&self) -> &Pronunciation {
        // never empty: built from one pronunciation, and from_blob rejects empty words
        &self.pronunciations[0]
    }

    fn push(&mut self, pronunciation: Pronunciation) {
        self.pronunciations.push(pronunciation);
    }
}

/// Collection of words, keyed and ordered by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lexicon {
    words: BTreeMap<String, Word>,
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pronunciation given as text; appends to an existing word
    pub fn add_word(&mut self, name: &str, pronunciation: &str, tag: &str) {
        self.add_pronunciation(name, Pronunciation::parse(pronunciation).with_tag(tag));
    }

    pub fn add_pronunciation(&mut self, name: &str, pronunciation: Pronunciation) {
        match self.words.get_mut(name) {
            Some(word) => word.push(pronunciation),
            None => {
                self.words
                    .insert(name.to_string(), Word::new(name, pronunciation));
            }
        }
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Word> {
        self.words.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains_key(name)
    }

    /// Words in identifier order
    pub fn words(&self) -> impl Iterator<Item = &Word> {
        self.words.values()
    }

    pub fn word_names(&self) -> Vec<String> {
        self.words.keys().cloned().collect()
    }

    /// Keep only the words in `allowlist`
    pub fn filtered<S: AsRef<str>>(&self, allowlist: &[S]) -> Lexicon {
        let allowed: HashSet<&str> = allowlist.iter().map(|s| s.as_ref()).collect();
        Lexicon {
            words: self
                .words
                .iter()
                .filter(|(name, _)| allowed.contains(name.as_str()))
                .map(|(name, word)| (name.clone(), word.clone()))
                .collect(),
        }
    }

    /// Unique characters used in word identifiers
    pub fn graphemes(&self) -> BTreeSet<String> {
        self.words
            .keys()
            .flat_map(|name| name.chars())
            .map(|c| c.to_string())
            .collect()
    }

    /// Unique phonemes (with stress marks) used in pronunciations
    pub fn phonemes(&self) -> BTreeSet<String> {
        self.words
            .values()
            .flat_map(|w| w.pronunciations.iter())
            .flat_map(|p| p.symbols(true))
            .collect()
    }

    /// Check that every grapheme and phoneme used is declared
    ///
    /// Fails with [`Error::VocabularyMismatch`] listing the offending
    /// symbols in sorted order.
    pub fn validate<G, P>(&self, graphemes: &[G], phonemes: &[P]) -> Result<()>
    where
        G: AsRef<str>,
        P: AsRef<str>,
    {
        let declared_graphemes: HashSet<&str> = graphemes.iter().map(|g| g.as_ref()).collect();
        let declared_phonemes: HashSet<&str> = phonemes.iter().map(|p| p.as_ref()).collect();

        let bad_graphemes: Vec<String> = self
            .graphemes()
            .into_iter()
            .filter(|g| !declared_graphemes.contains(g.as_str()))
            .collect();
        let bad_phonemes: Vec<String> = self
            .phonemes()
            .into_iter()
            .filter(|p| !declared_phonemes.contains(p.as_str()))
            .collect();

        if bad_graphemes.is_empty() && bad_phonemes.is_empty() {
            Ok(())
        } else {
            Err(Error::VocabularyMismatch {
                graphemes: bad_graphemes,
                phonemes: bad_phonemes,
            })
        }
    }

    /// Parse lexicon text, one pronunciation per line
    ///
    /// Blank lines are skipped. With `filter`, words outside it are dropped.
    pub fn parse_text(text: &str, filter: Option<&HashSet<String>>) -> Result<Lexicon> {
        let mut lexicon = Lexicon::new();
        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let (word, tag, pronunciation) = parse_lexicon_line(line, index + 1)?;
            if let Some(filter) = filter {
                if !filter.contains(word) {
                    continue;
                }
            }
            lexicon.add_word(word, pronunciation, tag);
        }
        Ok(lexicon)
    }

    /// Serialize into the opaque blob stored in the addon
    pub fn to_blob(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Decode a blob, rejecting words without pronunciations
    pub fn from_blob(bytes: &[u8]) -> Result<Lexicon> {
        let lexicon: Lexicon = rmp_serde::from_slice(bytes)?;
        if let Some(word) = lexicon.words().find(|w| w.pronunciations.is_empty()) {
            return Err(Error::Serialization(format!(
                "word '{}' has no pronunciations",
                word.name
            )));
        }
        Ok(lexicon)
    }
}

/// Split a lexicon line into `(word, tag, pronunciation)`
///
/// Accepts `word\tpronunciation` and `word\ttag\tpronunciation`.
pub fn parse_lexicon_line(line: &str, line_number: usize) -> Result<(&str, &str, &str)> {
    let parts: Vec<&str> = line.split('\t').collect();
    match parts.as_slice() {
        [word, pronunciation] => Ok((*word, "", *pronunciation)),
        [word, tag, pronunciation] => Ok((*word, *tag, *pronunciation)),
        _ => Err(Error::MalformedRecord {
            line_number,
            line: line.to_string(),
        }),
    }
}
