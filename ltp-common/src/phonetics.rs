//! Phoneme-set conversion
//!
//! Converts ARPAbet (phoneme set of CMUDict) to IPA or X-SAMPA. X-SAMPA is
//! the ASCII-only rendering of IPA.
//!
//! Conversion runs in two passes, ARPAbet → IPA → X-SAMPA. Stress marks
//! are put directly before the vowel, not before the syllable, so stressed
//! and unstressed vowels stay separate phonemes for training.
//!
//! References:
//! - ARPAbet: <https://en.wikipedia.org/wiki/ARPABET>
//! - X-SAMPA: <https://en.wikipedia.org/wiki/X-SAMPA>
//! - Mapping exceptions: <https://github.com/menelik3/cmudict-ipa>

use crate::{Error, Result};
use std::collections::HashMap;
use std::str::FromStr;

const ARPA_TO_IPA_TABLE: &str = "ARPAbet to IPA";
const IPA_TO_XSAMPA_TABLE: &str = "IPA to X-SAMPA";

const IPA_PRIMARY: char = 'ˈ';
const IPA_SECONDARY: char = 'ˌ';
const PROLONGATION: char = ':';

/// Target phoneme sets for conversion from ARPAbet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhonemeSet {
    Ipa,
    XSampa,
}

impl FromStr for PhonemeSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ipa" => Ok(PhonemeSet::Ipa),
            "xsampa" | "x-sampa" => Ok(PhonemeSet::XSampa),
            other => Err(Error::InvalidInput(format!(
                "Unsupported target phonemeset: {}",
                other
            ))),
        }
    }
}

/// ARPAbet → IPA → X-SAMPA converter
///
/// Tables are built once in [`ArpabetConverter::new`] and never mutated.
#[derive(Debug, Clone)]
pub struct ArpabetConverter {
    arpa_to_ipa: HashMap<&'static str, Vec<&'static str>>,
    ipa_to_xsampa: HashMap<&'static str, &'static str>,
}

impl Default for ArpabetConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl ArpabetConverter {
    pub fn new() -> Self {
        // Stress-annotated entries (AH0, AH1, AH2, ER0) are looked up
        // before the bare symbol
        let arpa_to_ipa: HashMap<&'static str, Vec<&'static str>> = [
            ("AA", vec!["ɑ:"]),
            ("AE", vec!["æ"]),
            ("AH0", vec!["ə"]),
            ("AH2", vec!["ə"]),
            ("AH1", vec!["ʌ"]),
            ("AO", vec!["ɔ"]),
            ("AW", vec!["a", "ʊ̯"]),
            ("AY", vec!["a", "ɪ̯"]),
            ("B", vec!["b"]),
            ("CH", vec!["t", "ʃ"]),
            ("D", vec!["d"]),
            ("DH", vec!["ð"]),
            ("EH", vec!["ɛ"]),
            ("ER0", vec!["ɚ"]),
            ("ER", vec!["ɝ:"]),
            ("EY", vec!["e", "ɪ̯"]),
            ("F", vec!["f"]),
            ("G", vec!["ɡ"]),
            ("HH", vec!["h"]),
            ("IH", vec!["ɪ"]),
            ("IY", vec!["i:"]),
            ("JH", vec!["d", "ʒ"]),
            ("K", vec!["k"]),
            ("L", vec!["l"]),
            ("M", vec!["m"]),
            ("N", vec!["n"]),
            ("NG", vec!["ŋ"]),
            ("OW", vec!["o", "ʊ̯"]),
            ("OY", vec!["ɔ", "ɪ̯"]),
            ("P", vec!["p"]),
            ("R", vec!["ɹ"]),
            ("S", vec!["s"]),
            ("SH", vec!["ʃ"]),
            ("T", vec!["t"]),
            ("TH", vec!["θ"]),
            ("UH", vec!["ʊ"]),
            ("UW", vec!["u:"]),
            ("V", vec!["v"]),
            ("W", vec!["w"]),
            ("Y", vec!["j"]),
            ("Z", vec!["z"]),
            ("ZH", vec!["ʒ"]),
            ("<eps>", vec!["<eps>"]),
        ]
        .into_iter()
        .collect();

        let ipa_to_xsampa: HashMap<&'static str, &'static str> = [
            ("ɑ", "A"),
            ("ɪ̯", "I"),
            ("æ", "{"),
            ("ʌ", "V"),
            ("ə", "@"),
            ("ɔ", "O"),
            ("a", "a"),
            ("ʊ̯", "U"),
            ("ɪ", "I"),
            ("b", "b"),
            ("t", "t"),
            ("ʃ", "S"),
            ("d", "d"),
            ("ð", "D"),
            ("ɛ", "E"),
            ("ɚ", "@`"),
            ("ɝ", "@`"),
            ("e", "e"),
            ("f", "f"),
            ("ɡ", "g"),
            ("h", "h"),
            ("i", "i"),
            ("ʒ", "Z"),
            ("k", "k"),
            ("l", "l"),
            ("m", "m"),
            ("n", "n"),
            ("ŋ", "N"),
            ("o", "o"),
            ("p", "p"),
            ("ɹ", "r\\"),
            ("s", "s"),
            ("θ", "T"),
            ("u", "u"),
            ("ʊ", "U"),
            ("v", "v"),
            ("w", "w"),
            ("j", "j"),
            ("z", "z"),
            ("<eps>", "<eps>"),
        ]
        .into_iter()
        .collect();

        Self {
            arpa_to_ipa,
            ipa_to_xsampa,
        }
    }

    /// Bare ARPAbet symbols the converter accepts (stress digits excluded)
    pub fn arpabet_symbols(&self) -> Vec<&'static str> {
        let mut symbols: Vec<&'static str> = self
            .arpa_to_ipa
            .keys()
            .map(|k| k.trim_end_matches(|c: char| c.is_ascii_digit()))
            .collect();
        symbols.sort_unstable();
        symbols.dedup();
        symbols
    }

    /// Pass 1: ARPAbet → IPA
    ///
    /// A symbol may expand into several IPA symbols (diphthongs,
    /// affricates); the stress prefix goes on the first one only.
    pub fn arpa_to_ipa<S: AsRef<str>>(&self, arpa_phonemes: &[S]) -> Result<Vec<String>> {
        let mut ipa_phonemes = Vec::with_capacity(arpa_phonemes.len());
        for raw in arpa_phonemes {
            let raw = raw.as_ref();
            // annotated form first, e.g. AH1 and AH0 differ
            let annotated = self.arpa_to_ipa.get(raw);

            let (bare, stress) = match raw.chars().last() {
                Some(digit) if digit.is_ascii_digit() => {
                    let stress = match digit {
                        '0' => "",
                        '1' => "ˈ",
                        '2' => "ˌ",
                        _ => {
                            return Err(Error::UnknownSymbol {
                                table: ARPA_TO_IPA_TABLE,
                                symbol: raw.to_string(),
                            })
                        }
                    };
                    (&raw[..raw.len() - 1], stress)
                }
                Some(_) => (raw, ""),
                None => {
                    return Err(Error::UnknownSymbol {
                        table: ARPA_TO_IPA_TABLE,
                        symbol: raw.to_string(),
                    })
                }
            };

            let expansion = match annotated.or_else(|| self.arpa_to_ipa.get(bare)) {
                Some(expansion) => expansion,
                None => {
                    return Err(Error::UnknownSymbol {
                        table: ARPA_TO_IPA_TABLE,
                        symbol: bare.to_string(),
                    })
                }
            };

            for (i, ipa) in expansion.iter().enumerate() {
                if i == 0 {
                    ipa_phonemes.push(format!("{}{}", stress, ipa));
                } else {
                    ipa_phonemes.push(ipa.to_string());
                }
            }
        }
        Ok(ipa_phonemes)
    }

    /// Pass 2: IPA → X-SAMPA
    ///
    /// Leading stress and trailing prolongation are carried over around
    /// the mapped symbol.
    pub fn ipa_to_xsampa<S: AsRef<str>>(&self, ipa_phonemes: &[S]) -> Result<Vec<String>> {
        let mut xsampa_phonemes = Vec::with_capacity(ipa_phonemes.len());
        for raw in ipa_phonemes {
            let mut symbol = raw.as_ref();

            let mut stress = "";
            if let Some(rest) = symbol.strip_prefix(IPA_PRIMARY) {
                stress = "\"";
                symbol = rest;
            } else if let Some(rest) = symbol.strip_prefix(IPA_SECONDARY) {
                stress = "%";
                symbol = rest;
            }

            let mut prolongation = "";
            if let Some(rest) = symbol.strip_suffix(PROLONGATION) {
                prolongation = ":";
                symbol = rest;
            }

            let mapped = self
                .ipa_to_xsampa
                .get(symbol)
                .ok_or_else(|| Error::UnknownSymbol {
                    table: IPA_TO_XSAMPA_TABLE,
                    symbol: symbol.to_string(),
                })?;

            let xsampa = format!("{}{}{}", stress, mapped, prolongation);
            if !xsampa.is_ascii() {
                return Err(Error::EncodingViolation(xsampa));
            }
            xsampa_phonemes.push(xsampa);
        }
        Ok(xsampa_phonemes)
    }

    /// ARPAbet → X-SAMPA (both passes)
    pub fn arpa_to_xsampa<S: AsRef<str>>(&self, arpa_phonemes: &[S]) -> Result<Vec<String>> {
        let ipa = self.arpa_to_ipa(arpa_phonemes)?;
        self.ipa_to_xsampa(&ipa)
    }

    /// Convert ARPAbet symbols into the given target set
    pub fn convert<S: AsRef<str>>(&self, arpa_phonemes: &[S], target: PhonemeSet) -> Result<Vec<String>> {
        match target {
            PhonemeSet::Ipa => self.arpa_to_ipa(arpa_phonemes),
            PhonemeSet::XSampa => self.arpa_to_xsampa(arpa_phonemes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_vowel(symbol: &str) -> bool {
        matches!(
            symbol,
            "AA" | "AE" | "AH" | "AO" | "AW" | "AY" | "EH" | "ER" | "EY" | "IH" | "IY" | "OW"
                | "OY" | "UH" | "UW"
        )
    }

    #[test]
    fn test_cat_vowel() {
        let converter = ArpabetConverter::new();
        assert_eq!(converter.arpa_to_ipa(&["AE1"]).unwrap(), vec!["ˈæ"]);
        assert_eq!(converter.arpa_to_xsampa(&["AE1"]).unwrap(), vec!["\"{"]);
    }

    #[test]
    fn test_annotated_lookup_takes_precedence() {
        let converter = ArpabetConverter::new();
        assert_eq!(converter.arpa_to_ipa(&["AH0"]).unwrap(), vec!["ə"]);
        assert_eq!(converter.arpa_to_ipa(&["AH1"]).unwrap(), vec!["ˈʌ"]);
        assert_eq!(converter.arpa_to_ipa(&["AH2"]).unwrap(), vec!["ˌə"]);
        assert_eq!(converter.arpa_to_ipa(&["ER0"]).unwrap(), vec!["ɚ"]);
        assert_eq!(converter.arpa_to_ipa(&["ER1"]).unwrap(), vec!["ˈɝ:"]);
        assert_eq!(converter.arpa_to_xsampa(&["ER1"]).unwrap(), vec!["\"@`:"]);
    }

    #[test]
    fn test_diphthong_stress_on_first_symbol() {
        let converter = ArpabetConverter::new();
        assert_eq!(converter.arpa_to_ipa(&["OW1"]).unwrap(), vec!["ˈo", "ʊ̯"]);
        assert_eq!(converter.arpa_to_xsampa(&["AY2"]).unwrap(), vec!["%a", "I"]);
    }

    #[test]
    fn test_word_conversion() {
        let converter = ArpabetConverter::new();
        let hello = ["HH", "AH0", "L", "OW1"];
        assert_eq!(
            converter.arpa_to_xsampa(&hello).unwrap(),
            vec!["h", "@", "l", "\"o", "U"]
        );
        assert_eq!(
            converter.convert(&["CH", "IY1", "Z"], PhonemeSet::XSampa).unwrap(),
            vec!["t", "S", "\"i:", "z"]
        );
    }

    #[test]
    fn test_every_symbol_converts_to_ascii() {
        let converter = ArpabetConverter::new();
        for symbol in converter.arpabet_symbols() {
            let variants: Vec<String> = if is_vowel(symbol) {
                ["0", "1", "2"].iter().map(|d| format!("{}{}", symbol, d)).collect()
            } else {
                vec![symbol.to_string()]
            };
            for arpa in variants {
                let xsampa = converter.arpa_to_xsampa(&[arpa.as_str()]).unwrap();
                assert!(!xsampa.is_empty(), "{} produced nothing", arpa);
                assert!(xsampa.iter().all(|x| x.is_ascii()), "{} -> {:?}", arpa, xsampa);

                if arpa.ends_with('1') || arpa.ends_with('2') {
                    let marked = xsampa
                        .iter()
                        .filter(|x| x.starts_with('"') || x.starts_with('%'))
                        .count();
                    assert_eq!(marked, 1, "{} -> {:?}", arpa, xsampa);
                    assert!(xsampa[0].starts_with('"') || xsampa[0].starts_with('%'));
                }
            }
        }
    }

    #[test]
    fn test_unknown_symbols() {
        let converter = ArpabetConverter::new();
        assert!(matches!(
            converter.arpa_to_ipa(&["QQ1"]),
            Err(Error::UnknownSymbol { .. })
        ));
        assert!(matches!(
            converter.arpa_to_ipa(&["AE7"]),
            Err(Error::UnknownSymbol { .. })
        ));
        assert!(matches!(
            converter.arpa_to_ipa(&[""]),
            Err(Error::UnknownSymbol { .. })
        ));
        assert!(matches!(
            converter.ipa_to_xsampa(&["ʔ"]),
            Err(Error::UnknownSymbol { .. })
        ));
    }

    #[test]
    fn test_eps_passes_through() {
        let converter = ArpabetConverter::new();
        assert_eq!(converter.arpa_to_xsampa(&["<eps>"]).unwrap(), vec!["<eps>"]);
    }

    #[test]
    fn test_phoneme_set_from_str() {
        assert_eq!("xsampa".parse::<PhonemeSet>().unwrap(), PhonemeSet::XSampa);
        assert_eq!("IPA".parse::<PhonemeSet>().unwrap(), PhonemeSet::Ipa);
        assert!("arpa".parse::<PhonemeSet>().is_err());
    }
}
