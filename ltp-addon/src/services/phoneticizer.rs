//! Interactive pronunciation lookup with a trained model
//!
//! Reads one word per line and writes `word<TAB>pronunciation` for each,
//! asking the generator one word at a time.

use crate::services::fst_evaluator::PronunciationGenerator;
use ltp_common::Result;
use std::io::{BufRead, Write};
use std::path::Path;
use tracing::{info, warn};

/// Phoneticize every word read from `input` with `model`
///
/// Returns the number of words that got a pronunciation. Blank lines are
/// skipped; words the model produces nothing for are logged and skipped.
pub fn phoneticize<R: BufRead, W: Write>(
    generator: &dyn PronunciationGenerator,
    model: &Path,
    input: R,
    mut output: W,
) -> Result<usize> {
    let mut generated = 0;
    for line in input.lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() {
            info!("No pronunciation for empty string");
            continue;
        }

        let hypotheses = generator.generate(model, &[word.to_string()])?;
        match hypotheses.get(word) {
            Some(pronunciation) => {
                writeln!(output, "{}\t{}", word, pronunciation)?;
                output.flush()?;
                generated += 1;
            }
            None => warn!("Model produced no pronunciation for '{}'", word),
        }
    }
    Ok(generated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ltp_common::Pronunciation;
    use std::collections::BTreeMap;

    struct Echo;

    impl PronunciationGenerator for Echo {
        fn generate(
            &self,
            _model: &Path,
            words: &[String],
        ) -> Result<BTreeMap<String, Pronunciation>> {
            Ok(words
                .iter()
                .filter(|w| w.as_str() != "unknown")
                .map(|w| {
                    let spelled: Vec<String> = w.chars().map(|c| c.to_string()).collect();
                    (w.clone(), Pronunciation::parse(&spelled.join(" ")))
                })
                .collect())
        }
    }

    #[test]
    fn test_one_line_per_word() {
        let mut out = Vec::new();
        let count = phoneticize(&Echo, Path::new("m.fst"), "cat\n\n  dog \n".as_bytes(), &mut out)
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(String::from_utf8(out).unwrap(), "cat\tc a t\ndog\td o g\n");
    }

    #[test]
    fn test_word_without_output_is_skipped() {
        let mut out = Vec::new();
        let count =
            phoneticize(&Echo, Path::new("m.fst"), "unknown\nab\n".as_bytes(), &mut out).unwrap();

        assert_eq!(count, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "ab\ta b\n");
    }
}
