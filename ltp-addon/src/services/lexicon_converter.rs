//! Lexicon phoneme-set conversion
//!
//! Rewrites the pronunciation column of a tab-separated lexicon from
//! ARPAbet into another phoneme set. Word and tag columns pass through
//! untouched.

use ltp_common::{ArpabetConverter, PhonemeSet, Result};
use std::path::Path;
use tracing::info;

/// Convert every line of `text`, returning the converted lexicon
///
/// Blank lines are kept so line numbers stay aligned with the input.
pub fn convert_lexicon(text: &str, converter: &ArpabetConverter, target: PhonemeSet) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            out.push('\n');
            continue;
        }

        let (head, pronunciation) = match line.rfind('\t') {
            Some(pos) => (&line[..=pos], &line[pos + 1..]),
            None => ("", line),
        };
        let symbols: Vec<&str> = pronunciation.split_whitespace().collect();
        let converted = converter.convert(&symbols, target)?;

        out.push_str(head);
        out.push_str(&converted.join(" "));
        out.push('\n');
    }
    Ok(out)
}

/// Convert the lexicon file at `input` and write the result to `output`
///
/// Returns the number of converted lines. Nothing is written if any line
/// fails to convert.
pub fn convert_lexicon_file(input: &Path, output: &Path, target: PhonemeSet) -> Result<usize> {
    let text = std::fs::read_to_string(input)?;
    let converter = ArpabetConverter::new();
    let converted = convert_lexicon(&text, &converter, target)?;
    let count = converted.lines().filter(|l| !l.is_empty()).count();

    std::fs::write(output, converted)?;
    info!(
        "Converted {} lexicon entries from {} to {}",
        count,
        input.display(),
        output.display()
    );
    Ok(count)
}
