//! JSON lexicon format
//!
//! A list of single-key objects mapping a word to its pronunciations:
//!
//! ```json
//! [{"hello": ["h @ l \"o U"]}, {"read": ["r\\ \"i: d", "r\\ \"E d"]}]
//! ```

use ltp_common::{Error, Lexicon, Result};
use std::collections::{BTreeMap, HashSet};

pub fn parse_json_lexicon(text: &str, filter: Option<&HashSet<String>>) -> Result<Lexicon> {
    let entries: Vec<BTreeMap<String, Vec<String>>> = serde_json::from_str(text)
        .map_err(|e| Error::Serialization(format!("Invalid JSON lexicon: {}", e)))?;

    let mut lexicon = Lexicon::new();
    for (index, entry) in entries.into_iter().enumerate() {
        if entry.len() != 1 {
            return Err(Error::InvalidInput(format!(
                "JSON lexicon entry {} must hold exactly one word, found {}",
                index + 1,
                entry.len()
            )));
        }
        for (word, pronunciations) in entry {
            if filter.is_some_and(|f| !f.contains(&word)) {
                continue;
            }
            for pronunciation in pronunciations {
                lexicon.add_word(&word, &pronunciation, "");
            }
        }
    }
    Ok(lexicon)
}
