//! Common error types for learn-to-pronounce

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for learn-to-pronounce operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the addon pipeline and its helpers
///
/// Everything except `Io`/`NotFound` signals a condition the pipeline
/// cannot recover from locally; callers surface it immediately.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Existing addon was built for a different locale
    #[error(
        "Addon file exists and locale inside [{stored}] doesn't match one specified [{requested}]"
    )]
    ConfigMismatch { stored: String, requested: String },

    /// Lexicon uses graphemes or phonemes that were not declared
    #[error("Lexicon uses undeclared symbols: graphemes {graphemes:?}, phonemes {phonemes:?}")]
    VocabularyMismatch {
        graphemes: Vec<String>,
        phonemes: Vec<String>,
    },

    /// A stage needs an artifact that an earlier stage produces
    #[error("Missing [{}]. {hint}", path.display())]
    MissingDependency { path: PathBuf, hint: String },

    /// Phoneme conversion table has no entry for a symbol
    #[error("Can't find [{symbol}] in {table} mapping")]
    UnknownSymbol { table: &'static str, symbol: String },

    /// Converted phoneme is not ASCII
    #[error("X-SAMPA phoneme is non-ASCII: {0}")]
    EncodingViolation(String),

    /// Lexicon line does not split into 2 or 3 tab-separated fields
    #[error("Failed to parse lexicon line {line_number}: [{line}]")]
    MalformedRecord { line_number: usize, line: String },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// External trainer or generator failed
    #[error("External tool error: {0}")]
    Trainer(String),

    /// Encoding/decoding of the addon record or lexicon blob failed
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rmp_serde::encode::Error> for Error {
    fn from(err: rmp_serde::encode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<rmp_serde::decode::Error> for Error {
    fn from(err: rmp_serde::decode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
