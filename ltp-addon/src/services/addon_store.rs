//! Addon storage
//!
//! The addon is a single MessagePack map stored at
//! `<work_dir>/pronunciation.addon`. Every pipeline stage loads the map,
//! adds or overwrites its fields and writes the whole map back, so the
//! build can be resumed from any stage.
//!
//! Only one writer may touch a work directory at a time; no locking is
//! done here.

use ltp_common::{Error, Lexicon, Result};
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the addon file inside the work directory
pub const ADDON_FILE_NAME: &str = "pronunciation.addon";

/// Generator tag written into every new addon
pub const ADDON_IDENTIFIER: &str = concat!("learn_to_pronounce-", env!("CARGO_PKG_VERSION"));

/// Named fields of the addon record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddonField {
    Id,
    Locale,
    Lexicon,
    Graphemes,
    Phonemes,
    FstPronunciationGenerator,
    FstSpellingGenerator,
}

impl AddonField {
    pub fn as_str(&self) -> &'static str {
        match self {
            AddonField::Id => "id",
            AddonField::Locale => "locale",
            AddonField::Lexicon => "lexicon",
            AddonField::Graphemes => "graphemes",
            AddonField::Phonemes => "phonemes",
            AddonField::FstPronunciationGenerator => "fst_pronunciation_generator",
            AddonField::FstSpellingGenerator => "fst_spelling_generator",
        }
    }
}

/// Which trained model is being stored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Pronunciation,
    Spelling,
}

impl ModelKind {
    pub fn field(&self) -> AddonField {
        match self {
            ModelKind::Pronunciation => AddonField::FstPronunciationGenerator,
            ModelKind::Spelling => AddonField::FstSpellingGenerator,
        }
    }
}

/// Value stored under an addon field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddonValue {
    Str(String),
    List(Vec<String>),
    Bytes(Vec<u8>),
}

impl Serialize for AddonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            AddonValue::Str(value) => serializer.serialize_str(value),
            AddonValue::List(values) => values.serialize(serializer),
            AddonValue::Bytes(bytes) => serializer.serialize_bytes(bytes),
        }
    }
}

impl<'de> Deserialize<'de> for AddonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct AddonValueVisitor;

        impl<'de> Visitor<'de> for AddonValueVisitor {
            type Value = AddonValue;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, a list of strings or a byte array")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<AddonValue, E> {
                Ok(AddonValue::Str(v.to_owned()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<AddonValue, E> {
                Ok(AddonValue::Str(v))
            }

            fn visit_bytes<E: de::Error>(self, v: &[u8]) -> std::result::Result<AddonValue, E> {
                Ok(AddonValue::Bytes(v.to_vec()))
            }

            fn visit_byte_buf<E: de::Error>(self, v: Vec<u8>) -> std::result::Result<AddonValue, E> {
                Ok(AddonValue::Bytes(v))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<AddonValue, A::Error> {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element::<String>()? {
                    items.push(item);
                }
                Ok(AddonValue::List(items))
            }
        }

        deserializer.deserialize_any(AddonValueVisitor)
    }
}

/// In-memory view of the addon map
///
/// Keys are kept sorted so identical content always encodes to identical
/// bytes. Keys this builder doesn't know about are carried through.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddonRecord(BTreeMap<String, AddonValue>);

impl AddonRecord {
    fn initial(locale: &str) -> Self {
        let mut record = Self::default();
        record.set(AddonField::Id, AddonValue::Str(ADDON_IDENTIFIER.to_string()));
        record.set(AddonField::Locale, AddonValue::Str(locale.to_string()));
        record
    }

    pub fn get(&self, field: AddonField) -> Option<&AddonValue> {
        self.0.get(field.as_str())
    }

    pub fn set(&mut self, field: AddonField, value: AddonValue) {
        self.0.insert(field.as_str().to_string(), value);
    }

    pub fn contains(&self, field: AddonField) -> bool {
        self.0.contains_key(field.as_str())
    }

    /// All keys, in encoding order
    pub fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|k| k.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn locale(&self) -> Option<&str> {
        match self.get(AddonField::Locale) {
            Some(AddonValue::Str(locale)) => Some(locale),
            _ => None,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Owner of the addon file in one work directory
#[derive(Debug, Clone)]
pub struct AddonStore {
    path: PathBuf,
}

impl AddonStore {
    /// Open the addon in `work_dir`, creating it if needed
    ///
    /// A new addon holds exactly `id` and `locale`. An existing addon must
    /// have been created for the same locale, otherwise
    /// [`Error::ConfigMismatch`] is returned and nothing is written.
    pub fn open(work_dir: &Path, locale: &str) -> Result<Self> {
        std::fs::create_dir_all(work_dir)?;
        let store = Self {
            path: work_dir.join(ADDON_FILE_NAME),
        };

        if !store.path.is_file() {
            info!("Creating addon {} for locale {}", store.path.display(), locale);
            store.save(&AddonRecord::initial(locale))?;
            return Ok(store);
        }

        let record = store.record()?;
        let stored = record
            .locale()
            .ok_or_else(|| Error::Serialization(format!(
                "Addon {} has no locale field",
                store.path.display()
            )))?;
        if stored != locale {
            return Err(Error::ConfigMismatch {
                stored: stored.to_string(),
                requested: locale.to_string(),
            });
        }

        info!(
            "Resuming addon {} ({} fields)",
            store.path.display(),
            record.len()
        );
        Ok(store)
    }

    /// Path of the addon file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the current record from disk
    pub fn record(&self) -> Result<AddonRecord> {
        let bytes = std::fs::read(&self.path)?;
        AddonRecord::from_bytes(&bytes)
    }

    /// Write the whole record through a temp file in the same directory
    fn save(&self, record: &AddonRecord) -> Result<()> {
        let bytes = record.to_bytes()?;
        let tmp_path = self.path.with_extension("addon.tmp");
        std::fs::write(&tmp_path, &bytes)?;
        std::fs::rename(&tmp_path, &self.path)?;
        debug!("Saved addon {} ({} bytes)", self.path.display(), bytes.len());
        Ok(())
    }

    fn update(&self, apply: impl FnOnce(&mut AddonRecord)) -> Result<()> {
        let mut record = self.record()?;
        apply(&mut record);
        self.save(&record)
    }

    /// Store the lexicon with its grapheme and phoneme inventories
    pub fn add_lexicon(&self, lexicon: &Lexicon, graphemes: &[String], phonemes: &[String]) -> Result<()> {
        let blob = lexicon.to_blob()?;
        self.update(|record| {
            record.set(AddonField::Lexicon, AddonValue::Bytes(blob));
            record.set(AddonField::Graphemes, AddonValue::List(graphemes.to_vec()));
            record.set(AddonField::Phonemes, AddonValue::List(phonemes.to_vec()));
        })
    }

    /// Read a trained model file and store it under the matching field
    pub fn add_model(&self, kind: ModelKind, model_path: &Path) -> Result<()> {
        let model = std::fs::read(model_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                Error::NotFound(format!("model file {}", model_path.display()))
            }
            _ => Error::Io(e),
        })?;
        info!(
            "Adding {} ({} bytes) to addon",
            kind.field().as_str(),
            model.len()
        );
        self.update(|record| record.set(kind.field(), AddonValue::Bytes(model)))
    }

    /// Copy the addon file to `dest` without touching the stored record
    pub fn export_to(&self, dest: &Path) -> Result<()> {
        std::fs::copy(&self.path, dest)?;
        info!("Exported addon to {}", dest.display());
        Ok(())
    }
}
