//! Pronunciation resources
//!
//! A resources directory holds a lexicon, a spelling lexicon and optional
//! inventories and word lists. How they are read is up to a
//! [`ResourceProvider`]. By default [`DefaultProvider`] is used; a
//! `custom_provider.toml` in the directory can select another registered
//! provider and pass it options:
//!
//! ```toml
//! provider = "json"
//! lexicon_file = "dictionary"
//! ```

pub mod default_provider;
pub mod json_lexicon;

pub use default_provider::{DefaultProvider, LexiconFormat};

use ltp_common::{Error, Lexicon, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// File in the resources directory that selects a provider
pub const CUSTOM_PROVIDER_FILE: &str = "custom_provider.toml";

/// Default lexicon file of the `json` provider
pub const JSON_LEXICON_FILE_NAME: &str = "dictionary";

// ============================================================================
// Provider Contract
// ============================================================================

/// Source of pronunciation resources for one locale
pub trait ResourceProvider {
    /// Complete phoneme inventory
    fn phonemes(&self) -> Result<Vec<String>>;

    /// Complete grapheme (letter) inventory
    fn graphemes(&self) -> Result<Vec<String>>;

    /// Lexicon, optionally restricted to `words`
    fn lexicon(&self, words: Option<&[String]>) -> Result<Lexicon>;

    /// Lexicon of words spelled letter by letter
    fn spelling_lexicon(&self) -> Result<Lexicon>;

    /// Words to train the pronunciation model on
    fn train_words(&self) -> Result<Vec<String>>;

    /// Held-out words for evaluation; `None` disables evaluation
    fn test_words(&self) -> Result<Option<Vec<String>>>;
}

// ============================================================================
// Provider Registry
// ============================================================================

/// Builds a provider for a resources directory from `custom_provider.toml`
/// options (the `provider` key already removed)
pub type ProviderFactory = fn(&Path, &toml::Table) -> Result<Box<dyn ResourceProvider>>;

/// Named provider factories
pub struct ProviderRegistry {
    factories: BTreeMap<String, ProviderFactory>,
}

impl ProviderRegistry {
    /// Registry without any providers
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry with the `default` and `json` providers
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("default", default_factory);
        registry.register("json", json_factory);
        registry
    }

    pub fn register(&mut self, name: &str, factory: ProviderFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(|k| k.as_str()).collect()
    }

    /// Build the provider named in `custom_provider.toml`
    ///
    /// Returns `Ok(None)` when the directory has no such file.
    pub fn load_custom(&self, resources_dir: &Path) -> Result<Option<Box<dyn ResourceProvider>>> {
        let path = resources_dir.join(CUSTOM_PROVIDER_FILE);
        if !path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let mut options: toml::Table = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;

        let name = match options.remove("provider") {
            Some(toml::Value::String(name)) => name,
            Some(_) => {
                return Err(Error::Config(format!(
                    "{}: `provider` must be a string",
                    path.display()
                )))
            }
            None => {
                return Err(Error::Config(format!(
                    "{}: missing `provider` key",
                    path.display()
                )))
            }
        };

        let factory = self.factories.get(&name).ok_or_else(|| {
            Error::Config(format!(
                "Unknown resource provider '{}' (known: {})",
                name,
                self.names().join(", ")
            ))
        })?;

        info!("Using resource provider '{}'", name);
        factory(resources_dir, &options).map(Some)
    }

    /// Pick the provider for `resources_dir`
    ///
    /// Any problem with the custom provider is logged and the default
    /// provider is used instead.
    pub fn resolve(&self, resources_dir: &Path) -> Box<dyn ResourceProvider> {
        match self.load_custom(resources_dir) {
            Ok(Some(provider)) => provider,
            Ok(None) => Box::new(DefaultProvider::new(resources_dir)),
            Err(e) => {
                warn!("Failed to load custom resource provider, using default: {}", e);
                Box::new(DefaultProvider::new(resources_dir))
            }
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Provider for `resources_dir` using the built-in registry
pub fn get_provider(resources_dir: &Path) -> Box<dyn ResourceProvider> {
    ProviderRegistry::with_builtins().resolve(resources_dir)
}

fn lexicon_file_option(options: &toml::Table) -> Result<Option<String>> {
    match options.get("lexicon_file") {
        None => Ok(None),
        Some(toml::Value::String(name)) => Ok(Some(name.clone())),
        Some(_) => Err(Error::Config("`lexicon_file` must be a string".to_string())),
    }
}

fn default_factory(resources_dir: &Path, options: &toml::Table) -> Result<Box<dyn ResourceProvider>> {
    let mut provider = DefaultProvider::new(resources_dir);
    if let Some(name) = lexicon_file_option(options)? {
        provider = provider.with_lexicon_file(name);
    }
    Ok(Box::new(provider))
}

fn json_factory(resources_dir: &Path, options: &toml::Table) -> Result<Box<dyn ResourceProvider>> {
    let name = lexicon_file_option(options)?.unwrap_or_else(|| JSON_LEXICON_FILE_NAME.to_string());
    Ok(Box::new(
        DefaultProvider::new(resources_dir)
            .with_lexicon_file(name)
            .with_format(LexiconFormat::Json),
    ))
}
