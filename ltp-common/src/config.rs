//! Configuration loading and resolution
//!
//! Settings come from, highest priority first:
//! 1. Command-line arguments (applied by the binaries)
//! 2. TOML config file (`--config`, `LTP_CONFIG`, or the user config dir)
//! 3. Built-in defaults
//!
//! A missing TOML file never stops the pipeline: it is logged and
//! defaults are used. A file that exists but does not parse is an error.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "LTP_CONFIG";

/// Default n-gram order for the pronunciation model
pub const DEFAULT_PRONUNCIATION_ORDER: usize = 8;

/// Default n-gram order for the spelling model
pub const DEFAULT_SPELLING_ORDER: usize = 3;

/// Top-level TOML configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External model trainer
    #[serde(default = "default_trainer")]
    pub trainer: ToolConfig,

    /// External pronunciation generator used for evaluation
    #[serde(default = "default_generator")]
    pub generator: ToolConfig,

    #[serde(default)]
    pub ngram: NgramConfig,

    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            logging: LoggingConfig::default(),
            trainer: default_trainer(),
            generator: default_generator(),
            ngram: NgramConfig::default(),
            evaluation: EvaluationConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// External command plus extra arguments appended to every call
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ToolConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// N-gram orders for model training
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
pub struct NgramConfig {
    #[serde(default = "default_pronunciation_order")]
    pub pronunciation_order: usize,
    #[serde(default = "default_spelling_order")]
    pub spelling_order: usize,
}

impl Default for NgramConfig {
    fn default() -> Self {
        Self {
            pronunciation_order: DEFAULT_PRONUNCIATION_ORDER,
            spelling_order: DEFAULT_SPELLING_ORDER,
        }
    }
}

/// Evaluation settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EvaluationConfig {
    /// Convert ARPAbet pronunciations to this phoneme set before comparing
    #[serde(default)]
    pub normalize_to: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_trainer() -> ToolConfig {
    ToolConfig {
        command: "phonetisaurus-train".to_string(),
        args: Vec::new(),
    }
}

fn default_generator() -> ToolConfig {
    ToolConfig {
        command: "phonetisaurus-apply".to_string(),
        args: Vec::new(),
    }
}

fn default_pronunciation_order() -> usize {
    DEFAULT_PRONUNCIATION_ORDER
}

fn default_spelling_order() -> usize {
    DEFAULT_SPELLING_ORDER
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content).map_err(|e| match e {
            Error::Config(msg) => Error::Config(format!("{}: {}", path.display(), msg)),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Locate the config file
///
/// Priority: explicit argument, then `LTP_CONFIG`, then
/// `<config_dir>/learn-to-pronounce/config.toml` if it exists.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        if !path.is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    dirs::config_dir()
        .map(|d| d.join("learn-to-pronounce").join("config.toml"))
        .filter(|p| p.exists())
}

/// Load configuration, falling back to defaults when no file is found
pub fn load_config(cli_arg: Option<&Path>) -> Result<TomlConfig> {
    let Some(path) = resolve_config_path(cli_arg) else {
        info!("No config file found, using built-in defaults");
        return Ok(TomlConfig::default());
    };

    if !path.exists() {
        warn!(
            "Config file {} does not exist, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    info!("Loading config from {}", path.display());
    TomlConfig::load(&path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TomlConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.trainer.command, "phonetisaurus-train");
        assert_eq!(config.generator.command, "phonetisaurus-apply");
        assert_eq!(config.ngram.pronunciation_order, 8);
        assert_eq!(config.ngram.spelling_order, 3);
        assert!(config.evaluation.normalize_to.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = TomlConfig::parse(
            r#"
            [ngram]
            pronunciation_order = 6

            [trainer]
            command = "/opt/phonetisaurus/bin/phonetisaurus-train"
            args = ["--verbose"]
            "#,
        )
        .unwrap();

        assert_eq!(config.ngram.pronunciation_order, 6);
        assert_eq!(config.ngram.spelling_order, 3);
        assert_eq!(config.trainer.args, vec!["--verbose".to_string()]);
        assert_eq!(config.generator.command, "phonetisaurus-apply");
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::parse("[ngram\npronunciation_order = ").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
