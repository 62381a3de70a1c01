//! Configuration loading and typed config structures for the Mahes engine.
//!
//! The configuration lives in `mahes-config.yaml`. Every field has a
//! default, so an absent file or an empty document yields a working engine
//! with the canonical ending thresholds and an uncapped leaderboard.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ending::EndingPolicy;

/// Environment variable overriding [`StorageConfig::save_dir`].
pub const SAVE_DIR_ENV: &str = "MAHES_SAVE_DIR";

/// Environment variable overriding [`CatalogConfig::path`].
pub const CATALOG_PATH_ENV: &str = "MAHES_CATALOG";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but contradict each other.
    #[error("invalid config: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GameConfig {
    /// Karma thresholds and fragment gating for endings.
    #[serde(default)]
    pub ending: EndingPolicy,

    /// Leaderboard retention.
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,

    /// File-backed storage location.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Content catalog source.
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GameConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `MAHES_SAVE_DIR` and `MAHES_CATALOG` override the storage directory
    /// and catalog path after parsing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values are inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from `path` if it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Same as [`GameConfig::from_file`] for a file that exists.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::debug!(path = %path.display(), "No config file, using defaults");
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a YAML string. Environment overrides are
    /// not applied.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if the values are inconsistent.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ending.neutral_threshold > self.ending.good_threshold {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "ending.neutral_threshold ({}) exceeds ending.good_threshold ({})",
                    self.ending.neutral_threshold, self.ending.good_threshold
                ),
            });
        }
        if self.ending.good_threshold > mahes_types::KARMA_MAX {
            return Err(ConfigError::Invalid {
                reason: format!(
                    "ending.good_threshold ({}) is above the karma ceiling",
                    self.ending.good_threshold
                ),
            });
        }
        if self.leaderboard.max_entries == Some(0) {
            return Err(ConfigError::Invalid {
                reason: String::from("leaderboard.max_entries must be at least 1"),
            });
        }
        Ok(())
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(SAVE_DIR_ENV) {
            self.storage.save_dir = PathBuf::from(val);
        }
        if let Some(val) = lookup(CATALOG_PATH_ENV) {
            self.catalog.path = Some(PathBuf::from(val));
        }
    }
}

/// Leaderboard retention settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct LeaderboardConfig {
    /// Keep at most this many ranked entries. Absent means uncapped.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

/// File-backed storage settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StorageConfig {
    /// Directory holding one JSON file per storage slot.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
        }
    }
}

/// Content catalog settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogConfig {
    /// YAML catalog to load instead of the built-in reference content.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
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

fn default_save_dir() -> PathBuf {
    PathBuf::from(".mahes")
}

fn default_log_level() -> String {
    String::from("info")
}
