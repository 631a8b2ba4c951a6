#![forbid(unsafe_code)]

//! History configuration.
//!
//! [`HistoryConfig`] can be built in code or loaded from TOML or JSON. Every
//! field has a default, so a file only needs the keys it overrides.
//!
//! ```toml
//! # sitewise-history.toml
//! max_depth = 200
//! skip_unchanged_batches = true
//! ```
//!
//! ```rust,ignore
//! let config = HistoryConfig::from_toml_file("sitewise-history.toml")?;
//! let history = HistoryManager::<Annotation>::new(config);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables for a [`HistoryManager`](crate::HistoryManager).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Maximum number of undo snapshots. Oldest are evicted first.
    pub max_depth: usize,
    /// Skip the history push when a batch ends with the document unchanged.
    pub skip_unchanged_batches: bool,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_depth: 100,
            skip_unchanged_batches: false,
        }
    }
}

impl HistoryConfig {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            ..Self::default()
        }
    }

    /// No depth limit (for testing).
    #[must_use]
    pub fn unlimited() -> Self {
        Self::new(usize::MAX)
    }

    #[must_use]
    pub fn with_skip_unchanged_batches(mut self, skip: bool) -> Self {
        self.skip_unchanged_batches = skip;
        self
    }

    /// Load from a TOML string and validate.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.ensure_valid()
    }

    /// Load from a TOML file on disk and validate.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string and validate.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.ensure_valid()
    }

    /// Load from a JSON file on disk and validate.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    /// Check parameters. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.max_depth == 0 {
            errors.push("max_depth must be at least 1".to_string());
        }
        errors
    }

    fn ensure_valid(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}
