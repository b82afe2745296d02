//! Configuration for matching behaviour and logging.
//!
//! Specifically, we try to find a locus.toml, and if present we load settings from there.
//! This provides the anchor search window, the ambiguity policy and the default log level.

use crate::error::ConfigError;
use facet::Facet;
use std::fs;
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = "locus.toml";

/// Lines searched after a context anchor when no config overrides it.
pub const DEFAULT_ANCHOR_WINDOW: usize = 10;

#[derive(Facet, Clone, Debug, PartialEq, Eq)]
/// Preferences loaded from locus.toml or falling back to defaults.
pub struct Config {
    #[facet(default = 10)]
    /// Number of lines after a `contextAnchor` line searched for the target content.
    pub anchor_window: usize,
    #[facet(default = false)]
    /// Fail with `AmbiguousTarget` instead of taking the first of several matches.
    pub strict_matching: bool,
    #[facet(default = "info".to_string())]
    /// Default tracing level when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anchor_window: DEFAULT_ANCHOR_WINDOW,
            strict_matching: false,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    #[must_use]
    /// Load configuration from locus.toml if present, otherwise use defaults.
    ///
    /// A file that exists but fails to parse is reported through tracing and ignored.
    pub fn load() -> Self {
        match Self::load_from(CONFIG_FILE) {
            Ok(config) => config,
            Err(ConfigError::Read { .. }) => Self::default(),
            Err(err) => {
                tracing::warn!("ignoring {CONFIG_FILE}: {err}");
                Self::default()
            }
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid config TOML.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from TOML text; missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        facet_toml::from_str::<Self>(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
