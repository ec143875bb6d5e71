// src/config/mod.rs

//! Ignore-rule settings consumed from the embedding server's configuration.
//!
//! Registering watch tasks stays the server's job; this module models the
//! `[watch]` fragment and reads it from a TOML string or settings file:
//!
//! ```toml
//! [watch]
//! ignored_dirs = [".git", ".hg"]
//! ignored_extensions = [".pyc", ".swp"]
//! ignore_patterns = ["build/**/compiled/*"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::errors::Result;

/// Declarative ignore rules. Missing fields keep their defaults, so a config
/// file can override just one list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchConfig {
    /// Directory names pruned from traversal entirely.
    #[serde(default = "default_ignored_dirs")]
    pub ignored_dirs: Vec<String>,

    /// File extensions (with leading dot) whose changes are never reported.
    #[serde(default = "default_ignored_extensions")]
    pub ignored_extensions: Vec<String>,

    /// Glob patterns matched against whole paths; matches are never
    /// reported.
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            ignored_dirs: default_ignored_dirs(),
            ignored_extensions: default_ignored_extensions(),
            ignore_patterns: Vec::new(),
        }
    }
}

impl WatchConfig {
    /// Parse a `WatchConfig` from a TOML fragment.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: WatchConfig = toml::from_str(s)?;
        Ok(config)
    }

    /// Read a `WatchConfig` from a TOML settings file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        Self::from_toml_str(&contents)
    }
}

fn default_ignored_dirs() -> Vec<String> {
    [".git", ".hg", ".svn", ".cvs"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_ignored_extensions() -> Vec<String> {
    [".pyc", ".pyo", ".o", ".swp"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
