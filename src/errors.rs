// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid glob pattern `{pattern}`: {source}")]
    PatternError {
        pattern: String,
        source: globset::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Watch backend error: {0}")]
    NotifyError(#[from] notify::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WatchError>;
