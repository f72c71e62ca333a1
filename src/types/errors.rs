//! Error types for Retro.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Default result type for Retro.
pub type RetroResult<T> = Result<T, RetroError>;

/// Errors that can occur in Retro.
#[derive(Error, Debug)]
pub enum RetroError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The knowledge file is missing, unreadable or structurally invalid.
    #[error("Knowledge storage error at {}: {reason}", path.display())]
    Storage { path: PathBuf, reason: String },

    #[error("Question must not be empty")]
    EmptyQuestion,

    #[error("QR generation failed: {0}")]
    Qr(String),

    #[cfg(feature = "cli")]
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),
}

impl RetroError {
    /// Creates a configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a storage error for the given knowledge file.
    pub fn storage<P: AsRef<Path>, S: ToString>(path: P, reason: S) -> Self {
        Self::Storage {
            path: path.as_ref().to_path_buf(),
            reason: reason.to_string(),
        }
    }

    /// True for errors raised while reading or writing the knowledge file.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }
}
