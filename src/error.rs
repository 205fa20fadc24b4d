//! # Errors
//!
//! Error type shared by every stage of the node generation pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while generating a node for a component
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Reading or writing an artifact failed
    #[error("I/O error on '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration artifact could not be encoded or decoded
    #[error("invalid node configuration '{}': {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The class name cannot be used as a Python identifier
    #[error("invalid class name '{name}': {reason}")]
    InvalidClassName { name: String, reason: &'static str },

    /// An artifact file name cannot be referenced from generated code
    #[error("invalid artifact name '{name}': {reason}")]
    InvalidArtifactName { name: String, reason: &'static str },

    /// Two inputs synthesized the same schema key
    #[error("duplicate {section} input key '{key}'")]
    DuplicateInputKey { section: &'static str, key: String },

    /// The generator settings file could not be parsed
    #[error("invalid settings file '{}': {message}", .path.display())]
    Settings { path: PathBuf, message: String },
}

impl GenerationError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GenerationError> = std::result::Result<T, E>;
