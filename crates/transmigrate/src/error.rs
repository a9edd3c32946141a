//! Error types for ingestion, transpilation and configuration.

use std::path::PathBuf;
use thiserror::Error;
use transmigrate_ir::{Target, UnknownTarget};

/// A front-end could not turn its input into an IR.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("invalid declaration document at {path}: {message}")]
    Syntax { path: String, message: String },

    #[error("{kind} #{index} has an empty name")]
    EmptyName { kind: &'static str, index: usize },

    #[error("class `{0}` is declared more than once")]
    DuplicateClass(String),
}

/// Failure of one unit.
#[derive(Debug, Error)]
pub enum TranspileError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to ingest {unit}")]
    Ingest {
        unit: String,
        #[source]
        source: IngestError,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no generator registered for target {0}")]
    NoGenerator(Target),
}

/// A batch stopped at its first failing unit.
#[derive(Debug, Error)]
#[error("{unit} failed after {completed} unit(s) completed")]
pub struct BatchError {
    pub unit: String,
    /// Units that finished before the failure.
    pub completed: usize,
    #[source]
    pub source: TranspileError,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("opt-level must be between 0 and 3, got {0}")]
    OptLevel(u8),

    #[error(transparent)]
    Target(#[from] UnknownTarget),
}
