use std::path::PathBuf;

use thiserror::Error;

/// Fatal setup errors: anything that stops the batch before the first file
/// is processed. Per-file validator or parse failures are *not* errors, they
/// are recorded as failed status records by the orchestrator.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlParsing(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("unsupported configuration file format: {path} (expected .toml or .json)")]
    UnsupportedFormat { path: PathBuf },

    #[error("{path} does not exist")]
    MissingFile { path: PathBuf },

    #[error("batch directory does not exist: {path}")]
    MissingBatchDir { path: PathBuf },

    #[error("could not create output directory {path}: {source}")]
    OutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    LogWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("schema role '{role}' requires a profile file (--profile)")]
    ProfileRequired { role: String },
}

/// Result type alias for setup-phase operations
pub type Result<T> = std::result::Result<T, SetupError>;
