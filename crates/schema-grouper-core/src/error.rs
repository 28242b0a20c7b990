use std::path::PathBuf;
use thiserror::Error;

/// Boxed error returned by a group processor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Schema error in {path}: {reason}")]
    Schema { path: String, reason: String },

    #[error("Threshold must be between 0.0 and 1.0, got {0}")]
    InvalidThreshold(f64),

    #[error("Invalid glob pattern: {0}")]
    InvalidPattern(String),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    #[error("No processor registered for group: {0}")]
    NoProcessorRegistered(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Processor for group '{group}' failed: {source}")]
    Processor { group: String, source: BoxError },
}

impl Error {
    pub(crate) fn schema(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Schema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
