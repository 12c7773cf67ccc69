use std::path::PathBuf;
use thiserror::Error;

/// Errors that halt an analysis request before a graph exists.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("cannot analyze {}: {reason}", root.display())]
    Discovery { root: PathBuf, reason: String },

    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("file is not part of the dependency graph: {0}")]
    UnknownFile(String),
}

/// Per-file read failure. Converted into a diagnostic, never fatal.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("binary content")]
    Binary,

    #[error("not valid UTF-8")]
    NotUtf8,

    #[error("file is {size} bytes, limit is {limit}")]
    TooLarge { size: u64, limit: u64 },
}
