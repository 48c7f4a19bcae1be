use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a build
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid asset rule pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Source directory not found: {0}")]
    SourceMissing(PathBuf),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize build artifact: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl BuildError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
