use thiserror::Error;

use crate::config::ConfigError;
use crate::pipeline::BuildError;
use crate::runtime::RuntimeConfigError;
use crate::tls::CertError;

/// Application-wide error type returned by command handlers
///
/// Wraps the per-module errors so the binary can report them uniformly and
/// exit non-zero.
#[derive(Error, Debug)]
pub enum AppError {
    /// Tool settings could not be loaded or failed validation
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// The dev certificate could not be generated, persisted or loaded
    #[error("Certificate generation failed: {0}")]
    Certificate(#[from] CertError),

    #[error("Build failed: {0}")]
    Build(#[from] BuildError),

    /// The runtime config artifact could not be read
    #[error("Runtime configuration error: {0}")]
    RuntimeConfig(#[from] RuntimeConfigError),

    /// Invalid command line input
    #[error("Invalid argument {field}: {reason}")]
    InvalidArgument { field: String, reason: String },

    /// Internal error for unexpected failures
    #[error("Internal error: {source}")]
    Internal {
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        AppError::Internal { source: error }
    }
}

/// Type alias for Result with AppError to simplify function signatures
pub type AppResult<T> = Result<T, AppError>;
