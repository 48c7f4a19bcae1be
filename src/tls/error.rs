use std::path::PathBuf;

use thiserror::Error;

/// Failures while producing or loading the dev certificate; all are fatal
/// for the TLS dev server.
#[derive(Debug, Error)]
pub enum CertError {
    #[error("Failed to generate self-signed certificate: {0}")]
    Generation(#[from] rcgen::Error),

    #[error("Invalid certificate validity window: {0}")]
    Validity(String),

    #[error("Certificate file error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed PEM in {path}: {message}")]
    Pem { path: PathBuf, message: String },

    #[error("TLS configuration rejected the certificate: {0}")]
    Tls(#[from] rustls::Error),
}

impl CertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
