//! Errors raised while loading tool settings
//!
//! Settings come from the layered TOML files, `EDITOR_*` variables and the
//! CLI. The deployment mode comes from `--mode` or `NODE_ENV`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file given with `--config` or `EDITOR_CONFIG_FILE` does not exist
    #[error("Configuration file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Configuration path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),

    /// Merged TOML layers do not match the settings structure
    #[error("Failed to deserialize settings: {0}")]
    Deserialize(String),

    /// A merged value is out of range or malformed
    #[error("Validation error: {field} - {message}")]
    ValidationError { field: String, message: String },

    /// `--mode` or `NODE_ENV` names an unknown deployment mode
    #[error("Invalid mode '{0}', expected development or production")]
    InvalidMode(String),

    /// The `config` crate failed to read or merge a TOML layer
    #[error("Failed to read configuration layers: {0}")]
    Source(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation<S: Into<String>>(field: S, message: S) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        ConfigError::FileNotFound(path.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_source() {
        let err = ConfigError::file_not_found("/etc/editor/editor.toml");
        assert_eq!(err.to_string(), "Configuration file not found: /etc/editor/editor.toml");

        let err = ConfigError::InvalidMode("staging".to_string());
        assert!(err.to_string().contains("'staging'"));

        let err = ConfigError::validation("dev_server.port", "must not be 0");
        assert_eq!(err.to_string(), "Validation error: dev_server.port - must not be 0");
    }
}
