//! Configuration validation logic
//!
//! Range and format checks for every settings section. The first failing
//! check wins.

use crate::config::error::ConfigError;
use crate::config::settings::{
    BuildConfig, CertificateConfig, DevServerConfig, FileSettings, LoggerSettings, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

/// A dev certificate may not outlive this many days
const MAX_VALIDITY_DAYS: u32 = 825;

impl DevServerConfig {
    /// Validate dev server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Host and public host must not be empty
    /// - Allowed host entries must not be blank
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "dev_server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "dev_server.host",
                "Host address is required.",
            ));
        }

        if self.public.trim().is_empty() {
            return Err(ConfigError::validation(
                "dev_server.public",
                "Public host is required, e.g. localhost:8080.",
            ));
        }

        if let Some(blank) = self.allowed_hosts.iter().position(|h| h.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                field: format!("dev_server.allowed_hosts[{}]", blank),
                message: "Allowed host entries cannot be empty.".to_string(),
            });
        }

        Ok(())
    }
}

impl CertificateConfig {
    /// Validate certificate parameters
    ///
    /// # Validation Rules
    /// - At least two distinct host names
    /// - Validity between 1 and 825 days
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names: Vec<&str> = self
            .hostnames
            .iter()
            .map(|h| h.trim())
            .filter(|h| !h.is_empty())
            .collect();
        names.sort_unstable();
        names.dedup();

        if names.len() < 2 {
            return Err(ConfigError::validation(
                "certificate.hostnames",
                "At least two distinct host names are required for the dev certificate.",
            ));
        }

        if self.validity_days == 0 || self.validity_days > MAX_VALIDITY_DAYS {
            return Err(ConfigError::ValidationError {
                field: "certificate.validity_days".to_string(),
                message: format!(
                    "Validity must be between 1 and {} days, got {}.",
                    MAX_VALIDITY_DAYS, self.validity_days
                ),
            });
        }

        Ok(())
    }
}

impl BuildConfig {
    /// Validate build configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entry.trim().is_empty() {
            return Err(ConfigError::validation(
                "build.entry",
                "Entry module path cannot be empty.",
            ));
        }

        if self.minify_cache_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "build.minify_cache_dir",
                "Minifier cache directory cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !VALID_LOG_LEVELS.contains(&self.level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl Settings {
    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dev_server.validate()?;
        self.certificate.validate()?;
        self.build.validate()?;
        self.logger.validate()?;
        Ok(())
    }
}
