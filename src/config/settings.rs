//! Configuration settings structures for the editor build tool
//!
//! This module defines all configuration structures that can be loaded from
//! TOML files and `EDITOR_*` environment variables. These settings drive the
//! tool itself; the editor's own runtime values come from dotenv files
//! (see [`crate::env`]).

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::error::ConfigError;
use crate::logger::{ConsoleConfig, FileConfig, LogFormat, LoggerConfig};

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "scene-editor-build".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_cert_dir() -> PathBuf {
    PathBuf::from("certs")
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_public_host() -> String {
    "localhost:8080".to_string()
}

fn default_allowed_hosts() -> Vec<String> {
    vec!["localhost".to_string()]
}

fn default_cert_hostnames() -> Vec<String> {
    vec!["localhost".to_string(), "hubs.local".to_string()]
}

fn default_validity_days() -> u32 {
    30
}

fn default_entry() -> String {
    "src/index.js".to_string()
}

fn default_minify_cache_dir() -> PathBuf {
    PathBuf::from(".tersercache")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_log_path() -> String {
    "logs/editor-build.log".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
        }
    }
}

// ============================================================================
// Paths Configuration
// ============================================================================

/// Project layout used by every command
///
/// Relative directories are resolved against `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Project root holding `.env.*` files and the source tree
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Directory holding the cached dev certificate pair
    #[serde(default = "default_cert_dir")]
    pub cert_dir: PathBuf,
}

impl PathsConfig {
    fn resolve(&self, path: &PathBuf) -> PathBuf {
        if path.is_absolute() {
            path.clone()
        } else {
            self.root.join(path)
        }
    }

    pub fn source(&self) -> PathBuf {
        self.resolve(&self.source_dir)
    }

    pub fn output(&self) -> PathBuf {
        self.resolve(&self.output_dir)
    }

    pub fn certs(&self) -> PathBuf {
        self.resolve(&self.cert_dir)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            cert_dir: default_cert_dir(),
        }
    }
}

// ============================================================================
// Dev Server Configuration
// ============================================================================

/// TLS dev server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DevServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Host and port the editor is reached at from the browser
    #[serde(default = "default_public_host")]
    pub public: String,

    /// Host names accepted in the `Host` header besides `public`
    #[serde(default = "default_allowed_hosts")]
    pub allowed_hosts: Vec<String>,

    /// Serve `index.html` for unknown paths
    #[serde(default = "default_true")]
    pub history_fallback: bool,
}

impl DevServerConfig {
    /// Get the full bind address as "host:port", bracketing IPv6 hosts
    pub fn address(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for DevServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            public: default_public_host(),
            allowed_hosts: default_allowed_hosts(),
            history_fallback: true,
        }
    }
}

// ============================================================================
// Certificate Configuration
// ============================================================================

/// Self-signed dev certificate parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateConfig {
    /// Subject alternative names; at least two are required
    #[serde(default = "default_cert_hostnames")]
    pub hostnames: Vec<String>,

    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
}

impl Default for CertificateConfig {
    fn default() -> Self {
        Self {
            hostnames: default_cert_hostnames(),
            validity_days: default_validity_days(),
        }
    }
}

// ============================================================================
// Build Configuration
// ============================================================================

/// Bundling knobs handed to the external JS toolchain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Entry module of the bundle
    #[serde(default = "default_entry")]
    pub entry: String,

    /// Minifier worker parallelism, 0 lets the minifier decide
    #[serde(default)]
    pub parallel: usize,

    #[serde(default = "default_minify_cache_dir")]
    pub minify_cache_dir: PathBuf,

    /// Log a size report after the asset pass
    #[serde(default)]
    pub analyze: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            entry: default_entry(),
            parallel: 0,
            minify_cache_dir: default_minify_cache_dir(),
            analyze: false,
        }
    }
}

// ============================================================================
// Logger Settings (compatible with LoggerConfig)
// ============================================================================

/// Console output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_true")]
    pub colored: bool,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            colored: default_true(),
        }
    }
}

/// File output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_log_path")]
    pub path: String,

    #[serde(default = "default_true")]
    pub append: bool,

    /// Log format: "full", "compact", or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path(),
            append: default_true(),
            format: default_log_format(),
        }
    }
}

/// Logger configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerSettings {
    /// Log level: "trace", "debug", "info", "warn", "error"
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub console: ConsoleSettings,

    #[serde(default)]
    pub file: FileSettings,
}

impl Default for LoggerSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            console: ConsoleSettings::default(),
            file: FileSettings::default(),
        }
    }
}

impl LoggerSettings {
    /// Convert the file representation into the runtime `LoggerConfig`
    pub fn into_logger_config(self) -> Result<LoggerConfig, ConfigError> {
        let format = self
            .file
            .format
            .parse::<LogFormat>()
            .map_err(|e| ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: e.to_string(),
            })?;

        let console = ConsoleConfig::new(self.console.enabled, self.console.colored);
        let file = FileConfig {
            enabled: self.file.enabled,
            path: PathBuf::from(self.file.path),
            append: self.file.append,
            format,
        };

        LoggerConfig::new(console, file, self.level).map_err(|e| ConfigError::ValidationError {
            field: "logger".to_string(),
            message: e.to_string(),
        })
    }
}

// ============================================================================
// Root Settings
// ============================================================================

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub dev_server: DevServerConfig,

    #[serde(default)]
    pub certificate: CertificateConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub logger: LoggerSettings,
}
