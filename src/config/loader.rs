//! Configuration loader for the editor build tool
//!
//! This module provides the `ConfigLoader` struct that handles loading
//! tool settings from multiple sources with proper precedence.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};

use crate::config::environment::Mode;
use crate::config::error::ConfigError;
use crate::config::settings::Settings;

/// Environment variable for the configuration directory
const CONFIG_DIR_ENV: &str = "EDITOR_CONFIG_DIR";

/// Environment variable for a single configuration file
const CONFIG_FILE_ENV: &str = "EDITOR_CONFIG_FILE";

/// Default configuration directory
const DEFAULT_CONFIG_DIR: &str = "config";

/// Environment variable prefix for configuration overrides
const ENV_PREFIX: &str = "EDITOR";

/// Separator for nested configuration keys in environment variables
const ENV_SEPARATOR: &str = "__";

/// Keys whose environment overrides are comma separated lists
const LIST_KEYS: &[&str] = &["dev_server.allowed_hosts", "certificate.hostnames"];

/// Configuration loader that handles layered configuration loading
///
/// Sources in order of priority (lowest first):
/// 1. `default.toml`
/// 2. `{mode}.toml`
/// 3. `local.toml`
/// 4. `EDITOR_*` environment variables
///
/// Every file is optional; missing values fall back to the serde defaults in
/// [`Settings`]. When a single configuration file is set, the layered files
/// are skipped but environment overrides still apply.
#[derive(Debug)]
pub struct ConfigLoader {
    config_dir: PathBuf,
    config_file: Option<PathBuf>,
    mode: Mode,
    /// Replaces the process environment as the override source
    env_source: Option<HashMap<String, String>>,
}

impl ConfigLoader {
    /// Create a loader for the given mode using the default directory
    pub fn new(mode: Mode) -> Self {
        Self {
            config_dir: PathBuf::from(DEFAULT_CONFIG_DIR),
            config_file: None,
            mode,
            env_source: None,
        }
    }

    /// Create a loader honoring `EDITOR_CONFIG_DIR` and `EDITOR_CONFIG_FILE`
    pub fn from_env(mode: Mode) -> Self {
        let mut loader = Self::new(mode);
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            loader.config_dir = PathBuf::from(dir);
        }
        loader.config_file = std::env::var(CONFIG_FILE_ENV).ok().map(PathBuf::from);
        loader
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = dir.into();
        self
    }

    pub fn with_config_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.config_file = Some(file.into());
        self
    }

    /// Use an explicit variable map instead of the process environment
    pub fn with_env_source(mut self, vars: HashMap<String, String>) -> Self {
        self.env_source = Some(vars);
        self
    }

    /// Load and validate settings from all sources
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - an explicitly configured single file does not exist
    /// - parsing or deserialization fails
    /// - validation fails
    pub fn load(&self) -> Result<Settings, ConfigError> {
        let config = self.build_config()?;
        let settings: Settings = config
            .try_deserialize()
            .map_err(|e| ConfigError::Deserialize(e.to_string()))?;

        settings.validate()?;

        Ok(settings)
    }

    fn build_config(&self) -> Result<Config, ConfigError> {
        let builder = Config::builder();

        let builder = match self.config_file {
            Some(ref config_file) => Self::add_file_source(builder, config_file, true)?,
            None => self.build_layered_config(builder)?,
        };

        let builder = self.add_env_source(builder);

        builder.build().map_err(ConfigError::from)
    }

    fn build_layered_config(
        &self,
        builder: ConfigBuilder<DefaultState>,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let default_path = self.config_dir.join("default.toml");
        let builder = Self::add_file_source(builder, &default_path, false)?;

        let mode_path = self.config_dir.join(format!("{}.toml", self.mode.as_str()));
        let builder = Self::add_file_source(builder, &mode_path, false)?;

        let local_path = self.config_dir.join("local.toml");
        Self::add_file_source(builder, &local_path, false)
    }

    fn add_file_source(
        builder: ConfigBuilder<DefaultState>,
        path: &Path,
        required: bool,
    ) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        if required && !path.exists() {
            return Err(ConfigError::file_not_found(path));
        }

        let name = path
            .to_str()
            .ok_or_else(|| ConfigError::NonUtf8Path(path.to_path_buf()))?;

        Ok(builder.add_source(File::new(name, FileFormat::Toml).required(required)))
    }

    /// `EDITOR_DEV_SERVER__PORT` -> `dev_server.port`
    fn add_env_source(&self, builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
        let mut env = Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator(ENV_SEPARATOR)
            .ignore_empty(true)
            .try_parsing(true)
            .list_separator(",");
        for key in LIST_KEYS {
            env = env.with_list_parse_key(key);
        }
        if let Some(ref vars) = self.env_source {
            env = env.source(Some(vars.clone().into_iter().collect()));
        }
        builder.add_source(env)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn setup_config_dir(files: &[(&str, &str)]) -> TempDir {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        for (name, content) in files {
            fs::write(temp_dir.path().join(name), content).expect("Failed to write config file");
        }
        temp_dir
    }

    fn loader_for(dir: &TempDir, mode: Mode) -> ConfigLoader {
        ConfigLoader::new(mode)
            .with_config_dir(dir.path())
            .with_env_source(HashMap::new())
    }

    #[test]
    fn test_load_without_any_files_uses_defaults() {
        let temp_dir = setup_config_dir(&[]);
        let settings = loader_for(&temp_dir, Mode::Development)
            .load()
            .expect("defaults should load");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_load_with_mode_override() {
        let temp_dir = setup_config_dir(&[
            (
                "default.toml",
                r#"
[dev_server]
port = 8080
public = "localhost:8080"

[paths]
output_dir = "dist"
"#,
            ),
            (
                "production.toml",
                r#"
[paths]
output_dir = "build/prod"
"#,
            ),
        ]);

        let settings = loader_for(&temp_dir, Mode::Production)
            .load()
            .expect("Should load settings");
        assert_eq!(settings.paths.output_dir, PathBuf::from("build/prod"));
        assert_eq!(settings.dev_server.port, 8080);

        let settings = loader_for(&temp_dir, Mode::Development)
            .load()
            .expect("Should load settings");
        assert_eq!(settings.paths.output_dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_full_precedence_chain() {
        let temp_dir = setup_config_dir(&[
            ("default.toml", "[dev_server]\nport = 3000\nhost = \"127.0.0.1\"\n"),
            ("development.toml", "[dev_server]\nport = 3001\n[build]\nparallel = 2\n"),
            ("local.toml", "[dev_server]\nport = 3002\n"),
        ]);

        let env = HashMap::from([("EDITOR_DEV_SERVER__PORT".to_string(), "3003".to_string())]);
        let settings = ConfigLoader::new(Mode::Development)
            .with_config_dir(temp_dir.path())
            .with_env_source(env)
            .load()
            .expect("Should load settings");

        assert_eq!(settings.dev_server.port, 3003);
        assert_eq!(settings.dev_server.host, "127.0.0.1");
        assert_eq!(settings.build.parallel, 2);
    }

    #[test]
    fn test_env_list_override() {
        let temp_dir = setup_config_dir(&[]);
        let env = HashMap::from([(
            "EDITOR_DEV_SERVER__ALLOWED_HOSTS".to_string(),
            "localhost,editor.test".to_string(),
        )]);
        let settings = ConfigLoader::new(Mode::Development)
            .with_config_dir(temp_dir.path())
            .with_env_source(env)
            .load()
            .expect("Should load settings");

        assert_eq!(
            settings.dev_server.allowed_hosts,
            vec!["localhost".to_string(), "editor.test".to_string()]
        );
    }

    #[test]
    fn test_single_file_mode_skips_layers() {
        let temp_dir = setup_config_dir(&[
            ("default.toml", "[dev_server]\nport = 3000\n"),
            ("single.toml", "[dev_server]\nport = 5000\n"),
        ]);

        let settings = loader_for(&temp_dir, Mode::Development)
            .with_config_file(temp_dir.path().join("single.toml"))
            .load()
            .expect("Should load settings");
        assert_eq!(settings.dev_server.port, 5000);
    }

    #[test]
    fn test_single_file_missing() {
        let temp_dir = setup_config_dir(&[]);
        let result = loader_for(&temp_dir, Mode::Development)
            .with_config_file(temp_dir.path().join("missing.toml"))
            .load();

        match result {
            Err(ConfigError::FileNotFound(path)) => assert!(path.ends_with("missing.toml")),
            other => panic!("Expected FileNotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let temp_dir = setup_config_dir(&[("default.toml", "[logger]\nlevel = \"loud\"\n")]);
        let result = loader_for(&temp_dir, Mode::Development).load();
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }
}
