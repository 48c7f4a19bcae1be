//! Configuration merger for CLI arguments and config files
//!
//! CLI flags have the highest priority, above `EDITOR_*` variables and the
//! layered TOML files.

use std::path::Path;

use super::parser::{Cli, Commands};
use crate::config::{ConfigError, ConfigLoader, Mode, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Load the base settings for `mode`
    ///
    /// An explicit file wins over the layered directory. Without
    /// `EDITOR_CONFIG_DIR`, the directory is `<root>/config` when a project
    /// root was given.
    pub fn load(
        config_path: Option<&Path>,
        root: Option<&Path>,
        mode: Mode,
    ) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::from_env(mode);
        if let Some(root) = root
            && std::env::var_os("EDITOR_CONFIG_DIR").is_none()
        {
            loader = loader.with_config_dir(root.join("config"));
        }
        if let Some(path) = config_path {
            loader = loader.with_config_file(path);
        }

        Ok(Self::new(loader.load()?))
    }

    /// Apply CLI overrides and validate the result
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        Self::apply_global_overrides(&mut config, cli);
        Self::apply_command_overrides(&mut config, &cli.command_or_default());

        config.validate()?;
        Ok(config)
    }

    fn apply_global_overrides(config: &mut Settings, cli: &Cli) {
        if let Some(ref root) = cli.root {
            config.paths.root = root.clone();
        }

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }
    }

    fn apply_command_overrides(config: &mut Settings, command: &Commands) {
        match command {
            Commands::Serve { host, port, .. } => {
                if let Some(host) = host {
                    config.dev_server.host = host.clone();
                }
                if let Some(port) = port {
                    config.dev_server.port = *port;
                }
            }
            Commands::Build { analyze: true, .. } => {
                config.build.analyze = true;
            }
            Commands::Build { .. } | Commands::Env { .. } | Commands::Config { .. } | Commands::Cert { .. } => {}
        }
    }

    pub fn config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn merge(args: &[&str]) -> Result<Settings, ConfigError> {
        let cli = Cli::try_parse_from(args).unwrap();
        ConfigurationMerger::new(Settings::default()).merge_cli_args(&cli)
    }

    #[test]
    fn test_verbose_and_quiet() {
        assert_eq!(merge(&["editor-build", "--verbose"]).unwrap().logger.level, "debug");
        assert_eq!(merge(&["editor-build", "--quiet"]).unwrap().logger.level, "error");
        assert_eq!(merge(&["editor-build"]).unwrap().logger.level, "info");
    }

    #[test]
    fn test_serve_overrides() {
        let config = merge(&["editor-build", "serve", "--host", "127.0.0.1", "--port", "9443"]).unwrap();
        assert_eq!(config.dev_server.host, "127.0.0.1");
        assert_eq!(config.dev_server.port, 9443);
        assert_eq!(config.dev_server.address(), "127.0.0.1:9443");
    }

    #[test]
    fn test_build_analyze_override() {
        assert!(merge(&["editor-build", "build", "--analyze"]).unwrap().build.analyze);
        assert!(!merge(&["editor-build", "build"]).unwrap().build.analyze);
    }

    #[test]
    fn test_root_override() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().to_str().unwrap();
        let config = merge(&["editor-build", "--root", root, "env"]).unwrap();
        assert_eq!(config.paths.root, PathBuf::from(root));
        assert_eq!(config.paths.output(), dir.path().join("dist"));
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("editor.toml");
        std::fs::write(&file, "[dev_server]\nport = 9000\n").unwrap();

        let merger = ConfigurationMerger::load(Some(&file), None, Mode::Development).unwrap();
        assert_eq!(merger.config().dev_server.port, 9000);
    }
}
