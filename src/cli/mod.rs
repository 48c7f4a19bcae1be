//! Command line interface
//!
//! Parses arguments, merges them over the file based settings and dispatches
//! to one handler per subcommand.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::execute_command;
pub use parser::{Cli, Commands, ModeArg};

use crate::config::{Mode, Settings};
use crate::env::{EnvLoadReport, EnvResolver};
use crate::logger::init_logger;

/// Load file settings for the CLI's mode and apply its overrides
pub fn load_and_merge_config(cli: &Cli) -> anyhow::Result<Settings> {
    let merger = ConfigurationMerger::load(cli.config.as_deref(), cli.root.as_deref(), cli.mode())?;
    Ok(merger.merge_cli_args(cli)?)
}

/// Extend the process environment from the `.env.*` layers of the configured
/// project root
///
/// Runs after settings are merged so the root from `--config`, the TOML
/// layers or `EDITOR_PATHS__ROOT` is honored, and before any threads exist.
pub fn load_environment(settings: &Settings, mode: Mode) -> EnvLoadReport {
    EnvResolver::new(&settings.paths.root, mode).load_into_process()
}

/// Initialize logging from settings
pub fn init_logger_from_settings(settings: &Settings) -> anyhow::Result<()> {
    let logger_config = settings.logger.clone().into_logger_config()?;
    init_logger(logger_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_environment_loads_from_configured_root() {
        let project = TempDir::new().unwrap();
        fs::write(
            project.path().join(".env.defaults"),
            "SCENE_EDITOR_ROOT_TEST_SERVER=from-defaults\n",
        )
        .unwrap();
        fs::write(
            project.path().join(".env.production"),
            "SCENE_EDITOR_ROOT_TEST_SERVER=from-production\n",
        )
        .unwrap();

        let config_dir = TempDir::new().unwrap();
        let config_file = config_dir.path().join("editor.toml");
        fs::write(
            &config_file,
            format!("[paths]\nroot = {:?}\n", project.path().display().to_string()),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "editor-build",
            "--config",
            config_file.to_str().unwrap(),
            "--mode",
            "production",
            "env",
        ])
        .unwrap();
        let settings = load_and_merge_config(&cli).unwrap();
        assert_eq!(settings.paths.root, project.path());

        // SAFETY: the key is unique to this test.
        unsafe {
            std::env::remove_var("SCENE_EDITOR_ROOT_TEST_SERVER");
        }
        let report = load_environment(&settings, cli.mode());

        assert_eq!(report.loaded.len(), 2);
        assert_eq!(
            std::env::var("SCENE_EDITOR_ROOT_TEST_SERVER").unwrap(),
            "from-production"
        );

        unsafe {
            std::env::remove_var("SCENE_EDITOR_ROOT_TEST_SERVER");
        }
    }
}
