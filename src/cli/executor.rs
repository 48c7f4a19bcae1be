//! Command executor for dispatching CLI commands

use super::handlers::{
    BuildCommandHandler, CertCommandHandler, ConfigCommandHandler, EnvCommandHandler,
    ServeCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::{AppError, AppResult};

/// Execute the parsed command with merged settings
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<()> {
    cli.validate()
        .map_err(|reason| AppError::invalid_argument("cli_arguments", reason))?;

    let mode = cli.mode();
    tracing::debug!(mode = %mode, command = ?cli.command_or_default(), "Executing command");

    match cli.command_or_default() {
        Commands::Env { all } => EnvCommandHandler::new(settings, mode).execute(all),
        Commands::Config { artifact } => {
            ConfigCommandHandler::new(settings, mode).execute(artifact.as_ref())
        }
        Commands::Cert { force } => CertCommandHandler::new(settings).execute(force),
        Commands::Build { dry_run, .. } => BuildCommandHandler::new(settings, mode).execute(dry_run),
        Commands::Serve { build, .. } => {
            warn_privileged_port(&settings);
            ServeCommandHandler::new(settings, mode).execute(build).await
        }
    }
}

fn warn_privileged_port(settings: &Settings) {
    if settings.dev_server.port < 1024 {
        tracing::warn!(
            port = settings.dev_server.port,
            "Binding to a port below 1024 usually requires root privileges"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn settings(dir: &TempDir) -> Settings {
        let mut settings = Settings::default();
        settings.paths.root = dir.path().to_path_buf();
        settings
    }

    #[tokio::test]
    async fn test_execute_build_dry_run() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["editor-build", "build", "--dry-run"]).unwrap();
        assert!(execute_command(&cli, settings(&dir)).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_cert() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["editor-build", "cert"]).unwrap();
        execute_command(&cli, settings(&dir)).await.unwrap();
        assert!(dir.path().join("certs/dev-cert.pem").is_file());
    }

    #[tokio::test]
    async fn test_execute_build_without_sources_fails() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["editor-build", "build"]).unwrap();
        let err = execute_command(&cli, settings(&dir)).await.unwrap_err();
        assert!(matches!(err, AppError::Build(_)));
    }

    #[tokio::test]
    async fn test_invalid_arguments_are_rejected() {
        let dir = TempDir::new().unwrap();
        let cli = Cli::try_parse_from(["editor-build", "config", "--artifact", "/nonexistent.json"])
            .unwrap();
        let err = execute_command(&cli, settings(&dir)).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));
    }
}
