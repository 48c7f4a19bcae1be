use clap::Parser;

use scene_editor_build::cli::{self, Cli};
use scene_editor_build::config::Settings;
use scene_editor_build::env::EnvLoadReport;

fn main() {
    if let Err(e) = start() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn start() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli::load_and_merge_config(&cli)?;

    // The process environment is extended from the configured root before
    // the runtime spawns any threads.
    let env_report = cli::load_environment(&settings, cli.mode());

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(run(cli, settings, env_report))
}

async fn run(cli: Cli, settings: Settings, env_report: EnvLoadReport) -> anyhow::Result<()> {
    cli::init_logger_from_settings(&settings)?;

    for file in &env_report.loaded {
        tracing::debug!(path = %file.display(), "Loaded env file");
    }
    for malformed in &env_report.malformed {
        tracing::warn!(
            path = %malformed.path.display(),
            error = %malformed.message,
            "Malformed env file entry"
        );
    }

    tracing::info!(
        app_name = %settings.application.name,
        app_version = %settings.application.version,
        root = %settings.paths.root.display(),
        mode = %cli.mode(),
        "Starting"
    );

    cli::execute_command(&cli, settings).await?;
    Ok(())
}
