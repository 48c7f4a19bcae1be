//! CLI argument parsing with clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Mode;

/// Build and dev-server tooling for the scene editor
#[derive(Parser, Debug)]
#[command(name = "editor-build")]
#[command(about = "Build and dev-server tooling for the scene editor")]
#[command(long_about = "
editor-build resolves the editor's environment from layered .env files,
assembles the static build output and serves it over HTTPS for local
development.

EXAMPLES:
    # Build with the mode taken from NODE_ENV (development if unset)
    editor-build build

    # Production build with a bundle size report
    editor-build --mode production build --analyze

    # Print the build plan for the JS toolchain without writing anything
    editor-build build --dry-run

    # Show the environment that would be injected into the bundle
    editor-build env

    # Serve the output directory over HTTPS on port 9090
    editor-build serve --port 9090

    # Force a new self-signed dev certificate
    editor-build cert --force
")]
#[command(version = crate::build::CLAP_LONG_VERSION)]
pub struct Cli {
    /// Subcommand to execute, `build` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    ///
    /// Loads tool settings from this TOML file instead of the layered files
    /// in the `config/` directory. `EDITOR_*` variables still override it.
    #[arg(short, long, global = true, value_name = "FILE", value_parser = super::validation::validate_config_file_path)]
    pub config: Option<PathBuf>,

    /// Project root holding the `.env.*` files and the source tree
    #[arg(short, long, global = true, value_name = "DIR", value_parser = super::validation::validate_root_dir)]
    pub root: Option<PathBuf>,

    /// Deployment mode, defaults to `NODE_ENV`
    #[arg(short, long, global = true, value_enum)]
    pub mode: Option<ModeArg>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Print the environment injected into the bundle
    Env {
        /// Print every resolved variable instead of the injected subset
        #[arg(long)]
        all: bool,
    },

    /// Print the runtime configuration the editor would see
    Config {
        /// Read a `runtime-config.json` written by a previous build
        #[arg(long, value_name = "FILE")]
        artifact: Option<PathBuf>,
    },

    /// Create the self-signed dev certificate if it is missing
    Cert {
        /// Regenerate even when a cached pair exists
        #[arg(short, long)]
        force: bool,
    },

    /// Run the asset pass into the output directory
    Build {
        /// Log per-directory output sizes
        #[arg(long)]
        analyze: bool,

        /// Print the build plan as JSON and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Serve the output directory over HTTPS
    Serve {
        /// Address to bind to
        #[arg(long, value_name = "ADDRESS", value_parser = super::validation::validate_host_address)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Run the asset pass before serving
        #[arg(long)]
        build: bool,
    },
}

/// Mode options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "production", alias = "prod")]
    Production,
}

impl From<ModeArg> for Mode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Development => Mode::Development,
            ModeArg::Production => Mode::Production,
        }
    }
}

impl Cli {
    /// The command to run, `build` when none was given
    pub fn command_or_default(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Build {
            analyze: false,
            dry_run: false,
        })
    }

    /// Mode from `--mode`, falling back to `NODE_ENV`
    pub fn mode(&self) -> Mode {
        self.mode.map(Mode::from).unwrap_or_else(Mode::from_env)
    }

    /// Checks clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.verbose && self.quiet {
            return Err("Cannot use --verbose and --quiet together".to_string());
        }

        if let Some(Commands::Config {
            artifact: Some(ref path),
        }) = self.command
            && !path.is_file()
        {
            return Err(format!("Runtime config artifact not found: '{}'", path.display()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_flag() {
        let err = Cli::try_parse_from(["editor-build", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_default_command_is_build() {
        let cli = Cli::try_parse_from(["editor-build"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(
            cli.command_or_default(),
            Commands::Build {
                analyze: false,
                dry_run: false
            }
        );
    }

    #[test]
    fn test_mode_aliases() {
        let cli = Cli::try_parse_from(["editor-build", "--mode", "prod", "build"]).unwrap();
        assert_eq!(cli.mode(), Mode::Production);

        let cli = Cli::try_parse_from(["editor-build", "build", "-m", "dev"]).unwrap();
        assert_eq!(cli.mode(), Mode::Development);
    }

    #[test]
    fn test_build_flags() {
        let cli = Cli::try_parse_from(["editor-build", "build", "--analyze", "--dry-run"]).unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Build {
                analyze: true,
                dry_run: true
            }
        );
    }

    #[test]
    fn test_serve_command() {
        let cli = Cli::try_parse_from([
            "editor-build",
            "serve",
            "--host",
            "127.0.0.1",
            "--port",
            "9090",
        ])
        .unwrap();
        assert_eq!(
            cli.command_or_default(),
            Commands::Serve {
                host: Some("127.0.0.1".to_string()),
                port: Some(9090),
                build: false
            }
        );
    }

    #[test]
    fn test_serve_rejects_port_zero() {
        let err = Cli::try_parse_from(["editor-build", "serve", "--port", "0"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_cert_force() {
        let cli = Cli::try_parse_from(["editor-build", "cert", "--force"]).unwrap();
        assert_eq!(cli.command_or_default(), Commands::Cert { force: true });
    }

    #[test]
    fn test_conflicting_verbose_quiet() {
        let err = Cli::try_parse_from(["editor-build", "--verbose", "--quiet"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_missing_artifact_fails_validation() {
        let cli =
            Cli::try_parse_from(["editor-build", "config", "--artifact", "/nonexistent/runtime.json"])
                .unwrap();
        assert!(cli.validate().is_err());
    }
}
