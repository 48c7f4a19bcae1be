//! Command handlers, one per subcommand

pub mod build;
pub mod cert;
pub mod config;
pub mod env;
pub mod serve;

pub use build::BuildCommandHandler;
pub use cert::CertCommandHandler;
pub use config::ConfigCommandHandler;
pub use env::EnvCommandHandler;
pub use serve::ServeCommandHandler;

use crate::config::{Mode, Settings};
use crate::env::{EnvResolver, ResolvedEnv};

/// Resolve the editor environment for the configured project root
fn resolve_env(settings: &Settings, mode: Mode) -> ResolvedEnv {
    let (env, report) = EnvResolver::new(&settings.paths.root, mode).resolve();
    if !report.is_clean() {
        tracing::warn!(
            malformed = report.malformed.len(),
            "Some environment file entries could not be parsed"
        );
    }
    env
}
