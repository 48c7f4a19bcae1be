//! Serve command handler

use crate::config::{Mode, Settings};
use crate::error::AppResult;
use crate::runtime::ConfigKey;
use crate::server::{DevServer, HostAllowList, StaticSite};
use crate::tls;

use super::{BuildCommandHandler, CertCommandHandler};

pub struct ServeCommandHandler {
    config: Settings,
    mode: Mode,
}

impl ServeCommandHandler {
    pub fn new(config: Settings, mode: Mode) -> Self {
        Self { config, mode }
    }

    /// Serve the output directory until interrupted
    ///
    /// With `build` set the asset pass runs first.
    pub async fn execute(&self, build: bool) -> AppResult<()> {
        if build {
            BuildCommandHandler::new(self.config.clone(), self.mode).run()?;
        }

        let output = self.config.paths.output();
        if !output.is_dir() {
            tracing::warn!(
                output = %output.display(),
                "Output directory does not exist yet, run `editor-build build` first"
            );
        }

        let cert = CertCommandHandler::new(self.config.clone()).provision(false)?;
        let tls = tls::server_config(&cert.paths)?;

        let server = DevServer::new(self.config.dev_server.address(), self.site(), self.hosts(), tls);
        server.run().await?;
        Ok(())
    }

    /// The output directory, mounted under the base assets path
    pub fn site(&self) -> StaticSite {
        let env = super::resolve_env(&self.config, self.mode);
        StaticSite {
            root: self.config.paths.output(),
            base_path: env
                .get(ConfigKey::BaseAssetsPath.as_str())
                .unwrap_or_default()
                .to_string(),
            history_fallback: self.config.dev_server.history_fallback,
        }
    }

    pub fn hosts(&self) -> HostAllowList {
        HostAllowList::new(&self.config.dev_server.allowed_hosts, &self.config.dev_server.public)
    }
}
