//! Cert command handler

use crate::config::Settings;
use crate::error::AppResult;
use crate::tls::{CertStatus, CertificateManager, DevCertificate};

pub struct CertCommandHandler {
    config: Settings,
}

impl CertCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub fn execute(&self, force: bool) -> AppResult<()> {
        let cert = self.provision(force)?;
        let verb = match cert.status {
            CertStatus::Reused => "Reusing",
            CertStatus::Generated => "Generated",
        };
        println!("{} dev certificate", verb);
        println!("  certificate: {}", cert.paths.cert.display());
        println!("  private key: {}", cert.paths.key.display());
        Ok(())
    }

    pub fn provision(&self, force: bool) -> AppResult<DevCertificate> {
        let manager = CertificateManager::new(self.config.paths.certs(), &self.config.certificate);
        let cert = if force {
            manager.regenerate()?
        } else {
            manager.ensure()?
        };
        Ok(cert)
    }
}
