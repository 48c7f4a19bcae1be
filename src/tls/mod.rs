//! Dev server TLS: certificate cache and rustls configuration

pub mod cert;
pub mod error;

pub use cert::{CERT_FILE, CertPaths, CertStatus, CertificateManager, DevCertificate, KEY_FILE};
pub use error::CertError;

use std::sync::Arc;

use rustls::ServerConfig;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};

/// Build a rustls server configuration from a PEM certificate pair
///
/// Advertises HTTP/2 and HTTP/1.1 over ALPN.
pub fn server_config(paths: &CertPaths) -> Result<Arc<ServerConfig>, CertError> {
    let certs = CertificateDer::pem_file_iter(&paths.cert)
        .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
        .map_err(|e| CertError::Pem {
            path: paths.cert.clone(),
            message: e.to_string(),
        })?;
    if certs.is_empty() {
        return Err(CertError::Pem {
            path: paths.cert.clone(),
            message: "no certificate found".to_string(),
        });
    }

    let key = PrivateKeyDer::from_pem_file(&paths.key).map_err(|e| CertError::Pem {
        path: paths.key.clone(),
        message: e.to_string(),
    })?;

    let provider = Arc::new(rustls::crypto::aws_lc_rs::default_provider());
    let mut config = ServerConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(certs, key)?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];

    Ok(Arc::new(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CertificateConfig;
    use tempfile::TempDir;

    #[test]
    fn test_server_config_from_generated_pair() {
        let dir = TempDir::new().unwrap();
        let cert = CertificateManager::new(dir.path(), &CertificateConfig::default())
            .ensure()
            .unwrap();

        let config = server_config(&cert.paths).expect("generated pair should load");
        assert_eq!(config.alpn_protocols.len(), 2);
    }

    #[test]
    fn test_server_config_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let paths = CertPaths::in_dir(dir.path());
        std::fs::write(&paths.cert, "not a pem").unwrap();
        std::fs::write(&paths.key, "not a pem").unwrap();

        let err = server_config(&paths).unwrap_err();
        assert!(matches!(err, CertError::Pem { .. }));
    }
}
