//! Cached self-signed certificate for the dev server
//!
//! The pair lives at `<cert_dir>/dev-cert.pem` and `<cert_dir>/dev-key.pem`.
//! An existing pair is reused untouched while the certificate is still valid;
//! a missing, partial, unreadable or expired pair is regenerated and persisted
//! so later runs skip key generation.

use std::fs;
use std::path::{Path, PathBuf};

use jiff::tz::TimeZone;
use jiff::{Span, Timestamp};
use rcgen::{CertificateParams, DistinguishedName, DnType, KeyPair};
use x509_parser::pem::parse_x509_pem;

use crate::config::CertificateConfig;
use crate::tls::error::CertError;

pub const CERT_FILE: &str = "dev-cert.pem";
pub const KEY_FILE: &str = "dev-key.pem";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl CertPaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            cert: dir.join(CERT_FILE),
            key: dir.join(KEY_FILE),
        }
    }

    /// Both files exist and are non-empty
    pub fn is_complete(&self) -> bool {
        [&self.cert, &self.key]
            .iter()
            .all(|path| fs::metadata(path).map(|m| m.is_file() && m.len() > 0).unwrap_or(false))
    }

    /// `notAfter` of the cached certificate
    pub fn expires_at(&self) -> Result<Timestamp, CertError> {
        let pem_error = |message: String| CertError::Pem {
            path: self.cert.clone(),
            message,
        };

        let bytes = fs::read(&self.cert).map_err(|e| CertError::io(&self.cert, e))?;
        let (_, pem) = parse_x509_pem(&bytes).map_err(|e| pem_error(e.to_string()))?;
        let cert = pem.parse_x509().map_err(|e| pem_error(e.to_string()))?;

        Timestamp::from_second(cert.validity().not_after.timestamp())
            .map_err(|e| CertError::Validity(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStatus {
    Reused,
    Generated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DevCertificate {
    pub paths: CertPaths,
    pub status: CertStatus,
}

/// Owns the on-disk certificate cache
#[derive(Debug, Clone)]
pub struct CertificateManager {
    dir: PathBuf,
    hostnames: Vec<String>,
    validity_days: u32,
}

impl CertificateManager {
    pub fn new(dir: impl Into<PathBuf>, config: &CertificateConfig) -> Self {
        Self {
            dir: dir.into(),
            hostnames: config.hostnames.clone(),
            validity_days: config.validity_days,
        }
    }

    pub fn paths(&self) -> CertPaths {
        CertPaths::in_dir(&self.dir)
    }

    /// Reuse the cached pair while it is valid, otherwise generate a new one
    pub fn ensure(&self) -> Result<DevCertificate, CertError> {
        let paths = self.paths();
        if paths.is_complete() {
            match paths.expires_at() {
                Ok(expires) if expires > Timestamp::now() => {
                    tracing::debug!(
                        cert = %paths.cert.display(),
                        expires = %expires,
                        "Reusing cached dev certificate"
                    );
                    return Ok(DevCertificate {
                        paths,
                        status: CertStatus::Reused,
                    });
                }
                Ok(expires) => {
                    tracing::info!(expires = %expires, "Cached dev certificate expired, regenerating");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Cached dev certificate is unreadable, regenerating");
                }
            }
        }

        self.regenerate()
    }

    /// Generate and persist a fresh pair regardless of the cache
    pub fn regenerate(&self) -> Result<DevCertificate, CertError> {
        let (cert_pem, key_pem) = self.generate()?;
        let paths = self.paths();

        fs::create_dir_all(&self.dir).map_err(|e| CertError::io(&self.dir, e))?;
        write_private(&paths.key, key_pem.as_bytes())?;
        fs::write(&paths.cert, cert_pem.as_bytes()).map_err(|e| CertError::io(&paths.cert, e))?;

        tracing::info!(
            cert = %paths.cert.display(),
            hostnames = ?self.hostnames,
            validity_days = self.validity_days,
            "Generated self-signed dev certificate"
        );

        Ok(DevCertificate {
            paths,
            status: CertStatus::Generated,
        })
    }

    /// PEM encoded certificate and PKCS#8 key
    fn generate(&self) -> Result<(String, String), CertError> {
        let mut params = CertificateParams::new(self.hostnames.clone())?;

        let mut dn = DistinguishedName::new();
        dn.push(
            DnType::CommonName,
            self.hostnames.first().map(String::as_str).unwrap_or("localhost"),
        );
        dn.push(DnType::OrganizationName, "Scene Editor Development");
        params.distinguished_name = dn;

        let today = Timestamp::now().to_zoned(TimeZone::UTC).date();
        let expires = today
            .checked_add(Span::new().days(i64::from(self.validity_days)))
            .map_err(|e| CertError::Validity(e.to_string()))?;
        params.not_before =
            rcgen::date_time_ymd(i32::from(today.year()), today.month() as u8, today.day() as u8);
        params.not_after = rcgen::date_time_ymd(
            i32::from(expires.year()),
            expires.month() as u8,
            expires.day() as u8,
        );

        let key_pair = KeyPair::generate()?;
        let certificate = params.self_signed(&key_pair)?;

        Ok((certificate.pem(), key_pair.serialize_pem()))
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> Result<(), CertError> {
    use std::io::Write;
    use std::os::unix::fs::OpenOptionsExt;

    let mut file = fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .map_err(|e| CertError::io(path, e))?;
    file.write_all(contents).map_err(|e| CertError::io(path, e))
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> Result<(), CertError> {
    fs::write(path, contents).map_err(|e| CertError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;
    use tempfile::TempDir;

    fn manager(dir: &Path) -> CertificateManager {
        CertificateManager::new(dir, &CertificateConfig::default())
    }

    #[test]
    fn test_generates_when_missing() {
        let dir = TempDir::new().unwrap();
        let cert = manager(&dir.path().join("certs")).ensure().expect("should generate");

        assert_eq!(cert.status, CertStatus::Generated);
        let pem = fs::read_to_string(&cert.paths.cert).unwrap();
        assert!(pem.starts_with("-----BEGIN CERTIFICATE-----"));
        let key = fs::read_to_string(&cert.paths.key).unwrap();
        assert!(key.contains("PRIVATE KEY"));
    }

    #[test]
    fn test_reuse_leaves_files_untouched() {
        let dir = TempDir::new().unwrap();
        let manager = manager(dir.path());
        let first = manager.ensure().unwrap();

        let old = FileTime::from_unix_time(1_600_000_000, 0);
        filetime::set_file_mtime(&first.paths.cert, old).unwrap();
        filetime::set_file_mtime(&first.paths.key, old).unwrap();
        let cert_before = fs::read(&first.paths.cert).unwrap();
        let key_before = fs::read(&first.paths.key).unwrap();

        let second = manager.ensure().unwrap();

        assert_eq!(second.status, CertStatus::Reused);
        assert_eq!(fs::read(&second.paths.cert).unwrap(), cert_before);
        assert_eq!(fs::read(&second.paths.key).unwrap(), key_before);
        for path in [&second.paths.cert, &second.paths.key] {
            let meta = fs::metadata(path).unwrap();
            assert_eq!(FileTime::from_last_modification_time(&meta), old);
        }
    }

    #[test]
    fn test_partial_pair_is_regenerated() {
        let dir = TempDir::new().unwrap();
        let manager = manager(dir.path());
        fs::write(dir.path().join(CERT_FILE), "stale").unwrap();

        let cert = manager.ensure().unwrap();
        assert_eq!(cert.status, CertStatus::Generated);
        assert_ne!(fs::read_to_string(&cert.paths.cert).unwrap(), "stale");
    }

    fn write_pair(dir: &Path, not_before: (i32, u8, u8), not_after: (i32, u8, u8)) {
        let mut params = CertificateParams::new(vec!["localhost".to_string()]).unwrap();
        params.not_before = rcgen::date_time_ymd(not_before.0, not_before.1, not_before.2);
        params.not_after = rcgen::date_time_ymd(not_after.0, not_after.1, not_after.2);
        let key_pair = KeyPair::generate().unwrap();
        let cert = params.self_signed(&key_pair).unwrap();

        fs::write(dir.join(CERT_FILE), cert.pem()).unwrap();
        fs::write(dir.join(KEY_FILE), key_pair.serialize_pem()).unwrap();
    }

    #[test]
    fn test_expired_pair_is_regenerated() {
        let dir = TempDir::new().unwrap();
        write_pair(dir.path(), (2020, 1, 1), (2020, 1, 31));
        let expired = fs::read(dir.path().join(CERT_FILE)).unwrap();

        let cert = manager(dir.path()).ensure().unwrap();

        assert_eq!(cert.status, CertStatus::Generated);
        assert_ne!(fs::read(&cert.paths.cert).unwrap(), expired);
        assert!(cert.paths.expires_at().unwrap() > Timestamp::now());
    }

    #[test]
    fn test_valid_foreign_pair_is_reused() {
        let dir = TempDir::new().unwrap();
        write_pair(dir.path(), (2020, 1, 1), (2999, 12, 31));

        let cert = manager(dir.path()).ensure().unwrap();
        assert_eq!(cert.status, CertStatus::Reused);
    }

    #[test]
    fn test_unparsable_pair_is_regenerated() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CERT_FILE), "not a certificate").unwrap();
        fs::write(dir.path().join(KEY_FILE), "not a key").unwrap();

        let cert = manager(dir.path()).ensure().unwrap();
        assert_eq!(cert.status, CertStatus::Generated);
    }

    #[test]
    fn test_expiry_follows_validity_days() {
        let dir = TempDir::new().unwrap();
        let cert = manager(dir.path()).ensure().unwrap();

        let days = Timestamp::now()
            .until(cert.paths.expires_at().unwrap())
            .unwrap()
            .total(jiff::Unit::Hour)
            .unwrap()
            / 24.0;
        assert!((29.0..=31.0).contains(&days), "unexpected validity of {days} days");
    }

    #[test]
    fn test_empty_files_are_not_complete() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CERT_FILE), "").unwrap();
        fs::write(dir.path().join(KEY_FILE), "").unwrap();
        assert!(!CertPaths::in_dir(dir.path()).is_complete());
    }

    #[test]
    fn test_regenerate_replaces_cached_pair() {
        let dir = TempDir::new().unwrap();
        let manager = manager(dir.path());
        let first = manager.ensure().unwrap();
        let before = fs::read(&first.paths.cert).unwrap();

        let second = manager.regenerate().unwrap();
        assert_eq!(second.status, CertStatus::Generated);
        assert_ne!(fs::read(&second.paths.cert).unwrap(), before);
    }

    #[cfg(unix)]
    #[test]
    fn test_private_key_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let cert = manager(dir.path()).ensure().unwrap();
        let mode = fs::metadata(&cert.paths.key).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
