//! Environment injected into the bundle
//!
//! The build captures a fixed list of variables from the resolved
//! environment and writes them to `runtime-config.json` at the output root.
//! That file is the only channel through which the runtime configuration
//! sees the build environment.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, Serializer};

use crate::config::Mode;
use crate::env::ResolvedEnv;
use crate::pipeline::error::BuildError;
use crate::runtime::{
    ConfigKey, ConfigSnapshot, ConfigSource, ConfigValue, ICON_ARTIFACT_KEY, SnapshotBuilder,
};

pub const RUNTIME_CONFIG_FILE: &str = "runtime-config.json";

/// Where an injected value is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "from", content = "name", rename_all = "lowercase")]
pub enum ValueSource {
    /// A variable of the resolved environment
    Var(&'static str),
    /// The mode the build runs in
    Mode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InjectedVar {
    pub bundle_key: ConfigKey,
    pub source: ValueSource,
    pub default: Option<&'static str>,
}

impl InjectedVar {
    const fn var(key: ConfigKey) -> Self {
        Self {
            bundle_key: key,
            source: ValueSource::Var(key.as_str()),
            default: None,
        }
    }

    const fn renamed(key: ConfigKey, source_var: &'static str) -> Self {
        Self {
            bundle_key: key,
            source: ValueSource::Var(source_var),
            default: None,
        }
    }

    const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    fn lookup(&self, env: &ResolvedEnv, mode: Mode) -> Option<(String, ConfigSource)> {
        let found = match self.source {
            ValueSource::Var(name) => env.get(name).map(str::to_string),
            ValueSource::Mode => Some(mode.as_str().to_string()),
        };
        match (found, self.default) {
            (Some(value), _) => Some((value, ConfigSource::Environment)),
            (None, Some(default)) => Some((default.to_string(), ConfigSource::Default)),
            (None, None) => None,
        }
    }
}

/// Variables copied into the bundle, in injection order
pub const INJECTED_VARS: [InjectedVar; 15] = [
    InjectedVar::var(ConfigKey::BuildVersion).with_default("dev"),
    InjectedVar {
        bundle_key: ConfigKey::NodeEnv,
        source: ValueSource::Mode,
        default: None,
    },
    InjectedVar::var(ConfigKey::ReticulumServer),
    InjectedVar::renamed(ConfigKey::ThumbnailServer, "FARSPARK_SERVER"),
    InjectedVar::var(ConfigKey::HubsServer),
    InjectedVar::var(ConfigKey::CorsProxyServer),
    InjectedVar::var(ConfigKey::BaseAssetsPath),
    InjectedVar::var(ConfigKey::NonCorsProxyDomains),
    InjectedVar::var(ConfigKey::RouterBasePath),
    InjectedVar::var(ConfigKey::SentryDsn),
    InjectedVar::var(ConfigKey::GaTrackingId),
    InjectedVar::var(ConfigKey::IsMoz),
    InjectedVar::var(ConfigKey::BackendServer),
    InjectedVar::var(ConfigKey::BackendEndpointPermissions),
    InjectedVar::var(ConfigKey::BackendEndpointRefreshAccessToken),
];

/// The captured bundle environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEnv {
    snapshot: ConfigSnapshot,
    missing: Vec<ConfigKey>,
}

impl BundleEnv {
    /// Capture [`INJECTED_VARS`] from `env`
    ///
    /// Variables that are undefined and have no default are left out of the
    /// bundle with a warning.
    pub fn capture(env: &ResolvedEnv, mode: Mode) -> Self {
        let mut builder = SnapshotBuilder::new();
        let mut missing = Vec::new();

        for var in INJECTED_VARS {
            match var.lookup(env, mode) {
                Some((raw, source)) => {
                    let value = ConfigValue::parse(var.bundle_key, &raw);
                    builder = builder.define(var.bundle_key, value, source);
                }
                None => {
                    tracing::warn!(
                        key = %var.bundle_key,
                        "Environment variable is undefined, omitting it from the bundle"
                    );
                    missing.push(var.bundle_key);
                }
            }
        }

        Self {
            snapshot: builder.freeze(),
            missing,
        }
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Keys left undefined
    pub fn missing(&self) -> &[ConfigKey] {
        &self.missing
    }

    /// Write `runtime-config.json` into `out_dir`
    ///
    /// `icon` is the emitted editor icon, relative to the output root.
    pub fn write_artifact(&self, out_dir: &Path, icon: Option<&str>) -> Result<PathBuf, BuildError> {
        let path = out_dir.join(RUNTIME_CONFIG_FILE);
        let mut values = serde_json::to_value(self)?;
        if let (Some(icon), Some(object)) = (icon, values.as_object_mut()) {
            object.insert(ICON_ARTIFACT_KEY.to_string(), icon.into());
        }

        fs::create_dir_all(out_dir).map_err(|e| BuildError::io(out_dir, e))?;
        fs::write(&path, serde_json::to_string_pretty(&values)?)
            .map_err(|e| BuildError::io(&path, e))?;
        tracing::debug!(path = %path.display(), "Wrote runtime config artifact");
        Ok(path)
    }
}

/// Defined values as a JSON object keyed by variable name
impl Serialize for BundleEnv {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot.defined().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::RuntimeConfig;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> ResolvedEnv {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_and_mode() {
        let bundle = BundleEnv::capture(&env(&[]), Mode::Production);
        let snapshot = bundle.snapshot();

        assert_eq!(snapshot.get(ConfigKey::BuildVersion).as_str(), Some("dev"));
        assert_eq!(
            snapshot.entry(ConfigKey::BuildVersion).unwrap().source,
            ConfigSource::Default
        );
        assert_eq!(snapshot.get(ConfigKey::NodeEnv).as_str(), Some("production"));
        assert!(!snapshot.get(ConfigKey::HubsServer).is_defined());
        assert!(bundle.missing().contains(&ConfigKey::HubsServer));
        assert!(!bundle.missing().contains(&ConfigKey::BuildVersion));
    }

    #[test]
    fn test_thumbnail_server_comes_from_farspark() {
        let bundle = BundleEnv::capture(
            &env(&[
                ("FARSPARK_SERVER", "farspark.example.com"),
                ("THUMBNAIL_SERVER", "ignored.example.com"),
            ]),
            Mode::Development,
        );
        assert_eq!(
            bundle.snapshot().get(ConfigKey::ThumbnailServer).as_str(),
            Some("farspark.example.com")
        );
    }

    #[test]
    fn test_backend_keys_are_injected() {
        let bundle = BundleEnv::capture(
            &env(&[
                ("BACKEND_SERVER", "api.example.com"),
                ("BACKEND_ENDPOINT_PERMISSIONS", "/permissions"),
                ("BACKEND_ENDPOINT_REFRESH_ACCESS_TOKEN", "/refresh"),
            ]),
            Mode::Development,
        );
        let snapshot = bundle.snapshot();
        assert_eq!(snapshot.get(ConfigKey::BackendServer).as_str(), Some("api.example.com"));
        assert_eq!(
            snapshot.get(ConfigKey::BackendEndpointRefreshAccessToken).as_str(),
            Some("/refresh")
        );
    }

    #[test]
    fn test_unlisted_variables_are_not_injected() {
        let bundle = BundleEnv::capture(&env(&[("HOME", "/root")]), Mode::Development);
        let json = serde_json::to_string(&bundle).unwrap();
        assert!(!json.contains("HOME"));
    }

    #[test]
    fn test_artifact_feeds_runtime_config() {
        let dir = TempDir::new().unwrap();
        let bundle = BundleEnv::capture(
            &env(&[
                ("BASE_ASSETS_PATH", "/cdn/v2/"),
                ("IS_MOZ", "true"),
                ("BUILD_VERSION", "1.2.3"),
            ]),
            Mode::Production,
        );

        let path = bundle.write_artifact(dir.path(), None).unwrap();
        assert_eq!(path, dir.path().join(RUNTIME_CONFIG_FILE));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["IS_MOZ"], serde_json::Value::Bool(true));
        assert!(json.get("HUBS_SERVER").is_none());

        let config = RuntimeConfig::from_artifact(&path).unwrap();
        assert!(config.is_moz());
        assert_eq!(config.icon_path(), "/cdn/v2/images/editor-icon.png");
        assert_eq!(config.string(ConfigKey::BuildVersion), Some("1.2.3"));
    }

    #[test]
    fn test_artifact_records_emitted_icon() {
        let dir = TempDir::new().unwrap();
        let bundle = BundleEnv::capture(&env(&[("BASE_ASSETS_PATH", "/cdn/v2/")]), Mode::Production);

        let path = bundle
            .write_artifact(dir.path(), Some("assets/images/editor-icon-abc.png"))
            .unwrap();

        let config = RuntimeConfig::from_artifact(&path).unwrap();
        assert_eq!(config.icon_path(), "/cdn/v2/images/editor-icon-abc.png");
    }
}
