//! Runtime configuration consumed by the editor
//!
//! Constructed once from a [`ConfigSnapshot`] (or the env artifact written by
//! the build) and passed by reference to whoever needs it.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

use thiserror::Error;

use crate::assets;
use crate::env::ResolvedEnv;
use crate::runtime::keys::ConfigKey;
use crate::runtime::snapshot::{ConfigSnapshot, ConfigSource, ConfigValue, SnapshotBuilder};

/// Label shown in the editor chrome
pub const DISPLAY_NAME: &str = "Scene Editor";

/// Bundled editor icon, relative to the output root
pub const DEFAULT_ICON_PATH: &str = "assets/images/editor-icon.png";

/// Artifact entry holding the icon path the build emitted
pub const ICON_ARTIFACT_KEY: &str = "EDITOR_ICON";

#[derive(Debug, Error)]
pub enum RuntimeConfigError {
    #[error("Failed to read runtime config artifact {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid runtime config artifact {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only view over the resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    snapshot: ConfigSnapshot,
    icon: Option<String>,
}

impl RuntimeConfig {
    pub fn from_snapshot(snapshot: ConfigSnapshot) -> Self {
        Self { snapshot, icon: None }
    }

    /// Use the hashed icon the build emitted instead of [`DEFAULT_ICON_PATH`]
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn from_env(env: &ResolvedEnv) -> Self {
        Self::from_snapshot(ConfigSnapshot::from_env(env))
    }

    /// Load the env snapshot the build wrote next to the bundle
    ///
    /// Strings and booleans are taken as-is, `null` means undefined and keys
    /// outside the recognized set are ignored. [`ICON_ARTIFACT_KEY`] carries
    /// the emitted icon path.
    pub fn from_artifact(path: &Path) -> Result<Self, RuntimeConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| RuntimeConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let values: BTreeMap<String, serde_json::Value> = serde_json::from_str(&content)
            .map_err(|source| RuntimeConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        let icon = values
            .get(ICON_ARTIFACT_KEY)
            .and_then(serde_json::Value::as_str)
            .map(str::to_string);

        let builder = values
            .into_iter()
            .fold(SnapshotBuilder::new(), |builder, (name, value)| {
                let Some(key) = ConfigKey::from_name(&name) else {
                    return builder;
                };
                match value {
                    serde_json::Value::String(s) => {
                        builder.define(key, ConfigValue::parse(key, &s), ConfigSource::Environment)
                    }
                    serde_json::Value::Bool(b) => {
                        builder.define(key, ConfigValue::Bool(b), ConfigSource::Environment)
                    }
                    _ => builder,
                }
            });

        let config = Self::from_snapshot(builder.freeze());
        Ok(match icon {
            Some(icon) => config.with_icon(icon),
            None => config,
        })
    }

    pub fn snapshot(&self) -> &ConfigSnapshot {
        &self.snapshot
    }

    /// Value for `key`; never fails, absent keys are `Undefined`
    pub fn get(&self, key: ConfigKey) -> &ConfigValue {
        self.snapshot.get(key)
    }

    pub fn string(&self, key: ConfigKey) -> Option<&str> {
        self.get(key).as_str()
    }

    pub fn hubs_server(&self) -> Option<&str> {
        self.string(ConfigKey::HubsServer)
    }

    pub fn reticulum_server(&self) -> Option<&str> {
        self.string(ConfigKey::ReticulumServer)
    }

    pub fn thumbnail_server(&self) -> Option<&str> {
        self.string(ConfigKey::ThumbnailServer)
    }

    pub fn cors_proxy_server(&self) -> Option<&str> {
        self.string(ConfigKey::CorsProxyServer)
    }

    pub fn backend_server(&self) -> Option<&str> {
        self.string(ConfigKey::BackendServer)
    }

    pub fn base_assets_path(&self) -> Option<&str> {
        self.string(ConfigKey::BaseAssetsPath)
    }

    /// Mozilla-hosted deployment flavor
    pub fn is_moz(&self) -> bool {
        self.get(ConfigKey::IsMoz).as_bool().unwrap_or(false)
    }

    /// Base path assets are served from; empty when unset
    pub fn public_path(&self) -> &str {
        self.base_assets_path().unwrap_or("")
    }

    pub fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    pub fn long_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    /// Emitted icon (or the default one) under the base assets path
    pub fn icon_path(&self) -> Cow<'_, str> {
        let icon = self.icon.as_deref().unwrap_or(DEFAULT_ICON_PATH);
        assets::rewrite(icon, self.public_path())
    }
}
