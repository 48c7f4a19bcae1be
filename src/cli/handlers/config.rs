//! Config command handler
//!
//! Shows the runtime configuration as the editor will see it: either from a
//! build artifact or from what a build would inject right now.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::config::{Mode, Settings};
use crate::error::AppResult;
use crate::pipeline::{BuildError, BundleEnv};
use crate::runtime::{ConfigValue, RuntimeConfig};

#[derive(Debug, Serialize)]
struct RuntimeConfigView<'a> {
    display_name: &'static str,
    long_name: &'static str,
    icon_path: String,
    public_path: &'a str,
    is_moz: bool,
    values: BTreeMap<&'static str, &'a ConfigValue>,
}

impl<'a> RuntimeConfigView<'a> {
    fn new(config: &'a RuntimeConfig) -> Self {
        Self {
            display_name: config.display_name(),
            long_name: config.long_name(),
            icon_path: config.icon_path().into_owned(),
            public_path: config.public_path(),
            is_moz: config.is_moz(),
            values: config.snapshot().defined(),
        }
    }
}

pub struct ConfigCommandHandler {
    config: Settings,
    mode: Mode,
}

impl ConfigCommandHandler {
    pub fn new(config: Settings, mode: Mode) -> Self {
        Self { config, mode }
    }

    pub fn execute(&self, artifact: Option<&PathBuf>) -> AppResult<()> {
        println!("{}", self.render(artifact)?);
        Ok(())
    }

    pub fn render(&self, artifact: Option<&PathBuf>) -> AppResult<String> {
        let runtime = self.runtime_config(artifact)?;
        let json = serde_json::to_string_pretty(&RuntimeConfigView::new(&runtime))
            .map_err(BuildError::from)?;
        Ok(json)
    }

    fn runtime_config(&self, artifact: Option<&PathBuf>) -> AppResult<RuntimeConfig> {
        match artifact {
            Some(path) => Ok(RuntimeConfig::from_artifact(path)?),
            None => {
                let env = super::resolve_env(&self.config, self.mode);
                let bundle = BundleEnv::capture(&env, self.mode);
                Ok(RuntimeConfig::from_snapshot(bundle.snapshot().clone()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn handler(dir: &TempDir) -> ConfigCommandHandler {
        let mut config = Settings::default();
        config.paths.root = dir.path().to_path_buf();
        ConfigCommandHandler::new(config, Mode::Development)
    }

    #[test]
    fn test_render_from_env_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".env.development"),
            "BASE_ASSETS_PATH=/cdn/v2/\nIS_MOZ=true\n",
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&handler(&dir).render(None).unwrap()).unwrap();
        assert_eq!(json["display_name"], "Scene Editor");
        assert_eq!(json["icon_path"], "/cdn/v2/images/editor-icon.png");
        assert_eq!(json["is_moz"], true);
        assert_eq!(json["values"]["BUILD_VERSION"], "dev");
    }

    #[test]
    fn test_render_from_artifact() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("runtime-config.json");
        std::fs::write(&artifact, r#"{"HUBS_SERVER":"hubs.example.com","UNKNOWN":"x"}"#).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&handler(&dir).render(Some(&artifact)).unwrap()).unwrap();
        assert_eq!(json["values"]["HUBS_SERVER"], "hubs.example.com");
        assert!(json["values"].get("UNKNOWN").is_none());
        assert_eq!(json["public_path"], "");
    }

    #[test]
    fn test_unreadable_artifact_is_an_error() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("runtime-config.json");
        std::fs::write(&artifact, "not json").unwrap();
        assert!(handler(&dir).render(Some(&artifact)).is_err());
    }
}
