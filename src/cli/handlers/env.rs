//! Env command handler

use std::collections::BTreeMap;

use crate::config::{Mode, Settings};
use crate::error::AppResult;
use crate::pipeline::{BuildError, BundleEnv};

pub struct EnvCommandHandler {
    config: Settings,
    mode: Mode,
}

impl EnvCommandHandler {
    pub fn new(config: Settings, mode: Mode) -> Self {
        Self { config, mode }
    }

    pub fn execute(&self, all: bool) -> AppResult<()> {
        println!("{}", self.render(all)?);
        Ok(())
    }

    /// JSON of the injected variables, or of every resolved variable
    pub fn render(&self, all: bool) -> AppResult<String> {
        let env = super::resolve_env(&self.config, self.mode);
        let json = if all {
            let vars: BTreeMap<&str, &str> = env.iter().collect();
            serde_json::to_string_pretty(&vars)
        } else {
            serde_json::to_string_pretty(&BundleEnv::capture(&env, self.mode))
        };
        Ok(json.map_err(BuildError::from)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn handler(dir: &TempDir, mode: Mode) -> EnvCommandHandler {
        let mut config = Settings::default();
        config.paths.root = dir.path().to_path_buf();
        EnvCommandHandler::new(config, mode)
    }

    #[test]
    fn test_render_injected_subset() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".env.defaults"),
            "FARSPARK_SERVER=farspark.example.com\nUNRELATED_SETTING=1\n",
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&handler(&dir, Mode::Production).render(false).unwrap()).unwrap();
        assert_eq!(json["THUMBNAIL_SERVER"], "farspark.example.com");
        assert_eq!(json["NODE_ENV"], "production");
        assert!(json.get("UNRELATED_SETTING").is_none());
    }

    #[test]
    fn test_render_all_includes_file_values() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(".env.development"),
            "SCENE_EDITOR_HANDLER_TEST_VALUE=from-file\n",
        )
        .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&handler(&dir, Mode::Development).render(true).unwrap()).unwrap();
        assert_eq!(json["SCENE_EDITOR_HANDLER_TEST_VALUE"], "from-file");
    }
}
