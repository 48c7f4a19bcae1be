//! Declarative build pipeline
//!
//! A [`BuildPlan`] describes the whole build for one mode: asset rules,
//! variant settings, injected environment, favicon and dev server setup.
//! The [`Bundler`] executes the asset pass of a plan; JS compilation is left
//! to the external toolchain, which reads the same plan via `build --dry-run`.

pub mod bundler;
pub mod error;
pub mod hash;
pub mod inject;
pub mod manifest;
pub mod rules;
pub mod variant;

pub use bundler::{BuildReport, Bundler, HTML_ENTRY};
pub use error::BuildError;
pub use inject::{BundleEnv, INJECTED_VARS, InjectedVar, RUNTIME_CONFIG_FILE, ValueSource};
pub use manifest::{AssetManifest, EntryStatus, MANIFEST_FILE, ManifestEntry};
pub use rules::{AssetRule, Handling, RuleSet};
pub use variant::{BuildVariant, CssStrategy, MinifyOptions, SourceMapStyle};

use std::path::PathBuf;

use serde::Serialize;

use crate::config::{DevServerConfig, Mode, Settings};
use crate::env::ResolvedEnv;
use crate::runtime::ConfigKey;

/// Output name pattern for copied assets
pub const ASSET_FILENAME: &str = "[name]-[hash].[ext]";

/// Output name pattern for JS entry chunks
pub const CHUNK_FILENAME: &str = "assets/js/[name]-[chunkhash].js";

/// Editor icon, relative to the source directory
pub const EDITOR_ICON: &str = "assets/images/editor-icon.png";

/// Favicon used when `IS_MOZ` is `"true"`, relative to the source directory
pub const MOZ_FAVICON: &str = "assets/favicon-spoke.ico";

pub const DEFAULT_FAVICON: &str = "assets/favicon-editor.ico";

/// Where the selected favicon lands, relative to the output root
pub const FAVICON_OUTPUT: &str = "assets/images/favicon.ico";

/// Replaced with the favicon URL in `index.html`
pub const FAVICON_PLACEHOLDER: &str = "{{faviconPath}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FaviconPlan {
    /// Icons copied verbatim into `assets/images`
    pub candidates: Vec<&'static str>,
    pub selected: &'static str,
    /// URL written into the HTML entry
    pub href: String,
}

impl FaviconPlan {
    fn new(env: &ResolvedEnv) -> Self {
        let selected = if env.get(ConfigKey::IsMoz.as_str()) == Some("true") {
            MOZ_FAVICON
        } else {
            DEFAULT_FAVICON
        };
        let base = env
            .get(ConfigKey::BaseAssetsPath.as_str())
            .filter(|base| !base.is_empty())
            .unwrap_or("/");

        Self {
            candidates: vec![MOZ_FAVICON, DEFAULT_FAVICON],
            selected,
            href: format!("{}{}", base, FAVICON_OUTPUT),
        }
    }
}

/// Dev server description handed to `serve`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DevServerPlan {
    pub host: String,
    pub port: u16,
    pub public: String,
    pub allowed_hosts: Vec<String>,
    pub https: bool,
    pub cert_dir: PathBuf,
    pub cors_origin: &'static str,
    pub history_fallback: bool,
}

impl DevServerPlan {
    fn new(config: &DevServerConfig, cert_dir: PathBuf) -> Self {
        Self {
            host: config.host.clone(),
            port: config.port,
            public: config.public.clone(),
            allowed_hosts: config.allowed_hosts.clone(),
            https: true,
            cert_dir,
            cors_origin: "*",
            history_fallback: config.history_fallback,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub entry: String,
    pub public_path: String,
    pub asset_filename: &'static str,
    pub chunk_filename: &'static str,
    pub variant: BuildVariant,
    pub rules: RuleSet,
    pub injected: Vec<InjectedVar>,
    /// Values captured for [`RUNTIME_CONFIG_FILE`]
    #[serde(rename = "env")]
    pub bundle_env: BundleEnv,
    pub favicon: FaviconPlan,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dev_server: Option<DevServerPlan>,
    /// Log a size report after the asset pass
    pub analyze: bool,
}

impl BuildPlan {
    pub fn new(
        settings: &Settings,
        mode: Mode,
        env: &ResolvedEnv,
        analyze: bool,
    ) -> Result<Self, BuildError> {
        let paths = &settings.paths;
        let source_dir = paths.source();
        let rule_root = source_dir
            .strip_prefix(&paths.root)
            .map(PathBuf::from)
            .unwrap_or_else(|_| source_dir.clone());

        let variant = BuildVariant::for_mode(mode, &settings.build);
        let dev_server = variant
            .dev_certificate
            .then(|| DevServerPlan::new(&settings.dev_server, paths.certs()));

        Ok(Self {
            root: paths.root.clone(),
            output_dir: paths.output(),
            entry: settings.build.entry.clone(),
            public_path: env
                .get(ConfigKey::BaseAssetsPath.as_str())
                .unwrap_or_default()
                .to_string(),
            asset_filename: ASSET_FILENAME,
            chunk_filename: CHUNK_FILENAME,
            rules: RuleSet::standard(&rule_root)?,
            injected: INJECTED_VARS.to_vec(),
            bundle_env: BundleEnv::capture(env, mode),
            favicon: FaviconPlan::new(env),
            dev_server,
            analyze: analyze || settings.build.analyze,
            variant,
            source_dir,
        })
    }

    pub fn to_json(&self) -> Result<String, BuildError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
