use std::path::PathBuf;

use serde::Serialize;

use crate::config::{BuildConfig, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapStyle {
    /// Embedded in the chunk as a data URL
    Inline,
    /// Separate `.map` file next to the chunk
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CssStrategy {
    /// Injected at runtime by the script bundle
    Inline,
    /// Written to `assets/styles`
    Extract,
}

/// Settings for the external minifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MinifyOptions {
    pub enabled: bool,
    /// Worker count, 0 means one per CPU
    pub parallel: usize,
    pub cache_dir: PathBuf,
}

/// Mode dependent output settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildVariant {
    pub mode: Mode,
    pub source_maps: SourceMapStyle,
    pub css: CssStrategy,
    pub minify: MinifyOptions,
    /// Whether the dev server certificate is provisioned for this build
    pub dev_certificate: bool,
}

impl BuildVariant {
    pub fn for_mode(mode: Mode, build: &BuildConfig) -> Self {
        let production = mode.is_production();
        Self {
            mode,
            source_maps: if production {
                SourceMapStyle::External
            } else {
                SourceMapStyle::Inline
            },
            css: if production {
                CssStrategy::Extract
            } else {
                CssStrategy::Inline
            },
            minify: MinifyOptions {
                enabled: production,
                parallel: build.parallel,
                cache_dir: build.minify_cache_dir.clone(),
            },
            dev_certificate: !production,
        }
    }
}
