//! Asset rules: which handling applies to which source file
//!
//! Rules are ordered and the first match wins, so the worker rule sits in
//! front of the plain JavaScript rule.

use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;

use crate::pipeline::error::BuildError;

/// Matches an optional `?query` after the extension
const QUERY_SUFFIX: &str = r"(\?.*$|$)";

/// What the pipeline does with a matched file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Handling {
    /// Copy to `output_dir` under a content-hashed name
    CopyWithHash { output_dir: &'static str },
    /// Hand to the JS compiler
    Compile,
    /// Compile as a worker and inline it into the importing chunk
    InlineWorker { output_dir: &'static str },
    /// Inline or extract depending on the build variant
    Stylesheet { output_dir: &'static str },
}

impl Handling {
    pub fn output_dir(&self) -> Option<&'static str> {
        match self {
            Handling::CopyWithHash { output_dir }
            | Handling::InlineWorker { output_dir }
            | Handling::Stylesheet { output_dir } => Some(output_dir),
            Handling::Compile => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssetRule {
    pub name: &'static str,
    /// Source text of `pattern`
    pub test: String,
    #[serde(skip)]
    pattern: Regex,
    /// Only files below this directory match
    pub include: Option<PathBuf>,
    pub handling: Handling,
}

impl AssetRule {
    fn new(
        name: &'static str,
        test: String,
        include: Option<PathBuf>,
        handling: Handling,
    ) -> Result<Self, BuildError> {
        let pattern = Regex::new(&test)?;
        Ok(Self {
            name,
            test,
            pattern,
            include,
            handling,
        })
    }

    /// Rule for a set of extensions, allowing a trailing query string
    fn extensions(
        name: &'static str,
        extensions: &[&str],
        handling: Handling,
    ) -> Result<Self, BuildError> {
        let test = format!(r"\.({}){}", extensions.join("|"), QUERY_SUFFIX);
        Self::new(name, test, None, handling)
    }

    pub fn matches(&self, request: &str) -> bool {
        if !self.pattern.is_match(request) {
            return false;
        }
        match self.include {
            Some(ref dir) => Path::new(request).starts_with(dir),
            None => true,
        }
    }
}

/// Ordered rule table
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: Vec<AssetRule>,
}

impl RuleSet {
    /// The editor's rule table; JS rules only apply below `source_dir`
    pub fn standard(source_dir: &Path) -> Result<Self, BuildError> {
        let src = Some(source_dir.to_path_buf());
        let rules = vec![
            AssetRule::extensions(
                "images",
                &["png", "jpg", "jpeg", "gif", "svg"],
                Handling::CopyWithHash {
                    output_dir: "assets/images",
                },
            )?,
            AssetRule::extensions(
                "fonts",
                &["woff", "woff2", "ttf", "eot"],
                Handling::CopyWithHash {
                    output_dir: "assets/fonts",
                },
            )?,
            AssetRule::extensions(
                "glb",
                &["glb"],
                Handling::CopyWithHash {
                    output_dir: "assets/models",
                },
            )?,
            AssetRule::extensions(
                "gltf",
                &["gltf"],
                Handling::CopyWithHash {
                    output_dir: "assets/models",
                },
            )?,
            AssetRule::new(
                "gltf-buffers",
                r"\.(bin)$".to_string(),
                None,
                Handling::CopyWithHash {
                    output_dir: "assets/models",
                },
            )?,
            AssetRule::extensions(
                "videos",
                &["mp4", "webm"],
                Handling::CopyWithHash {
                    output_dir: "assets/videos",
                },
            )?,
            AssetRule::extensions(
                "templates",
                &["spoke"],
                Handling::CopyWithHash {
                    output_dir: "assets/templates",
                },
            )?,
            AssetRule::new(
                "workers",
                r"\.worker\.js$".to_string(),
                src.clone(),
                Handling::InlineWorker {
                    output_dir: "assets/js/workers",
                },
            )?,
            AssetRule::new("scripts", r"\.js$".to_string(), src, Handling::Compile)?,
            AssetRule::new(
                "wasm",
                r"\.wasm$".to_string(),
                None,
                Handling::CopyWithHash {
                    output_dir: "assets/js/wasm",
                },
            )?,
            AssetRule::new(
                "styles",
                r"\.css$".to_string(),
                None,
                Handling::Stylesheet {
                    output_dir: "assets/styles",
                },
            )?,
        ];

        Ok(Self { rules })
    }

    /// First rule matching `request`, if any
    pub fn classify(&self, request: &str) -> Option<&AssetRule> {
        self.rules.iter().find(|rule| rule.matches(request))
    }

    pub fn iter(&self) -> impl Iterator<Item = &AssetRule> {
        self.rules.iter()
    }
}
