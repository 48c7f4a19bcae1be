//! The asset pass
//!
//! Walks the source tree, copies static assets into the hashed output
//! layout, records JS modules for the external toolchain, then writes the
//! favicon, `index.html`, the runtime config artifact and the manifest.

use std::fs;
use std::path::{Path, PathBuf};

use crate::pipeline::error::BuildError;
use crate::pipeline::hash::{content_hash, hashed_name};
use crate::pipeline::manifest::{AssetManifest, EntryStatus, ManifestEntry};
use crate::pipeline::rules::Handling;
use crate::pipeline::variant::CssStrategy;
use crate::pipeline::{BuildPlan, EDITOR_ICON, FAVICON_OUTPUT, FAVICON_PLACEHOLDER};

/// Source of the HTML entry, relative to the source directory
pub const HTML_ENTRY: &str = "index.html";

/// Outcome of a finished build
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub manifest: AssetManifest,
    pub manifest_path: PathBuf,
    pub runtime_config_path: PathBuf,
    pub html: Option<PathBuf>,
}

pub struct Bundler<'a> {
    plan: &'a BuildPlan,
    root: PathBuf,
    source: PathBuf,
    output: PathBuf,
}

impl<'a> Bundler<'a> {
    pub fn new(plan: &'a BuildPlan) -> Self {
        Self {
            plan,
            root: plan.root.clone(),
            source: plan.source_dir.clone(),
            output: plan.output_dir.clone(),
        }
    }

    pub fn run(&self) -> Result<BuildReport, BuildError> {
        if !self.source.is_dir() {
            return Err(BuildError::SourceMissing(self.source.clone()));
        }
        fs::create_dir_all(&self.output).map_err(|e| BuildError::io(&self.output, e))?;

        tracing::info!(
            mode = %self.plan.variant.mode,
            source = %self.source.display(),
            output = %self.output.display(),
            "Starting asset pass"
        );

        let mut manifest = AssetManifest::new();
        for file in collect_files(&self.source)? {
            if let Some(entry) = self.process(&file)? {
                manifest.push(entry);
            }
        }

        self.copy_favicons()?;
        let html = self.render_html()?;
        let icon = manifest.output_for(&self.request_for(&self.source.join(EDITOR_ICON)));
        if icon.is_none() {
            tracing::warn!(icon = EDITOR_ICON, "Editor icon was not emitted, using the default path");
        }
        let runtime_config_path = self.plan.bundle_env.write_artifact(&self.output, icon)?;
        let manifest_path = manifest.write(&self.output)?;

        if self.plan.analyze {
            manifest.log_report();
        }

        tracing::info!(
            files = manifest.len(),
            emitted = manifest.count(EntryStatus::Emitted),
            pending = manifest.count(EntryStatus::Pending),
            "Asset pass finished"
        );

        Ok(BuildReport {
            manifest,
            manifest_path,
            runtime_config_path,
            html,
        })
    }

    /// Source path as seen by the rules: relative to the root, `/` separated
    fn request_for(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn process(&self, path: &Path) -> Result<Option<ManifestEntry>, BuildError> {
        let request = self.request_for(path);
        let Some(rule) = self.plan.rules.classify(&request) else {
            tracing::trace!(source = %request, "No rule matches, skipping");
            return Ok(None);
        };

        let size = fs::metadata(path).map_err(|e| BuildError::io(path, e))?.len();
        let (output, status) = match rule.handling {
            Handling::CopyWithHash { output_dir } => (Some(self.emit(path, output_dir)?), EntryStatus::Emitted),
            Handling::Stylesheet { output_dir } if self.plan.variant.css == CssStrategy::Extract => {
                (Some(self.emit(path, output_dir)?), EntryStatus::Emitted)
            }
            Handling::Stylesheet { .. } | Handling::InlineWorker { .. } => (None, EntryStatus::Inlined),
            Handling::Compile => (None, EntryStatus::Pending),
        };

        tracing::debug!(source = %request, rule = rule.name, output = ?output, "Processed asset");

        Ok(Some(ManifestEntry {
            source: request,
            output,
            rule: rule.name.to_string(),
            status,
            size,
        }))
    }

    /// Copy `path` to `<output>/<dir>/<name>-<hash>.<ext>`
    fn emit(&self, path: &Path, dir: &str) -> Result<String, BuildError> {
        let bytes = fs::read(path).map_err(|e| BuildError::io(path, e))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let relative = format!("{}/{}", dir, hashed_name(&file_name, &content_hash(&bytes)));

        let target = self.output.join(&relative);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|e| BuildError::io(parent, e))?;
        }
        fs::write(&target, &bytes).map_err(|e| BuildError::io(&target, e))?;
        Ok(relative)
    }

    /// Copy both favicons verbatim and the selected one to `favicon.ico`
    fn copy_favicons(&self) -> Result<(), BuildError> {
        let images = self.output.join("assets/images");
        fs::create_dir_all(&images).map_err(|e| BuildError::io(&images, e))?;

        for candidate in &self.plan.favicon.candidates {
            let source = self.source.join(candidate);
            if !source.is_file() {
                tracing::warn!(path = %source.display(), "Favicon source not found, skipping");
                continue;
            }
            if let Some(name) = source.file_name() {
                let target = images.join(name);
                fs::copy(&source, &target).map_err(|e| BuildError::io(&target, e))?;
            }
            if *candidate == self.plan.favicon.selected {
                let target = self.output.join(FAVICON_OUTPUT);
                fs::copy(&source, &target).map_err(|e| BuildError::io(&target, e))?;
            }
        }
        Ok(())
    }

    /// Render `index.html` with the favicon link filled in
    fn render_html(&self) -> Result<Option<PathBuf>, BuildError> {
        let source = self.source.join(HTML_ENTRY);
        if !source.is_file() {
            tracing::debug!(path = %source.display(), "No HTML entry, skipping");
            return Ok(None);
        }

        let template = fs::read_to_string(&source).map_err(|e| BuildError::io(&source, e))?;
        let html = template.replace(FAVICON_PLACEHOLDER, &self.plan.favicon.href);
        let target = self.output.join(HTML_ENTRY);
        fs::write(&target, html).map_err(|e| BuildError::io(&target, e))?;
        Ok(Some(target))
    }
}

/// All files below `dir`, sorted so builds are reproducible
fn collect_files(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];

    while let Some(current) = pending.pop() {
        let entries = fs::read_dir(&current).map_err(|e| BuildError::io(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| BuildError::io(&current, e))?;
            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| BuildError::io(&path, e))?;
            if file_type.is_dir() {
                pending.push(path);
            } else if file_type.is_file() {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}
