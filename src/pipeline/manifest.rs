//! Record of what the asset pass did with every source file

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::pipeline::error::BuildError;

pub const MANIFEST_FILE: &str = "asset-manifest.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    /// Written to the output directory
    Emitted,
    /// Left for the JS toolchain
    Pending,
    /// Folded into another chunk, no file of its own
    Inlined,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Path relative to the project root, `/` separated
    pub source: String,
    /// Path relative to the output root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub rule: String,
    pub status: EntryStatus,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AssetManifest {
    entries: Vec<ManifestEntry>,
}

impl AssetManifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ManifestEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count(&self, status: EntryStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    /// Output path of a source file, if it was emitted
    pub fn output_for(&self, source: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.source == source)
            .and_then(|e| e.output.as_deref())
    }

    /// Emitted bytes per output directory
    pub fn sizes_by_dir(&self) -> BTreeMap<String, u64> {
        let mut sizes = BTreeMap::new();
        for entry in &self.entries {
            let Some(ref output) = entry.output else {
                continue;
            };
            let dir = match output.rsplit_once('/') {
                Some((dir, _)) => dir.to_string(),
                None => ".".to_string(),
            };
            *sizes.entry(dir).or_insert(0) += entry.size;
        }
        sizes
    }

    /// Log the size report shown by `build --analyze`
    pub fn log_report(&self) {
        let sizes = self.sizes_by_dir();
        let total: u64 = sizes.values().sum();
        for (dir, bytes) in &sizes {
            tracing::info!(dir = %dir, bytes = *bytes, "Bundle size");
        }
        tracing::info!(
            total_bytes = total,
            emitted = self.count(EntryStatus::Emitted),
            pending = self.count(EntryStatus::Pending),
            inlined = self.count(EntryStatus::Inlined),
            "Bundle report"
        );
    }

    pub fn write(&self, out_dir: &Path) -> Result<PathBuf, BuildError> {
        let path = out_dir.join(MANIFEST_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| BuildError::io(&path, e))?;
        Ok(path)
    }
}
