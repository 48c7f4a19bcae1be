//! Layered dotenv loading
//!
//! For a mode `M`, files are consulted in this order:
//! 1. the process environment (never overwritten)
//! 2. `.env.M`
//! 3. `.env.defaults`
//!
//! The first layer that defines a key wins. Missing files are skipped, bad
//! lines are reported and the rest of the file still loads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::Mode;

/// File holding values shared by every mode
pub const DEFAULTS_FILE: &str = ".env.defaults";

/// A line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEnvFile {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of one load pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvLoadReport {
    /// Files that existed and were read, in precedence order
    pub loaded: Vec<PathBuf>,
    /// Files that did not exist
    pub skipped: Vec<PathBuf>,
    pub malformed: Vec<MalformedEnvFile>,
}

impl EnvLoadReport {
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }
}

/// Flat key/value view of the resolved environment
///
/// Built once, read many times; there is no way to mutate it after
/// resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedEnv {
    vars: BTreeMap<String, String>,
}

impl ResolvedEnv {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.vars.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl FromIterator<(String, String)> for ResolvedEnv {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            vars: iter.into_iter().collect(),
        }
    }
}

/// Resolves the dotenv layers for one project root and mode
#[derive(Debug, Clone)]
pub struct EnvResolver {
    root: PathBuf,
    mode: Mode,
}

impl EnvResolver {
    pub fn new(root: impl Into<PathBuf>, mode: Mode) -> Self {
        Self {
            root: root.into(),
            mode,
        }
    }

    /// Resolver for `root` with the mode taken from `NODE_ENV`
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        Self::new(root, Mode::from_env())
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Layer files in precedence order, highest first
    pub fn files(&self) -> [PathBuf; 2] {
        [
            self.root.join(format!(".env.{}", self.mode.as_str())),
            self.root.join(DEFAULTS_FILE),
        ]
    }

    /// Resolve against the current process environment without mutating it
    pub fn resolve(&self) -> (ResolvedEnv, EnvLoadReport) {
        self.resolve_with(std::env::vars())
    }

    /// Resolve against an explicit base environment
    ///
    /// Pure apart from reading the layer files: the same base and files
    /// always produce the same result.
    pub fn resolve_with<I>(&self, base: I) -> (ResolvedEnv, EnvLoadReport)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut vars: BTreeMap<String, String> = base.into_iter().collect();
        let mut report = EnvLoadReport::default();

        for path in self.files() {
            let Some(entries) = read_layer(&path, &mut report) else {
                continue;
            };
            for (key, value) in entries {
                vars.entry(key).or_insert(value);
            }
        }

        (ResolvedEnv { vars }, report)
    }

    /// Extend the process environment in place
    ///
    /// Variables that are already set keep their values, so the mode file
    /// shadows the defaults file and both are shadowed by the caller's
    /// environment. Call this once at startup before any threads are spawned.
    pub fn load_into_process(&self) -> EnvLoadReport {
        let mut report = EnvLoadReport::default();

        for path in self.files() {
            let Some(entries) = read_layer(&path, &mut report) else {
                continue;
            };
            for (key, value) in entries {
                if std::env::var_os(&key).is_none() {
                    // SAFETY: invoked during single-threaded startup.
                    unsafe {
                        std::env::set_var(&key, &value);
                    }
                }
            }
        }

        report
    }
}

/// Read one dotenv file, recording what happened in `report`
///
/// Returns `None` when the file does not exist or cannot be opened.
fn read_layer(path: &Path, report: &mut EnvLoadReport) -> Option<Vec<(String, String)>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(dotenvy::Error::Io(ref e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "Optional env file not found, skipping");
            report.skipped.push(path.to_path_buf());
            return None;
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Failed to open env file");
            report.malformed.push(MalformedEnvFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            });
            return None;
        }
    };

    let mut entries = Vec::new();
    for item in iter {
        match item {
            Ok(pair) => entries.push(pair),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Malformed line in env file");
                report.malformed.push(MalformedEnvFile {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::debug!(path = %path.display(), count = entries.len(), "Loaded env file");
    report.loaded.push(path.to_path_buf());
    Some(entries)
}
