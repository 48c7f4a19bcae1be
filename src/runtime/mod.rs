//! Runtime configuration object
//!
//! A fixed set of keys resolved once into an immutable snapshot, plus the
//! derived accessors (display name, icon path) the editor UI relies on.

pub mod config;
pub mod keys;
pub mod snapshot;

pub use config::{DEFAULT_ICON_PATH, DISPLAY_NAME, ICON_ARTIFACT_KEY, RuntimeConfig, RuntimeConfigError};
pub use keys::ConfigKey;
pub use snapshot::{ConfigEntry, ConfigSnapshot, ConfigSource, ConfigValue, SnapshotBuilder};
