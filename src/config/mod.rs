//! Configuration management for the editor build tool
//!
//! Tool settings (paths, dev server, certificate, logging) are loaded with
//! layered precedence, lowest to highest:
//! 1. `default.toml`
//! 2. `{mode}.toml`
//! 3. `local.toml` (not committed to version control)
//! 4. `EDITOR_*` environment variables
//!
//! The editor's runtime values (server URLs, analytics ids) are a separate
//! concern handled by [`crate::env`] and [`crate::runtime`].

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Mode;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    BuildConfig, CertificateConfig, DevServerConfig, PathsConfig, Settings,
};
