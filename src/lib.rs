//! Scene editor build tooling
//!
//! Environment resolution, runtime configuration, asset path rewriting, the
//! build pipeline and the TLS dev server for the browser scene editor.

use shadow_rs::shadow;
shadow!(build);

pub mod assets;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod runtime;
pub mod server;
pub mod tls;

pub fn pkg_version() -> &'static str {
    build::PKG_VERSION
}
