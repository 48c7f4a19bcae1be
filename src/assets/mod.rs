//! Asset path handling shared by the build pipeline and runtime configuration

pub mod path;

pub use path::{AssetPath, rewrite};
