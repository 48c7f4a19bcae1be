//! Environment resolution from layered dotenv files
//!
//! Produces the flat key/value mapping that feeds both the build pipeline
//! (env injection) and the runtime configuration object.

pub mod resolver;

pub use resolver::{DEFAULTS_FILE, EnvLoadReport, EnvResolver, MalformedEnvFile, ResolvedEnv};
