//! Small helpers shared by the ingestion binaries: environment lookups and
//! env-file loading.

pub mod config;
pub mod env;

pub use config::ConfigError;
pub use env::{get_env_var, load_env_file};
