use thiserror::Error;

/// Errors related to application configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable required by the application is not set.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    /// An environment variable is set but its value cannot be used.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue {
        /// Name of the offending variable.
        name: String,
        /// The raw value that failed to parse.
        value: String,
    },

    /// The env file exists but could not be read or parsed.
    #[error("Failed to load env file {path}: {source}")]
    EnvFile {
        /// Path of the env file.
        path: String,
        /// Underlying loader error.
        #[source]
        source: dotenvy::Error,
    },
}
