use std::path::Path;

use crate::config::ConfigError;

/// Reads an environment variable, returning a structured error if it's missing.
///
/// This is a thin wrapper around `std::env::var` that provides a more
/// ergonomic and specific error type for missing variables.
///
/// # Arguments
/// * `name` - The name of the environment variable to read.
pub fn get_env_var(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

/// Loads `KEY=VALUE` pairs from an optional env file into the process environment.
///
/// Variables already present in the environment are left untouched. Returns
/// `Ok(false)` when the file does not exist.
pub fn load_env_file(path: impl AsRef<Path>) -> Result<bool, ConfigError> {
    let path = path.as_ref();
    match dotenvy::from_path(path) {
        Ok(()) => Ok(true),
        Err(e) if e.not_found() => Ok(false),
        Err(source) => Err(ConfigError::EnvFile {
            path: path.display().to_string(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_var_is_reported_by_name() {
        let err = get_env_var("SHARED_UTILS_SURELY_UNSET_VAR").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing environment variable: SHARED_UTILS_SURELY_UNSET_VAR"
        );
    }

    #[test]
    fn absent_env_file_is_not_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let loaded = load_env_file(dir.path().join(".env.local")).unwrap();
        assert!(!loaded);
    }

    #[test]
    fn env_file_values_are_loaded() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join(".env.local");
        std::fs::write(&path, "SHARED_UTILS_TEST_FROM_FILE=loaded\n").unwrap();

        assert!(load_env_file(&path).unwrap());
        assert_eq!(get_env_var("SHARED_UTILS_TEST_FROM_FILE").unwrap(), "loaded");
    }
}
