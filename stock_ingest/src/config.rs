//! Database configuration from environment variables.
//!
//! Every setting has a hardcoded default and can be overridden by a named
//! variable. `DB_STOCK_DATA_URL`, when set, replaces the composed
//! PostgreSQL URL entirely (handy for pointing at a SQLite file).
//!
//! Call [`shared_utils::load_env_file`] before [`DbConfig::from_env`] to
//! pick up a local `.env.local`.

use secrecy::{ExposeSecret, SecretString};
use shared_utils::{ConfigError, get_env_var};

/// Database host.
pub const ENV_HOST: &str = "DB_STOCK_DATA_HOST";
/// Database user.
pub const ENV_USER: &str = "DB_STOCK_DATA_USER";
/// Database password.
pub const ENV_PASSWORD: &str = "DB_STOCK_DATA_PASSWORD";
/// Database name.
pub const ENV_NAME: &str = "DB_STOCK_DATA_NAME";
/// Database port.
pub const ENV_PORT: &str = "DB_STOCK_DATA_PORT";
/// Full connection URL, overriding all of the above.
pub const ENV_URL: &str = "DB_STOCK_DATA_URL";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_USER: &str = "finet_app";
const DEFAULT_PASSWORD: &str = "finet_password";
const DEFAULT_NAME: &str = "stock_data_db";
const DEFAULT_PORT: u16 = 5432;

/// Connection settings for the stock database.
#[derive(Debug)]
pub struct DbConfig {
    /// Server host name.
    pub host: String,
    /// Login user.
    pub user: String,
    /// Login password; redacted in `Debug` output.
    pub password: SecretString,
    /// Database (schema) name.
    pub name: String,
    /// Server port.
    pub port: u16,
    /// Explicit URL override.
    pub url: Option<String>,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            user: DEFAULT_USER.to_string(),
            password: SecretString::from(DEFAULT_PASSWORD.to_string()),
            name: DEFAULT_NAME.to_string(),
            port: DEFAULT_PORT,
            url: None,
        }
    }
}

impl DbConfig {
    /// Builds the config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| get_env_var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to defaults. A port that is not a valid
    /// `u16` is an error rather than a silent default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(host) = lookup(ENV_HOST) {
            cfg.host = host;
        }
        if let Some(user) = lookup(ENV_USER) {
            cfg.user = user;
        }
        if let Some(password) = lookup(ENV_PASSWORD) {
            cfg.password = SecretString::from(password);
        }
        if let Some(name) = lookup(ENV_NAME) {
            cfg.name = name;
        }
        if let Some(raw) = lookup(ENV_PORT) {
            cfg.port = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue {
                    name: ENV_PORT.to_string(),
                    value: raw.clone(),
                })?;
        }
        cfg.url = lookup(ENV_URL).filter(|u| !u.trim().is_empty());

        Ok(cfg)
    }

    /// The URL handed to [`crate::db::connect`].
    pub fn database_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => self.compose_url(&urlencoding::encode(self.password.expose_secret())),
        }
    }

    /// Same as [`Self::database_url`] with the password masked, for logs.
    pub fn redacted_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => self.compose_url("***"),
        }
    }

    // `password` must already be percent-encoded.
    fn compose_url(&self, password: &str) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.user),
            password,
            self.host,
            self.port,
            self.name
        )
    }
}
