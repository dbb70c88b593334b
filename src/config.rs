//! Runtime configuration.
//!
//! Settings can be read from a JSON document or from environment-style
//! key lookups. Only the `PostgreSQL` adapter consumes them; the domain and
//! in-memory adapter need no configuration.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// Environment key holding the `PostgreSQL` connection URL.
pub const DATABASE_URL_KEY: &str = "MIKADO_DATABASE_URL";
/// Environment key holding the maximum pool size.
pub const MAX_POOL_SIZE_KEY: &str = "MIKADO_MAX_POOL_SIZE";
/// Environment key holding the connection checkout timeout in seconds.
pub const CONNECTION_TIMEOUT_KEY: &str = "MIKADO_CONNECTION_TIMEOUT_SECS";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The JSON document could not be parsed.
    #[error("invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A numeric setting was not a valid number.
    #[error("invalid value '{value}' for {key}")]
    InvalidNumber {
        /// Setting key.
        key: &'static str,
        /// Raw value supplied.
        value: String,
    },

    /// A required setting was not provided.
    #[error("missing required setting {0}")]
    Missing(&'static str),

    /// A numeric setting was zero.
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Connection settings for the `PostgreSQL` task graph repository.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistenceConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum number of pooled connections.
    pub max_pool_size: u32,
    /// Seconds to wait for a pooled connection.
    pub connection_timeout_secs: u64,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            database_url: String::new(),
            max_pool_size: 8,
            connection_timeout_secs: 30,
        }
    }
}

impl PersistenceConfig {
    /// Creates a configuration for `database_url` with default pool
    /// settings.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            ..Self::default()
        }
    }

    /// Parses a JSON configuration document.
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed documents and the
    /// validation errors of [`Self::validate`].
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Builds a configuration from a key lookup, typically the process
    /// environment.
    ///
    /// ```
    /// use mikado::config::PersistenceConfig;
    ///
    /// let config = PersistenceConfig::from_lookup(|key| match key {
    ///     "MIKADO_DATABASE_URL" => Some("postgres://localhost/mikado".to_owned()),
    ///     _ => None,
    /// })
    /// .expect("valid configuration");
    /// assert_eq!(config.max_pool_size, 8);
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidNumber`] when a numeric key is not a
    /// number, and the validation errors of [`Self::validate`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            database_url: lookup(DATABASE_URL_KEY).unwrap_or_default(),
            max_pool_size: parse_number(&lookup, MAX_POOL_SIZE_KEY)?
                .unwrap_or(defaults.max_pool_size),
            connection_timeout_secs: parse_number(&lookup, CONNECTION_TIMEOUT_KEY)?
                .unwrap_or(defaults.connection_timeout_secs),
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// See [`Self::from_lookup`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Checks that required settings are present and limits are positive.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] without a database URL and
    /// [`ConfigError::Zero`] for a zero pool size or timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::Missing(DATABASE_URL_KEY));
        }
        if self.max_pool_size == 0 {
            return Err(ConfigError::Zero(MAX_POOL_SIZE_KEY));
        }
        if self.connection_timeout_secs == 0 {
            return Err(ConfigError::Zero(CONNECTION_TIMEOUT_KEY));
        }
        Ok(())
    }

    /// Returns the connection checkout timeout.
    #[must_use]
    pub const fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs)
    }
}

fn parse_number<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ConfigError::InvalidNumber { key, value: raw })
        })
        .transpose()
}
