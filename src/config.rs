//! Store configuration.
//!
//! Settings come from built-in defaults, then an optional JSON file, then
//! `KANBAN_*` environment variables, with later sources taking precedence.

use std::time::Duration;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::board::adapters::sqlite::{
    SqliteKanbanRepository, SqliteSetupError, apply_schema, build_pool,
};

/// Environment variable overriding [`StoreConfig::database_url`].
pub const DATABASE_URL_ENV: &str = "KANBAN_DATABASE_URL";
/// Environment variable overriding [`StoreConfig::max_connections`].
pub const MAX_CONNECTIONS_ENV: &str = "KANBAN_MAX_CONNECTIONS";
/// Environment variable overriding [`StoreConfig::busy_timeout_ms`].
pub const BUSY_TIMEOUT_ENV: &str = "KANBAN_BUSY_TIMEOUT_MS";

/// Errors raised while loading configuration or opening the store.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for [`StoreConfig`].
    #[error("failed to parse {path}: {source}")]
    Parse {
        /// File that failed.
        path: String,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },

    /// An environment override holds an unusable value.
    #[error("invalid value {value:?} for {key}")]
    InvalidOverride {
        /// Environment variable name.
        key: &'static str,
        /// Rejected value.
        value: String,
    },

    /// The store could not be opened.
    #[error(transparent)]
    Store(#[from] SqliteSetupError),
}

/// Embedded store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the `SQLite` database file.
    pub database_url: String,
    /// Upper bound on pooled connections.
    pub max_connections: u32,
    /// How long a writer waits for the database lock, in milliseconds.
    pub busy_timeout_ms: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: "kanban.db".to_owned(),
            max_connections: 8,
            busy_timeout_ms: 5_000,
        }
    }
}

impl StoreConfig {
    /// Loads configuration from `path` when given, then applies environment
    /// overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or an
    /// override is invalid.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(file) => Self::from_file(file)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads configuration from a JSON file. Missing fields keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] or [`ConfigError::Parse`].
    pub fn from_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let read_error = |source| ConfigError::Read {
            path: path.to_string(),
            source,
        };
        let parent = path
            .parent()
            .filter(|dir| !dir.as_str().is_empty())
            .unwrap_or_else(|| Utf8Path::new("."));
        let file_name = path.file_name().unwrap_or(path.as_str());

        let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(read_error)?;
        let contents = dir.read_to_string(file_name).map_err(read_error)?;
        let config = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_string(),
            source,
        })?;
        debug!(%path, "store configuration read");
        Ok(config)
    }

    /// Applies overrides looked up through `lookup`, which maps an
    /// environment variable name to its value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOverride`] for an empty database URL or
    /// a non-numeric count or timeout.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(value) = lookup(DATABASE_URL_ENV) {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidOverride {
                    key: DATABASE_URL_ENV,
                    value,
                });
            }
            self.database_url = value;
        }
        if let Some(value) = lookup(MAX_CONNECTIONS_ENV) {
            self.max_connections = parse_override(MAX_CONNECTIONS_ENV, value)?;
        }
        if let Some(value) = lookup(BUSY_TIMEOUT_ENV) {
            self.busy_timeout_ms = parse_override(BUSY_TIMEOUT_ENV, value)?;
        }
        Ok(self)
    }

    /// Returns the lock wait as a [`Duration`].
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    /// Opens the configured store, creating its schema when needed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Store`] when the pool cannot be built or the
    /// schema cannot be applied.
    pub fn connect(&self) -> Result<SqliteKanbanRepository, ConfigError> {
        let pool = build_pool(&self.database_url, self.max_connections, self.busy_timeout())?;
        apply_schema(&pool)?;
        Ok(SqliteKanbanRepository::new(pool))
    }
}

fn parse_override<T: std::str::FromStr>(
    key: &'static str,
    value: String,
) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidOverride { key, value })
}
