use std::env;

use crate::error::StorageError;

/// Connection settings for a `SQLite` storage.
#[derive(Debug, Clone)]
pub struct SqliteConfig {
    /// Database path; `:memory:` and `file:` URIs are accepted.
    pub db_path: String,
}

impl SqliteConfig {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    /// Build the configuration from a DSN, stripping an optional `sqlite:`
    /// prefix.
    #[must_use]
    pub fn from_dsn(dsn: &str) -> Self {
        Self::new(dsn.strip_prefix("sqlite:").unwrap_or(dsn))
    }

    /// Read the configuration from `DB_DSN`. `DB_USER` and `DB_PASS` are
    /// accepted for parity with other backends; the sqlite driver has no use
    /// for them.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if `DB_DSN` is not set.
    pub fn from_env() -> Result<Self, StorageError> {
        let dsn = env::var("DB_DSN")
            .map_err(|_| StorageError::ConfigError("DB_DSN is required".to_string()))?;
        let _ = env::var("DB_USER");
        let _ = env::var("DB_PASS");
        Ok(Self::from_dsn(&dsn))
    }
}
