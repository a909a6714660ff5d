use std::env;
use std::str::FromStr;

use tokio_postgres::Config as PgConfig;

use crate::error::StorageError;

/// Connection settings for a Postgres storage.
///
/// The DSN is any connection string `tokio_postgres` accepts (URL or
/// key/value form); user and password, when present, overlay whatever the
/// DSN carries.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub dsn: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl PostgresConfig {
    #[must_use]
    pub fn new(dsn: impl Into<String>) -> Self {
        Self {
            dsn: dsn.into(),
            user: None,
            password: None,
        }
    }

    #[must_use]
    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Read the configuration from `DB_DSN`, `DB_USER` and `DB_PASS`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if `DB_DSN` is not set.
    pub fn from_env() -> Result<Self, StorageError> {
        let dsn = env::var("DB_DSN")
            .map_err(|_| StorageError::ConfigError("DB_DSN is required".to_string()))?;
        Ok(Self {
            dsn,
            user: env::var("DB_USER").ok(),
            password: env::var("DB_PASS").ok(),
        })
    }

    pub(crate) fn to_pg_config(&self) -> Result<PgConfig, StorageError> {
        let mut cfg = PgConfig::from_str(&self.dsn)
            .map_err(|e| StorageError::ConfigError(format!("invalid postgres DSN: {e}")))?;
        if let Some(user) = &self.user {
            cfg.user(user);
        }
        if let Some(password) = &self.password {
            cfg.password(password);
        }
        Ok(cfg)
    }
}
