use async_trait::async_trait;
use rusqlite::Connection;

use super::config::SqliteConfig;
use super::params::to_sqlite_values;
use super::query::build_result_set;
use crate::error::StorageError;
use crate::query::{
    PlaceholderStyle, QueryAndParams, build_delete, build_find, build_find_all, build_find_one,
    build_insert, build_update,
};
use crate::results::{ResultSet, StorageRow};
use crate::storage::Storage;
use crate::types::{FetchMode, RowValues};

fn query_err(err: rusqlite::Error) -> StorageError {
    StorageError::QueryError(err.to_string())
}

/// `SQLite`-backed [`Storage`] implementation.
///
/// Owns at most one `rusqlite` connection, opened lazily on first use and
/// reused until [`Storage::close`] drops it. Every statement is prepared by
/// the driver itself; there is no client-side parameter substitution.
pub struct SqliteStorage {
    config: SqliteConfig,
    conn: Option<Connection>,
}

impl SqliteStorage {
    #[must_use]
    pub fn new(config: SqliteConfig) -> Self {
        Self { config, conn: None }
    }

    /// Build a storage from `DB_DSN`/`DB_USER`/`DB_PASS`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if `DB_DSN` is not set.
    pub fn from_env() -> Result<Self, StorageError> {
        Ok(Self::new(SqliteConfig::from_env()?))
    }

    fn connection(&mut self) -> Result<&Connection, StorageError> {
        if self.conn.is_none() {
            let conn = Connection::open(&self.config.db_path)
                .map_err(|e| StorageError::ConnectionError(e.to_string()))?;
            tracing::debug!(db_path = %self.config.db_path, "opened sqlite connection");
            self.conn = Some(conn);
        }
        self.conn
            .as_ref()
            .ok_or_else(|| StorageError::ConnectionError("sqlite connection unavailable".into()))
    }

    fn run_select(
        &mut self,
        query_and_params: &QueryAndParams,
        mode: FetchMode,
    ) -> Result<ResultSet, StorageError> {
        let params = to_sqlite_values(&query_and_params.params);
        let conn = self.connection()?;
        tracing::debug!(sql = %query_and_params.query, "executing sqlite select");
        let mut stmt = conn.prepare(&query_and_params.query).map_err(query_err)?;
        build_result_set(&mut stmt, &params, mode)
    }

    fn run_dml(&mut self, query_and_params: &QueryAndParams) -> Result<usize, StorageError> {
        let params = to_sqlite_values(&query_and_params.params);
        let conn = self.connection()?;
        tracing::debug!(sql = %query_and_params.query, "executing sqlite dml");
        let mut stmt = conn.prepare(&query_and_params.query).map_err(query_err)?;
        let refs: Vec<&dyn rusqlite::ToSql> =
            params.iter().map(|v| v as &dyn rusqlite::ToSql).collect();
        stmt.execute(&refs[..]).map_err(query_err)
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn connect(&mut self) -> Result<(), StorageError> {
        self.connection().map(|_| ())
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        if let Some(conn) = self.conn.take() {
            conn.close()
                .map_err(|(_, err)| StorageError::ConnectionError(err.to_string()))?;
            tracing::debug!("closed sqlite connection");
        }
        Ok(())
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), StorageError> {
        let conn = self.connection()?;
        conn.execute_batch(sql).map_err(query_err)
    }

    async fn find_all(
        &mut self,
        table: &str,
        columns: &[&str],
        mode: FetchMode,
    ) -> Result<ResultSet, StorageError> {
        let q = build_find_all(table, columns)?;
        self.run_select(&q, mode)
    }

    async fn find_one(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
        columns: &[&str],
    ) -> Result<Option<StorageRow>, StorageError> {
        let q = build_find_one(PlaceholderStyle::Sqlite, table, condition, columns)?;
        let mut result_set = self.run_select(&q, FetchMode::Associative)?;
        if result_set.results.is_empty() {
            Ok(None)
        } else {
            Ok(Some(result_set.results.remove(0)))
        }
    }

    async fn find(
        &mut self,
        table: &str,
        conditions: &[(&str, &str, RowValues)],
        columns: &[&str],
    ) -> Result<ResultSet, StorageError> {
        let q = build_find(PlaceholderStyle::Sqlite, table, conditions, columns)?;
        self.run_select(&q, FetchMode::Associative)
    }

    async fn insert(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
    ) -> Result<bool, StorageError> {
        let q = build_insert(PlaceholderStyle::Sqlite, table, data)?;
        self.run_dml(&q)?;
        Ok(true)
    }

    async fn update(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
        conditions: &[(&str, &str, RowValues)],
    ) -> Result<bool, StorageError> {
        let q = build_update(PlaceholderStyle::Sqlite, table, data, conditions)?;
        self.run_dml(&q)?;
        Ok(true)
    }

    async fn delete(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
    ) -> Result<bool, StorageError> {
        let q = build_delete(PlaceholderStyle::Sqlite, table, condition)?;
        self.run_dml(&q)?;
        Ok(true)
    }
}
