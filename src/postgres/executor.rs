use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio_postgres::{Client, NoTls};

use super::config::PostgresConfig;
use super::params::as_pg_params;
use super::query::build_result_set;
use crate::error::StorageError;
use crate::query::{
    PlaceholderStyle, QueryAndParams, build_delete, build_find, build_find_all, build_find_one,
    build_insert, build_update,
};
use crate::results::{ResultSet, StorageRow};
use crate::storage::Storage;
use crate::types::{FetchMode, RowValues};

fn query_err(err: tokio_postgres::Error) -> StorageError {
    StorageError::QueryError(err.to_string())
}

/// Postgres-backed [`Storage`] implementation.
///
/// Owns at most one `tokio_postgres` client, connected lazily on first use.
/// The connection's I/O task is spawned alongside the client and joined
/// again by [`Storage::close`], so teardown is deterministic.
pub struct PostgresStorage {
    config: PostgresConfig,
    client: Option<Client>,
    driver: Option<JoinHandle<()>>,
}

impl PostgresStorage {
    #[must_use]
    pub fn new(config: PostgresConfig) -> Self {
        Self {
            config,
            client: None,
            driver: None,
        }
    }

    /// Build a storage from `DB_DSN`/`DB_USER`/`DB_PASS`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigError` if `DB_DSN` is not set.
    pub fn from_env() -> Result<Self, StorageError> {
        Ok(Self::new(PostgresConfig::from_env()?))
    }

    async fn connection(&mut self) -> Result<&Client, StorageError> {
        if self.client.is_none() {
            let pg_config = self.config.to_pg_config()?;
            let (client, connection) = pg_config
                .connect(NoTls)
                .await
                .map_err(|e| StorageError::ConnectionError(e.to_string()))?;
            let driver = tokio::spawn(async move {
                if let Err(err) = connection.await {
                    tracing::warn!(error = %err, "postgres connection task ended with error");
                }
            });
            tracing::debug!("opened postgres connection");
            self.client = Some(client);
            self.driver = Some(driver);
        }
        self.client
            .as_ref()
            .ok_or_else(|| StorageError::ConnectionError("postgres connection unavailable".into()))
    }

    async fn run_select(
        &mut self,
        query_and_params: &QueryAndParams,
        mode: FetchMode,
    ) -> Result<ResultSet, StorageError> {
        let client = self.connection().await?;
        tracing::debug!(sql = %query_and_params.query, "executing postgres select");
        let stmt = client
            .prepare(&query_and_params.query)
            .await
            .map_err(query_err)?;
        let params = as_pg_params(&query_and_params.params);
        let rows = client.query(&stmt, &params).await.map_err(query_err)?;
        build_result_set(&stmt, &rows, mode)
    }

    async fn run_dml(&mut self, query_and_params: &QueryAndParams) -> Result<usize, StorageError> {
        let client = self.connection().await?;
        tracing::debug!(sql = %query_and_params.query, "executing postgres dml");
        let stmt = client
            .prepare(&query_and_params.query)
            .await
            .map_err(query_err)?;
        let params = as_pg_params(&query_and_params.params);
        let rows = client.execute(&stmt, &params).await.map_err(query_err)?;
        usize::try_from(rows)
            .map_err(|e| StorageError::QueryError(format!("affected rows conversion error: {e}")))
    }
}

#[async_trait]
impl Storage for PostgresStorage {
    async fn connect(&mut self) -> Result<(), StorageError> {
        self.connection().await.map(|_| ())
    }

    async fn close(&mut self) -> Result<(), StorageError> {
        // Dropping the client ends the connection task.
        drop(self.client.take());
        if let Some(driver) = self.driver.take() {
            driver.await.map_err(|e| {
                StorageError::ConnectionError(format!("postgres connection task failed: {e}"))
            })?;
            tracing::debug!("closed postgres connection");
        }
        Ok(())
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), StorageError> {
        let client = self.connection().await?;
        client.batch_execute(sql).await.map_err(query_err)
    }

    async fn find_all(
        &mut self,
        table: &str,
        columns: &[&str],
        mode: FetchMode,
    ) -> Result<ResultSet, StorageError> {
        let q = build_find_all(table, columns)?;
        self.run_select(&q, mode).await
    }

    async fn find_one(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
        columns: &[&str],
    ) -> Result<Option<StorageRow>, StorageError> {
        let q = build_find_one(PlaceholderStyle::Postgres, table, condition, columns)?;
        let mut result_set = self.run_select(&q, FetchMode::Associative).await?;
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
        let q = build_find(PlaceholderStyle::Postgres, table, conditions, columns)?;
        self.run_select(&q, FetchMode::Associative).await
    }

    async fn insert(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
    ) -> Result<bool, StorageError> {
        let q = build_insert(PlaceholderStyle::Postgres, table, data)?;
        self.run_dml(&q).await?;
        Ok(true)
    }

    async fn update(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
        conditions: &[(&str, &str, RowValues)],
    ) -> Result<bool, StorageError> {
        let q = build_update(PlaceholderStyle::Postgres, table, data, conditions)?;
        self.run_dml(&q).await?;
        Ok(true)
    }

    async fn delete(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
    ) -> Result<bool, StorageError> {
        let q = build_delete(PlaceholderStyle::Postgres, table, condition)?;
        self.run_dml(&q).await?;
        Ok(true)
    }
}
