use async_trait::async_trait;

use crate::error::StorageError;
use crate::results::{ResultSet, StorageRow};
use crate::types::{FetchMode, RowValues};

/// The capability set every storage backend implements.
///
/// All operations share a two-phase structure: local shape validation first
/// (no I/O, `ParameterError`), then SQL construction and execution
/// (`QueryError` on driver failure). Each call is awaited to completion
/// before the caller proceeds; no operation retries.
///
/// Condition and data maps are ordered column/value slices. Passing a
/// positional list-shaped structure (keys `"0".."n-1"`) where a keyed map is
/// required is a shape error, raised before any SQL is built.
#[async_trait]
pub trait Storage: Send {
    /// Establish the backend connection from this storage's configuration.
    ///
    /// Connects at most once per storage value; operations call this lazily
    /// on first use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConnectionError` if the handle cannot be
    /// established.
    async fn connect(&mut self) -> Result<(), StorageError>;

    /// Release the backend connection. Subsequent operations reconnect
    /// lazily.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConnectionError` if teardown fails.
    async fn close(&mut self) -> Result<(), StorageError>;

    /// Execute one or more raw statements with no parameters. Intended for
    /// schema setup; CRUD traffic should use the typed operations.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::QueryError` if the driver rejects a statement.
    async fn execute_batch(&mut self, sql: &str) -> Result<(), StorageError>;

    /// `SELECT <columns|*> FROM <table>` with no conditions. An empty table
    /// returns an empty result set, not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ParameterError` for an empty table name,
    /// `StorageError::QueryError` on driver failure.
    async fn find_all(
        &mut self,
        table: &str,
        columns: &[&str],
        mode: FetchMode,
    ) -> Result<ResultSet, StorageError>;

    /// Fetch the first row matching an exact-equality condition, or `None`.
    /// Only the first pair of the condition map is used.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ParameterError` for an empty table name or an
    /// empty/list-shaped condition, `StorageError::QueryError` on driver
    /// failure.
    async fn find_one(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
        columns: &[&str],
    ) -> Result<Option<StorageRow>, StorageError>;

    /// Fetch all rows matching a list of (column, operator, value) triples,
    /// ANDed in input order. Operators pass through verbatim. Conditions
    /// naming the same column share one bind; the later value wins.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ParameterError` for an empty table name or an
    /// empty condition list, `StorageError::QueryError` on driver failure.
    async fn find(
        &mut self,
        table: &str,
        conditions: &[(&str, &str, RowValues)],
        columns: &[&str],
    ) -> Result<ResultSet, StorageError>;

    /// Insert one row; column order is data-map order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ParameterError` for an empty table name or an
    /// empty/list-shaped data map, `StorageError::QueryError` on driver
    /// failure.
    async fn insert(&mut self, table: &str, data: &[(&str, RowValues)])
    -> Result<bool, StorageError>;

    /// Update rows matching the conditions. Only the first pair of the data
    /// map is applied; extra pairs are silently ignored.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ParameterError` for an empty table name,
    /// empty/list-shaped data, or empty conditions;
    /// `StorageError::QueryError` on driver failure.
    async fn update(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
        conditions: &[(&str, &str, RowValues)],
    ) -> Result<bool, StorageError>;

    /// Delete rows matching an exact-equality condition. Only the first pair
    /// of the condition map is used.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ParameterError` for an empty table name or an
    /// empty/list-shaped condition, `StorageError::QueryError` on driver
    /// failure.
    async fn delete(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
    ) -> Result<bool, StorageError>;
}
