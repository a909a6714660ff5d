use crate::error::StorageError;
use crate::results::{ResultSet, StorageRow};
use crate::storage::Storage;
use crate::types::{FetchMode, RowValues};

/// Strategy holder for one interchangeable [`Storage`] backend.
///
/// Holds exactly one implementation and forwards calls unchanged, so the
/// backend can be swapped at runtime without touching call sites:
/// ```rust,no_run
/// # use storage_middleware::{SqliteStorage, StorageContext};
/// let mut context = StorageContext::new(Box::new(SqliteStorage::from_env()?));
/// # Ok::<(), storage_middleware::StorageError>(())
/// ```
pub struct StorageContext {
    storage: Box<dyn Storage + Send>,
}

impl StorageContext {
    #[must_use]
    pub fn new(storage: Box<dyn Storage + Send>) -> Self {
        Self { storage }
    }

    /// Replace the held backend.
    pub fn set_storage(&mut self, storage: Box<dyn Storage + Send>) {
        self.storage = storage;
    }

    /// Borrow the held backend.
    #[must_use]
    pub fn storage(&self) -> &(dyn Storage + Send) {
        self.storage.as_ref()
    }

    /// Mutably borrow the held backend.
    pub fn storage_mut(&mut self) -> &mut (dyn Storage + Send) {
        self.storage.as_mut()
    }

    // Forwarding; no validation and no state beyond the held reference.

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn connect(&mut self) -> Result<(), StorageError> {
        self.storage.connect().await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn close(&mut self) -> Result<(), StorageError> {
        self.storage.close().await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn execute_batch(&mut self, sql: &str) -> Result<(), StorageError> {
        self.storage.execute_batch(sql).await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn find_all(
        &mut self,
        table: &str,
        columns: &[&str],
        mode: FetchMode,
    ) -> Result<ResultSet, StorageError> {
        self.storage.find_all(table, columns, mode).await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn find_one(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
        columns: &[&str],
    ) -> Result<Option<StorageRow>, StorageError> {
        self.storage.find_one(table, condition, columns).await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn find(
        &mut self,
        table: &str,
        conditions: &[(&str, &str, RowValues)],
        columns: &[&str],
    ) -> Result<ResultSet, StorageError> {
        self.storage.find(table, conditions, columns).await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn insert(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
    ) -> Result<bool, StorageError> {
        self.storage.insert(table, data).await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn update(
        &mut self,
        table: &str,
        data: &[(&str, RowValues)],
        conditions: &[(&str, &str, RowValues)],
    ) -> Result<bool, StorageError> {
        self.storage.update(table, data, conditions).await
    }

    /// # Errors
    ///
    /// Propagates the backend's error unchanged.
    pub async fn delete(
        &mut self,
        table: &str,
        condition: &[(&str, RowValues)],
    ) -> Result<bool, StorageError> {
        self.storage.delete(table, condition).await
    }
}
