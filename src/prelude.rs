//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types
//! to make it easier to get started with the library.

pub use crate::{
    FetchMode, PlaceholderStyle, QueryAndParams, ResultSet, RowValues, Storage, StorageContext,
    StorageError, StorageRow,
};

#[cfg(feature = "postgres")]
pub use crate::postgres::{PostgresConfig, PostgresStorage};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteConfig, SqliteStorage};
