mod context;
mod error;
mod results;
mod storage;
mod types;

pub mod query;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub mod prelude;

pub use context::StorageContext;
pub use error::StorageError;
pub use query::{PlaceholderStyle, QueryAndParams};
pub use results::{ResultSet, StorageRow};
pub use storage::Storage;
pub use types::{FetchMode, RowValues};

#[cfg(feature = "postgres")]
pub use postgres::{PostgresConfig, PostgresStorage};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteConfig, SqliteStorage};
