use thiserror::Error;

/// Errors returned by every storage operation.
///
/// Driver errors are converted to strings at the call boundary, so callers
/// match on the variant and never on a driver type. All variants are
/// recoverable; nothing here aborts the process.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Input shape/presence validation failed. Raised before any SQL is
    /// built or sent; deterministic for the same inputs.
    #[error("Parameter error: {0}")]
    ParameterError(String),

    /// The driver rejected the constructed SQL or its execution. The
    /// message is the driver's own diagnostic text, unmodified.
    #[error("An error occurred while process of the query. {0}")]
    QueryError(String),

    /// The initial connection handle could not be established.
    #[error("Database connection failed: {0}")]
    ConnectionError(String),

    /// Missing or malformed environment configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}
