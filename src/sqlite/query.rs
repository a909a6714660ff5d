use std::sync::Arc;

use rusqlite::types::Value;
use rusqlite::{Statement, ToSql};

use crate::error::StorageError;
use crate::results::ResultSet;
use crate::types::{FetchMode, RowValues};

fn query_err(err: rusqlite::Error) -> StorageError {
    StorageError::QueryError(err.to_string())
}

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `StorageError::QueryError` if the value cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<RowValues, StorageError> {
    let value: Value = row.get(idx).map_err(query_err)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Run a prepared `SQLite` statement and collect its rows.
///
/// Numeric fetch mode leaves the column-name list empty, so rows come back
/// index-addressable only.
///
/// # Errors
///
/// Returns `StorageError::QueryError` if execution or row extraction fails.
pub fn build_result_set(
    stmt: &mut Statement,
    params: &[Value],
    mode: FetchMode,
) -> Result<ResultSet, StorageError> {
    let param_refs: Vec<&dyn ToSql> = params.iter().map(|v| v as &dyn ToSql).collect();
    let column_count = stmt.column_count();
    let column_names: Vec<String> = match mode {
        FetchMode::Associative => stmt
            .column_names()
            .iter()
            .map(std::string::ToString::to_string)
            .collect(),
        FetchMode::Numeric => Vec::new(),
    };

    let mut rows_iter = stmt.query(&param_refs[..]).map_err(query_err)?;
    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    while let Some(row) = rows_iter.next().map_err(query_err)? {
        let mut row_values = Vec::with_capacity(column_count);
        for i in 0..column_count {
            row_values.push(extract_value(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
