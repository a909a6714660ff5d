use std::sync::Arc;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use tokio_postgres::{Row, Statement};

use crate::error::StorageError;
use crate::results::ResultSet;
use crate::types::{FetchMode, RowValues};

fn query_err(err: tokio_postgres::Error) -> StorageError {
    StorageError::QueryError(err.to_string())
}

/// Extract a `RowValues` from a `tokio_postgres` row at the given index,
/// dispatching on the column's reported type.
///
/// # Errors
///
/// Returns `StorageError::QueryError` if the value cannot be read.
pub fn extract_value(row: &Row, idx: usize) -> Result<RowValues, StorageError> {
    let type_name = row.columns()[idx].type_().name();

    match type_name {
        "int2" => {
            let val: Option<i16> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, |v| RowValues::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<JsonValue> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::JSON))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::Blob))
        }
        // Everything else, text types included, comes back as a string.
        _ => {
            let val: Option<String> = row.try_get(idx).map_err(query_err)?;
            Ok(val.map_or(RowValues::Null, RowValues::Text))
        }
    }
}

/// Collect executed rows into a result set, using statement metadata for
/// column names so empty results keep their shape.
///
/// # Errors
///
/// Returns `StorageError::QueryError` if row extraction fails.
pub fn build_result_set(
    stmt: &Statement,
    rows: &[Row],
    mode: FetchMode,
) -> Result<ResultSet, StorageError> {
    let column_count = stmt.columns().len();
    let column_names: Vec<String> = match mode {
        FetchMode::Associative => stmt
            .columns()
            .iter()
            .map(|col| col.name().to_string())
            .collect(),
        FetchMode::Numeric => Vec::new(),
    };

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}
