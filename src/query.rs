use crate::error::StorageError;
use crate::types::RowValues;

/// A query and its parameters bundled together.
///
/// Every builder below returns one of these; the parameter order matches the
/// placeholder numbering in the query text.
#[derive(Debug, Clone)]
pub struct QueryAndParams {
    /// The SQL query string
    pub query: String,
    /// The parameters to be bound to the query
    pub params: Vec<RowValues>,
}

impl QueryAndParams {
    /// Create a new `QueryAndParams` with the given query string and parameters
    pub fn new(query: impl Into<String>, params: Vec<RowValues>) -> Self {
        Self {
            query: query.into(),
            params,
        }
    }

    /// Create a new `QueryAndParams` with no parameters
    pub fn new_without_params(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            params: Vec::new(),
        }
    }
}

/// Placeholder dialect emitted by the query builders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// PostgreSQL-style placeholders like `$1`.
    Postgres,
    /// SQLite-style placeholders like `?1`.
    Sqlite,
}

impl PlaceholderStyle {
    fn placeholder(self, n: usize) -> String {
        match self {
            PlaceholderStyle::Postgres => format!("${n}"),
            PlaceholderStyle::Sqlite => format!("?{n}"),
        }
    }
}

pub(crate) const MSG_TABLE_NAME: &str = "Please, provide a name of database table.";
pub(crate) const MSG_CONDITION_VALUES: &str = "Please, provide condition values.";
pub(crate) const MSG_INSERT_DATA: &str = "Please, provide data for insert query.";
pub(crate) const MSG_UPDATE_DATA: &str = "Please, provide data for update query.";

fn wrong_format(kind: &str) -> StorageError {
    StorageError::ParameterError(format!(
        "The format of {kind} data is wrong. Right format is ['column' => 'value']"
    ))
}

fn ensure_table_name(table: &str) -> Result<(), StorageError> {
    if table.is_empty() {
        return Err(StorageError::ParameterError(MSG_TABLE_NAME.to_string()));
    }
    Ok(())
}

/// Reject positional/list-shaped input: keys forming the contiguous integer
/// sequence `"0".."n-1"` mean the caller supplied a plain list where an
/// associative column/value mapping was required.
fn ensure_keyed(
    kind: &str,
    data: &[(&str, RowValues)],
    empty_message: &str,
) -> Result<(), StorageError> {
    if data.is_empty() {
        return Err(StorageError::ParameterError(empty_message.to_string()));
    }
    let positional = data
        .iter()
        .enumerate()
        .all(|(i, (key, _))| *key == i.to_string());
    if positional {
        return Err(wrong_format(kind));
    }
    Ok(())
}

fn column_list(columns: &[&str]) -> String {
    if columns.is_empty() {
        "*".to_string()
    } else {
        columns.join(", ")
    }
}

/// Render a condition list as `col op <placeholder> AND ...`, assigning one
/// placeholder slot per unique column name in first-occurrence order.
///
/// Conditions naming the same column share a slot and the later value
/// overwrites the earlier one, as in a flat named-placeholder namespace.
/// Both backends produce identical results for such input.
fn condition_clause(
    style: PlaceholderStyle,
    conditions: &[(&str, &str, RowValues)],
    first_slot: usize,
) -> (String, Vec<RowValues>) {
    let mut slots: Vec<(&str, RowValues)> = Vec::new();
    let mut parts = Vec::with_capacity(conditions.len());

    for &(column, operator, ref value) in conditions {
        let slot = match slots.iter().position(|&(name, _)| name == column) {
            Some(idx) => {
                slots[idx].1 = value.clone();
                idx
            }
            None => {
                slots.push((column, value.clone()));
                slots.len() - 1
            }
        };
        parts.push(format!(
            "{column} {operator} {}",
            style.placeholder(first_slot + slot)
        ));
    }

    let values = slots.into_iter().map(|(_, value)| value).collect();
    (parts.join(" AND "), values)
}

/// Build `SELECT <cols|*> FROM <table>` with no conditions.
///
/// # Errors
///
/// Returns `StorageError::ParameterError` if the table name is empty.
pub fn build_find_all(table: &str, columns: &[&str]) -> Result<QueryAndParams, StorageError> {
    ensure_table_name(table)?;

    let statement = column_list(columns);
    Ok(QueryAndParams::new_without_params(format!(
        "SELECT {statement} FROM {table}"
    )))
}

/// Build a single-condition `SELECT`. Only the first pair of the condition
/// map is used; extra pairs are ignored.
///
/// # Errors
///
/// Returns `StorageError::ParameterError` if the table name is empty or the
/// condition map is empty or list-shaped.
pub fn build_find_one(
    style: PlaceholderStyle,
    table: &str,
    condition: &[(&str, RowValues)],
    columns: &[&str],
) -> Result<QueryAndParams, StorageError> {
    ensure_table_name(table)?;
    ensure_keyed("condition", condition, MSG_CONDITION_VALUES)?;

    let (column, value) = &condition[0];
    let statement = column_list(columns);
    let sql = format!(
        "SELECT {statement} FROM {table} WHERE {column} = {}",
        style.placeholder(1)
    );
    Ok(QueryAndParams::new(sql, vec![value.clone()]))
}

/// Build a multi-condition `SELECT`; conditions are ANDed in input order.
///
/// # Errors
///
/// Returns `StorageError::ParameterError` if the table name is empty or the
/// condition list is empty.
pub fn build_find(
    style: PlaceholderStyle,
    table: &str,
    conditions: &[(&str, &str, RowValues)],
    columns: &[&str],
) -> Result<QueryAndParams, StorageError> {
    ensure_table_name(table)?;
    if conditions.is_empty() {
        return Err(StorageError::ParameterError(
            MSG_CONDITION_VALUES.to_string(),
        ));
    }

    let statement = column_list(columns);
    let (clause, params) = condition_clause(style, conditions, 1);
    let sql = format!("SELECT {statement} FROM {table} WHERE {clause}");
    Ok(QueryAndParams::new(sql, params))
}

/// Build an `INSERT` from a data map; column order is map order.
///
/// # Errors
///
/// Returns `StorageError::ParameterError` if the table name is empty or the
/// data map is empty or list-shaped.
pub fn build_insert(
    style: PlaceholderStyle,
    table: &str,
    data: &[(&str, RowValues)],
) -> Result<QueryAndParams, StorageError> {
    ensure_table_name(table)?;
    ensure_keyed("insert", data, MSG_INSERT_DATA)?;

    let mut slots: Vec<(&str, RowValues)> = Vec::new();
    let mut placeholders = Vec::with_capacity(data.len());
    for &(column, ref value) in data {
        let slot = match slots.iter().position(|&(name, _)| name == column) {
            Some(idx) => {
                slots[idx].1 = value.clone();
                idx
            }
            None => {
                slots.push((column, value.clone()));
                slots.len() - 1
            }
        };
        placeholders.push(style.placeholder(1 + slot));
    }

    let columns = data
        .iter()
        .map(|(column, _)| *column)
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {table} ({columns}) VALUES ({})",
        placeholders.join(", ")
    );
    let params = slots.into_iter().map(|(_, value)| value).collect();
    Ok(QueryAndParams::new(sql, params))
}

/// Build an `UPDATE`. Only the first pair of the data map is applied; extra
/// pairs are silently ignored. The SET value gets its own placeholder slot,
/// so a column may appear in both SET and WHERE.
///
/// # Errors
///
/// Returns `StorageError::ParameterError` if the table name is empty, the
/// data map is empty or list-shaped, or the condition list is empty.
pub fn build_update(
    style: PlaceholderStyle,
    table: &str,
    data: &[(&str, RowValues)],
    conditions: &[(&str, &str, RowValues)],
) -> Result<QueryAndParams, StorageError> {
    ensure_table_name(table)?;
    ensure_keyed("update", data, MSG_UPDATE_DATA)?;
    if conditions.is_empty() {
        return Err(StorageError::ParameterError(
            MSG_CONDITION_VALUES.to_string(),
        ));
    }

    let (column_updated, value_updated) = &data[0];
    let (clause, condition_params) = condition_clause(style, conditions, 2);
    let sql = format!(
        "UPDATE {table} SET {column_updated} = {} WHERE {clause}",
        style.placeholder(1)
    );
    let mut params = vec![value_updated.clone()];
    params.extend(condition_params);
    Ok(QueryAndParams::new(sql, params))
}

/// Build a single-condition `DELETE`. Only the first pair of the condition
/// map is used.
///
/// # Errors
///
/// Returns `StorageError::ParameterError` if the table name is empty or the
/// condition map is empty or list-shaped.
pub fn build_delete(
    style: PlaceholderStyle,
    table: &str,
    condition: &[(&str, RowValues)],
) -> Result<QueryAndParams, StorageError> {
    ensure_table_name(table)?;
    ensure_keyed("delete", condition, MSG_CONDITION_VALUES)?;

    let (column, value) = &condition[0];
    let sql = format!(
        "DELETE FROM {table} WHERE {column} = {}",
        style.placeholder(1)
    );
    Ok(QueryAndParams::new(sql, vec![value.clone()]))
}
