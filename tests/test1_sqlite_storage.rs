#![cfg(feature = "sqlite")]

use storage_middleware::prelude::*;

const TEST_TABLE_NAME: &str = "test_table";

fn storage() -> SqliteStorage {
    SqliteStorage::new(SqliteConfig::new(":memory:"))
}

async fn refresh_database(storage: &mut SqliteStorage) -> Result<(), StorageError> {
    storage
        .execute_batch(
            "
            CREATE TABLE IF NOT EXISTS test_table (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL
            );
        ",
        )
        .await
}

fn text(s: &str) -> RowValues {
    RowValues::Text(s.to_string())
}

fn assert_parameter_error(result: StorageError, expected: &str) {
    match result {
        StorageError::ParameterError(msg) => assert_eq!(msg, expected),
        other => panic!("expected ParameterError, got {other:?}"),
    }
}

#[test]
fn test_insert() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        let err = storage
            .insert("", &[("name", text("John"))])
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide a name of database table.");

        let err = storage.insert(TEST_TABLE_NAME, &[]).await.unwrap_err();
        assert_parameter_error(err, "Please, provide data for insert query.");

        let err = storage
            .insert(TEST_TABLE_NAME, &[("names", text("John"))])
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("has no column named names"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let err = storage
            .insert("test_tabled", &[("names", text("John"))])
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such table: test_tabled"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let err = storage
            .insert("test_tabled", &[("0", text("name"))])
            .await
            .unwrap_err();
        match err {
            StorageError::ParameterError(msg) => {
                assert!(msg.starts_with("The format of insert data is wrong."));
            }
            other => panic!("expected ParameterError, got {other:?}"),
        }

        let result = storage
            .insert(TEST_TABLE_NAME, &[("name", text("John"))])
            .await?;
        assert!(result);

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_update() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        for name in ["John", "Peter", "Jack", "John"] {
            storage.insert(TEST_TABLE_NAME, &[("name", text(name))]).await?;
        }

        let conditions = [
            ("name", "=", text("John")),
            ("id", ">", RowValues::Int(1)),
        ];

        let err = storage
            .update("", &[("name", text("John Updated"))], &conditions)
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide a name of database table.");

        let err = storage
            .update(TEST_TABLE_NAME, &[], &conditions)
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide data for update query.");

        let err = storage
            .update(TEST_TABLE_NAME, &[("name", text("John Updated"))], &[])
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide condition values.");

        let err = storage
            .update(TEST_TABLE_NAME, &[("named", text("John Updated"))], &conditions)
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such column: named"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let err = storage
            .update(
                TEST_TABLE_NAME,
                &[("name", text("John Updated"))],
                &[("name", "=", text("John")), ("ids", ">", RowValues::Int(1))],
            )
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such column: ids"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let err = storage
            .update(TEST_TABLE_NAME, &[("0", text("name"))], &conditions)
            .await
            .unwrap_err();
        match err {
            StorageError::ParameterError(msg) => {
                assert!(msg.starts_with("The format of update data is wrong."));
            }
            other => panic!("expected ParameterError, got {other:?}"),
        }

        let result = storage
            .update(TEST_TABLE_NAME, &[("name", text("John Updated"))], &conditions)
            .await?;
        assert!(result);

        let row = storage
            .find_one(TEST_TABLE_NAME, &[("id", RowValues::Int(4))], &[])
            .await?
            .expect("row 4 should exist");
        assert_eq!(row.get("name").unwrap().as_text().unwrap(), "John Updated");

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_update_applies_only_first_data_pair() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        storage.insert(TEST_TABLE_NAME, &[("name", text("John"))]).await?;
        storage.insert(TEST_TABLE_NAME, &[("name", text("Peter"))]).await?;

        // Extra data pairs are silently ignored; only the first column is set.
        storage
            .update(
                TEST_TABLE_NAME,
                &[("name", text("Renamed")), ("id", RowValues::Int(99))],
                &[("id", "=", RowValues::Int(2))],
            )
            .await?;

        let row = storage
            .find_one(TEST_TABLE_NAME, &[("id", RowValues::Int(2))], &[])
            .await?
            .expect("row 2 should keep its id");
        assert_eq!(row.get("name").unwrap().as_text().unwrap(), "Renamed");

        let missing = storage
            .find_one(TEST_TABLE_NAME, &[("id", RowValues::Int(99))], &[])
            .await?;
        assert!(missing.is_none(), "second data pair must not be applied");

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_delete() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        for name in ["John", "Peter", "Jack"] {
            storage.insert(TEST_TABLE_NAME, &[("name", text(name))]).await?;
        }

        let data = storage
            .find_all(TEST_TABLE_NAME, &[], FetchMode::Associative)
            .await?;
        assert_eq!(data.len(), 3);

        let err = storage
            .delete("", &[("id", RowValues::Int(1))])
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide a name of database table.");

        let err = storage.delete(TEST_TABLE_NAME, &[]).await.unwrap_err();
        assert_parameter_error(err, "Please, provide condition values.");

        let err = storage
            .delete(TEST_TABLE_NAME, &[("ids", RowValues::Int(1))])
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such column: ids"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let err = storage
            .delete(TEST_TABLE_NAME, &[("0", text("id"))])
            .await
            .unwrap_err();
        match err {
            StorageError::ParameterError(msg) => {
                assert!(msg.starts_with("The format of delete data is wrong."));
            }
            other => panic!("expected ParameterError, got {other:?}"),
        }

        storage
            .delete(TEST_TABLE_NAME, &[("id", RowValues::Int(1))])
            .await?;

        let data = storage
            .find_all(TEST_TABLE_NAME, &[], FetchMode::Associative)
            .await?;
        assert_eq!(data.len(), 2);

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_find_all() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        // An empty table is an empty result, not an error.
        let data = storage
            .find_all(TEST_TABLE_NAME, &[], FetchMode::Associative)
            .await?;
        assert!(data.is_empty());

        for name in ["John", "Peter", "Jack"] {
            storage.insert(TEST_TABLE_NAME, &[("name", text(name))]).await?;
        }

        let err = storage
            .find_all("", &["id", "name"], FetchMode::Associative)
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide a name of database table.");

        let err = storage
            .find_all(TEST_TABLE_NAME, &["id", "named"], FetchMode::Associative)
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such column: named"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let data = storage
            .find_all(TEST_TABLE_NAME, &["id", "name"], FetchMode::Associative)
            .await?;
        assert_eq!(data.len(), 3);
        assert_eq!(
            data.results[0].get("name").unwrap().as_text().unwrap(),
            "John"
        );

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_find_all_numeric_mode() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;
        storage.insert(TEST_TABLE_NAME, &[("name", text("John"))]).await?;

        let data = storage
            .find_all(TEST_TABLE_NAME, &["id", "name"], FetchMode::Numeric)
            .await?;
        assert_eq!(data.len(), 1);

        let row = &data.results[0];
        assert!(row.get("name").is_none(), "numeric rows have no column names");
        assert_eq!(row.get_by_index(0).unwrap().as_int().unwrap(), &1);
        assert_eq!(row.get_by_index(1).unwrap().as_text().unwrap(), "John");

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_find_one() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        for name in ["John", "Peter", "Jack"] {
            storage.insert(TEST_TABLE_NAME, &[("name", text(name))]).await?;
        }

        let err = storage
            .find_one("", &[("name", text("John"))], &[])
            .await
            .unwrap_err();
        assert_parameter_error(err, "Please, provide a name of database table.");

        let err = storage.find_one(TEST_TABLE_NAME, &[], &[]).await.unwrap_err();
        assert_parameter_error(err, "Please, provide condition values.");

        let err = storage
            .find_one(TEST_TABLE_NAME, &[("names", text("John"))], &[])
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such column: names"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let err = storage
            .find_one(TEST_TABLE_NAME, &[("0", text("name"))], &[])
            .await
            .unwrap_err();
        match err {
            StorageError::ParameterError(msg) => {
                assert!(msg.starts_with("The format of condition data is wrong."));
            }
            other => panic!("expected ParameterError, got {other:?}"),
        }

        let row = storage
            .find_one(TEST_TABLE_NAME, &[("name", text("John"))], &[])
            .await?
            .expect("John should be found");
        assert_eq!(row.get("name").unwrap().as_text().unwrap(), "John");

        let missing = storage
            .find_one(TEST_TABLE_NAME, &[("name", text("Nobody"))], &[])
            .await?;
        assert!(missing.is_none());

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_find() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        for name in ["John", "Peter", "Jack", "John"] {
            storage.insert(TEST_TABLE_NAME, &[("name", text(name))]).await?;
        }

        let conditions = [
            ("name", "=", text("John")),
            ("id", ">", RowValues::Int(1)),
        ];

        let err = storage.find("", &conditions, &[]).await.unwrap_err();
        assert_parameter_error(err, "Please, provide a name of database table.");

        let err = storage.find(TEST_TABLE_NAME, &[], &[]).await.unwrap_err();
        assert_parameter_error(err, "Please, provide condition values.");

        let err = storage
            .find(
                TEST_TABLE_NAME,
                &[("names", "=", text("John")), ("id", ">", RowValues::Int(1))],
                &[],
            )
            .await
            .unwrap_err();
        match err {
            StorageError::QueryError(msg) => {
                assert!(
                    msg.contains("no such column: names"),
                    "unexpected driver message: {msg}"
                );
            }
            other => panic!("expected QueryError, got {other:?}"),
        }

        let data = storage.find(TEST_TABLE_NAME, &conditions, &[]).await?;
        assert_eq!(data.len(), 1);
        assert_eq!(
            data.results[0].get("name").unwrap().as_text().unwrap(),
            "John"
        );

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_find_duplicate_column_binds_later_value() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let mut storage = storage();
        refresh_database(&mut storage).await?;

        for name in ["John", "Peter", "Jack", "John"] {
            storage.insert(TEST_TABLE_NAME, &[("name", text(name))]).await?;
        }

        // Both predicates share one bind and the later value wins, so this
        // evaluates as id > 10 AND id < 10 and matches nothing.
        let data = storage
            .find(
                TEST_TABLE_NAME,
                &[("id", ">", RowValues::Int(1)), ("id", "<", RowValues::Int(10))],
                &[],
            )
            .await?;
        assert!(data.is_empty());

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_close_then_reconnect() -> Result<(), Box<dyn std::error::Error>> {
    let rt = tokio::runtime::Runtime::new()?;
    let dir = tempfile::tempdir()?;
    let db_path = dir.path().join("storage.db");
    let db_path = db_path.to_string_lossy().to_string();

    rt.block_on(async move {
        let mut storage = SqliteStorage::new(SqliteConfig::new(&db_path));
        refresh_database(&mut storage).await?;
        storage.insert(TEST_TABLE_NAME, &[("name", text("John"))]).await?;

        storage.close().await?;

        // The next operation reconnects lazily against the same file.
        let data = storage
            .find_all(TEST_TABLE_NAME, &[], FetchMode::Associative)
            .await?;
        assert_eq!(data.len(), 1);

        Ok::<(), StorageError>(())
    })?;
    Ok(())
}

#[test]
fn test_from_env_requires_dsn() -> Result<(), Box<dyn std::error::Error>> {
    // When the variable is absent the constructor reports a config error;
    // environments that define DB_DSN get a storage instead.
    match SqliteStorage::from_env() {
        Ok(_) => assert!(std::env::var("DB_DSN").is_ok()),
        Err(StorageError::ConfigError(msg)) => {
            assert_eq!(msg, "DB_DSN is required");
            assert!(std::env::var("DB_DSN").is_err());
        }
        Err(other) => panic!("unexpected error: {other:?}"),
    }
    Ok(())
}
