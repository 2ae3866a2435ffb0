#![cfg(feature = "libsql")]

use libsql_dialect::prelude::*;
use libsql_dialect::dialect::SqliteIntrospector;
use libsql_dialect::map_raw_result;
use tempfile::TempDir;
use tokio::runtime::Runtime;

const CREATE_BOOK: &str = "CREATE TABLE book (id INTEGER PRIMARY KEY, title TEXT)";

fn file_url(dir: &TempDir) -> String {
    format!("file:{}", dir.path().join("test.db").display())
}

async fn driver_for(dir: &TempDir) -> Result<LibsqlDriver, DialectError> {
    let driver = LibsqlDialect::new(DialectConfig::url(file_url(dir)))
        .create_driver()
        .await?;
    driver.init().await?;
    Ok(driver)
}

async fn create_book_table(driver: &LibsqlDriver) -> Result<(), DialectError> {
    let mut conn = driver.acquire_connection().await?;
    conn.execute_query(&CompiledQuery::raw(CREATE_BOOK)).await?;
    driver.release_connection(conn).await
}

async fn count_books(driver: &LibsqlDriver) -> Result<i64, DialectError> {
    let mut conn = driver.acquire_connection().await?;
    let result = conn
        .execute_query(&CompiledQuery::raw("SELECT COUNT(*) AS cnt FROM book"))
        .await?;
    driver.release_connection(conn).await?;
    Ok(result
        .first()
        .and_then(|row| row.get("cnt"))
        .and_then(Value::as_integer)
        .unwrap_or(-1))
}

#[test]
fn file_url_insert_and_select_by_id() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        assert!(driver.owns_client());
        assert_eq!(driver.client().kind(), TransportKind::Embedded);
        create_book_table(&driver).await?;

        let mut conn = driver.acquire_connection().await?;
        let inserted = conn
            .execute_query(&CompiledQuery::new(
                "INSERT INTO book (title) VALUES (?) RETURNING id",
                vec!["X".into()],
            ))
            .await?;
        assert_eq!(inserted.num_affected_rows, 1);
        let id = inserted
            .first()
            .and_then(|row| row.get("id"))
            .and_then(Value::as_integer)
            .ok_or("missing returned id")?;
        assert_eq!(inserted.insert_id, Some(id));

        let selected = conn
            .execute_query(&CompiledQuery::new(
                "SELECT id, title FROM book WHERE id = ?",
                vec![id.into()],
            ))
            .await?;
        assert_eq!(selected.rows.len(), 1);
        assert_eq!(selected.num_affected_rows, 0);
        let row = &selected.rows[0];
        assert_eq!(row.get("id"), Some(&Value::Integer(id)));
        assert_eq!(row.get("title"), Some(&Value::Text("X".into())));

        driver.release_connection(conn).await?;
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn transaction_round_trip_is_visible_before_and_after_commit()
-> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        create_book_table(&driver).await?;

        let mut conn = driver.acquire_connection().await?;
        driver.begin_transaction(&mut conn).await?;
        conn.execute_query(&CompiledQuery::new(
            "INSERT INTO book (id, title) VALUES (?, ?)",
            vec![7_i64.into(), "Sense and Sensibility".into()],
        ))
        .await?;
        let inside = conn
            .execute_query(&CompiledQuery::new(
                "SELECT title FROM book WHERE id = ?",
                vec![7_i64.into()],
            ))
            .await?;
        assert_eq!(
            inside.first().and_then(|row| row.get("title")),
            Some(&Value::Text("Sense and Sensibility".into()))
        );
        driver.commit_transaction(&mut conn).await?;
        driver.release_connection(conn).await?;

        let mut fresh = driver.acquire_connection().await?;
        let after = fresh
            .execute_query(&CompiledQuery::new(
                "SELECT id, title FROM book WHERE id = ?",
                vec![7_i64.into()],
            ))
            .await?;
        assert_eq!(after.rows.len(), 1);
        assert_eq!(
            after.rows[0].get("title"),
            Some(&Value::Text("Sense and Sensibility".into()))
        );
        driver.release_connection(fresh).await?;
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn rollback_discards_rows() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        create_book_table(&driver).await?;

        let mut conn = driver.acquire_connection().await?;
        driver.begin_transaction(&mut conn).await?;
        conn.execute_query(&CompiledQuery::new(
            "INSERT INTO book (title) VALUES (?)",
            vec!["Robinson Crusoe".into()],
        ))
        .await?;
        driver.rollback_transaction(&mut conn).await?;
        driver.release_connection(conn).await?;

        assert_eq!(count_books(&driver).await?, 0);
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn transaction_state_errors_on_real_sessions() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        let mut conn = driver.acquire_connection().await?;

        assert!(matches!(
            driver.commit_transaction(&mut conn).await,
            Err(DialectError::TransactionState(_))
        ));
        driver.begin_transaction(&mut conn).await?;
        assert!(matches!(
            driver.begin_transaction(&mut conn).await,
            Err(DialectError::TransactionState(_))
        ));
        assert!(conn.in_transaction());
        driver.rollback_transaction(&mut conn).await?;
        assert!(matches!(
            conn.stream_query(&CompiledQuery::raw("SELECT 1"), 10).await,
            Err(DialectError::UnsupportedOperation(_))
        ));

        driver.release_connection(conn).await?;
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn update_reports_affected_rows() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        create_book_table(&driver).await?;

        let mut conn = driver.acquire_connection().await?;
        for title in ["Emma", "Persuasion", "Ulysses"] {
            conn.execute_query(&CompiledQuery::new(
                "INSERT INTO book (title) VALUES (?)",
                vec![title.into()],
            ))
            .await?;
        }
        let updated = conn
            .execute_query(&CompiledQuery::new(
                "UPDATE book SET title = upper(title) WHERE title <> ?",
                vec!["Ulysses".into()],
            ))
            .await?;
        assert_eq!(updated.num_affected_rows, 2);
        assert!(updated.rows.is_empty());

        let listed = conn
            .execute_query(&CompiledQuery::raw("SELECT title FROM book ORDER BY id"))
            .await?;
        let titles: Vec<_> = listed
            .rows
            .iter()
            .filter_map(|row| row.get("title").and_then(Value::as_text))
            .collect();
        assert_eq!(titles, ["EMMA", "PERSUASION", "Ulysses"]);

        driver.release_connection(conn).await?;
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn trigger_writes_and_old_rowids_do_not_leak_into_results()
-> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        create_book_table(&driver).await?;

        let mut conn = driver.acquire_connection().await?;
        conn.execute_query(&CompiledQuery::raw(
            "CREATE TABLE audit (id INTEGER PRIMARY KEY, note TEXT)",
        ))
        .await?;
        let book = conn
            .execute_query(&CompiledQuery::new(
                "INSERT INTO book (id, title) VALUES (?, ?)",
                vec![5_i64.into(), "Emma".into()],
            ))
            .await?;
        assert_eq!(book.num_affected_rows, 1);
        assert_eq!(book.insert_id, Some(5));
        let audit = conn
            .execute_query(&CompiledQuery::new(
                "INSERT INTO audit (note) VALUES (?)",
                vec!["seed".into()],
            ))
            .await?;
        assert_eq!(audit.insert_id, Some(1));

        let trigger = conn
            .execute_query(&CompiledQuery::raw(
                "CREATE TRIGGER book_audit AFTER UPDATE ON book BEGIN \
                 INSERT INTO audit (note) VALUES ('old'); \
                 INSERT INTO audit (note) VALUES ('new'); \
                 END",
            ))
            .await?;
        assert_eq!(trigger.num_affected_rows, 0);

        let updated = conn
            .execute_query(&CompiledQuery::new(
                "UPDATE book SET title = ? WHERE id = ?",
                vec!["EMMA".into(), 5_i64.into()],
            ))
            .await?;
        assert_eq!(updated.num_affected_rows, 1);
        assert_eq!(updated.insert_id, None);

        let counted = conn
            .execute_query(&CompiledQuery::raw("SELECT COUNT(*) AS cnt FROM audit"))
            .await?;
        assert_eq!(counted.num_affected_rows, 0);
        assert_eq!(counted.insert_id, None);
        assert_eq!(
            counted.first().and_then(|row| row.get("cnt")),
            Some(&Value::Integer(3))
        );

        let deleted = conn
            .execute_query(&CompiledQuery::new(
                "DELETE FROM book WHERE id = ?",
                vec![5_i64.into()],
            ))
            .await?;
        assert_eq!(deleted.num_affected_rows, 1);
        assert_eq!(deleted.insert_id, None);

        let ignored = conn
            .execute_query(&CompiledQuery::new(
                "INSERT OR IGNORE INTO audit (id, note) VALUES (?, ?)",
                vec![1_i64.into(), "dup".into()],
            ))
            .await?;
        assert_eq!(ignored.num_affected_rows, 0);
        assert_eq!(ignored.insert_id, None);

        driver.release_connection(conn).await?;
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn sql_errors_surface_as_libsql_errors() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        let mut conn = driver.acquire_connection().await?;

        let err = conn
            .execute_query(&CompiledQuery::raw("SELECT * FROM no_such_table"))
            .await
            .expect_err("missing table");
        assert!(matches!(err, DialectError::Libsql(_)), "{err}");

        driver.release_connection(conn).await?;
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn url_driver_closes_its_client() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        let conn = driver.acquire_connection().await?;
        driver.release_connection(conn).await?;

        driver.destroy().await?;
        assert!(driver.client().is_closed());
        assert!(matches!(
            driver.client().open_session().await,
            Err(DialectError::ClientClosed)
        ));
        // Idempotent.
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn borrowed_client_survives_destroy() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shared.db");
        let client = LibsqlClient::open_local(path.display().to_string()).await?;

        let dialect = LibsqlDialect::new(DialectConfig::client(client.clone()));
        let driver = dialect.create_driver().await?;
        assert!(!driver.owns_client());
        create_book_table(&driver).await?;
        driver.destroy().await?;

        assert!(!client.is_closed());
        let mut session = client.open_session().await?;
        let raw = session
            .execute("INSERT INTO book (title) VALUES (?)", &[Value::from("after")])
            .await?;
        assert_eq!(map_raw_result(raw).num_affected_rows, 1);
        session.close().await?;
        client.close().await?;
        Ok(())
    })
}

#[test]
fn introspector_lists_tables_and_columns() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let dialect = LibsqlDialect::new(DialectConfig::url(file_url(&dir)));
        let driver = dialect.create_driver().await?;
        create_book_table(&driver).await?;

        let introspector: SqliteIntrospector<'_, LibsqlDriver> =
            dialect.create_introspector(&driver);
        let tables = introspector.get_tables().await?;
        assert_eq!(tables.len(), 1);
        let book = &tables[0];
        assert_eq!(book.name, "book");
        assert!(!book.is_view);
        let names: Vec<_> = book.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "title"]);
        assert!(book.columns[0].is_primary_key);
        assert_eq!(book.columns[1].data_type, "TEXT");
        assert!(book.columns[1].is_nullable);

        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn repeated_acquire_release_cycles() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let dir = tempfile::tempdir()?;
        let driver = driver_for(&dir).await?;
        for _ in 0..5 {
            let mut conn = driver.acquire_connection().await?;
            conn.execute_query(&CompiledQuery::raw("SELECT 1")).await?;
            driver.release_connection(conn).await?;
        }
        driver.destroy().await?;
        Ok(())
    })
}

#[test]
fn invalid_url_fails_before_io() -> Result<(), Box<dyn std::error::Error>> {
    let rt = Runtime::new()?;
    rt.block_on(async {
        let err = LibsqlDialect::new(DialectConfig::url("postgres://localhost/db"))
            .create_driver()
            .await
            .expect_err("unsupported scheme");
        assert!(matches!(err, DialectError::Configuration(_)));
        Ok(())
    })
}
