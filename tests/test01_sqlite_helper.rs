#![cfg(feature = "sqlite")]

use quick_db::prelude::*;
use quick_db::test_utils::{memory_database, users_database};

#[tokio::test]
async fn users_scenario_get_update_delete() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_database().await?;
    db.execute_batch("CREATE TABLE users (id INTEGER PRIMARY KEY, name TEXT);")
        .await?;
    db.insert(
        "users",
        &ColumnValues::new().with("id", 1).with("name", "Ada"),
    )
    .await?;

    let ada = db.get_id("users", 1).await?.expect("row 1 exists");
    assert_eq!(ada.to_json(), serde_json::json!({"id": 1, "name": "Ada"}));

    let updated = db
        .update("users", 1, &ColumnValues::new().with("name", "Grace"))
        .await?;
    assert_eq!(updated, RowValues::Int(1));
    let grace = db.get_id("users", 1).await?.expect("row 1 still exists");
    assert_eq!(grace.get("name").and_then(RowValues::as_text), Some("Grace"));
    assert_eq!(grace.get("id").and_then(RowValues::as_int), Some(&1));

    let deleted = db.delete("users", 1).await?;
    assert_eq!(deleted, RowValues::Int(1));
    assert!(db.get_id("users", 1).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn get_one_and_get_all_with_conditions() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    let oldest = db
        .get_one("users", Some("ORDER BY age DESC"), &[])
        .await?
        .expect("table is seeded");
    assert_eq!(oldest.get("name").and_then(RowValues::as_text), Some("Grace"));

    let active = db
        .get_all(
            "users",
            Some("WHERE active=? ORDER BY id"),
            &[RowValues::Bool(true)],
        )
        .await?;
    let names: Vec<&str> = active
        .iter()
        .filter_map(|r| r.get("name").and_then(RowValues::as_text))
        .collect();
    assert_eq!(names, ["Ada", "Grace"]);

    let nobody = db
        .get_all("users", Some("WHERE age > ?"), &[RowValues::Int(100)])
        .await?;
    assert!(nobody.is_empty());
    assert!(
        db.get_one("users", Some("WHERE name=?"), &[RowValues::from("Nobody")])
            .await?
            .is_none()
    );
    Ok(())
}

#[tokio::test]
async fn exec_one_and_exec_all_run_arbitrary_sql() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    let stats = db
        .exec_one(
            "SELECT COUNT(*) AS n, MAX(age) AS oldest FROM users WHERE active = ?1",
            &[RowValues::Int(1)],
        )
        .await?
        .expect("aggregate returns a row");
    assert_eq!(stats.get("n"), Some(&RowValues::Int(2)));
    assert_eq!(stats.get("oldest"), Some(&RowValues::Int(45)));

    let rows = db
        .exec_all(
            "SELECT name FROM users WHERE age BETWEEN $1 AND $2 ORDER BY age",
            &[RowValues::Int(20), RowValues::Int(40)],
        )
        .await?;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].column_names(), ["name".to_string()]);
    assert_eq!(rows[0].get("name").and_then(RowValues::as_text), Some("Linus"));

    assert!(db.exec_one("SELECT * FROM users WHERE id = -1", &[]).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn insert_returns_generated_rowid() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    let data = ColumnValues::new()
        .with("name", "Margaret")
        .with("email", "margaret@example.com")
        .with("age", 33);
    let id = db.insert("users", &data).await?;
    assert_eq!(id, RowValues::Int(4));

    let row = db.get_id("users", id).await?.expect("inserted row");
    for (column, value) in data.iter() {
        assert_eq!(row.get(column), Some(value), "column {column}");
    }
    assert_eq!(row.get("active").and_then(RowValues::as_bool), Some(&true));
    Ok(())
}

#[tokio::test]
async fn insert_into_without_rowid_table_returns_its_own_key() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    db.execute_batch("CREATE TABLE codes (id TEXT PRIMARY KEY, label TEXT) WITHOUT ROWID;")
        .await?;

    let user = db
        .insert("users", &ColumnValues::new().with("name", "Margaret"))
        .await?;
    assert_eq!(user, RowValues::Int(4));

    let code = db
        .insert("codes", &ColumnValues::new().with("id", "en").with("label", "English"))
        .await?;
    assert_eq!(code, RowValues::from("en"));
    let row = db.get_id("codes", code).await?.expect("inserted code");
    assert_eq!(row.get("label").and_then(RowValues::as_text), Some("English"));
    Ok(())
}

#[tokio::test]
async fn count_agrees_with_get_all() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    let cases: [(Option<&str>, Vec<RowValues>); 4] = [
        (None, vec![]),
        (Some("WHERE active=?"), vec![RowValues::Int(1)]),
        (Some("WHERE age < ?"), vec![RowValues::Int(30)]),
        (Some("WHERE name=?"), vec![RowValues::from("Nobody")]),
    ];
    for (conditions, params) in &cases {
        let counted = db.count("users", *conditions, params).await?;
        let fetched = db.get_all("users", *conditions, params).await?;
        assert_eq!(counted, fetched.len(), "{conditions:?}");
    }
    Ok(())
}

#[tokio::test]
async fn delete_by_key_removes_only_that_row() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    assert_eq!(db.delete("users", 2).await?, RowValues::Int(2));
    assert!(db.get_id("users", 2).await?.is_none());

    let remaining = db.get_all("users", Some("ORDER BY id"), &[]).await?;
    let names: Vec<&str> = remaining
        .iter()
        .filter_map(|r| r.get("name").and_then(RowValues::as_text))
        .collect();
    assert_eq!(names, ["Ada", "Linus"]);
    Ok(())
}

#[tokio::test]
async fn insert_constraint_violation_is_a_driver_error() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    let err = db
        .insert(
            "users",
            &ColumnValues::new().with("name", "Ada again").with("email", "ada@example.com"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, QuickDbError::SqliteError(_)), "{err:?}");
    assert_eq!(db.count("users", None, &[]).await?, 3);
    Ok(())
}

#[tokio::test]
async fn update_missing_id_is_not_found_and_writes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    let before = db.get_all("users", Some("ORDER BY id"), &[]).await?;

    let err = db
        .update("users", 99, &ColumnValues::new().with("name", "Ghost"))
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    let after = db.get_all("users", Some("ORDER BY id"), &[]).await?;
    let as_json = |rows: &[Record]| rows.iter().map(Record::to_json).collect::<Vec<_>>();
    assert_eq!(as_json(&before), as_json(&after));
    Ok(())
}

#[tokio::test]
async fn update_where_binds_data_then_condition_params() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    let changed = db
        .update_where(
            "users",
            &ColumnValues::new().with("active", false),
            Some("WHERE age > ?"),
            &[RowValues::Int(30)],
        )
        .await?;
    assert_eq!(changed, 2);
    assert_eq!(
        db.count("users", Some("WHERE active=?"), &[RowValues::Int(0)])
            .await?,
        3
    );

    let err = db
        .update_where(
            "users",
            &ColumnValues::new().with("age", 1),
            Some("WHERE name=?"),
            &[RowValues::from("Nobody")],
        )
        .await
        .unwrap_err();
    assert!(err.is_not_found());
    Ok(())
}

#[tokio::test]
async fn delete_modes() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    assert!(db.delete("users", 42).await.unwrap_err().is_not_found());
    assert_eq!(db.count("users", None, &[]).await?, 3);

    let removed = db
        .delete_where("users", Some("WHERE active=?"), &[RowValues::Bool(false)])
        .await?;
    assert_eq!(removed, 1);
    assert!(db.get_id("users", 3).await?.is_none());

    let err = db
        .delete_where("users", Some("WHERE active=?"), &[RowValues::Bool(false)])
        .await
        .unwrap_err();
    assert!(err.is_not_found());

    assert_eq!(db.delete_where("users", None, &[]).await?, 2);
    assert!(db.delete_where("users", None, &[]).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn set_primary_key_changes_key_lookups() -> Result<(), Box<dyn std::error::Error>> {
    let mut db = memory_database().await?;
    db.execute_batch(
        "CREATE TABLE posts (post_id INTEGER PRIMARY KEY, title TEXT);
         INSERT INTO posts (post_id, title) VALUES (10, 'first'), (11, 'second');",
    )
    .await?;
    assert_eq!(db.primary_key(), DEFAULT_PRIMARY_KEY);

    // "id" does not exist in posts
    assert!(db.get_id("posts", 10).await.is_err());

    db.set_primary_key("post_id")?;
    let post = db.get_id("posts", 11).await?.expect("post 11");
    assert_eq!(post.get("title").and_then(RowValues::as_text), Some("second"));

    db.update("posts", 10, &ColumnValues::new().with("title", "edited"))
        .await?;
    assert_eq!(
        db.get_id("posts", 10)
            .await?
            .and_then(|r| r.get("title").cloned()),
        Some(RowValues::from("edited"))
    );

    assert!(db.set_primary_key("post_id; DROP TABLE posts").unwrap_err().is_validation());
    assert_eq!(db.primary_key(), "post_id");
    Ok(())
}

#[tokio::test]
async fn validation_happens_before_execution() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;

    let err = db
        .get_all("users", Some("WHERE age > ? AND active = ?"), &[RowValues::Int(1)])
        .await
        .unwrap_err();
    assert!(err.is_validation(), "{err:?}");

    let err = db.exec_all("SELECT * FROM users", &[RowValues::Int(1)]).await.unwrap_err();
    assert!(err.is_validation());

    assert!(db.insert("users", &ColumnValues::new()).await.unwrap_err().is_validation());
    assert!(
        db.insert("users; --", &ColumnValues::new().with("name", "x"))
            .await
            .unwrap_err()
            .is_validation()
    );
    assert!(
        db.update("users", RowValues::Null, &ColumnValues::new().with("name", "x"))
            .await
            .unwrap_err()
            .is_validation()
    );
    assert_eq!(db.count("users", None, &[]).await?, 3);
    Ok(())
}

#[tokio::test]
async fn malformed_sql_is_a_driver_error_not_a_panic() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    let err = db
        .get_all("users", Some("WHERE ORDER BY"), &[])
        .await
        .unwrap_err();
    assert!(matches!(err, QuickDbError::SqliteError(_)));
    assert!(db.get_all("missing_table", None, &[]).await.is_err());
    Ok(())
}

#[tokio::test]
async fn values_round_trip_through_sqlite_storage() -> Result<(), Box<dyn std::error::Error>> {
    let db = memory_database().await?;
    db.execute_batch("CREATE TABLE t (id INTEGER PRIMARY KEY, f REAL, b BLOB, j TEXT, ts TEXT, n TEXT);")
        .await?;
    let ts = chrono::NaiveDate::from_ymd_opt(2024, 1, 3)
        .and_then(|d| d.and_hms_opt(10, 30, 0))
        .expect("valid timestamp");
    let id = db
        .insert(
            "t",
            &ColumnValues::new()
                .with("f", 30.25)
                .with("b", b"Blob12".to_vec())
                .with("j", serde_json::json!({"name": "Alice"}))
                .with("ts", ts)
                .with("n", Option::<String>::None),
        )
        .await?;

    let row = db.get_id("t", id).await?.expect("row");
    assert_eq!(row.get("f").and_then(RowValues::as_float), Some(30.25));
    assert_eq!(row.get("b").and_then(RowValues::as_blob), Some(&b"Blob12"[..]));
    assert_eq!(row.get("j").and_then(RowValues::as_text), Some(r#"{"name":"Alice"}"#));
    assert_eq!(row.get("ts").and_then(RowValues::as_timestamp), Some(ts));
    assert!(row.get("n").is_some_and(RowValues::is_null));
    Ok(())
}
