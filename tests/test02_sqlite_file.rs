#![cfg(feature = "sqlite")]

use quick_db::prelude::*;
use quick_db::test_utils::USERS_DDL;

#[tokio::test]
async fn file_database_persists_across_connections() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("people.db");
    let path = path.to_str().ok_or("non-utf8 temp path")?;

    {
        let db = Database::new_sqlite(path).await?;
        db.execute_batch(USERS_DDL).await?;
        db.insert("users", &ColumnValues::new().with("name", "Zoë").with("age", 31))
            .await?;
    }

    let reopened = Database::connect(SqliteOptions::new(path).with_busy_timeout_ms(2_000)).await?;
    let rows = reopened.get_all("users", None, &[]).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("name").and_then(RowValues::as_text), Some("Zoë"));
    Ok(())
}

#[tokio::test]
async fn connect_from_json_options() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("json.db");
    let raw = serde_json::json!({"backend": "sqlite", "db_path": path}).to_string();

    let opts = ConnectOptions::from_json(&raw)?;
    let db = Database::connect(opts).await?.with_primary_key("code")?;
    assert_eq!(db.database_type(), DatabaseType::Sqlite);
    db.execute_batch("CREATE TABLE codes (code TEXT PRIMARY KEY, label TEXT);")
        .await?;
    db.insert("codes", &ColumnValues::new().with("code", "en").with("label", "English"))
        .await?;

    let en = db.get_id("codes", "en").await?.ok_or("missing row")?;
    assert_eq!(en.get("label").and_then(RowValues::as_text), Some("English"));
    assert_eq!(db.delete("codes", "en").await?, RowValues::from("en"));
    assert_eq!(db.count("codes", None, &[]).await?, 0);
    Ok(())
}

#[tokio::test]
async fn unopenable_path_is_an_error() {
    let err = Database::new_sqlite("/nonexistent-dir/definitely/missing.db")
        .await
        .unwrap_err();
    assert!(!err.is_validation());
    assert!(!err.is_not_found());
}

#[tokio::test]
async fn empty_path_is_rejected_by_config_validation() {
    let err = Database::new_sqlite("  ").await.unwrap_err();
    assert!(matches!(err, QuickDbError::ConfigError(_)), "{err:?}");
}
