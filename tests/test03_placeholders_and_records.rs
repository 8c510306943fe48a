#![cfg(feature = "sqlite")]

use quick_db::prelude::*;
use quick_db::test_utils::users_database;

#[test]
fn count_matches_sqlite_numbering() {
    assert_eq!(count_placeholders("SELECT 1"), 0);
    assert_eq!(count_placeholders("a=? AND b=?"), 2);
    assert_eq!(count_placeholders("a=?2 AND b=?"), 3);
    assert_eq!(
        count_placeholders("name = '?' AND note = ? -- what?"),
        1
    );
}

#[test]
fn translation_targets_postgres_only() {
    let sql = "SELECT * FROM users WHERE name=? AND tag <> '?' AND age>?";
    assert_eq!(
        translate_placeholders(sql, PlaceholderStyle::Postgres),
        "SELECT * FROM users WHERE name=$1 AND tag <> '?' AND age>$2"
    );
    assert_eq!(translate_placeholders(sql, PlaceholderStyle::Sqlite), sql);
}

#[tokio::test]
async fn quoted_question_marks_are_data() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    db.insert("users", &ColumnValues::new().with("name", "Who?").with("age", 1))
        .await?;

    let rows = db
        .get_all("users", Some("WHERE name = 'Who?' AND age = ?"), &[RowValues::Int(1)])
        .await?;
    assert_eq!(rows.len(), 1);

    let err = db
        .get_all("users", Some("WHERE name = 'Who?'"), &[RowValues::Int(1)])
        .await
        .unwrap_err();
    assert!(err.is_validation());
    Ok(())
}

#[tokio::test]
async fn values_are_bound_not_spliced() -> Result<(), Box<dyn std::error::Error>> {
    let db = users_database().await?;
    let hostile = "x'; DROP TABLE users; --";
    let found = db
        .get_one("users", Some("WHERE name=?"), &[RowValues::from(hostile)])
        .await?;
    assert!(found.is_none());
    assert_eq!(db.count("users", None, &[]).await?, 3);
    Ok(())
}

#[test]
fn records_serialize_as_objects_keyed_by_column() -> Result<(), serde_json::Error> {
    let row = quick_db::test_utils::create_test_row(
        &["id", "name", "score"],
        vec![RowValues::Int(7), RowValues::from("Ada"), RowValues::Null],
    );
    assert_eq!(
        serde_json::to_value(&row)?,
        serde_json::json!({"id": 7, "name": "Ada", "score": null})
    );
    assert_eq!(row.column_names(), ["id", "name", "score"]);
    Ok(())
}
