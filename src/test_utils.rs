//! Fixtures for tests and examples.

use std::sync::Arc;

use crate::database::Database;
use crate::error::QuickDbError;
use crate::results::Record;
use crate::types::RowValues;

/// Schema used by [`users_database`].
pub const USERS_DDL: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT UNIQUE,
        age INTEGER,
        active BOOLEAN NOT NULL DEFAULT 1
    );
";

/// Build a record without touching a database.
#[must_use]
pub fn create_test_row(column_names: &[&str], values: Vec<RowValues>) -> Record {
    Record::new(
        Arc::new(column_names.iter().map(|c| (*c).to_string()).collect()),
        values,
    )
}

/// A private in-memory `SQLite` database.
///
/// # Errors
/// Returns an error if `SQLite` cannot be opened.
pub async fn memory_database() -> Result<Database, QuickDbError> {
    Database::new_sqlite(":memory:").await
}

/// An in-memory database with a `users` table holding Ada (id 1), Grace (id 2) and
/// Linus (id 3).
///
/// # Errors
/// Returns an error if the schema or seed rows cannot be written.
pub async fn users_database() -> Result<Database, QuickDbError> {
    let db = memory_database().await?;
    db.execute_batch(USERS_DDL).await?;
    db.execute_batch(
        "INSERT INTO users (name, email, age, active) VALUES
            ('Ada', 'ada@example.com', 36, 1),
            ('Grace', 'grace@example.com', 45, 1),
            ('Linus', 'linus@example.com', 28, 0);",
    )
    .await?;
    Ok(db)
}
