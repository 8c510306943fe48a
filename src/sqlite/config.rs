use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::connection::SqliteConnection;
use crate::error::QuickDbError;

/// Options for opening a `SQLite` database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqliteOptions {
    /// File path, `:memory:`, or a `file:` URI.
    pub db_path: String,
    /// How long a statement waits on a locked database before failing.
    #[serde(default)]
    pub busy_timeout_ms: Option<u64>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            busy_timeout_ms: None,
        }
    }

    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(":memory:")
    }

    #[must_use]
    pub fn with_busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout_ms = Some(millis);
        self
    }

    /// # Errors
    /// Returns `QuickDbError::ConfigError` when the path is empty.
    pub fn validate(&self) -> Result<(), QuickDbError> {
        if self.db_path.trim().is_empty() {
            return Err(QuickDbError::ConfigError(
                "db_path is required".to_string(),
            ));
        }
        Ok(())
    }

    /// Open the database and apply the fixed connection settings.
    ///
    /// # Errors
    /// Returns `QuickDbError::ConfigError` for invalid options or
    /// `QuickDbError::ConnectionError` if the file cannot be opened.
    pub async fn open(self) -> Result<SqliteConnection, QuickDbError> {
        self.validate()?;
        let path = self.db_path.clone();
        let busy_timeout = self.busy_timeout_ms.map(Duration::from_millis);

        let conn = tokio::task::spawn_blocking(move || {
            let conn = rusqlite::Connection::open(&path).map_err(|e| {
                QuickDbError::ConnectionError(format!("Failed to open SQLite database {path}: {e}"))
            })?;
            // only takes effect on a fresh database; existing files keep their encoding
            conn.execute_batch("PRAGMA encoding = 'UTF-8';")?;
            if let Some(timeout) = busy_timeout {
                conn.busy_timeout(timeout)?;
            }
            Ok::<_, QuickDbError>(conn)
        })
        .await
        .map_err(|e| QuickDbError::ConnectionError(format!("sqlite open join error: {e}")))??;

        tracing::info!(db_path = %self.db_path, "opened sqlite database");
        Ok(SqliteConnection::new(conn))
    }
}
