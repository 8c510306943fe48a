use serde::{Deserialize, Serialize};

use crate::error::QuickDbError;
use crate::types::DatabaseType;

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresOptions;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteOptions;

/// Which database to open, and how.
///
/// Deserializes from a tagged object:
/// ```rust
/// use quick_db::prelude::*;
///
/// let opts = ConnectOptions::from_json(r#"{"backend": "sqlite", "db_path": ":memory:"}"#)?;
/// assert_eq!(opts.database_type(), DatabaseType::Sqlite);
/// # Ok::<(), QuickDbError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "lowercase")]
pub enum ConnectOptions {
    #[cfg(feature = "postgres")]
    Postgres(PostgresOptions),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteOptions),
}

impl ConnectOptions {
    /// # Errors
    /// Returns `QuickDbError::ConfigError` if the JSON does not describe a known backend.
    pub fn from_json(raw: &str) -> Result<Self, QuickDbError> {
        serde_json::from_str(raw)
            .map_err(|e| QuickDbError::ConfigError(format!("invalid connection options: {e}")))
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            ConnectOptions::Postgres(_) => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            ConnectOptions::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    /// # Errors
    /// Returns `QuickDbError::ConfigError` naming the first invalid field.
    pub fn validate(&self) -> Result<(), QuickDbError> {
        match self {
            #[cfg(feature = "postgres")]
            ConnectOptions::Postgres(opts) => opts.validate(),
            #[cfg(feature = "sqlite")]
            ConnectOptions::Sqlite(opts) => opts.validate(),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<PostgresOptions> for ConnectOptions {
    fn from(opts: PostgresOptions) -> Self {
        ConnectOptions::Postgres(opts)
    }
}

#[cfg(feature = "sqlite")]
impl From<SqliteOptions> for ConnectOptions {
    fn from(opts: SqliteOptions) -> Self {
        ConnectOptions::Sqlite(opts)
    }
}
