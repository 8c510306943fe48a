//! Convenient imports for common functionality.

pub use crate::config::ConnectOptions;
pub use crate::connection::DbConnection;
pub use crate::database::{DEFAULT_PRIMARY_KEY, Database};
pub use crate::error::QuickDbError;
pub use crate::results::{Record, ResultSet};
pub use crate::translation::{PlaceholderStyle, count_placeholders, translate_placeholders};
pub use crate::types::{ColumnValues, DatabaseType, RowValues};

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresOptions;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteOptions;
