//! A small async helper for table-shaped database access.
//!
//! [`Database`] owns one connection (PostgreSQL through `tokio-postgres`, or `SQLite`
//! through `rusqlite`) and a primary-key column name, and turns calls such as
//! `get_id("users", 1)` or `update("users", 1, &data)` into one parameterized statement
//! each. Guarded `update`/`delete` first check that a matching row exists.
//!
//! Condition fragments (`"WHERE type=? ORDER BY id"`) are appended to the generated SQL as
//! written. Only the values behind their `?` placeholders are bound, so never build a
//! fragment from untrusted input.

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("enable at least one of the `postgres` or `sqlite` features");

pub mod config;
pub mod connection;
pub mod database;
pub mod error;
pub mod prelude;
pub mod results;
pub mod statements;
pub mod translation;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::ConnectOptions;
pub use database::Database;
pub use error::QuickDbError;
pub use results::{Record, ResultSet};
pub use types::{ColumnValues, DatabaseType, RowValues};
