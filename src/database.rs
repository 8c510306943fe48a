//! The table helper.
//!
//! ```rust,no_run
//! use quick_db::prelude::*;
//!
//! # async fn demo() -> Result<(), QuickDbError> {
//! let db = Database::new_sqlite("blog.db").await?;
//! db.execute_batch("CREATE TABLE IF NOT EXISTS posts (id INTEGER PRIMARY KEY, type TEXT, title TEXT)")
//!     .await?;
//!
//! let id = db
//!     .insert("posts", &ColumnValues::new().with("type", "post").with("title", "Hello"))
//!     .await?;
//! let post = db.get_id("posts", id.clone()).await?;
//! let posts = db.get_all("posts", Some("WHERE type=? ORDER BY id"), &[RowValues::from("post")]).await?;
//! db.update("posts", id, &ColumnValues::new().with("title", "Hello again")).await?;
//! # let _ = (post, posts);
//! # Ok(()) }
//! ```

use std::slice;

use crate::config::ConnectOptions;
use crate::connection::DbConnection;
use crate::error::QuickDbError;
use crate::results::Record;
use crate::statements;
use crate::types::{ColumnValues, DatabaseType, RowValues};

/// Column used by key-based calls until [`Database::set_primary_key`] changes it.
pub const DEFAULT_PRIMARY_KEY: &str = "id";

/// One connection plus the primary-key column name used by `get_id`, `update` and
/// `delete`.
///
/// Every call builds its statement, runs it once and hands back its own result; nothing
/// about a call is kept on the instance.
#[derive(Debug)]
pub struct Database {
    conn: DbConnection,
    primary_key: String,
}

impl Database {
    #[must_use]
    pub fn from_connection(conn: DbConnection) -> Self {
        Self {
            conn,
            primary_key: DEFAULT_PRIMARY_KEY.to_string(),
        }
    }

    /// Open the single connection this helper will use.
    ///
    /// # Errors
    /// Returns `ConfigError` for invalid options, `ConnectionError` (or the driver's error)
    /// when the database cannot be reached.
    pub async fn connect(options: impl Into<ConnectOptions>) -> Result<Self, QuickDbError> {
        let conn = DbConnection::connect(options.into()).await?;
        Ok(Self::from_connection(conn))
    }

    /// Connect, or report the error and terminate the process.
    ///
    /// For programs that cannot do anything useful without their database.
    pub async fn connect_or_exit(options: impl Into<ConnectOptions>) -> Self {
        match Self::connect(options).await {
            Ok(db) => db,
            Err(err) => {
                tracing::error!(error = %err, "database connection failed");
                eprintln!("{err}");
                std::process::exit(1);
            }
        }
    }

    /// Connect to PostgreSQL on the default port.
    ///
    /// # Errors
    /// See [`Database::connect`].
    #[cfg(feature = "postgres")]
    pub async fn new_postgres(
        host: &str,
        dbname: &str,
        user: &str,
        password: &str,
    ) -> Result<Self, QuickDbError> {
        Self::connect(crate::postgres::PostgresOptions::new(host, dbname, user, password)).await
    }

    /// Open (or create) an `SQLite` database file; `":memory:"` for a private in-memory one.
    ///
    /// # Errors
    /// See [`Database::connect`].
    #[cfg(feature = "sqlite")]
    pub async fn new_sqlite(path: &str) -> Result<Self, QuickDbError> {
        Self::connect(crate::sqlite::SqliteOptions::new(path)).await
    }

    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Change the key column for every later `get_id`, `update` and `delete`.
    ///
    /// # Errors
    /// Returns `ValidationError` if `primary_key` is not a plain identifier.
    pub fn set_primary_key(&mut self, primary_key: impl Into<String>) -> Result<(), QuickDbError> {
        let primary_key = primary_key.into();
        statements::validate_identifier(&primary_key, "primary key")?;
        self.primary_key = primary_key;
        Ok(())
    }

    /// Builder form of [`Database::set_primary_key`].
    ///
    /// # Errors
    /// Returns `ValidationError` if `primary_key` is not a plain identifier.
    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Result<Self, QuickDbError> {
        self.set_primary_key(primary_key)?;
        Ok(self)
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        self.conn.database_type()
    }

    #[must_use]
    pub fn connection(&self) -> &DbConnection {
        &self.conn
    }

    /// Run parameterless SQL (schema setup and the like).
    ///
    /// # Errors
    /// Returns the driver's error.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), QuickDbError> {
        self.conn.execute_batch(sql).await
    }

    /// First row of `SELECT * FROM {table} {conditions}`.
    ///
    /// # Errors
    /// Returns `ValidationError` for a bad table name or parameter count, otherwise the
    /// driver's error. No matching row is `Ok(None)`.
    pub async fn get_one(
        &self,
        table: &str,
        conditions: Option<&str>,
        params: &[RowValues],
    ) -> Result<Option<Record>, QuickDbError> {
        let sql = statements::select_all(table, conditions)?;
        Ok(self.conn.select(&sql, params).await?.into_first())
    }

    /// The row whose primary key equals `id`.
    ///
    /// # Errors
    /// Same as [`Database::get_one`].
    pub async fn get_id(
        &self,
        table: &str,
        id: impl Into<RowValues>,
    ) -> Result<Option<Record>, QuickDbError> {
        let key = statements::key_condition(&self.primary_key)?;
        let sql = statements::select_all(table, Some(&key))?;
        Ok(self.conn.select(&sql, &[id.into()]).await?.into_first())
    }

    /// First row of an arbitrary query.
    ///
    /// # Errors
    /// Returns `ValidationError` for a parameter count mismatch, otherwise the driver's
    /// error.
    pub async fn exec_one(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Option<Record>, QuickDbError> {
        Ok(self.conn.select(query, params).await?.into_first())
    }

    /// Every row of `SELECT * FROM {table} {conditions}`, in the order returned.
    ///
    /// # Errors
    /// Same as [`Database::get_one`].
    pub async fn get_all(
        &self,
        table: &str,
        conditions: Option<&str>,
        params: &[RowValues],
    ) -> Result<Vec<Record>, QuickDbError> {
        let sql = statements::select_all(table, conditions)?;
        Ok(self.conn.select(&sql, params).await?.into_records())
    }

    /// Every row of an arbitrary query.
    ///
    /// # Errors
    /// Same as [`Database::exec_one`].
    pub async fn exec_all(
        &self,
        query: &str,
        params: &[RowValues],
    ) -> Result<Vec<Record>, QuickDbError> {
        Ok(self.conn.select(query, params).await?.into_records())
    }

    /// Insert one row and return the key the database generated for it.
    ///
    /// Both backends append `RETURNING {pk}` and report that column of the new row, so the
    /// table must have the configured primary-key column.
    ///
    /// # Errors
    /// Returns `ValidationError` for empty `data` or bad names, otherwise the driver's
    /// error (constraint violations included).
    pub async fn insert(&self, table: &str, data: &ColumnValues) -> Result<RowValues, QuickDbError> {
        let returning = Some(self.primary_key.as_str());
        let sql = statements::insert_into(table, data.columns(), returning)?;
        self.conn.insert(&sql, &data.values()).await
    }

    /// Update the row whose primary key equals `id` and return `id`.
    ///
    /// The row must exist; the check and the write are separate statements.
    ///
    /// # Errors
    /// Returns `NotFound` when no row has that key, `ValidationError` for empty `data`, a
    /// NULL `id` or bad names, otherwise the driver's error.
    pub async fn update(
        &self,
        table: &str,
        id: impl Into<RowValues>,
        data: &ColumnValues,
    ) -> Result<RowValues, QuickDbError> {
        let id = non_null_id(id.into())?;
        let key = statements::key_condition(&self.primary_key)?;
        let sql = statements::update_set(table, data.columns(), Some(&key))?;
        self.ensure_exists(table, Some(&key), slice::from_ref(&id))
            .await?;

        let mut params = data.values();
        params.push(id.clone());
        let affected = self.conn.execute(&sql, &params).await?;
        if affected == 0 {
            tracing::warn!(table, "row disappeared between existence check and update");
        }
        Ok(id)
    }

    /// Update every row matching `conditions` and return how many changed.
    ///
    /// Parameters are bound as the values of `data` followed by `params`.
    ///
    /// # Errors
    /// Returns `NotFound` when nothing matches, `ValidationError` for empty `data`, bad
    /// names or a parameter count mismatch, otherwise the driver's error.
    pub async fn update_where(
        &self,
        table: &str,
        data: &ColumnValues,
        conditions: Option<&str>,
        params: &[RowValues],
    ) -> Result<usize, QuickDbError> {
        let sql = statements::update_set(table, data.columns(), conditions)?;
        self.ensure_exists(table, conditions, params).await?;

        let mut all_params = data.values();
        all_params.extend_from_slice(params);
        self.conn.execute(&sql, &all_params).await
    }

    /// Delete the row whose primary key equals `id` and return `id`.
    ///
    /// # Errors
    /// Returns `NotFound` when no row has that key, `ValidationError` for a NULL `id` or
    /// bad names, otherwise the driver's error.
    pub async fn delete(&self, table: &str, id: impl Into<RowValues>) -> Result<RowValues, QuickDbError> {
        let id = non_null_id(id.into())?;
        let key = statements::key_condition(&self.primary_key)?;
        let sql = statements::delete_from(table, Some(&key))?;
        self.ensure_exists(table, Some(&key), slice::from_ref(&id))
            .await?;

        let affected = self.conn.execute(&sql, slice::from_ref(&id)).await?;
        if affected == 0 {
            tracing::warn!(table, "row disappeared between existence check and delete");
        }
        Ok(id)
    }

    /// Delete every row matching `conditions` and return how many went.
    ///
    /// `None` conditions delete the whole table, provided it is not already empty.
    ///
    /// # Errors
    /// Returns `NotFound` when nothing matches, `ValidationError` for a bad table name or
    /// parameter count, otherwise the driver's error.
    pub async fn delete_where(
        &self,
        table: &str,
        conditions: Option<&str>,
        params: &[RowValues],
    ) -> Result<usize, QuickDbError> {
        let sql = statements::delete_from(table, conditions)?;
        self.ensure_exists(table, conditions, params).await?;
        self.conn.execute(&sql, params).await
    }

    /// Number of rows `SELECT * FROM {table} {conditions}` returns.
    ///
    /// Rows are fetched and counted rather than aggregated with `COUNT(*)`.
    ///
    /// # Errors
    /// Same as [`Database::get_one`].
    pub async fn count(
        &self,
        table: &str,
        conditions: Option<&str>,
        params: &[RowValues],
    ) -> Result<usize, QuickDbError> {
        let sql = statements::select_all(table, conditions)?;
        self.conn.count(&sql, params).await
    }

    async fn ensure_exists(
        &self,
        table: &str,
        conditions: Option<&str>,
        params: &[RowValues],
    ) -> Result<usize, QuickDbError> {
        let matched = self.count(table, conditions, params).await?;
        if matched == 0 {
            let conditions = conditions.unwrap_or_default();
            tracing::warn!(table, conditions, "guarded write matched no rows");
            return Err(QuickDbError::NotFound(
                format!("{table} {conditions}").trim_end().to_string(),
            ));
        }
        Ok(matched)
    }
}

fn non_null_id(id: RowValues) -> Result<RowValues, QuickDbError> {
    if id.is_null() {
        return Err(QuickDbError::ValidationError(
            "identifier must not be NULL".to_string(),
        ));
    }
    Ok(id)
}
