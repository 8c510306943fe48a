use crate::config::ConnectOptions;
use crate::error::QuickDbError;
use crate::results::ResultSet;
use crate::translation::{PlaceholderStyle, prepare_placeholders};
use crate::types::{DatabaseType, RowValues};

#[cfg(feature = "postgres")]
use crate::postgres::PostgresConnection;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteConnection;

/// A live connection to one of the enabled backends.
///
/// Every statement passes through [`prepare_placeholders`] first: the parameter count is
/// checked against the statement and placeholders are rewritten for the backend.
#[derive(Debug)]
pub enum DbConnection {
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnection),
    #[cfg(feature = "sqlite")]
    Sqlite(SqliteConnection),
}

impl DbConnection {
    /// Open the connection described by `options`.
    ///
    /// # Errors
    /// Returns `ConfigError` for invalid options and `ConnectionError` when the database
    /// cannot be reached.
    pub async fn connect(options: ConnectOptions) -> Result<Self, QuickDbError> {
        match options {
            #[cfg(feature = "postgres")]
            ConnectOptions::Postgres(opts) => Ok(DbConnection::Postgres(opts.connect().await?)),
            #[cfg(feature = "sqlite")]
            ConnectOptions::Sqlite(opts) => Ok(DbConnection::Sqlite(opts.open().await?)),
        }
    }

    #[must_use]
    pub fn database_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(_) => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(_) => PlaceholderStyle::Postgres,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(_) => PlaceholderStyle::Sqlite,
        }
    }

    /// Run a row-returning statement.
    ///
    /// # Errors
    /// Returns `ValidationError` on a parameter count mismatch, otherwise driver errors.
    pub async fn select(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, QuickDbError> {
        let sql = self.prepare(query, params, "select")?;
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.select(&sql, params).await,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.select(&sql, params).await,
        }
    }

    /// Run a row-returning statement and only count the rows.
    ///
    /// # Errors
    /// Returns `ValidationError` on a parameter count mismatch, otherwise driver errors.
    pub async fn count(&self, query: &str, params: &[RowValues]) -> Result<usize, QuickDbError> {
        let sql = self.prepare(query, params, "count")?;
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.count(&sql, params).await,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.count(&sql, params).await,
        }
    }

    /// Run a DML statement and return rows affected.
    ///
    /// # Errors
    /// Returns `ValidationError` on a parameter count mismatch, otherwise driver errors.
    pub async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, QuickDbError> {
        let sql = self.prepare(query, params, "execute")?;
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.execute(&sql, params).await,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.execute(&sql, params).await,
        }
    }

    /// Run an INSERT and return the key the database generated.
    ///
    /// The statement must end in `RETURNING <key>`.
    ///
    /// # Errors
    /// Returns `ValidationError` on a parameter count mismatch, otherwise driver errors.
    pub async fn insert(&self, query: &str, params: &[RowValues]) -> Result<RowValues, QuickDbError> {
        let sql = self.prepare(query, params, "insert")?;
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.insert(&sql, params).await,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.insert(&sql, params).await,
        }
    }

    /// Run parameterless statements as-is.
    ///
    /// # Errors
    /// Returns driver errors.
    pub async fn execute_batch(&self, query: &str) -> Result<(), QuickDbError> {
        tracing::debug!(sql = %query, "execute batch");
        match self {
            #[cfg(feature = "postgres")]
            DbConnection::Postgres(conn) => conn.execute_batch(query).await,
            #[cfg(feature = "sqlite")]
            DbConnection::Sqlite(conn) => conn.execute_batch(query).await,
        }
    }

    fn prepare(&self, query: &str, params: &[RowValues], op: &str) -> Result<String, QuickDbError> {
        let prepared = prepare_placeholders(query, self.placeholder_style());
        if prepared.expected_params != params.len() {
            return Err(QuickDbError::ValidationError(format!(
                "statement expects {} parameter(s) but {} were supplied: {query}",
                prepared.expected_params,
                params.len()
            )));
        }
        tracing::debug!(op, sql = %prepared.sql, params = params.len(), "executing statement");
        Ok(prepared.sql.into_owned())
    }
}
