use std::fmt;
use std::sync::Arc;

use tokio::sync::Mutex;

use super::params::Params;
use super::query::{build_result_set, count_rows, sqlite_extract_value_sync};
use crate::error::QuickDbError;
use crate::results::ResultSet;
use crate::types::{RowValues, convert_sql_params};

type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// The one `SQLite` connection owned by a `Database`.
///
/// rusqlite is blocking, so every statement runs on tokio's blocking pool while holding
/// the connection mutex.
#[derive(Clone)]
pub struct SqliteConnection {
    conn: SharedSqliteConnection,
}

impl SqliteConnection {
    pub(crate) fn new(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `func` against the raw rusqlite connection.
    ///
    /// # Errors
    /// Returns whatever `func` returns, or `ExecutionError` if the blocking task panics.
    pub async fn with_connection<F, R>(&self, func: F) -> Result<R, QuickDbError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, QuickDbError> + Send + 'static,
        R: Send + 'static,
    {
        run_blocking(Arc::clone(&self.conn), func).await
    }

    /// Execute a SELECT and materialize into a `ResultSet`.
    ///
    /// # Errors
    /// Returns `QuickDbError` if preparing or executing the query fails.
    pub async fn select(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, QuickDbError> {
        let converted = convert_sql_params::<Params>(params)?.0;
        let sql_owned = query.to_owned();
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare(&sql_owned)?;
            build_result_set(&mut stmt, &converted)
        })
        .await
    }

    /// Number of rows the query returns.
    ///
    /// # Errors
    /// Returns `QuickDbError` if preparing or executing the query fails.
    pub async fn count(&self, query: &str, params: &[RowValues]) -> Result<usize, QuickDbError> {
        let converted = convert_sql_params::<Params>(params)?.0;
        let sql_owned = query.to_owned();
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare(&sql_owned)?;
            count_rows(&mut stmt, &converted)
        })
        .await
    }

    /// Execute a DML statement and return rows affected.
    ///
    /// # Errors
    /// Returns `QuickDbError` if preparing or executing the statement fails.
    pub async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, QuickDbError> {
        let converted = convert_sql_params::<Params>(params)?;
        let sql_owned = query.to_owned();
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare(&sql_owned)?;
            Ok(stmt.execute(&converted.as_refs()[..])?)
        })
        .await
    }

    /// Execute an `INSERT ... RETURNING key` and report the returned key.
    ///
    /// The key is read from the statement's own output rather than `last_insert_rowid`,
    /// which `WITHOUT ROWID` tables never update.
    ///
    /// # Errors
    /// Returns `ExecutionError` if the statement returned no row, or errors from execution.
    pub async fn insert(&self, query: &str, params: &[RowValues]) -> Result<RowValues, QuickDbError> {
        let converted = convert_sql_params::<Params>(params)?;
        let sql_owned = query.to_owned();
        self.with_connection(move |guard| {
            let mut stmt = guard.prepare(&sql_owned)?;
            let mut rows = stmt.query(&converted.as_refs()[..])?;
            let row = rows.next()?.ok_or_else(|| {
                QuickDbError::ExecutionError("insert returned no generated key".to_string())
            })?;
            sqlite_extract_value_sync(row, 0)
        })
        .await
    }

    /// Execute one or more parameterless statements.
    ///
    /// # Errors
    /// Returns `QuickDbError` if any statement fails.
    pub async fn execute_batch(&self, query: &str) -> Result<(), QuickDbError> {
        let sql_owned = query.to_owned();
        self.with_connection(move |guard| Ok(guard.execute_batch(&sql_owned)?))
            .await
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection").finish_non_exhaustive()
    }
}

pub(crate) async fn run_blocking<F, R>(conn: SharedSqliteConnection, func: F) -> Result<R, QuickDbError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, QuickDbError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = conn.blocking_lock();
        func(&mut guard)
    })
    .await
    .map_err(|e| QuickDbError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}
