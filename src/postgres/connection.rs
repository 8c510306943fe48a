use std::fmt;

use tokio_postgres::Client;

use super::params::Params as PgParams;
use super::query::{build_result_set, postgres_extract_value};
use crate::error::QuickDbError;
use crate::results::ResultSet;
use crate::types::{RowValues, convert_sql_params};

/// The one PostgreSQL client owned by a `Database`.
///
/// Statements are prepared on the server for every call and parameters are bound there.
pub struct PostgresConnection {
    client: Client,
}

impl PostgresConnection {
    pub(crate) fn new(client: Client) -> Self {
        Self { client }
    }

    /// Borrow the underlying client for anything the helper does not cover.
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Execute a SELECT and materialize into a `ResultSet`.
    ///
    /// # Errors
    /// Returns errors from preparation, parameter conversion, or query execution.
    pub async fn select(&self, query: &str, params: &[RowValues]) -> Result<ResultSet, QuickDbError> {
        let stmt = self.client.prepare(query).await?;
        let converted = convert_sql_params::<PgParams>(params)?;
        let rows = self.client.query(&stmt, converted.as_refs()).await?;
        build_result_set(&stmt, &rows)
    }

    /// Number of rows the query returns.
    ///
    /// # Errors
    /// Returns errors from parameter conversion or query execution.
    pub async fn count(&self, query: &str, params: &[RowValues]) -> Result<usize, QuickDbError> {
        let converted = convert_sql_params::<PgParams>(params)?;
        let rows = self.client.query(query, converted.as_refs()).await?;
        Ok(rows.len())
    }

    /// Execute a DML statement and return rows affected.
    ///
    /// # Errors
    /// Returns errors from parameter conversion or statement execution.
    pub async fn execute(&self, query: &str, params: &[RowValues]) -> Result<usize, QuickDbError> {
        let converted = convert_sql_params::<PgParams>(params)?;
        let rows = self.client.execute(query, converted.as_refs()).await?;
        usize::try_from(rows).map_err(|e| {
            QuickDbError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
        })
    }

    /// Execute an `INSERT ... RETURNING key` and report the returned key.
    ///
    /// # Errors
    /// Returns `ExecutionError` if the statement returned no row, or errors from execution.
    pub async fn insert(&self, query: &str, params: &[RowValues]) -> Result<RowValues, QuickDbError> {
        let converted = convert_sql_params::<PgParams>(params)?;
        let row = self
            .client
            .query_opt(query, converted.as_refs())
            .await?
            .ok_or_else(|| {
                QuickDbError::ExecutionError("insert returned no generated key".to_string())
            })?;
        postgres_extract_value(&row, 0)
    }

    /// Execute one or more parameterless statements.
    ///
    /// # Errors
    /// Returns errors from statement execution.
    pub async fn execute_batch(&self, query: &str) -> Result<(), QuickDbError> {
        self.client.batch_execute(query).await?;
        Ok(())
    }
}

impl fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresConnection")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}
