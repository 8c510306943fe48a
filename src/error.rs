use thiserror::Error;

/// Errors returned by every fallible operation in this crate.
///
/// Read operations never use [`QuickDbError::NotFound`]; an empty result is `Ok(None)` or an
/// empty `Vec`. Guarded mutations (`update`, `delete` and their `_where` variants) return
/// `NotFound` when the existence check matches no rows.
#[derive(Debug, Error)]
pub enum QuickDbError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No matching rows: {0}")]
    NotFound(String),
}

impl QuickDbError {
    /// True when a guarded update/delete found nothing to act on.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// True for caller mistakes caught before anything reached the database.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::ConfigError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_helpers() {
        assert!(QuickDbError::NotFound("users".into()).is_not_found());
        assert!(!QuickDbError::ExecutionError("boom".into()).is_not_found());
        assert!(QuickDbError::ValidationError("bad".into()).is_validation());
        assert!(QuickDbError::ConfigError("host".into()).is_validation());
        assert!(!QuickDbError::NotFound("users".into()).is_validation());
    }

    #[test]
    fn display_includes_detail() {
        let err = QuickDbError::NotFound("users where id=?".into());
        assert_eq!(err.to_string(), "No matching rows: users where id=?");
    }
}
