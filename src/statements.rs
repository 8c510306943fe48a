//! SQL text for the helper's operations.
//!
//! Table, column and key names are spliced into the statement, so each one is checked by
//! [`validate_identifier`] first. Values never are; every value position is a `?`.
//! Condition fragments are appended verbatim after a single space.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::QuickDbError;

static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)?$")
        .unwrap_or_else(|e| unreachable!("identifier pattern is valid: {e}"))
});

/// Check that `value` is a plain (optionally schema-qualified) SQL identifier.
///
/// # Errors
/// Returns `QuickDbError::ValidationError` naming `what` when the identifier is rejected.
pub fn validate_identifier(value: &str, what: &str) -> Result<(), QuickDbError> {
    if IDENTIFIER.is_match(value) {
        Ok(())
    } else {
        Err(QuickDbError::ValidationError(format!(
            "invalid {what} identifier: {value:?}"
        )))
    }
}

fn with_conditions(mut sql: String, conditions: Option<&str>) -> String {
    if let Some(cond) = conditions.map(str::trim).filter(|c| !c.is_empty()) {
        sql.push(' ');
        sql.push_str(cond);
    }
    sql
}

/// `WHERE {pk}=?`
///
/// # Errors
/// Returns `QuickDbError::ValidationError` for an invalid key name.
pub fn key_condition(primary_key: &str) -> Result<String, QuickDbError> {
    validate_identifier(primary_key, "primary key")?;
    Ok(format!("WHERE {primary_key}=?"))
}

/// `SELECT * FROM {table} {conditions}`
///
/// # Errors
/// Returns `QuickDbError::ValidationError` for an invalid table name.
pub fn select_all(table: &str, conditions: Option<&str>) -> Result<String, QuickDbError> {
    validate_identifier(table, "table")?;
    Ok(with_conditions(format!("SELECT * FROM {table}"), conditions))
}

/// `INSERT INTO {table} ({columns}) VALUES (?,...)`, optionally `RETURNING {column}`.
///
/// # Errors
/// Returns `QuickDbError::ValidationError` for invalid names or an empty column list.
pub fn insert_into<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a str>,
    returning: Option<&str>,
) -> Result<String, QuickDbError> {
    validate_identifier(table, "table")?;
    let columns = checked_columns(columns)?;
    let marks = vec!["?"; columns.len()].join(",");
    let mut sql = format!(
        "INSERT INTO {table} ({}) VALUES ({marks})",
        columns.join(",")
    );
    if let Some(col) = returning {
        validate_identifier(col, "returning")?;
        sql.push_str(" RETURNING ");
        sql.push_str(col);
    }
    Ok(sql)
}

/// `UPDATE {table} SET c1=?,c2=? {conditions}`
///
/// # Errors
/// Returns `QuickDbError::ValidationError` for invalid names or an empty column list.
pub fn update_set<'a>(
    table: &str,
    columns: impl IntoIterator<Item = &'a str>,
    conditions: Option<&str>,
) -> Result<String, QuickDbError> {
    validate_identifier(table, "table")?;
    let assignments: Vec<String> = checked_columns(columns)?
        .into_iter()
        .map(|c| format!("{c}=?"))
        .collect();
    Ok(with_conditions(
        format!("UPDATE {table} SET {}", assignments.join(",")),
        conditions,
    ))
}

/// `DELETE FROM {table} {conditions}`
///
/// # Errors
/// Returns `QuickDbError::ValidationError` for an invalid table name.
pub fn delete_from(table: &str, conditions: Option<&str>) -> Result<String, QuickDbError> {
    validate_identifier(table, "table")?;
    Ok(with_conditions(format!("DELETE FROM {table}"), conditions))
}

fn checked_columns<'a>(
    columns: impl IntoIterator<Item = &'a str>,
) -> Result<Vec<&'a str>, QuickDbError> {
    let columns: Vec<&str> = columns.into_iter().collect();
    if columns.is_empty() {
        return Err(QuickDbError::ValidationError(
            "at least one column is required".to_string(),
        ));
    }
    for col in &columns {
        validate_identifier(col, "column")?;
    }
    Ok(columns)
}
