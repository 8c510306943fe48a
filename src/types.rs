use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::ser::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use crate::error::QuickDbError;

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used for every backend, and `From` conversions cover the common Rust
/// types so parameter lists stay short:
/// ```rust
/// use quick_db::prelude::*;
///
/// let params: Vec<RowValues> = vec![1.into(), "alice".into(), true.into()];
/// assert_eq!(params[1], RowValues::Text("alice".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let RowValues::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    /// Parse a loosely typed command-line value.
    ///
    /// Integers and floats become numeric values, `null`/`true`/`false` (any case) become
    /// their SQL counterparts, and everything else is text. Zero-padded or `+`-signed
    /// numerals (`02139`, `+1`) stay text so codes keep their exact spelling.
    #[must_use]
    pub fn parse_loose(raw: &str) -> Self {
        let unsigned = raw.strip_prefix('-').unwrap_or(raw);
        let zero_padded = unsigned.len() > 1
            && unsigned.starts_with('0')
            && unsigned.as_bytes()[1].is_ascii_digit();
        if !zero_padded && !raw.starts_with('+') {
            if let Ok(i) = raw.parse::<i64>() {
                return RowValues::Int(i);
            }
            if let Ok(f) = raw.parse::<f64>()
                && f.is_finite()
            {
                return RowValues::Float(f);
            }
        }
        match raw.to_ascii_lowercase().as_str() {
            "null" => RowValues::Null,
            "true" => RowValues::Bool(true),
            "false" => RowValues::Bool(false),
            _ => RowValues::Text(raw.to_string()),
        }
    }

    /// Render the value as JSON, the shape used when records are serialized.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            RowValues::Int(i) => JsonValue::from(*i),
            RowValues::Float(f) => serde_json::Number::from_f64(*f)
                .map_or(JsonValue::Null, JsonValue::Number),
            RowValues::Text(s) => JsonValue::String(s.clone()),
            RowValues::Bool(b) => JsonValue::Bool(*b),
            RowValues::Timestamp(dt) => JsonValue::String(dt.format("%F %T%.f").to_string()),
            RowValues::Null => JsonValue::Null,
            RowValues::JSON(v) => v.clone(),
            RowValues::Blob(bytes) => {
                JsonValue::Array(bytes.iter().map(|b| JsonValue::from(*b)).collect())
            }
        }
    }
}

impl Serialize for RowValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RowValues::Int(i) => serializer.serialize_i64(*i),
            RowValues::Float(f) => serializer.serialize_f64(*f),
            RowValues::Text(s) => serializer.serialize_str(s),
            RowValues::Bool(b) => serializer.serialize_bool(*b),
            RowValues::Timestamp(dt) => serializer.collect_str(&dt.format("%F %T%.f")),
            RowValues::Null => serializer.serialize_unit(),
            RowValues::JSON(v) => v.serialize(serializer),
            RowValues::Blob(bytes) => serializer.collect_seq(bytes),
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Ordered column/value pairs for `insert` and `update`.
///
/// Iteration order is the column order of the generated statement.
/// ```rust
/// use quick_db::prelude::*;
///
/// let data = ColumnValues::new().with("name", "Ada").with("age", 36);
/// assert_eq!(data.columns().collect::<Vec<_>>(), ["name", "age"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    entries: Vec<(String, RowValues)>,
}

impl ColumnValues {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style append.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<String>, value: impl Into<RowValues>) {
        self.entries.push((column.into(), value.into()));
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(c, _)| c.as_str())
    }

    /// Values in column order, cloned into a parameter list.
    #[must_use]
    pub fn values(&self) -> Vec<RowValues> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValues)> {
        self.entries.iter().map(|(c, v)| (c.as_str(), v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ColumnValues
where
    K: Into<String>,
    V: Into<RowValues>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = ColumnValues::new();
        for (k, v) in iter {
            data.push(k, v);
        }
        data
    }
}

/// The database type supported by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum DatabaseType {
    /// `PostgreSQL` database
    #[cfg(feature = "postgres")]
    Postgres,
    /// `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite,
}

/// Convert a slice of `RowValues` into backend-specific parameters.
pub trait ParamConverter<'a> {
    type Converted;

    /// Convert a slice of `RowValues` into the backend's parameter type.
    ///
    /// # Errors
    ///
    /// Returns `QuickDbError` if the conversion fails for any parameter.
    fn convert_sql_params(params: &'a [RowValues]) -> Result<Self::Converted, QuickDbError>;
}

/// Generic entry point over [`ParamConverter`].
///
/// # Errors
///
/// Propagates the converter's error.
pub fn convert_sql_params<'a, T: ParamConverter<'a>>(
    params: &'a [RowValues],
) -> Result<T::Converted, QuickDbError> {
    T::convert_sql_params(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn loose_parsing() {
        assert_eq!(RowValues::parse_loose("42"), RowValues::Int(42));
        assert_eq!(RowValues::parse_loose("-1.5"), RowValues::Float(-1.5));
        assert_eq!(RowValues::parse_loose("NULL"), RowValues::Null);
        assert_eq!(RowValues::parse_loose("true"), RowValues::Bool(true));
        assert_eq!(RowValues::parse_loose("Ada"), RowValues::Text("Ada".into()));
        assert_eq!(RowValues::parse_loose("inf"), RowValues::Text("inf".into()));
        assert_eq!(RowValues::parse_loose("02139"), RowValues::Text("02139".into()));
        assert_eq!(RowValues::parse_loose("+7"), RowValues::Text("+7".into()));
        assert_eq!(RowValues::parse_loose("0"), RowValues::Int(0));
        assert_eq!(RowValues::parse_loose("0.25"), RowValues::Float(0.25));
    }

    #[test]
    fn bool_accessor_accepts_sqlite_integers() {
        assert_eq!(RowValues::Int(1).as_bool(), Some(&true));
        assert_eq!(RowValues::Int(0).as_bool(), Some(&false));
        assert_eq!(RowValues::Int(7).as_bool(), None);
    }

    #[test]
    fn timestamp_from_text() {
        let v = RowValues::Text("2024-01-03 10:30:00".into());
        let dt = NaiveDateTime::parse_from_str("2024-01-03 10:30:00", "%Y-%m-%d %H:%M:%S")
            .unwrap();
        assert_eq!(v.as_timestamp(), Some(dt));
    }

    #[test]
    fn option_conversion() {
        let none: Option<i64> = None;
        assert_eq!(RowValues::from(none), RowValues::Null);
        assert_eq!(RowValues::from(Some("x")), RowValues::Text("x".into()));
    }

    #[test]
    fn json_rendering() {
        assert_eq!(RowValues::Int(3).to_json(), json!(3));
        assert_eq!(RowValues::Float(f64::NAN).to_json(), json!(null));
        assert_eq!(RowValues::Blob(vec![1, 2]).to_json(), json!([1, 2]));
        assert_eq!(
            serde_json::to_value(RowValues::Text("a".into())).unwrap(),
            json!("a")
        );
    }

    #[test]
    fn column_values_keep_insertion_order() {
        let data: ColumnValues = vec![("b", 2), ("a", 1)].into_iter().collect();
        assert_eq!(data.columns().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(data.values(), vec![RowValues::Int(2), RowValues::Int(1)]);
        assert_eq!(data.len(), 2);
        assert!(ColumnValues::new().is_empty());
    }
}
