use std::error::Error;

use chrono::{NaiveDateTime, TimeZone, Utc};
use serde_json::Value as JsonValue;
use tokio_postgres::types::{IsNull, ToSql, Type, WrongType, to_sql_checked};
use tokio_util::bytes;

use crate::error::QuickDbError;
use crate::types::{ParamConverter, RowValues};

/// Borrowed Postgres parameters.
pub struct Params<'a> {
    references: Vec<&'a (dyn ToSql + Sync)>,
}

impl<'a> Params<'a> {
    /// Convert from a slice of `RowValues` to Postgres parameters
    ///
    /// # Errors
    /// Never fails; type mismatches surface from the server when the statement runs.
    pub fn convert(params: &'a [RowValues]) -> Result<Params<'a>, QuickDbError> {
        let references: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|p| p as &(dyn ToSql + Sync)).collect();

        Ok(Params { references })
    }

    #[must_use]
    pub fn as_refs(&self) -> &[&(dyn ToSql + Sync)] {
        &self.references
    }
}

impl<'a> ParamConverter<'a> for Params<'a> {
    type Converted = Params<'a>;

    fn convert_sql_params(params: &'a [RowValues]) -> Result<Self::Converted, QuickDbError> {
        Self::convert(params)
    }
}

fn wrong_type<T>(ty: &Type) -> Box<dyn Error + Sync + Send> {
    Box::new(WrongType::new::<T>(ty.clone()))
}

fn is_text(ty: &Type) -> bool {
    matches!(*ty, Type::TEXT | Type::VARCHAR | Type::BPCHAR | Type::NAME)
}

fn text_to_sql(
    s: &str,
    ty: &Type,
    out: &mut bytes::BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        _ if is_text(ty) => s.to_sql(ty, out),
        Type::CHAR => match s.as_bytes() {
            [b] if b.is_ascii() => i8::try_from(*b)?.to_sql(ty, out),
            _ => Err(wrong_type::<String>(ty)),
        },
        Type::INT2 => s.trim().parse::<i16>()?.to_sql(ty, out),
        Type::INT4 => s.trim().parse::<i32>()?.to_sql(ty, out),
        Type::INT8 => s.trim().parse::<i64>()?.to_sql(ty, out),
        Type::FLOAT4 => s.trim().parse::<f32>()?.to_sql(ty, out),
        Type::FLOAT8 => s.trim().parse::<f64>()?.to_sql(ty, out),
        Type::BOOL => s.trim().parse::<bool>()?.to_sql(ty, out),
        Type::JSON | Type::JSONB => serde_json::from_str::<JsonValue>(s)?.to_sql(ty, out),
        Type::TIMESTAMP | Type::TIMESTAMPTZ | Type::DATE => RowValues::Text(s.to_string())
            .as_timestamp()
            .ok_or_else(|| wrong_type::<String>(ty))
            .and_then(|dt| timestamp_to_sql(dt, ty, out)),
        Type::BYTEA => s.as_bytes().to_sql(ty, out),
        _ => Err(wrong_type::<String>(ty)),
    }
}

fn timestamp_to_sql(
    dt: NaiveDateTime,
    ty: &Type,
    out: &mut bytes::BytesMut,
) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
    match *ty {
        Type::TIMESTAMP => dt.to_sql(ty, out),
        // naive values are taken as UTC, matching how TIMESTAMPTZ columns are decoded
        Type::TIMESTAMPTZ => Utc.from_utc_datetime(&dt).to_sql(ty, out),
        Type::DATE => dt.date().to_sql(ty, out),
        _ if is_text(ty) => dt.format("%F %T%.f").to_string().to_sql(ty, out),
        _ => Err(wrong_type::<NaiveDateTime>(ty)),
    }
}

impl ToSql for RowValues {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut bytes::BytesMut,
    ) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self {
            // narrow to the column width so `?` works against int2/int4 keys
            RowValues::Int(i) => match *ty {
                Type::INT2 => i16::try_from(*i)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*i)?.to_sql(ty, out),
                Type::INT8 => i.to_sql(ty, out),
                Type::FLOAT4 => {
                    #[allow(clippy::cast_precision_loss)]
                    let f = *i as f32;
                    f.to_sql(ty, out)
                }
                Type::FLOAT8 => {
                    #[allow(clippy::cast_precision_loss)]
                    let f = *i as f64;
                    f.to_sql(ty, out)
                }
                _ if is_text(ty) => i.to_string().to_sql(ty, out),
                _ => Err(wrong_type::<i64>(ty)),
            },
            RowValues::Float(f) => match *ty {
                Type::FLOAT4 => {
                    #[allow(clippy::cast_possible_truncation)]
                    let narrowed = *f as f32;
                    narrowed.to_sql(ty, out)
                }
                Type::FLOAT8 => f.to_sql(ty, out),
                _ if is_text(ty) => f.to_string().to_sql(ty, out),
                _ => Err(wrong_type::<f64>(ty)),
            },
            RowValues::Text(s) => text_to_sql(s, ty, out),
            RowValues::Bool(b) => match *ty {
                Type::BOOL => b.to_sql(ty, out),
                Type::INT2 | Type::INT4 | Type::INT8 => {
                    RowValues::Int(i64::from(*b)).to_sql(ty, out)
                }
                _ if is_text(ty) => b.to_string().to_sql(ty, out),
                _ => Err(wrong_type::<bool>(ty)),
            },
            RowValues::Timestamp(dt) => timestamp_to_sql(*dt, ty, out),
            RowValues::Null => Ok(IsNull::Yes),
            RowValues::JSON(jsval) => match *ty {
                Type::JSON | Type::JSONB => jsval.to_sql(ty, out),
                _ if is_text(ty) => jsval.to_string().to_sql(ty, out),
                _ => Err(wrong_type::<JsonValue>(ty)),
            },
            RowValues::Blob(bytes) => match *ty {
                Type::BYTEA => bytes.to_sql(ty, out),
                _ => Err(wrong_type::<Vec<u8>>(ty)),
            },
        }
    }

    fn accepts(ty: &Type) -> bool {
        matches!(
            *ty,
            Type::INT2
                | Type::INT4
                | Type::INT8
                | Type::FLOAT4
                | Type::FLOAT8
                | Type::TEXT
                | Type::VARCHAR
                | Type::BPCHAR
                | Type::CHAR
                | Type::NAME
                | Type::BOOL
                | Type::TIMESTAMP
                | Type::TIMESTAMPTZ
                | Type::DATE
                | Type::JSON
                | Type::JSONB
                | Type::BYTEA
        )
    }

    to_sql_checked!();
}
