//! Column decoding: one driver row in, one [`RowMap`] out.
//!
//! [`PgDecoder`] reads every column according to its server type. Types the mapper
//! has no field kind for are handed over as raw bytes, and `numeric` arrives as the
//! bytes of its decimal text (`NaN`, `Infinity` and `-Infinity` included), so the
//! mapper's byte coercion decides what they become.

use crate::error::{FluentError, FluentResult};
use crate::mapper::RowMap;
use crate::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use std::error::Error;
use tokio_postgres::Row;
use tokio_postgres::types::{FromSql, Type};

/// Turns driver rows into column/value mappings.
pub trait ColumnDecoder: Send + Sync {
    /// Decode the column at `idx`. SQL `NULL` must come back as [`Value::Null`].
    fn decode(&self, row: &Row, idx: usize) -> FluentResult<Value>;

    /// Decode every column of `row`, keyed by column name.
    ///
    /// With duplicate column names the last one wins.
    fn decode_row(&self, row: &Row) -> FluentResult<RowMap> {
        let mut map = RowMap::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            map.insert(column.name().to_string(), self.decode(row, idx)?);
        }
        Ok(map)
    }
}

/// Default decoder for the built-in Postgres types.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgDecoder;

/// How a server type is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Int2,
    Int4,
    Int8,
    Oid,
    Float4,
    Float8,
    Text,
    Bool,
    Timestamp,
    TimestampTz,
    Date,
    Numeric,
    Raw,
}

fn slot_for(ty: &Type) -> Slot {
    match *ty {
        Type::INT2 => Slot::Int2,
        Type::INT4 => Slot::Int4,
        Type::INT8 => Slot::Int8,
        Type::OID => Slot::Oid,
        Type::FLOAT4 => Slot::Float4,
        Type::FLOAT8 => Slot::Float8,
        Type::BOOL => Slot::Bool,
        Type::TIMESTAMP => Slot::Timestamp,
        Type::TIMESTAMPTZ => Slot::TimestampTz,
        Type::DATE => Slot::Date,
        Type::NUMERIC => Slot::Numeric,
        _ if <String as FromSql<'_>>::accepts(ty) => Slot::Text,
        _ => Slot::Raw,
    }
}

impl ColumnDecoder for PgDecoder {
    fn decode(&self, row: &Row, idx: usize) -> FluentResult<Value> {
        let column = &row.columns()[idx];
        let value = match slot_for(column.type_()) {
            Slot::Int2 => get::<i16>(row, idx)?.into(),
            Slot::Int4 => get::<i32>(row, idx)?.into(),
            Slot::Int8 => get::<i64>(row, idx)?.into(),
            Slot::Oid => get::<u32>(row, idx)?.into(),
            Slot::Float4 => get::<f32>(row, idx)?.into(),
            Slot::Float8 => get::<f64>(row, idx)?.into(),
            Slot::Text => get::<String>(row, idx)?.into(),
            Slot::Bool => get::<bool>(row, idx)?.into(),
            Slot::Timestamp => get::<NaiveDateTime>(row, idx)?.into(),
            Slot::TimestampTz => get::<DateTime<Utc>>(row, idx)?.into(),
            Slot::Date => get::<NaiveDate>(row, idx)?
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .into(),
            Slot::Numeric => get::<NumericText>(row, idx)?.map(|n| n.0.into_bytes()).into(),
            Slot::Raw => get::<RawBytes>(row, idx)?.map(|raw| raw.0).into(),
        };
        Ok(value)
    }
}

fn get<'a, T: FromSql<'a>>(row: &'a Row, idx: usize) -> FluentResult<Option<T>> {
    row.try_get::<_, Option<T>>(idx)
        .map_err(|e| FluentError::decode(row.columns()[idx].name(), e.to_string()))
}

// numeric sign words for values `Decimal` cannot hold
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// A `numeric` column as its decimal text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NumericText(String);

impl<'a> FromSql<'a> for NumericText {
    fn from_sql(ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        let special = match raw.get(4..6) {
            Some(&[hi, lo]) => match u16::from_be_bytes([hi, lo]) {
                NUMERIC_NAN => Some("NaN"),
                NUMERIC_PINF => Some("Infinity"),
                NUMERIC_NINF => Some("-Infinity"),
                _ => None,
            },
            _ => None,
        };
        match special {
            Some(text) => Ok(NumericText(text.to_string())),
            None => Decimal::from_sql(ty, raw).map(|d| NumericText(d.to_string())),
        }
    }

    fn accepts(ty: &Type) -> bool {
        *ty == Type::NUMERIC
    }
}

/// The column's wire bytes, whatever its type.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawBytes(Vec<u8>);

impl<'a> FromSql<'a> for RawBytes {
    fn from_sql(_ty: &Type, raw: &'a [u8]) -> Result<Self, Box<dyn Error + Sync + Send>> {
        Ok(RawBytes(raw.to_vec()))
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }
}
