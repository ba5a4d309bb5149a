//! Field types the row mapper knows how to read and write.

use super::FieldKind;
use crate::value::Value;
use chrono::{DateTime, NaiveDateTime, Utc};

/// Conversion between a field type and [`Value`].
///
/// `from_value` hands the value back on failure so the caller can report what it got.
/// `is_unset` decides whether the field belongs in a write payload.
pub trait Column: Sized {
    const KIND: FieldKind;

    fn to_value(&self) -> Value;

    fn from_value(value: Value) -> Result<Self, Value>;

    fn is_unset(&self) -> bool;
}

macro_rules! impl_int_column {
    ($($t:ty),*) => {
        $(
            impl Column for $t {
                const KIND: FieldKind = FieldKind::Integer;

                fn to_value(&self) -> Value {
                    Value::Int(i64::from(*self))
                }

                fn from_value(value: Value) -> Result<Self, Value> {
                    match value {
                        Value::Int(v) => <$t>::try_from(v).map_err(|_| Value::Int(v)),
                        other => Err(other),
                    }
                }

                fn is_unset(&self) -> bool {
                    *self == 0
                }
            }
        )*
    };
}

impl_int_column!(i16, i32, i64);

impl Column for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(v) => Ok(v),
            other => Err(other),
        }
    }

    fn is_unset(&self) -> bool {
        *self == 0.0
    }
}

impl Column for f32 {
    const KIND: FieldKind = FieldKind::Float;

    fn to_value(&self) -> Value {
        Value::Float(f64::from(*self))
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Float(v) => Ok(v as f32),
            other => Err(other),
        }
    }

    fn is_unset(&self) -> bool {
        *self == 0.0
    }
}

impl Column for String {
    const KIND: FieldKind = FieldKind::Text;

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Text(v) => Ok(v),
            other => Err(other),
        }
    }

    fn is_unset(&self) -> bool {
        self.is_empty()
    }
}

impl Column for bool {
    const KIND: FieldKind = FieldKind::Bool;

    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(other),
        }
    }

    fn is_unset(&self) -> bool {
        !*self
    }
}

impl Column for DateTime<Utc> {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(*self)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Timestamp(v) => Ok(v),
            other => Err(other),
        }
    }

    fn is_unset(&self) -> bool {
        *self == DateTime::<Utc>::default()
    }
}

impl Column for NaiveDateTime {
    const KIND: FieldKind = FieldKind::Timestamp;

    fn to_value(&self) -> Value {
        Value::Timestamp(self.and_utc())
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Timestamp(v) => Ok(v.naive_utc()),
            other => Err(other),
        }
    }

    fn is_unset(&self) -> bool {
        *self == NaiveDateTime::default()
    }
}

// Option<T> delegates to the inner type; only `None` counts as unset.
impl<T: Column> Column for Option<T> {
    const KIND: FieldKind = T::KIND;

    fn to_value(&self) -> Value {
        self.as_ref().map_or(Value::Null, Column::to_value)
    }

    fn from_value(value: Value) -> Result<Self, Value> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }

    fn is_unset(&self) -> bool {
        self.is_none()
    }
}
