//! Bindable values and their semantic types.
//!
//! [`Value`] is what literals carry into the argument list and what executors hand back
//! when a row is scanned. [`SqlType`] ties a Rust field type to a [`ValueType`] so the
//! registry can record it and decoders can convert scanned values back into fields.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A bound parameter or a scanned column value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// SQL NULL
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
    TimestampTz(DateTime<Utc>),
    Uuid(Uuid),
    Json(serde_json::Value),
    #[cfg(feature = "rust_decimal")]
    Decimal(rust_decimal::Decimal),
}

/// The semantic type of a model field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Bool,
    Int,
    UInt,
    Float,
    Text,
    Bytes,
    Date,
    Timestamp,
    TimestampTz,
    Uuid,
    Json,
    #[cfg(feature = "rust_decimal")]
    Decimal,
}

/// Conversion failure between a [`Value`] and a field type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("expected {expected:?}, found {found}")]
pub struct ValueError {
    pub expected: ValueType,
    pub found: String,
}

impl ValueError {
    fn new(expected: ValueType, found: &Value) -> Self {
        Self {
            expected,
            found: found.kind_name().to_string(),
        }
    }

    fn out_of_range(expected: ValueType, found: &Value) -> Self {
        Self {
            expected,
            found: format!("out of range {}", found.kind_name()),
        }
    }
}

impl Value {
    /// Returns `true` for SQL NULL.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The semantic type of this value, `None` for NULL.
    pub fn value_type(&self) -> Option<ValueType> {
        Some(match self {
            Value::Null => return None,
            Value::Bool(_) => ValueType::Bool,
            Value::Int(_) => ValueType::Int,
            Value::UInt(_) => ValueType::UInt,
            Value::Float(_) => ValueType::Float,
            Value::Text(_) => ValueType::Text,
            Value::Bytes(_) => ValueType::Bytes,
            Value::Date(_) => ValueType::Date,
            Value::Timestamp(_) => ValueType::Timestamp,
            Value::TimestampTz(_) => ValueType::TimestampTz,
            Value::Uuid(_) => ValueType::Uuid,
            Value::Json(_) => ValueType::Json,
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => ValueType::Decimal,
        })
    }

    fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "NULL",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::UInt(_) => "uint",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Date(_) => "date",
            Value::Timestamp(_) => "timestamp",
            Value::TimestampTz(_) => "timestamptz",
            Value::Uuid(_) => "uuid",
            Value::Json(_) => "json",
            #[cfg(feature = "rust_decimal")]
            Value::Decimal(_) => "decimal",
        }
    }

    /// Convert a scanned value into the representation expected for `ty`.
    ///
    /// Lossless conversions between the integer kinds, integers to floats, naive and UTC
    /// timestamps, and textual UUID/JSON are accepted. NULL passes only when `nullable`.
    pub fn coerce(self, ty: ValueType, nullable: bool) -> Result<Value, ValueError> {
        if self.is_null() {
            return if nullable {
                Ok(Value::Null)
            } else {
                Err(ValueError::new(ty, &self))
            };
        }
        if self.value_type() == Some(ty) {
            return Ok(self);
        }
        match (ty, self) {
            (ValueType::Int, Value::UInt(v)) => i64::try_from(v)
                .map(Value::Int)
                .map_err(|_| ValueError::out_of_range(ty, &Value::UInt(v))),
            (ValueType::UInt, Value::Int(v)) => u64::try_from(v)
                .map(Value::UInt)
                .map_err(|_| ValueError::out_of_range(ty, &Value::Int(v))),
            (ValueType::Float, Value::Int(v)) => Ok(Value::Float(v as f64)),
            (ValueType::Float, Value::UInt(v)) => Ok(Value::Float(v as f64)),
            (ValueType::Bool, Value::Int(v)) if v == 0 || v == 1 => Ok(Value::Bool(v == 1)),
            (ValueType::Timestamp, Value::TimestampTz(v)) => Ok(Value::Timestamp(v.naive_utc())),
            (ValueType::TimestampTz, Value::Timestamp(v)) => Ok(Value::TimestampTz(v.and_utc())),
            (ValueType::Uuid, Value::Text(s)) => Uuid::parse_str(&s)
                .map(Value::Uuid)
                .map_err(|_| ValueError::new(ty, &Value::Text(s))),
            (ValueType::Json, Value::Text(s)) => serde_json::from_str(&s)
                .map(Value::Json)
                .map_err(|_| ValueError::new(ty, &Value::Text(s))),
            (ty, other) => Err(ValueError::new(ty, &other)),
        }
    }
}

/// A Rust type that can be stored in a model field.
///
/// Implemented for the scalar types ormkit binds and for `Option<T>` of those.
pub trait SqlType: Sized + Clone + Into<Value> {
    /// Semantic type recorded in the table descriptor.
    const VALUE_TYPE: ValueType;

    /// Whether NULL is an acceptable value.
    const NULLABLE: bool = false;

    /// Convert a (coerced) value back into the field type.
    fn from_value(value: Value) -> Result<Self, ValueError>;
}

macro_rules! impl_signed {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(i64::from(v))
            }
        }

        impl SqlType for $ty {
            const VALUE_TYPE: ValueType = ValueType::Int;

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::Int(v) => <$ty>::try_from(v)
                        .map_err(|_| ValueError::out_of_range(ValueType::Int, &Value::Int(v))),
                    Value::UInt(v) => <$ty>::try_from(v)
                        .map_err(|_| ValueError::out_of_range(ValueType::Int, &Value::UInt(v))),
                    other => Err(ValueError::new(ValueType::Int, &other)),
                }
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($ty:ty),*) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::UInt(u64::from(v))
            }
        }

        impl SqlType for $ty {
            const VALUE_TYPE: ValueType = ValueType::UInt;

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::UInt(v) => <$ty>::try_from(v)
                        .map_err(|_| ValueError::out_of_range(ValueType::UInt, &Value::UInt(v))),
                    Value::Int(v) => <$ty>::try_from(v)
                        .map_err(|_| ValueError::out_of_range(ValueType::UInt, &Value::Int(v))),
                    other => Err(ValueError::new(ValueType::UInt, &other)),
                }
            }
        }
    )*};
}

impl_signed!(i8, i16, i32, i64);
impl_unsigned!(u8, u16, u32, u64);

/// Types that map 1:1 onto a single `Value` variant.
macro_rules! impl_direct {
    ($($ty:ty => $variant:ident),* $(,)?) => {$(
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl SqlType for $ty {
            const VALUE_TYPE: ValueType = ValueType::$variant;

            fn from_value(value: Value) -> Result<Self, ValueError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(ValueError::new(ValueType::$variant, &other)),
                }
            }
        }
    )*};
}

impl_direct!(
    bool => Bool,
    String => Text,
    Vec<u8> => Bytes,
    NaiveDate => Date,
    NaiveDateTime => Timestamp,
    DateTime<Utc> => TimestampTz,
    Uuid => Uuid,
    serde_json::Value => Json,
);

#[cfg(feature = "rust_decimal")]
impl_direct!(rust_decimal::Decimal => Decimal);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float(f64::from(v))
    }
}

impl SqlType for f64 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Float(v) => Ok(v),
            Value::Int(v) => Ok(v as f64),
            Value::UInt(v) => Ok(v as f64),
            other => Err(ValueError::new(ValueType::Float, &other)),
        }
    }
}

impl SqlType for f32 {
    const VALUE_TYPE: ValueType = ValueType::Float;

    fn from_value(value: Value) -> Result<Self, ValueError> {
        f64::from_value(value).map(|v| v as f32)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Value::Bytes(v.to_vec())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: SqlType> SqlType for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;
    const NULLABLE: bool = true;

    fn from_value(value: Value) -> Result<Self, ValueError> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}
