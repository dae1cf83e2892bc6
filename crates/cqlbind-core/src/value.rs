//! Runtime CQL values and the `Scalar` conversion trait.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::types::CqlType;

/// A 16-byte `uuid` value.
///
/// Thin wrapper so `uuid` columns have a dedicated Rust type without
/// pulling a uuid crate into the core. `Display` renders the canonical
/// hyphenated form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uuid(pub [u8; 16]);

impl Uuid {
    /// Construct from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Uuid(bytes)
    }

    /// The raw byte representation.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
            b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7], b[8], b[9], b[10], b[11], b[12], b[13],
            b[14], b[15]
        )
    }
}

/// A `timestamp` value: milliseconds since the Unix epoch.
///
/// Distinct from `i64` so `bigint` and `timestamp` columns map to
/// different Rust types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

/// A `blob` value.
///
/// Distinct from `Vec<u8>` so the generic list conversion for `Vec<T>`
/// does not collide with byte payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob(pub Vec<u8>);

/// A typed runtime CQL value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CqlValue {
    /// Absent value.
    Null,
    /// `boolean`
    Boolean(bool),
    /// `tinyint`
    TinyInt(i8),
    /// `smallint`
    SmallInt(i16),
    /// `int`
    Int(i32),
    /// `bigint`
    BigInt(i64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `text`
    Text(String),
    /// `blob`
    Blob(Vec<u8>),
    /// `uuid`
    Uuid(Uuid),
    /// `timestamp` (epoch milliseconds)
    Timestamp(i64),
    /// `list<T>`
    List(Vec<CqlValue>),
}

impl CqlValue {
    /// Best-effort type of this value.
    ///
    /// `Null` has no type; an empty list has no element type. Both return
    /// `None`. Used for diagnostics only - encode paths check values
    /// against the *declared* column type instead.
    #[must_use]
    pub fn cql_type(&self) -> Option<CqlType> {
        match self {
            CqlValue::Null => None,
            CqlValue::Boolean(_) => Some(CqlType::Boolean),
            CqlValue::TinyInt(_) => Some(CqlType::TinyInt),
            CqlValue::SmallInt(_) => Some(CqlType::SmallInt),
            CqlValue::Int(_) => Some(CqlType::Int),
            CqlValue::BigInt(_) => Some(CqlType::BigInt),
            CqlValue::Float(_) => Some(CqlType::Float),
            CqlValue::Double(_) => Some(CqlType::Double),
            CqlValue::Text(_) => Some(CqlType::Text),
            CqlValue::Blob(_) => Some(CqlType::Blob),
            CqlValue::Uuid(_) => Some(CqlType::Uuid),
            CqlValue::Timestamp(_) => Some(CqlType::Timestamp),
            CqlValue::List(items) => items
                .first()
                .and_then(CqlValue::cql_type)
                .map(CqlType::list),
        }
    }

    /// Whether this is the null value.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, CqlValue::Null)
    }

    /// Render as a CQL literal, suitable for splicing into diagnostic
    /// statement text. Text is single-quoted with embedded quotes doubled,
    /// blobs render as `0x...`.
    #[must_use]
    pub fn to_cql_literal(&self) -> String {
        match self {
            CqlValue::Null => "null".to_string(),
            CqlValue::Boolean(b) => b.to_string(),
            CqlValue::TinyInt(v) => v.to_string(),
            CqlValue::SmallInt(v) => v.to_string(),
            CqlValue::Int(v) => v.to_string(),
            CqlValue::BigInt(v) => v.to_string(),
            CqlValue::Float(v) => v.to_string(),
            CqlValue::Double(v) => v.to_string(),
            CqlValue::Text(s) => format!("'{}'", s.replace('\'', "''")),
            CqlValue::Blob(bytes) => {
                let mut out = String::with_capacity(2 + bytes.len() * 2);
                out.push_str("0x");
                for b in bytes {
                    out.push_str(&format!("{b:02x}"));
                }
                out
            }
            CqlValue::Uuid(u) => u.to_string(),
            CqlValue::Timestamp(ms) => ms.to_string(),
            CqlValue::List(items) => {
                let rendered: Vec<_> = items.iter().map(CqlValue::to_cql_literal).collect();
                format!("[{}]", rendered.join(", "))
            }
        }
    }

    /// Render as JSON for structured diagnostics (tracing fields, dumps).
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CqlValue::Null => serde_json::Value::Null,
            CqlValue::Boolean(b) => serde_json::Value::Bool(*b),
            CqlValue::TinyInt(v) => serde_json::json!(v),
            CqlValue::SmallInt(v) => serde_json::json!(v),
            CqlValue::Int(v) => serde_json::json!(v),
            CqlValue::BigInt(v) => serde_json::json!(v),
            CqlValue::Float(v) => serde_json::json!(v),
            CqlValue::Double(v) => serde_json::json!(v),
            CqlValue::Text(s) => serde_json::Value::String(s.clone()),
            CqlValue::Blob(bytes) => serde_json::Value::String(format!("0x{}", hex(bytes))),
            CqlValue::Uuid(u) => serde_json::Value::String(u.to_string()),
            CqlValue::Timestamp(ms) => serde_json::json!(ms),
            CqlValue::List(items) => {
                serde_json::Value::Array(items.iter().map(CqlValue::to_json).collect())
            }
        }
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// A Rust type with a canonical CQL column type and value conversion.
///
/// This is the bridge the derive macro and the tuple adapters route
/// through: a record corresponds to a statement shape exactly when each of
/// its fields' `Scalar::cql_type()` matches the declared column type.
pub trait Scalar: Sized {
    /// The CQL column type this Rust type maps to.
    fn cql_type() -> CqlType;

    /// Convert into a runtime value. Infallible: every inhabitant of a
    /// `Scalar` type is representable.
    fn to_value(&self) -> CqlValue;

    /// Convert back from a runtime value. `column` is used for error
    /// context only.
    fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError>;
}

macro_rules! impl_scalar {
    ($rust:ty, $cql:expr, $variant:ident) => {
        impl Scalar for $rust {
            fn cql_type() -> CqlType {
                $cql
            }

            fn to_value(&self) -> CqlValue {
                CqlValue::$variant(self.clone())
            }

            fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError> {
                match value {
                    CqlValue::$variant(v) => Ok(v.clone()),
                    CqlValue::Null => Err(DecodeError::NullValue {
                        column: column.to_string(),
                    }),
                    other => Err(DecodeError::TypeMismatch {
                        column: column.to_string(),
                        expected: $cql,
                        actual: other.cql_type(),
                    }),
                }
            }
        }
    };
}

impl_scalar!(bool, CqlType::Boolean, Boolean);
impl_scalar!(i8, CqlType::TinyInt, TinyInt);
impl_scalar!(i16, CqlType::SmallInt, SmallInt);
impl_scalar!(i32, CqlType::Int, Int);
impl_scalar!(i64, CqlType::BigInt, BigInt);
impl_scalar!(f32, CqlType::Float, Float);
impl_scalar!(f64, CqlType::Double, Double);
impl_scalar!(String, CqlType::Text, Text);

impl Scalar for Blob {
    fn cql_type() -> CqlType {
        CqlType::Blob
    }

    fn to_value(&self) -> CqlValue {
        CqlValue::Blob(self.0.clone())
    }

    fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError> {
        match value {
            CqlValue::Blob(bytes) => Ok(Blob(bytes.clone())),
            CqlValue::Null => Err(DecodeError::NullValue {
                column: column.to_string(),
            }),
            other => Err(DecodeError::TypeMismatch {
                column: column.to_string(),
                expected: CqlType::Blob,
                actual: other.cql_type(),
            }),
        }
    }
}

impl Scalar for Uuid {
    fn cql_type() -> CqlType {
        CqlType::Uuid
    }

    fn to_value(&self) -> CqlValue {
        CqlValue::Uuid(*self)
    }

    fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError> {
        match value {
            CqlValue::Uuid(u) => Ok(*u),
            CqlValue::Null => Err(DecodeError::NullValue {
                column: column.to_string(),
            }),
            other => Err(DecodeError::TypeMismatch {
                column: column.to_string(),
                expected: CqlType::Uuid,
                actual: other.cql_type(),
            }),
        }
    }
}

impl Scalar for Timestamp {
    fn cql_type() -> CqlType {
        CqlType::Timestamp
    }

    fn to_value(&self) -> CqlValue {
        CqlValue::Timestamp(self.0)
    }

    fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError> {
        match value {
            CqlValue::Timestamp(ms) => Ok(Timestamp(*ms)),
            CqlValue::Null => Err(DecodeError::NullValue {
                column: column.to_string(),
            }),
            other => Err(DecodeError::TypeMismatch {
                column: column.to_string(),
                expected: CqlType::Timestamp,
                actual: other.cql_type(),
            }),
        }
    }
}

/// Nullable columns map to `Option<T>`: `None` binds null, null decodes
/// to `None`.
impl<T: Scalar> Scalar for Option<T> {
    fn cql_type() -> CqlType {
        T::cql_type()
    }

    fn to_value(&self) -> CqlValue {
        match self {
            Some(v) => v.to_value(),
            None => CqlValue::Null,
        }
    }

    fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError> {
        match value {
            CqlValue::Null => Ok(None),
            other => T::from_value(other, column).map(Some),
        }
    }
}

/// `list<T>` columns map to `Vec<T>`.
impl<T: Scalar> Scalar for Vec<T> {
    fn cql_type() -> CqlType {
        CqlType::list(T::cql_type())
    }

    fn to_value(&self) -> CqlValue {
        CqlValue::List(self.iter().map(Scalar::to_value).collect())
    }

    fn from_value(value: &CqlValue, column: &str) -> Result<Self, DecodeError> {
        match value {
            CqlValue::List(items) => items
                .iter()
                .map(|item| T::from_value(item, column))
                .collect(),
            CqlValue::Null => Err(DecodeError::NullValue {
                column: column.to_string(),
            }),
            other => Err(DecodeError::TypeMismatch {
                column: column.to_string(),
                expected: Self::cql_type(),
                actual: other.cql_type(),
            }),
        }
    }
}
