//! Version-aware raw value codec.
//!
//! The CQL native protocol frames every bound or returned value as raw
//! bytes whose layout depends on the declared column type (and, for a few
//! types, on the protocol version). This module is the byte-level half of
//! the raw statement capability: pure functions between [`CqlValue`] and
//! [`RawValue`].
//!
//! Layouts follow the native protocol spec: big-endian fixed-width
//! integers and IEEE-754 floats, UTF-8 text, raw blobs, 16-byte uuids,
//! epoch-millisecond timestamps, and lists framed as
//! `[count:i32] ([len:i32][bytes])*` with `-1` marking a null element.

use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, EncodeError};
use crate::types::{CqlType, ProtocolVersion};
use crate::value::{CqlValue, Uuid};

/// The wire form of a single bound or returned value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawValue {
    /// Null, framed on the wire as length `-1`.
    Null,
    /// Raw value bytes.
    Bytes(Vec<u8>),
}

impl RawValue {
    /// The payload bytes, or `None` for null.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            RawValue::Null => None,
            RawValue::Bytes(b) => Some(b),
        }
    }

    /// Whether this is the null marker.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

/// Encode a value for a column of the declared type.
///
/// `column` is carried into errors for context. The value must match the
/// declared type exactly; no coercions are performed.
pub fn encode(
    column: &str,
    value: &CqlValue,
    expected: &CqlType,
    version: ProtocolVersion,
) -> Result<RawValue, EncodeError> {
    if !version.supports(expected) {
        return Err(EncodeError::UnsupportedType {
            ty: expected.clone(),
            version,
        });
    }

    let mismatch = || EncodeError::TypeMismatch {
        column: column.to_string(),
        expected: expected.clone(),
        value: value.to_cql_literal(),
    };

    let bytes = match (expected, value) {
        (_, CqlValue::Null) => return Ok(RawValue::Null),
        (CqlType::Boolean, CqlValue::Boolean(b)) => vec![u8::from(*b)],
        (CqlType::TinyInt, CqlValue::TinyInt(v)) => v.to_be_bytes().to_vec(),
        (CqlType::SmallInt, CqlValue::SmallInt(v)) => v.to_be_bytes().to_vec(),
        (CqlType::Int, CqlValue::Int(v)) => v.to_be_bytes().to_vec(),
        (CqlType::BigInt, CqlValue::BigInt(v)) => v.to_be_bytes().to_vec(),
        (CqlType::Float, CqlValue::Float(v)) => v.to_be_bytes().to_vec(),
        (CqlType::Double, CqlValue::Double(v)) => v.to_be_bytes().to_vec(),
        (CqlType::Text, CqlValue::Text(s)) => s.as_bytes().to_vec(),
        (CqlType::Blob, CqlValue::Blob(b)) => b.clone(),
        (CqlType::Uuid, CqlValue::Uuid(u)) => u.as_bytes().to_vec(),
        (CqlType::Timestamp, CqlValue::Timestamp(ms)) => ms.to_be_bytes().to_vec(),
        (CqlType::List(element), CqlValue::List(items)) => {
            let count = i32::try_from(items.len()).map_err(|_| mismatch())?;
            let mut out = count.to_be_bytes().to_vec();
            for item in items {
                match encode(column, item, element, version)? {
                    RawValue::Null => out.extend_from_slice(&(-1_i32).to_be_bytes()),
                    RawValue::Bytes(b) => {
                        let len = i32::try_from(b.len()).map_err(|_| mismatch())?;
                        out.extend_from_slice(&len.to_be_bytes());
                        out.extend_from_slice(&b);
                    }
                }
            }
            out
        }
        _ => return Err(mismatch()),
    };

    Ok(RawValue::Bytes(bytes))
}

/// Decode raw bytes into a value of the declared type.
///
/// Null decodes to [`CqlValue::Null`] for every type; rejecting nulls for
/// non-nullable targets is the job of the typed conversion layer above.
pub fn decode(
    column: &str,
    raw: &RawValue,
    ty: &CqlType,
    version: ProtocolVersion,
) -> Result<CqlValue, DecodeError> {
    if !version.supports(ty) {
        return Err(DecodeError::UnsupportedType {
            ty: ty.clone(),
            version,
        });
    }

    let bytes = match raw {
        RawValue::Null => return Ok(CqlValue::Null),
        RawValue::Bytes(b) => b.as_slice(),
    };

    let malformed = |detail: String| DecodeError::Malformed {
        column: column.to_string(),
        detail,
    };

    let value = match ty {
        CqlType::Boolean => {
            let [b] = fixed::<1>(column, bytes, ty)?;
            CqlValue::Boolean(b != 0)
        }
        CqlType::TinyInt => CqlValue::TinyInt(i8::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::SmallInt => CqlValue::SmallInt(i16::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::Int => CqlValue::Int(i32::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::BigInt => CqlValue::BigInt(i64::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::Float => CqlValue::Float(f32::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::Double => CqlValue::Double(f64::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::Text => CqlValue::Text(
            std::str::from_utf8(bytes)
                .map_err(|e| malformed(format!("invalid utf-8: {e}")))?
                .to_string(),
        ),
        CqlType::Blob => CqlValue::Blob(bytes.to_vec()),
        CqlType::Uuid => CqlValue::Uuid(Uuid::from_bytes(fixed(column, bytes, ty)?)),
        CqlType::Timestamp => CqlValue::Timestamp(i64::from_be_bytes(fixed(column, bytes, ty)?)),
        CqlType::List(element) => {
            let mut cursor = bytes;
            let count = read_i32(column, &mut cursor)?;
            let count = usize::try_from(count)
                .map_err(|_| malformed(format!("negative list length {count}")))?;
            let mut items = Vec::with_capacity(count);
            for _ in 0..count {
                let len = read_i32(column, &mut cursor)?;
                if len < 0 {
                    items.push(CqlValue::Null);
                    continue;
                }
                let len = len as usize;
                if cursor.len() < len {
                    return Err(malformed(format!(
                        "list element truncated: need {len} bytes, have {}",
                        cursor.len()
                    )));
                }
                let (head, tail) = cursor.split_at(len);
                items.push(decode(column, &RawValue::Bytes(head.to_vec()), element, version)?);
                cursor = tail;
            }
            if !cursor.is_empty() {
                return Err(malformed(format!(
                    "{} trailing bytes after list payload",
                    cursor.len()
                )));
            }
            CqlValue::List(items)
        }
    };

    Ok(value)
}

fn fixed<const N: usize>(column: &str, bytes: &[u8], ty: &CqlType) -> Result<[u8; N], DecodeError> {
    <[u8; N]>::try_from(bytes).map_err(|_| DecodeError::Malformed {
        column: column.to_string(),
        detail: format!("{ty} expects {N} bytes, got {}", bytes.len()),
    })
}

fn read_i32(column: &str, cursor: &mut &[u8]) -> Result<i32, DecodeError> {
    if cursor.len() < 4 {
        return Err(DecodeError::Malformed {
            column: column.to_string(),
            detail: "truncated length prefix".to_string(),
        });
    }
    let (head, tail) = cursor.split_at(4);
    *cursor = tail;
    Ok(i32::from_be_bytes([head[0], head[1], head[2], head[3]]))
}
