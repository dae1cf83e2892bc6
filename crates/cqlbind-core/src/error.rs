//! Error types for the statement layer.
//!
//! Failures fall into three disjoint families:
//!
//! - [`EncodeError`]: an input value cannot be represented in the target
//!   column type. Surfaced from `fill`/`write_raw`, fatal to that single
//!   bind attempt only.
//! - [`DecodeError`]: a row or result cannot be converted to the requested
//!   output type. Always a recoverable value, never a panic, so callers can
//!   skip or abort per row.
//! - [`ShapeError`]: a record type does not correspond to a statement's
//!   native field shape. Raised eagerly while *constructing* an adapted
//!   statement; it can never appear once a statement exists.

use std::fmt;

use crate::types::{CqlType, ProtocolVersion};

/// Failure to encode an input value into its wire representation.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodeError {
    /// The value's runtime type does not match the declared column type.
    TypeMismatch {
        /// Column being bound.
        column: String,
        /// Declared column type.
        expected: CqlType,
        /// Rendering of the offending value.
        value: String,
    },
    /// The column type has no encoding under the negotiated protocol version.
    UnsupportedType {
        /// The type without an encoding.
        ty: CqlType,
        /// The version in effect.
        version: ProtocolVersion,
    },
    /// The input carries no value for a declared bind column.
    MissingField {
        /// The unbound column.
        column: String,
    },
    /// A positional input has the wrong number of values.
    ArityMismatch {
        /// Declared parameter count.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::TypeMismatch {
                column,
                expected,
                value,
            } => write!(
                f,
                "cannot encode {value} as {expected} for column `{column}`"
            ),
            EncodeError::UnsupportedType { ty, version } => {
                write!(f, "type {ty} has no encoding under protocol {version}")
            }
            EncodeError::MissingField { column } => {
                write!(f, "no value supplied for bind column `{column}`")
            }
            EncodeError::ArityMismatch { expected, actual } => {
                write!(f, "expected {expected} bind values, got {actual}")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Failure to decode a row or execution result into the requested output.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// A requested column is absent from the row.
    MissingColumn {
        /// The missing column name.
        column: String,
    },
    /// The raw bytes decoded to a value of the wrong type for the target.
    TypeMismatch {
        /// Column being decoded.
        column: String,
        /// Type the caller asked for.
        expected: CqlType,
        /// Type actually found.
        actual: Option<CqlType>,
    },
    /// A null value where the target type is non-nullable.
    NullValue {
        /// Column holding the null.
        column: String,
    },
    /// The raw bytes are not a valid encoding of the declared type.
    Malformed {
        /// Column being decoded.
        column: String,
        /// What went wrong.
        detail: String,
    },
    /// The column type has no decoding under the negotiated protocol version.
    UnsupportedType {
        /// The type without a decoding.
        ty: CqlType,
        /// The version in effect.
        version: ProtocolVersion,
    },
    /// A result-level decode needed a row but the result carried none.
    EmptyResult,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MissingColumn { column } => {
                write!(f, "column `{column}` not present in row")
            }
            DecodeError::TypeMismatch {
                column,
                expected,
                actual,
            } => match actual {
                Some(actual) => write!(
                    f,
                    "column `{column}`: expected {expected}, found {actual}"
                ),
                None => write!(f, "column `{column}`: expected {expected}"),
            },
            DecodeError::NullValue { column } => {
                write!(f, "column `{column}` is null but the target is non-nullable")
            }
            DecodeError::Malformed { column, detail } => {
                write!(f, "column `{column}` is malformed: {detail}")
            }
            DecodeError::UnsupportedType { ty, version } => {
                write!(f, "type {ty} has no decoding under protocol {version}")
            }
            DecodeError::EmptyResult => write!(f, "execution result contains no rows"),
        }
    }
}

impl std::error::Error for DecodeError {}

/// Shape mismatch between a record type and a statement's native columns.
///
/// Only produced while building an adapted statement. A `ShapeError` means
/// the adapted statement was refused, so no statement carrying a bad shape
/// can ever run.
#[derive(Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A record field has no matching statement column.
    UnmatchedField {
        /// Record field name.
        name: String,
        /// Record field type.
        ty: CqlType,
    },
    /// A statement column has no matching record field.
    UnmatchedColumn {
        /// Column name.
        name: String,
        /// Column type.
        ty: CqlType,
    },
    /// Field and column share a name but disagree on type.
    TypeMismatch {
        /// The shared name.
        name: String,
        /// Column type declared by the statement.
        expected: CqlType,
        /// Type carried by the record field.
        actual: CqlType,
    },
    /// Positional shapes of different lengths.
    ArityMismatch {
        /// Statement column count.
        expected: usize,
        /// Record/tuple arity.
        actual: usize,
    },
    /// A scalar adaptation was requested on a multi-column shape.
    NotSingleColumn {
        /// Actual column count.
        count: usize,
    },
    /// The statement text contains a bind marker with no declared column.
    UnknownMarker {
        /// The marker name, without the leading `:`.
        marker: String,
    },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::UnmatchedField { name, ty } => {
                write!(f, "record field `{name}: {ty}` matches no statement column")
            }
            ShapeError::UnmatchedColumn { name, ty } => {
                write!(f, "statement column `{name}: {ty}` matches no record field")
            }
            ShapeError::TypeMismatch {
                name,
                expected,
                actual,
            } => write!(
                f,
                "`{name}`: statement declares {expected}, record carries {actual}"
            ),
            ShapeError::ArityMismatch { expected, actual } => {
                write!(f, "statement has {expected} columns, shape has {actual}")
            }
            ShapeError::NotSingleColumn { count } => {
                write!(f, "scalar adaptation requires exactly one column, found {count}")
            }
            ShapeError::UnknownMarker { marker } => {
                write!(f, "bind marker `:{marker}` has no declared parameter column")
            }
        }
    }
}

impl std::error::Error for ShapeError {}

/// Umbrella error for callers that do not care which family failed.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Encode-time failure.
    Encode(EncodeError),
    /// Decode-time failure.
    Decode(DecodeError),
    /// Construction-time shape mismatch.
    Shape(ShapeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Encode(e) => write!(f, "encode error: {e}"),
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::Shape(e) => write!(f, "shape error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Encode(e) => Some(e),
            Error::Decode(e) => Some(e),
            Error::Shape(e) => Some(e),
        }
    }
}

impl From<EncodeError> for Error {
    fn from(e: EncodeError) -> Self {
        Error::Encode(e)
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}

impl From<ShapeError> for Error {
    fn from(e: ShapeError) -> Self {
        Error::Shape(e)
    }
}

/// Convenience alias used across the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_error_display() {
        let e = EncodeError::MissingField {
            column: "id".to_string(),
        };
        assert_eq!(e.to_string(), "no value supplied for bind column `id`");
    }

    #[test]
    fn test_decode_error_display_type_mismatch() {
        let e = DecodeError::TypeMismatch {
            column: "name".to_string(),
            expected: CqlType::Text,
            actual: Some(CqlType::Int),
        };
        assert_eq!(e.to_string(), "column `name`: expected text, found int");
    }

    #[test]
    fn test_shape_error_display_unknown_marker() {
        let e = ShapeError::UnknownMarker {
            marker: "missing".to_string(),
        };
        assert_eq!(
            e.to_string(),
            "bind marker `:missing` has no declared parameter column"
        );
    }

    #[test]
    fn test_umbrella_error_source() {
        use std::error::Error as _;
        let e = Error::Decode(DecodeError::EmptyResult);
        assert!(e.source().is_some());
        assert_eq!(e.to_string(), "decode error: execution result contains no rows");
    }
}
