//! CQL column types and the native-protocol version tag.

use std::fmt;

use serde::{Deserialize, Serialize};

/// CQL native protocol version.
///
/// Wire encodings of values are version-dependent, so every encode and
/// decode call in this workspace takes a `ProtocolVersion`. Versions are
/// ordered; `V4` introduced the `tinyint` and `smallint` encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProtocolVersion {
    /// Native protocol v3.
    V3,
    /// Native protocol v4.
    V4,
    /// Native protocol v5.
    V5,
}

impl ProtocolVersion {
    /// Numeric version as it appears in the frame header.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            ProtocolVersion::V3 => 3,
            ProtocolVersion::V4 => 4,
            ProtocolVersion::V5 => 5,
        }
    }

    /// Parse from a frame-header version number.
    #[must_use]
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            3 => Some(ProtocolVersion::V3),
            4 => Some(ProtocolVersion::V4),
            5 => Some(ProtocolVersion::V5),
            _ => None,
        }
    }

    /// Whether this version can encode/decode the given column type.
    ///
    /// `tinyint` and `smallint` were added in protocol v4; everything else
    /// supported here dates back to v3.
    #[must_use]
    pub fn supports(self, ty: &CqlType) -> bool {
        match ty {
            CqlType::TinyInt | CqlType::SmallInt => self >= ProtocolVersion::V4,
            CqlType::List(inner) => self.supports(inner),
            _ => true,
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u8())
    }
}

/// A CQL column type.
///
/// The subset of CQL types this layer binds and decodes. `Display` renders
/// the lowercase DDL spelling (`int`, `text`, `list<bigint>`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CqlType {
    /// `boolean` - single byte.
    Boolean,
    /// `tinyint` - 8-bit signed integer (protocol v4+).
    TinyInt,
    /// `smallint` - 16-bit signed integer (protocol v4+).
    SmallInt,
    /// `int` - 32-bit signed integer.
    Int,
    /// `bigint` - 64-bit signed integer.
    BigInt,
    /// `float` - 32-bit IEEE-754.
    Float,
    /// `double` - 64-bit IEEE-754.
    Double,
    /// `text` - UTF-8 string.
    Text,
    /// `blob` - arbitrary bytes.
    Blob,
    /// `uuid` - 16-byte identifier.
    Uuid,
    /// `timestamp` - milliseconds since the Unix epoch.
    Timestamp,
    /// `list<T>` - ordered collection.
    List(Box<CqlType>),
}

impl CqlType {
    /// The DDL spelling of this type.
    #[must_use]
    pub fn cql_name(&self) -> String {
        match self {
            CqlType::Boolean => "boolean".to_string(),
            CqlType::TinyInt => "tinyint".to_string(),
            CqlType::SmallInt => "smallint".to_string(),
            CqlType::Int => "int".to_string(),
            CqlType::BigInt => "bigint".to_string(),
            CqlType::Float => "float".to_string(),
            CqlType::Double => "double".to_string(),
            CqlType::Text => "text".to_string(),
            CqlType::Blob => "blob".to_string(),
            CqlType::Uuid => "uuid".to_string(),
            CqlType::Timestamp => "timestamp".to_string(),
            CqlType::List(inner) => format!("list<{}>", inner.cql_name()),
        }
    }

    /// Shorthand for a list of the given element type.
    #[must_use]
    pub fn list(element: CqlType) -> Self {
        CqlType::List(Box::new(element))
    }
}

impl fmt::Display for CqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.cql_name())
    }
}
