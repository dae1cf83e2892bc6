//! Typed CQL statement descriptors.
//!
//! cqlbind separates what a statement *is* from what executes it. A
//! descriptor - [`Query`], [`Insert`], [`Update`], or [`Delete`] - is
//! built once from CQL text and declared parameter/result shapes, then
//! bound many times against typed inputs. Adaptation to application
//! types happens structurally: a `#[derive(Record)]` struct, a tuple, or
//! a bare scalar is matched against the declared shape while the adapted
//! descriptor is constructed, so a shape mismatch is an error at
//! construction, never at bind time.
//!
//! ```
//! use cqlbind::prelude::*;
//!
//! #[derive(Record)]
//! struct PersonKey {
//!     id: i32,
//! }
//!
//! let query = Query::build(
//!     "SELECT id, name FROM people WHERE id = :id",
//!     vec![ColumnSpec::new("id", CqlType::Int)],
//!     vec![
//!         ColumnSpec::new("id", CqlType::Int),
//!         ColumnSpec::new("name", CqlType::Text),
//!     ],
//! )
//! .unwrap();
//! let by_key = query.from_record::<PersonKey>().unwrap();
//! assert_eq!(by_key.cql(), query.cql());
//! ```
//!
//! The workspace splits into `cqlbind-core` (data model, codec, and the
//! correspondence traits), `cqlbind-stmt` (the descriptors and their
//! combinators), and `cqlbind-macros` (the [`Record`] derive). This crate
//! re-exports all of it.

pub use cqlbind_core::{
    APPLIED_COLUMN, Blob, BoundStatement, ColumnSpec, CqlType, CqlValue, DecodeError, EncodeError,
    Error, ExecutionResult, FieldValue, Fields, FromFields, PreparedStatement, ProtocolVersion,
    RawValue, Result, Row, Scalar, ShapeError, Timestamp, ToFields, TupleFields, Uuid,
};
pub use cqlbind_macros::Record;
pub use cqlbind_stmt::{
    BatchResultReader, Delete, DeleteVerb, Dml, Insert, InsertVerb, Query, Update, UpdateVerb,
    Verb,
};

/// Lower-level entry points for driver glue.
pub mod core {
    pub use cqlbind_core::*;
}

/// Everything most applications need.
pub mod prelude {
    pub use crate::{
        ColumnSpec, CqlType, CqlValue, Delete, Dml, ExecutionResult, Fields, FromFields, Insert,
        PreparedStatement, ProtocolVersion, Query, Record, Row, Scalar, ToFields, Update,
    };
}
