//! Core types and conversion traits for cqlbind.
//!
//! `cqlbind-core` is the **foundation layer** of the workspace. It defines
//! the data model shared between the statement layer, the derive macro,
//! and whatever driver ultimately executes statements.
//!
//! # Role In The Architecture
//!
//! - **Data model**: [`CqlType`], [`CqlValue`], [`RawValue`], [`Row`], and
//!   [`ExecutionResult`] represent statement inputs and outputs.
//! - **Raw capability**: the [`codec`] module encodes and decodes values
//!   under a [`ProtocolVersion`]; [`PreparedStatement`] and
//!   [`BoundStatement`] are the handle types exchanged with a driver.
//! - **Correspondence contracts**: [`Scalar`], [`ToFields`],
//!   [`FromFields`], and [`TupleFields`] are the traits record adaptation
//!   routes through; shape checks live in [`column`].
//!
//! # Who Uses This Crate
//!
//! - `cqlbind-stmt` builds statement descriptors over these types.
//! - `cqlbind-macros` generates `ToFields`/`FromFields` impls defined here.
//! - Driver integrations consume `BoundStatement` and produce `Row` /
//!   `ExecutionResult`.
//!
//! Most applications should use the `cqlbind` facade; reach for
//! `cqlbind-core` directly when writing driver glue.

pub mod codec;
pub mod column;
pub mod cqltext;
pub mod error;
pub mod fields;
pub mod row;
pub mod types;
pub mod value;

pub use codec::{RawValue, decode, encode};
pub use column::{ColumnSpec, verify_named, verify_positional, verify_single};
pub use cqltext::{bind_markers, render_literals};
pub use error::{DecodeError, EncodeError, Error, Result, ShapeError};
pub use fields::{FieldValue, Fields, FromFields, ToFields, TupleFields};
pub use row::{APPLIED_COLUMN, BoundStatement, ExecutionResult, PreparedStatement, Row};
pub use types::{CqlType, ProtocolVersion};
pub use value::{Blob, CqlValue, Scalar, Timestamp, Uuid};
