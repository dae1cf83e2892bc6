//! Rows, execution results, and the external driver's handle types.
//!
//! These are the data shapes exchanged with the driver that actually
//! prepares and executes statements. The statement layer only ever
//! constructs [`BoundStatement`]s and consumes [`Row`]s /
//! [`ExecutionResult`]s; it never performs I/O.

use crate::codec::{self, RawValue};
use crate::column::ColumnSpec;
use crate::error::{DecodeError, EncodeError};
use crate::fields::Fields;
use crate::types::{CqlType, ProtocolVersion};
use crate::value::CqlValue;

/// Column name Cassandra uses for the conditional-write outcome flag.
pub const APPLIED_COLUMN: &str = "[applied]";

/// One undecoded result row: column metadata plus raw values.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Vec<ColumnSpec>,
    values: Vec<RawValue>,
}

impl Row {
    /// Build a row from column metadata and raw values, positionally
    /// aligned.
    #[must_use]
    pub fn new(columns: Vec<ColumnSpec>, values: Vec<RawValue>) -> Self {
        Self { columns, values }
    }

    /// Encode typed values into a row. Test and adapter convenience; the
    /// inverse of decoding the row back through the same column specs.
    pub fn from_values(
        columns: Vec<ColumnSpec>,
        values: &[CqlValue],
        version: ProtocolVersion,
    ) -> Result<Self, EncodeError> {
        if values.len() != columns.len() {
            return Err(EncodeError::ArityMismatch {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        let raw = columns
            .iter()
            .zip(values)
            .map(|(spec, value)| codec::encode(&spec.name, value, &spec.ty, version))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(columns, raw))
    }

    /// The row's column metadata.
    #[must_use]
    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    /// Raw value of a column by name.
    #[must_use]
    pub fn raw(&self, name: &str) -> Option<&RawValue> {
        self.columns
            .iter()
            .position(|c| c.name == name)
            .and_then(|i| self.values.get(i))
    }

    /// Decode one column to a typed value.
    pub fn decode_column(
        &self,
        name: &str,
        ty: &CqlType,
        version: ProtocolVersion,
    ) -> Result<CqlValue, DecodeError> {
        let raw = self.raw(name).ok_or_else(|| DecodeError::MissingColumn {
            column: name.to_string(),
        })?;
        codec::decode(name, raw, ty, version)
    }

    /// Decode the named columns, in the order given, into a field list.
    pub fn decode(
        &self,
        shape: &[ColumnSpec],
        version: ProtocolVersion,
    ) -> Result<Fields, DecodeError> {
        let mut fields = Fields::empty();
        for spec in shape {
            let value = self.decode_column(&spec.name, &spec.ty, version)?;
            fields.push(spec.name.clone(), spec.ty.clone(), value);
        }
        Ok(fields)
    }
}

/// The full payload returned by executing a statement (or a batch).
///
/// Mutations decode from this rather than from a single row: a plain write
/// returns no rows, a conditional write returns one row carrying the
/// `[applied]` flag and, on failure, the existing column values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExecutionResult {
    rows: Vec<Row>,
}

impl ExecutionResult {
    /// An empty result, as returned by an unconditional mutation.
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new() }
    }

    /// Wrap rows returned by the driver.
    #[must_use]
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// The result rows.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The first row, if any.
    #[must_use]
    pub fn first_row(&self) -> Option<&Row> {
        self.rows.first()
    }

    /// Conditional-write outcome.
    ///
    /// Reads the `[applied]` boolean from the first row. A result with no
    /// rows or no `[applied]` column is an unconditional write, which is
    /// always applied.
    pub fn was_applied(&self, version: ProtocolVersion) -> Result<bool, DecodeError> {
        let Some(row) = self.first_row() else {
            return Ok(true);
        };
        if row.raw(APPLIED_COLUMN).is_none() {
            return Ok(true);
        }
        match row.decode_column(APPLIED_COLUMN, &CqlType::Boolean, version)? {
            CqlValue::Boolean(applied) => Ok(applied),
            CqlValue::Null => Err(DecodeError::NullValue {
                column: APPLIED_COLUMN.to_string(),
            }),
            other => Err(DecodeError::TypeMismatch {
                column: APPLIED_COLUMN.to_string(),
                expected: CqlType::Boolean,
                actual: other.cql_type(),
            }),
        }
    }
}

/// Handle to a statement the driver has prepared.
///
/// Produced by the external driver's `prepare`; consumed by `fill` to
/// order bound values the way the server expects them.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStatement {
    id: Vec<u8>,
    bind_columns: Vec<ColumnSpec>,
}

impl PreparedStatement {
    /// Wrap a prepared-statement id and its bind column metadata.
    #[must_use]
    pub fn new(id: Vec<u8>, bind_columns: Vec<ColumnSpec>) -> Self {
        Self { id, bind_columns }
    }

    /// The server-assigned statement id.
    #[must_use]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    /// Bind columns in the order the server expects values.
    #[must_use]
    pub fn bind_columns(&self) -> &[ColumnSpec] {
        &self.bind_columns
    }
}

/// A prepared statement with values bound, ready for the driver to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundStatement {
    prepared_id: Vec<u8>,
    values: Vec<(String, RawValue)>,
}

impl BoundStatement {
    /// Pair a prepared-statement id with named raw values.
    #[must_use]
    pub fn new(prepared_id: Vec<u8>, values: Vec<(String, RawValue)>) -> Self {
        Self {
            prepared_id,
            values,
        }
    }

    /// The prepared statement this binds to.
    #[must_use]
    pub fn prepared_id(&self) -> &[u8] {
        &self.prepared_id
    }

    /// The bound values, in the prepared statement's bind order.
    #[must_use]
    pub fn values(&self) -> &[(String, RawValue)] {
        &self.values
    }
}
