//! The input side shared by every statement kind.
//!
//! A [`BindSide`] pairs the fixed statement text and parameter shape with
//! the function that turns a typed input into a field list. Input
//! adaptation (`map_in` and the `from_*` correspondence operations) only
//! ever rewraps that function; text and shape are never touched.

use std::sync::Arc;

use cqlbind_core::{
    BoundStatement, ColumnSpec, EncodeError, Fields, PreparedStatement, ProtocolVersion, RawValue,
    ShapeError, bind_markers, encode, render_literals,
};

pub(crate) type WriteFn<I> = dyn Fn(&I) -> Result<Fields, EncodeError> + Send + Sync;

pub(crate) struct BindSide<I> {
    cql: Arc<str>,
    params: Arc<[ColumnSpec]>,
    write: Arc<WriteFn<I>>,
}

impl<I> Clone for BindSide<I> {
    fn clone(&self) -> Self {
        Self {
            cql: Arc::clone(&self.cql),
            params: Arc::clone(&self.params),
            write: Arc::clone(&self.write),
        }
    }
}

impl BindSide<Fields> {
    /// Build the native bind side. Verifies eagerly that every `:marker`
    /// in the text has a declared parameter column.
    pub(crate) fn native(cql: &str, params: Vec<ColumnSpec>) -> Result<Self, ShapeError> {
        for marker in bind_markers(cql) {
            if !params.iter().any(|p| p.name == marker) {
                return Err(ShapeError::UnknownMarker { marker });
            }
        }
        Ok(Self {
            cql: Arc::from(cql),
            params: params.into(),
            write: Arc::new(|fields: &Fields| Ok(fields.clone())),
        })
    }
}

impl<I: 'static> BindSide<I> {
    pub(crate) fn cql(&self) -> &str {
        &self.cql
    }

    pub(crate) fn params(&self) -> &[ColumnSpec] {
        &self.params
    }

    /// Produce the typed field list for an input.
    pub(crate) fn write_fields(&self, input: &I) -> Result<Fields, EncodeError> {
        (self.write)(input)
    }

    /// Encode an input to named raw values, in declared parameter order.
    pub(crate) fn write_raw(
        &self,
        input: &I,
        version: ProtocolVersion,
    ) -> Result<Vec<(String, RawValue)>, EncodeError> {
        let fields = self.write_fields(input)?;
        let mut out = Vec::with_capacity(self.params.len());
        for spec in self.params.iter() {
            let value = fields.get(&spec.name).ok_or_else(|| EncodeError::MissingField {
                column: spec.name.clone(),
            })?;
            out.push((spec.name.clone(), encode(&spec.name, value, &spec.ty, version)?));
        }
        tracing::trace!(cql = %self.cql, params = %fields.to_json(), "encoded raw values");
        Ok(out)
    }

    /// Diagnostic rendering: statement text with markers replaced by the
    /// input's literals. Falls back to the unrendered text when the input
    /// itself fails to convert.
    pub(crate) fn cql_for(&self, input: &I) -> String {
        match self.write_fields(input) {
            Ok(fields) => render_literals(&self.cql, &fields),
            Err(_) => self.cql.to_string(),
        }
    }

    /// Bind an input against a prepared handle. Values are ordered the way
    /// the handle declares its bind columns and encoded against the
    /// handle's column types.
    pub(crate) fn fill(
        &self,
        input: &I,
        prepared: &PreparedStatement,
        version: ProtocolVersion,
    ) -> Result<BoundStatement, EncodeError> {
        let fields = self.write_fields(input)?;
        let mut values = Vec::with_capacity(prepared.bind_columns().len());
        for spec in prepared.bind_columns() {
            let value = fields.get(&spec.name).ok_or_else(|| EncodeError::MissingField {
                column: spec.name.clone(),
            })?;
            values.push((spec.name.clone(), encode(&spec.name, value, &spec.ty, version)?));
        }
        Ok(BoundStatement::new(prepared.id().to_vec(), values))
    }

    /// Contravariant adaptation: accept `B` by converting it to `I` first.
    pub(crate) fn adapt<B: 'static>(
        &self,
        f: impl Fn(&B) -> I + Send + Sync + 'static,
    ) -> BindSide<B> {
        let write = Arc::clone(&self.write);
        BindSide {
            cql: Arc::clone(&self.cql),
            params: Arc::clone(&self.params),
            write: Arc::new(move |b: &B| write(&f(b))),
        }
    }

    /// Replace the write function wholesale. Used by correspondence
    /// operations whose conversion is itself fallible.
    pub(crate) fn rebind<B>(&self, write: Arc<WriteFn<B>>) -> BindSide<B> {
        BindSide {
            cql: Arc::clone(&self.cql),
            params: Arc::clone(&self.params),
            write,
        }
    }
}
