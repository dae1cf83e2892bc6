//! The read statement kind.

use std::sync::Arc;

use cqlbind_core::{
    BoundStatement, ColumnSpec, DecodeError, EncodeError, Fields, PreparedStatement,
    ProtocolVersion, RawValue, Row, ShapeError,
};

use crate::binder::BindSide;

pub(crate) type RowReadFn<O> =
    dyn Fn(&Row, ProtocolVersion) -> Result<O, DecodeError> + Send + Sync;

/// A typed SELECT statement descriptor.
///
/// Describes a read returning zero or more rows, each independently
/// decodable to `O` from an input of type `I`. The descriptor is an
/// immutable value: the statement text and its parameter/result shapes are
/// fixed at construction, and every adaptation (`map_in`, `map`, the
/// `from_*`/`into_*` correspondence operations) returns a new descriptor
/// without touching the original.
///
/// # Example
///
/// ```
/// use cqlbind_core::{ColumnSpec, CqlType};
/// use cqlbind_stmt::Query;
///
/// let query = Query::build(
///     "SELECT id, name FROM users WHERE id = :id",
///     vec![ColumnSpec::new("id", CqlType::Int)],
///     vec![
///         ColumnSpec::new("id", CqlType::Int),
///         ColumnSpec::new("name", CqlType::Text),
///     ],
/// )
/// .unwrap();
/// let by_key = query.from_scalar::<i32>().unwrap();
/// assert_eq!(by_key.cql(), query.cql());
/// ```
pub struct Query<I, O> {
    pub(crate) bind: BindSide<I>,
    pub(crate) results: Arc<[ColumnSpec]>,
    pub(crate) read: Arc<RowReadFn<O>>,
}

impl<I: 'static, O> std::fmt::Debug for Query<I, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Query")
            .field("cql", &self.bind.cql())
            .field("params", &self.bind.params())
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

impl<I, O> Clone for Query<I, O> {
    fn clone(&self) -> Self {
        Self {
            bind: self.bind.clone(),
            results: Arc::clone(&self.results),
            read: Arc::clone(&self.read),
        }
    }
}

impl Query<Fields, Fields> {
    /// Build a native query descriptor from statement text and its
    /// parameter and result shapes.
    ///
    /// Fails eagerly if the text contains a bind marker with no declared
    /// parameter column.
    pub fn build(
        cql: &str,
        params: Vec<ColumnSpec>,
        results: Vec<ColumnSpec>,
    ) -> Result<Self, ShapeError> {
        let bind = BindSide::native(cql, params)?;
        tracing::debug!(cql, results = results.len(), "built query descriptor");
        let results: Arc<[ColumnSpec]> = results.into();
        let read_shape = Arc::clone(&results);
        Ok(Self {
            bind,
            results,
            read: Arc::new(move |row: &Row, version| row.decode(&read_shape, version)),
        })
    }
}

impl<I: 'static, O: 'static> Query<I, O> {
    /// The fixed statement text. Never a function of the input.
    #[must_use]
    pub fn cql(&self) -> &str {
        self.bind.cql()
    }

    /// The native parameter shape, invariant under adaptation.
    #[must_use]
    pub fn params(&self) -> &[ColumnSpec] {
        self.bind.params()
    }

    /// The native result shape, invariant under adaptation.
    #[must_use]
    pub fn results(&self) -> &[ColumnSpec] {
        &self.results
    }

    /// Bind an input against a prepared handle.
    pub fn fill(
        &self,
        input: &I,
        prepared: &PreparedStatement,
        version: ProtocolVersion,
    ) -> Result<BoundStatement, EncodeError> {
        self.bind.fill(input, prepared, version)
    }

    /// Encode an input to named raw values without a prepared handle.
    pub fn write_raw(
        &self,
        input: &I,
        version: ProtocolVersion,
    ) -> Result<Vec<(String, RawValue)>, EncodeError> {
        self.bind.write_raw(input, version)
    }

    /// Render the statement text with the input's values spliced in as
    /// literals. Diagnostics only.
    #[must_use]
    pub fn cql_for(&self, input: &I) -> String {
        self.bind.cql_for(input)
    }

    /// Decode one row.
    pub fn read(&self, row: &Row, version: ProtocolVersion) -> Result<O, DecodeError> {
        (self.read)(row, version)
    }

    /// Contravariant input adaptation: accept `B` wherever `I` was
    /// accepted. Text, shapes, and the decode side are untouched.
    #[must_use]
    pub fn map_in<B: 'static>(&self, f: impl Fn(&B) -> I + Send + Sync + 'static) -> Query<B, O> {
        Query {
            bind: self.bind.adapt(f),
            results: Arc::clone(&self.results),
            read: Arc::clone(&self.read),
        }
    }

    /// Covariant output adaptation: produce `C` wherever `O` was
    /// produced. `g` is never invoked on a decode failure.
    #[must_use]
    pub fn map<C: 'static>(&self, g: impl Fn(O) -> C + Send + Sync + 'static) -> Query<I, C> {
        self.map_read(move |o| Ok(g(o)))
    }

    /// Fallible output adaptation, for conversions that can themselves
    /// fail with a decode error.
    pub(crate) fn map_read<C: 'static>(
        &self,
        g: impl Fn(O) -> Result<C, DecodeError> + Send + Sync + 'static,
    ) -> Query<I, C> {
        let read = Arc::clone(&self.read);
        Query {
            bind: self.bind.clone(),
            results: Arc::clone(&self.results),
            read: Arc::new(move |row: &Row, version| read(row, version).and_then(&g)),
        }
    }

    pub(crate) fn rebind<B>(&self, bind: BindSide<B>) -> Query<B, O> {
        Query {
            bind,
            results: Arc::clone(&self.results),
            read: Arc::clone(&self.read),
        }
    }
}
