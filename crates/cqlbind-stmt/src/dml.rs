//! The mutating statement kinds: INSERT, UPDATE, DELETE.
//!
//! The three kinds share one data-shape contract and differ only in the
//! CQL verb their text encodes, so they are a single generic descriptor
//! parameterized by a verb marker. Call sites keep the distinct names via
//! the [`Insert`], [`Update`], and [`Delete`] aliases, and the verbs
//! expose slightly different correspondence helper sets (a delete key can
//! be a bare scalar; an insert input is always a whole record).

use std::marker::PhantomData;
use std::sync::Arc;

use cqlbind_core::{
    BoundStatement, ColumnSpec, DecodeError, EncodeError, ExecutionResult, Fields,
    PreparedStatement, ProtocolVersion, RawValue, Row, ShapeError,
};

use crate::binder::BindSide;

mod sealed {
    pub trait Sealed {}
}

/// Marker trait for the DML verbs.
pub trait Verb: sealed::Sealed + Send + Sync + 'static {
    /// The CQL verb, for diagnostics.
    const NAME: &'static str;
}

/// Verb marker for INSERT statements.
#[derive(Debug, Clone, Copy)]
pub struct InsertVerb;

/// Verb marker for UPDATE statements.
#[derive(Debug, Clone, Copy)]
pub struct UpdateVerb;

/// Verb marker for DELETE statements.
#[derive(Debug, Clone, Copy)]
pub struct DeleteVerb;

impl sealed::Sealed for InsertVerb {}
impl sealed::Sealed for UpdateVerb {}
impl sealed::Sealed for DeleteVerb {}

impl Verb for InsertVerb {
    const NAME: &'static str = "INSERT";
}
impl Verb for UpdateVerb {
    const NAME: &'static str = "UPDATE";
}
impl Verb for DeleteVerb {
    const NAME: &'static str = "DELETE";
}

pub(crate) type ResultReadFn<O> =
    dyn Fn(&ExecutionResult, ProtocolVersion) -> Result<O, DecodeError> + Send + Sync;

/// A typed mutating statement descriptor.
///
/// Shares the query contract for text, binding, and raw encoding, but
/// decodes its output from a whole [`ExecutionResult`] rather than a
/// single row - the appropriate shape for mutation acknowledgements such
/// as conditional-write results.
pub struct Dml<I, O, V: Verb> {
    pub(crate) bind: BindSide<I>,
    pub(crate) results: Arc<[ColumnSpec]>,
    pub(crate) read: Arc<ResultReadFn<O>>,
    pub(crate) _verb: PhantomData<V>,
}

/// A typed INSERT descriptor.
pub type Insert<I, O> = Dml<I, O, InsertVerb>;
/// A typed UPDATE descriptor.
pub type Update<I, O> = Dml<I, O, UpdateVerb>;
/// A typed DELETE descriptor.
pub type Delete<I, O> = Dml<I, O, DeleteVerb>;

impl<I, O, V: Verb> Clone for Dml<I, O, V> {
    fn clone(&self) -> Self {
        Self {
            bind: self.bind.clone(),
            results: Arc::clone(&self.results),
            read: Arc::clone(&self.read),
            _verb: PhantomData,
        }
    }
}

impl<V: Verb> Dml<Fields, Fields, V> {
    /// Build a native mutating descriptor from statement text and its
    /// parameter and result shapes.
    ///
    /// An empty result shape decodes to [`Fields::empty`] without looking
    /// at the result rows (the unconditional-write case). A non-empty
    /// shape decodes the first row; a rowless result is then a decode
    /// failure. Fails eagerly if the text contains a bind marker with no
    /// declared parameter column.
    pub fn build(
        cql: &str,
        params: Vec<ColumnSpec>,
        results: Vec<ColumnSpec>,
    ) -> Result<Self, ShapeError> {
        let bind = BindSide::native(cql, params)?;
        tracing::debug!(verb = V::NAME, cql, "built statement descriptor");
        let results: Arc<[ColumnSpec]> = results.into();
        let read_shape = Arc::clone(&results);
        Ok(Self {
            bind,
            results,
            read: Arc::new(move |result: &ExecutionResult, version| {
                if read_shape.is_empty() {
                    return Ok(Fields::empty());
                }
                let row = result.first_row().ok_or(DecodeError::EmptyResult)?;
                row.decode(&read_shape, version)
            }),
            _verb: PhantomData,
        })
    }
}

impl<I: 'static, O: 'static, V: Verb> Dml<I, O, V> {
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

    /// Decode the outcome of executing this statement alone.
    pub fn read(
        &self,
        result: &ExecutionResult,
        version: ProtocolVersion,
    ) -> Result<O, DecodeError> {
        (self.read)(result, version)
    }

    /// Produce a reader that isolates this statement's outcome from a
    /// combined batch result.
    ///
    /// The reader is derived from this statement's own decode logic plus
    /// the input that was bound - nothing else. Adding or removing other
    /// statements from a batch cannot change what it reads.
    pub fn read_batch_result(&self, input: &I) -> Result<BatchResultReader<O>, EncodeError> {
        Ok(BatchResultReader {
            bound: self.bind.write_fields(input)?,
            read: Arc::clone(&self.read),
        })
    }

    /// Contravariant input adaptation: accept `B` wherever `I` was
    /// accepted. Text, shapes, and the decode side are untouched.
    #[must_use]
    pub fn map_in<B: 'static>(&self, f: impl Fn(&B) -> I + Send + Sync + 'static) -> Dml<B, O, V> {
        Dml {
            bind: self.bind.adapt(f),
            results: Arc::clone(&self.results),
            read: Arc::clone(&self.read),
            _verb: PhantomData,
        }
    }

    /// Covariant output adaptation: produce `C` wherever `O` was
    /// produced. `g` is never invoked on a decode failure, and composes
    /// through [`Dml::read_batch_result`] exactly as through
    /// [`Dml::read`].
    #[must_use]
    pub fn map<C: 'static>(&self, g: impl Fn(O) -> C + Send + Sync + 'static) -> Dml<I, C, V> {
        self.map_read(move |o| Ok(g(o)))
    }

    pub(crate) fn map_read<C: 'static>(
        &self,
        g: impl Fn(O) -> Result<C, DecodeError> + Send + Sync + 'static,
    ) -> Dml<I, C, V> {
        let read = Arc::clone(&self.read);
        Dml {
            bind: self.bind.clone(),
            results: Arc::clone(&self.results),
            read: Arc::new(move |result: &ExecutionResult, version| {
                read(result, version).and_then(&g)
            }),
            _verb: PhantomData,
        }
    }

    pub(crate) fn rebind<B>(&self, bind: BindSide<B>) -> Dml<B, O, V> {
        Dml {
            bind,
            results: Arc::clone(&self.results),
            read: Arc::clone(&self.read),
            _verb: PhantomData,
        }
    }
}

/// Extracts one statement's outcome from a combined batch result.
///
/// Holds the statement's bound field values and its decode function. When
/// the batch result carries per-statement rows (a failed conditional
/// batch), the reader locates its own row by matching its bound values on
/// the columns both sides share; otherwise the whole result is decoded
/// directly (the common shared-`[applied]`-row case).
pub struct BatchResultReader<O> {
    bound: Fields,
    read: Arc<ResultReadFn<O>>,
}

impl<O> Clone for BatchResultReader<O> {
    fn clone(&self) -> Self {
        Self {
            bound: self.bound.clone(),
            read: Arc::clone(&self.read),
        }
    }
}

impl<O> BatchResultReader<O> {
    /// The field values this reader's statement bound.
    #[must_use]
    pub fn bound(&self) -> &Fields {
        &self.bound
    }

    /// Decode this statement's contribution out of a batch result.
    pub fn read(
        &self,
        result: &ExecutionResult,
        version: ProtocolVersion,
    ) -> Result<O, DecodeError> {
        match self.locate(result, version) {
            Some(row) => {
                let own = ExecutionResult::new(vec![row.clone()]);
                (self.read)(&own, version)
            }
            None => (self.read)(result, version),
        }
    }

    /// Find the row whose values match this statement's bound values on
    /// every column the two have in common. Rows sharing no columns with
    /// the bound input never match.
    fn locate<'r>(
        &self,
        result: &'r ExecutionResult,
        version: ProtocolVersion,
    ) -> Option<&'r Row> {
        result.rows().iter().find(|row| {
            let mut overlap = false;
            for field in &self.bound {
                if row.raw(&field.name).is_none() {
                    continue;
                }
                overlap = true;
                match row.decode_column(&field.name, &field.ty, version) {
                    Ok(value) if value == field.value => {}
                    _ => return false,
                }
            }
            overlap
        })
    }
}
