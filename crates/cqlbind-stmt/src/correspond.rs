//! Record correspondence: retargeting native-shaped statements to
//! application types.
//!
//! Every operation here is an eager shape check. The record (or tuple, or
//! scalar) shape is verified against the statement's native parameter or
//! result columns while the adapted statement is being constructed; on any
//! mismatch the adapted statement is refused with a [`ShapeError`] and
//! nothing partially-adapted escapes. Once an adapted statement exists,
//! the only runtime failures left are value-level encode/decode errors.
//!
//! The operations are only available at the native shape (`Fields` on the
//! side being adapted), so each side can be adapted exactly once - which
//! is all a bijective correspondence admits.

use std::sync::Arc;

use cqlbind_core::{
    ColumnSpec, CqlValue, DecodeError, EncodeError, Fields, FromFields, Scalar, ShapeError,
    ToFields, TupleFields, verify_named, verify_positional, verify_single,
};

use crate::binder::WriteFn;
use crate::dml::{DeleteVerb, Dml, Verb};
use crate::query::Query;

fn tuple_write<T: TupleFields + 'static>(params: &[ColumnSpec]) -> Arc<WriteFn<T>> {
    let params = params.to_vec();
    Arc::new(move |tuple: &T| {
        Ok(params
            .iter()
            .zip(tuple.to_values())
            .map(|(spec, value)| cqlbind_core::FieldValue {
                name: spec.name.clone(),
                ty: spec.ty.clone(),
                value,
            })
            .collect())
    })
}

fn values_write(params: &[ColumnSpec]) -> Arc<WriteFn<Vec<CqlValue>>> {
    let params: Vec<ColumnSpec> = params.to_vec();
    Arc::new(move |values: &Vec<CqlValue>| {
        if values.len() != params.len() {
            return Err(EncodeError::ArityMismatch {
                expected: params.len(),
                actual: values.len(),
            });
        }
        Ok(params
            .iter()
            .zip(values)
            .map(|(spec, value)| cqlbind_core::FieldValue {
                name: spec.name.clone(),
                ty: spec.ty.clone(),
                value: value.clone(),
            })
            .collect())
    })
}

fn scalar_read<T: Scalar + 'static>(
    column: String,
) -> impl Fn(Fields) -> Result<T, DecodeError> + Send + Sync + 'static + use<T> {
    move |fields: Fields| {
        let value = fields.get(&column).ok_or_else(|| DecodeError::MissingColumn {
            column: column.clone(),
        })?;
        T::from_value(value, &column)
    }
}

impl<O: 'static> Query<Fields, O> {
    /// Accept a record type whose fields correspond to this statement's
    /// parameters by name and type, order-independently.
    pub fn from_record<A: ToFields + 'static>(&self) -> Result<Query<A, O>, ShapeError> {
        verify_named(&A::shape(), self.params())?;
        Ok(self.map_in(|record: &A| record.to_fields()))
    }

    /// Accept a tuple whose element types match this statement's
    /// parameters positionally, in declared order.
    pub fn from_tuple<T: TupleFields + 'static>(&self) -> Result<Query<T, O>, ShapeError> {
        verify_positional(&T::types(), self.params())?;
        Ok(self.rebind(self.bind.rebind(tuple_write::<T>(self.params()))))
    }

    /// Accept a plain ordered value list, matched positionally.
    ///
    /// The dynamic escape hatch: a `Vec<CqlValue>` carries no shape to
    /// verify up front, so arity and per-value type mismatches surface as
    /// encode-time errors at bind instead. When the value types are known
    /// statically, prefer [`Query::from_tuple`], which verifies the shape
    /// at construction like every other correspondence operation.
    #[must_use]
    pub fn from_values(&self) -> Query<Vec<CqlValue>, O> {
        self.rebind(self.bind.rebind(values_write(self.params())))
    }

    /// Accept a bare scalar for a single-parameter statement.
    pub fn from_scalar<T: Scalar + 'static>(&self) -> Result<Query<T, O>, ShapeError> {
        let spec = verify_single(&T::cql_type(), self.params())?.clone();
        Ok(self.map_in(move |scalar: &T| {
            Fields::single(spec.name.clone(), spec.ty.clone(), scalar.to_value())
        }))
    }
}

impl<I: 'static> Query<I, Fields> {
    /// Decode rows into a record type whose fields correspond to this
    /// statement's result columns by name and type, order-independently.
    pub fn into_record<B: FromFields + 'static>(&self) -> Result<Query<I, B>, ShapeError> {
        verify_named(&B::shape(), self.results())?;
        Ok(self.map_read(|fields| B::from_fields(&fields)))
    }

    /// Decode rows into a tuple matched positionally against the result
    /// columns, in declared order.
    pub fn into_tuple<T: TupleFields + 'static>(&self) -> Result<Query<I, T>, ShapeError> {
        verify_positional(&T::types(), self.results())?;
        Ok(self.map_read(|fields| T::from_values(&fields.into_values())))
    }

    /// Decode rows into a plain ordered value list.
    #[must_use]
    pub fn into_values(&self) -> Query<I, Vec<CqlValue>> {
        self.map(Fields::into_values)
    }

    /// Decode a single-column result into a bare scalar.
    pub fn into_scalar<T: Scalar + 'static>(&self) -> Result<Query<I, T>, ShapeError> {
        let column = verify_single(&T::cql_type(), self.results())?.name.clone();
        Ok(self.map_read(scalar_read::<T>(column)))
    }
}

impl<O: 'static, V: Verb> Dml<Fields, O, V> {
    /// Accept a record type whose fields correspond to this statement's
    /// parameters by name and type, order-independently.
    pub fn from_record<A: ToFields + 'static>(&self) -> Result<Dml<A, O, V>, ShapeError> {
        verify_named(&A::shape(), self.params())?;
        Ok(self.map_in(|record: &A| record.to_fields()))
    }

    /// Accept a tuple whose element types match this statement's
    /// parameters positionally, in declared order.
    pub fn from_tuple<T: TupleFields + 'static>(&self) -> Result<Dml<T, O, V>, ShapeError> {
        verify_positional(&T::types(), self.params())?;
        Ok(self.rebind(self.bind.rebind(tuple_write::<T>(self.params()))))
    }

    /// Accept a plain ordered value list, matched positionally. Arity and
    /// type mismatches surface at encode time; prefer [`Dml::from_tuple`]
    /// for a shape verified at construction.
    #[must_use]
    pub fn from_values(&self) -> Dml<Vec<CqlValue>, O, V> {
        self.rebind(self.bind.rebind(values_write(self.params())))
    }
}

impl<O: 'static> Dml<Fields, O, DeleteVerb> {
    /// Accept a bare key scalar for a single-parameter delete.
    ///
    /// Deletes (like queries) are commonly keyed by one value; inserts
    /// never are, so this helper exists only here and on [`Query`].
    pub fn from_scalar<T: Scalar + 'static>(&self) -> Result<Dml<T, O, DeleteVerb>, ShapeError> {
        let spec = verify_single(&T::cql_type(), self.params())?.clone();
        Ok(self.map_in(move |scalar: &T| {
            Fields::single(spec.name.clone(), spec.ty.clone(), scalar.to_value())
        }))
    }
}

impl<I: 'static, V: Verb> Dml<I, Fields, V> {
    /// Decode the outcome into a record type corresponding to this
    /// statement's result columns by name and type, order-independently.
    pub fn into_record<B: FromFields + 'static>(&self) -> Result<Dml<I, B, V>, ShapeError> {
        verify_named(&B::shape(), self.results())?;
        Ok(self.map_read(|fields| B::from_fields(&fields)))
    }

    /// Decode the outcome into a tuple matched positionally against the
    /// result columns.
    pub fn into_tuple<T: TupleFields + 'static>(&self) -> Result<Dml<I, T, V>, ShapeError> {
        verify_positional(&T::types(), self.results())?;
        Ok(self.map_read(|fields| T::from_values(&fields.into_values())))
    }

    /// Decode the outcome into a plain ordered value list.
    #[must_use]
    pub fn into_values(&self) -> Dml<I, Vec<CqlValue>, V> {
        self.map(Fields::into_values)
    }

    /// Decode a single-column outcome into a bare scalar.
    pub fn into_scalar<T: Scalar + 'static>(&self) -> Result<Dml<I, T, V>, ShapeError> {
        let column = verify_single(&T::cql_type(), self.results())?.name.clone();
        Ok(self.map_read(scalar_read::<T>(column)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dml::Delete;
    use cqlbind_core::{CqlType, ProtocolVersion, Row};

    const V4: ProtocolVersion = ProtocolVersion::V4;

    fn users_query() -> Query<Fields, Fields> {
        Query::build(
            "SELECT id, name FROM users WHERE id = :id",
            vec![ColumnSpec::new("id", CqlType::Int)],
            vec![
                ColumnSpec::new("id", CqlType::Int),
                ColumnSpec::new("name", CqlType::Text),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_from_scalar_renders_named_raw_value() {
        let delete = Delete::build(
            "DELETE FROM users WHERE id = :id",
            vec![ColumnSpec::new("id", CqlType::Int)],
            vec![],
        )
        .unwrap();
        let by_key = delete.from_scalar::<i32>().unwrap();
        let raw = by_key.write_raw(&42, V4).unwrap();
        assert_eq!(raw.len(), 1);
        assert_eq!(raw[0].0, "id");
        assert_eq!(raw[0].1.as_bytes(), Some(&42_i32.to_be_bytes()[..]));
        assert_eq!(by_key.cql_for(&42), "DELETE FROM users WHERE id = 42");
    }

    #[test]
    fn test_from_scalar_rejects_wrong_type() {
        let query = users_query();
        assert!(query.from_scalar::<String>().is_err());
        assert!(query.from_scalar::<i32>().is_ok());
    }

    #[test]
    fn test_from_tuple_positional() {
        let query = Query::build(
            "SELECT name FROM users WHERE id = :id AND name = :name",
            vec![
                ColumnSpec::new("id", CqlType::Int),
                ColumnSpec::new("name", CqlType::Text),
            ],
            vec![ColumnSpec::new("name", CqlType::Text)],
        )
        .unwrap();
        let typed = query.from_tuple::<(i32, String)>().unwrap();
        let raw = typed.write_raw(&(7, "Ann".to_string()), V4).unwrap();
        assert_eq!(raw[0].0, "id");
        assert_eq!(raw[1].0, "name");
        // Order must match exactly; no name-based reshuffling.
        assert!(query.from_tuple::<(String, i32)>().is_err());
    }

    #[test]
    fn test_into_tuple_and_scalar() {
        let query = users_query();
        let row = Row::from_values(
            vec![
                ColumnSpec::new("id", CqlType::Int),
                ColumnSpec::new("name", CqlType::Text),
            ],
            &[CqlValue::Int(7), CqlValue::Text("Ann".to_string())],
            V4,
        )
        .unwrap();

        let tupled = query.into_tuple::<(i32, String)>().unwrap();
        assert_eq!(tupled.read(&row, V4).unwrap(), (7, "Ann".to_string()));

        let names = Query::build(
            "SELECT name FROM users WHERE id = :id",
            vec![ColumnSpec::new("id", CqlType::Int)],
            vec![ColumnSpec::new("name", CqlType::Text)],
        )
        .unwrap();
        let scalar = names.into_scalar::<String>().unwrap();
        assert_eq!(scalar.read(&row, V4).unwrap(), "Ann");
    }

    #[test]
    fn test_from_values_arity_at_encode_time() {
        let query = users_query();
        let dynamic = query.from_values();
        let err = dynamic
            .write_raw(&vec![CqlValue::Int(1), CqlValue::Int(2)], V4)
            .unwrap_err();
        assert_eq!(
            err,
            EncodeError::ArityMismatch {
                expected: 1,
                actual: 2
            }
        );
        let ok = dynamic.write_raw(&vec![CqlValue::Int(1)], V4).unwrap();
        assert_eq!(ok[0].0, "id");
    }

    #[test]
    fn test_into_values_in_result_order() {
        let query = users_query();
        let row = Row::from_values(
            vec![
                // Row columns deliberately reversed relative to the shape.
                ColumnSpec::new("name", CqlType::Text),
                ColumnSpec::new("id", CqlType::Int),
            ],
            &[CqlValue::Text("Ann".to_string()), CqlValue::Int(7)],
            V4,
        )
        .unwrap();
        let values = query.into_values().read(&row, V4).unwrap();
        // Output order follows the declared result shape.
        assert_eq!(
            values,
            vec![CqlValue::Int(7), CqlValue::Text("Ann".to_string())]
        );
    }
}
