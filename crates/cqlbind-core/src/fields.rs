//! The ordered heterogeneous field list and the record conversion traits.
//!
//! [`Fields`] is the native input/output shape of every statement: an
//! explicit ordered sequence of `(name, type, value)` triples. Record
//! correspondence converts between `Fields` and application types through
//! [`ToFields`] / [`FromFields`] (generated by `#[derive(Record)]`) or
//! [`TupleFields`] (implemented here for tuples up to arity 8).

use crate::column::ColumnSpec;
use crate::error::DecodeError;
use crate::types::CqlType;
use crate::value::{CqlValue, Scalar};

/// One named, typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// Field name.
    pub name: String,
    /// Declared type.
    pub ty: CqlType,
    /// Current value.
    pub value: CqlValue,
}

/// An ordered sequence of named, typed values.
///
/// Order is preserved exactly as constructed; name lookup is provided for
/// by-name binding and decoding. Duplicate names are not rejected here -
/// shapes that feed `Fields` (statement columns, record fields) cannot
/// contain duplicates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fields(Vec<FieldValue>);

impl Fields {
    /// The empty field list.
    #[must_use]
    pub const fn empty() -> Self {
        Fields(Vec::new())
    }

    /// A single-entry field list.
    #[must_use]
    pub fn single(name: impl Into<String>, ty: CqlType, value: CqlValue) -> Self {
        Fields(vec![FieldValue {
            name: name.into(),
            ty,
            value,
        }])
    }

    /// Append a field, preserving order.
    pub fn push(&mut self, name: impl Into<String>, ty: CqlType, value: CqlValue) {
        self.0.push(FieldValue {
            name: name.into(),
            ty,
            value,
        });
    }

    /// Look up a value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CqlValue> {
        self.0.iter().find(|f| f.name == name).map(|f| &f.value)
    }

    /// Iterate fields in order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldValue> {
        self.0.iter()
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The values in order, names and types dropped.
    #[must_use]
    pub fn into_values(self) -> Vec<CqlValue> {
        self.0.into_iter().map(|f| f.value).collect()
    }

    /// Render as a JSON object for structured diagnostics.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|f| (f.name.clone(), f.value.to_json()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Fields {
    type Item = &'a FieldValue;
    type IntoIter = std::slice::Iter<'a, FieldValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<FieldValue> for Fields {
    fn from_iter<I: IntoIterator<Item = FieldValue>>(iter: I) -> Self {
        Fields(iter.into_iter().collect())
    }
}

/// A record type convertible *into* a field list.
///
/// Implemented by `#[derive(Record)]`. The shape lists the record's fields
/// in declaration order with their `Scalar` column types; `to_fields` is
/// infallible because every inhabitant of a `Scalar` field type is
/// representable.
pub trait ToFields {
    /// The record's field shape, in declaration order.
    fn shape() -> Vec<ColumnSpec>;

    /// Convert a value of this record into its field list.
    fn to_fields(&self) -> Fields;
}

/// A record type convertible *from* a field list.
///
/// Implemented by `#[derive(Record)]`. `from_fields` looks fields up by
/// name; once a shape correspondence has been verified, the only remaining
/// failures are value-level (a null in a non-nullable field).
pub trait FromFields: Sized {
    /// The record's field shape, in declaration order.
    fn shape() -> Vec<ColumnSpec>;

    /// Build a record from a field list.
    fn from_fields(fields: &Fields) -> Result<Self, DecodeError>;
}

/// A tuple convertible to and from an ordered value list.
///
/// Tuples correspond to statement shapes positionally by declared order;
/// names play no part. Implemented for tuples of `Scalar` elements up to
/// arity 8.
pub trait TupleFields: Sized {
    /// Element types in order.
    fn types() -> Vec<CqlType>;

    /// The element values in order.
    fn to_values(&self) -> Vec<CqlValue>;

    /// Rebuild the tuple from values in order. The slice length must
    /// equal the tuple arity; positions are reported as `#0`, `#1`, ...
    /// in errors.
    fn from_values(values: &[CqlValue]) -> Result<Self, DecodeError>;
}

macro_rules! impl_tuple_fields {
    ($len:expr; $($ty:ident : $idx:tt),+) => {
        impl<$($ty: Scalar),+> TupleFields for ($($ty,)+) {
            fn types() -> Vec<CqlType> {
                vec![$($ty::cql_type()),+]
            }

            fn to_values(&self) -> Vec<CqlValue> {
                vec![$(self.$idx.to_value()),+]
            }

            fn from_values(values: &[CqlValue]) -> Result<Self, DecodeError> {
                if values.len() != $len {
                    return Err(DecodeError::Malformed {
                        column: format!("#{}", values.len()),
                        detail: format!(
                            "tuple arity mismatch: expected {}, got {}",
                            $len,
                            values.len()
                        ),
                    });
                }
                Ok(($($ty::from_value(&values[$idx], concat!("#", stringify!($idx)))?,)+))
            }
        }
    };
}

impl_tuple_fields!(1; A:0);
impl_tuple_fields!(2; A:0, B:1);
impl_tuple_fields!(3; A:0, B:1, C:2);
impl_tuple_fields!(4; A:0, B:1, C:2, D:3);
impl_tuple_fields!(5; A:0, B:1, C:2, D:3, E:4);
impl_tuple_fields!(6; A:0, B:1, C:2, D:3, E:4, F:5);
impl_tuple_fields!(7; A:0, B:1, C:2, D:3, E:4, F:5, G:6);
impl_tuple_fields!(8; A:0, B:1, C:2, D:3, E:4, F:5, G:6, H:7);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_preserve_order() {
        let mut fields = Fields::empty();
        fields.push("b", CqlType::Int, CqlValue::Int(2));
        fields.push("a", CqlType::Int, CqlValue::Int(1));
        let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_fields_lookup_by_name() {
        let fields = Fields::single("id", CqlType::Int, CqlValue::Int(7));
        assert_eq!(fields.get("id"), Some(&CqlValue::Int(7)));
        assert_eq!(fields.get("missing"), None);
    }

    #[test]
    fn test_fields_to_json() {
        let mut fields = Fields::empty();
        fields.push("id", CqlType::Int, CqlValue::Int(7));
        fields.push("name", CqlType::Text, CqlValue::Text("Ann".to_string()));
        assert_eq!(
            fields.to_json(),
            serde_json::json!({"id": 7, "name": "Ann"})
        );
    }

    #[test]
    fn test_tuple_types_and_values() {
        type T = (i32, String);
        assert_eq!(T::types(), vec![CqlType::Int, CqlType::Text]);
        let t = (7_i32, "Ann".to_string());
        let values = t.to_values();
        assert_eq!(
            values,
            vec![CqlValue::Int(7), CqlValue::Text("Ann".to_string())]
        );
        assert_eq!(T::from_values(&values).unwrap(), t);
    }

    #[test]
    fn test_tuple_from_values_arity_check() {
        let err = <(i32, String)>::from_values(&[CqlValue::Int(1)]).unwrap_err();
        assert!(matches!(err, DecodeError::Malformed { .. }));
    }

    #[test]
    fn test_tuple_from_values_position_in_error() {
        let err =
            <(i32, String)>::from_values(&[CqlValue::Int(1), CqlValue::Int(2)]).unwrap_err();
        assert!(matches!(err, DecodeError::TypeMismatch { ref column, .. } if column == "#1"));
    }
}
