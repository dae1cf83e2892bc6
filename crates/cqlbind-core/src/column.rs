//! Named, typed column slots and structural shape matching.
//!
//! A statement's native shape is an ordered list of [`ColumnSpec`]s. Record
//! correspondence is established by the `verify_*` functions here: they
//! either prove a record shape maps onto a statement shape or report the
//! first mismatch as a [`ShapeError`]. They run while an adapted statement
//! is being constructed, never afterwards.

use serde::{Deserialize, Serialize};

use crate::error::ShapeError;
use crate::types::CqlType;

/// One named, typed slot in a statement's parameter or result shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name as it appears in the statement.
    pub name: String,
    /// Declared CQL type.
    pub ty: CqlType,
}

impl ColumnSpec {
    /// Create a new column spec.
    pub fn new(name: impl Into<String>, ty: CqlType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Verify an order-independent name+type bijection between a record shape
/// and a statement shape.
///
/// Every record field must match exactly one statement column by name with
/// an equal type, and every column must be matched. Order is irrelevant;
/// binding and decoding are by name.
pub fn verify_named(record: &[ColumnSpec], columns: &[ColumnSpec]) -> Result<(), ShapeError> {
    for field in record {
        match columns.iter().find(|c| c.name == field.name) {
            None => {
                return Err(ShapeError::UnmatchedField {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                });
            }
            Some(column) if column.ty != field.ty => {
                return Err(ShapeError::TypeMismatch {
                    name: field.name.clone(),
                    expected: column.ty.clone(),
                    actual: field.ty.clone(),
                });
            }
            Some(_) => {}
        }
    }
    // A record type cannot repeat a field name, so matching every column
    // by name makes the correspondence a bijection.
    for column in columns {
        if !record.iter().any(|f| f.name == column.name) {
            return Err(ShapeError::UnmatchedColumn {
                name: column.name.clone(),
                ty: column.ty.clone(),
            });
        }
    }
    Ok(())
}

/// Verify a positional type match between a tuple shape and a statement
/// shape. Names are ignored; order must line up exactly.
pub fn verify_positional(types: &[CqlType], columns: &[ColumnSpec]) -> Result<(), ShapeError> {
    if types.len() != columns.len() {
        return Err(ShapeError::ArityMismatch {
            expected: columns.len(),
            actual: types.len(),
        });
    }
    for (ty, column) in types.iter().zip(columns) {
        if ty != &column.ty {
            return Err(ShapeError::TypeMismatch {
                name: column.name.clone(),
                expected: column.ty.clone(),
                actual: ty.clone(),
            });
        }
    }
    Ok(())
}

/// Verify that the shape is a single column of the given type, returning
/// that column.
pub fn verify_single<'a>(
    ty: &CqlType,
    columns: &'a [ColumnSpec],
) -> Result<&'a ColumnSpec, ShapeError> {
    match columns {
        [column] => {
            if &column.ty == ty {
                Ok(column)
            } else {
                Err(ShapeError::TypeMismatch {
                    name: column.name.clone(),
                    expected: column.ty.clone(),
                    actual: ty.clone(),
                })
            }
        }
        _ => Err(ShapeError::NotSingleColumn {
            count: columns.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(cols: &[(&str, CqlType)]) -> Vec<ColumnSpec> {
        cols.iter()
            .map(|(n, t)| ColumnSpec::new(*n, t.clone()))
            .collect()
    }

    #[test]
    fn test_verify_named_order_independent() {
        let record = shape(&[("name", CqlType::Text), ("id", CqlType::Int)]);
        let columns = shape(&[("id", CqlType::Int), ("name", CqlType::Text)]);
        assert!(verify_named(&record, &columns).is_ok());
    }

    #[test]
    fn test_verify_named_reports_unmatched_field() {
        let record = shape(&[("id", CqlType::Int), ("email", CqlType::Text)]);
        let columns = shape(&[("id", CqlType::Int)]);
        let err = verify_named(&record, &columns).unwrap_err();
        assert!(matches!(err, ShapeError::UnmatchedField { ref name, .. } if name == "email"));
    }

    #[test]
    fn test_verify_named_reports_unmatched_column() {
        let record = shape(&[("id", CqlType::Int)]);
        let columns = shape(&[("id", CqlType::Int), ("name", CqlType::Text)]);
        let err = verify_named(&record, &columns).unwrap_err();
        assert!(matches!(err, ShapeError::UnmatchedColumn { ref name, .. } if name == "name"));
    }

    #[test]
    fn test_verify_named_reports_type_mismatch() {
        let record = shape(&[("id", CqlType::BigInt)]);
        let columns = shape(&[("id", CqlType::Int)]);
        let err = verify_named(&record, &columns).unwrap_err();
        assert_eq!(
            err,
            ShapeError::TypeMismatch {
                name: "id".to_string(),
                expected: CqlType::Int,
                actual: CqlType::BigInt,
            }
        );
    }

    #[test]
    fn test_verify_positional() {
        let columns = shape(&[("id", CqlType::Int), ("name", CqlType::Text)]);
        assert!(verify_positional(&[CqlType::Int, CqlType::Text], &columns).is_ok());
        // Positional matching must not reorder.
        assert!(verify_positional(&[CqlType::Text, CqlType::Int], &columns).is_err());
        assert!(matches!(
            verify_positional(&[CqlType::Int], &columns).unwrap_err(),
            ShapeError::ArityMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_verify_single() {
        let one = shape(&[("id", CqlType::Int)]);
        assert_eq!(verify_single(&CqlType::Int, &one).unwrap().name, "id");
        assert!(verify_single(&CqlType::Text, &one).is_err());

        let two = shape(&[("a", CqlType::Int), ("b", CqlType::Int)]);
        assert_eq!(
            verify_single(&CqlType::Int, &two).unwrap_err(),
            ShapeError::NotSingleColumn { count: 2 }
        );
    }
}
