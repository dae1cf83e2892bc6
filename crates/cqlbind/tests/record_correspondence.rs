//! End-to-end record correspondence through the `Record` derive.

use cqlbind::prelude::*;
use cqlbind::ShapeError;

const V4: ProtocolVersion = ProtocolVersion::V4;

#[derive(Record, Debug, PartialEq)]
struct Person {
    id: i32,
    name: String,
}

#[derive(Record)]
struct PersonKey {
    id: i32,
}

#[derive(Record)]
struct Renamed {
    id: i32,
    #[cql(rename = "name")]
    display_name: String,
}

fn people_query() -> Query<Fields, Fields> {
    Query::build(
        "SELECT id, name FROM people WHERE id = :id",
        vec![ColumnSpec::new("id", CqlType::Int)],
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
    )
    .unwrap()
}

fn person_row(id: i32, name: &str) -> Row {
    Row::from_values(
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
        &[CqlValue::Int(id), CqlValue::Text(name.to_string())],
        V4,
    )
    .unwrap()
}

#[test]
fn key_in_person_out() {
    let typed = people_query()
        .from_record::<PersonKey>()
        .unwrap()
        .into_record::<Person>()
        .unwrap();

    let raw = typed.write_raw(&PersonKey { id: 7 }, V4).unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].0, "id");

    // Rows carry the full result shape; the output record decodes every
    // column, key included, from the row alone.
    let person = typed.read(&person_row(7, "Ann"), V4).unwrap();
    assert_eq!(
        person,
        Person {
            id: 7,
            name: "Ann".to_string()
        }
    );
}

#[test]
fn correspondence_is_order_independent() {
    #[derive(Record, Debug, PartialEq)]
    struct Backwards {
        name: String,
        id: i32,
    }
    let typed = people_query().into_record::<Backwards>().unwrap();
    let out = typed.read(&person_row(7, "Ann"), V4).unwrap();
    assert_eq!(out.id, 7);
    assert_eq!(out.name, "Ann");
}

#[test]
fn rename_attribute_matches_the_column() {
    let typed = people_query().into_record::<Renamed>().unwrap();
    let out = typed.read(&person_row(7, "Ann"), V4).unwrap();
    assert_eq!(out.display_name, "Ann");
}

#[test]
fn shape_mismatch_is_refused_at_construction() {
    #[derive(Record)]
    struct WrongField {
        id: i32,
        email: String,
    }
    #[derive(Record)]
    struct WrongType {
        id: i64,
        name: String,
    }
    let query = people_query();
    assert!(matches!(
        query.into_record::<WrongField>().unwrap_err(),
        ShapeError::UnmatchedField { .. }
    ));
    assert!(matches!(
        query.into_record::<WrongType>().unwrap_err(),
        ShapeError::TypeMismatch { .. }
    ));
    // Partial coverage fails in the other direction too.
    assert!(query.into_record::<PersonKey>().is_err());
}

#[test]
fn record_in_for_mutations() {
    let insert = Insert::build(
        "INSERT INTO people (id, name) VALUES (:id, :name)",
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
        vec![],
    )
    .unwrap()
    .from_record::<Person>()
    .unwrap();

    let person = Person {
        id: 7,
        name: "Ann".to_string(),
    };
    let raw = insert.write_raw(&person, V4).unwrap();
    assert_eq!(raw.len(), 2);
    assert_eq!(
        insert.cql_for(&person),
        "INSERT INTO people (id, name) VALUES (7, 'Ann')"
    );
    let out = insert.read(&ExecutionResult::empty(), V4).unwrap();
    assert!(out.is_empty());
}

#[test]
fn scalar_key_for_delete() {
    let delete = Delete::build(
        "DELETE FROM people WHERE id = :id",
        vec![ColumnSpec::new("id", CqlType::Int)],
        vec![],
    )
    .unwrap()
    .from_scalar::<i32>()
    .unwrap();
    assert_eq!(delete.cql_for(&42), "DELETE FROM people WHERE id = 42");
}

#[test]
fn optional_fields_round_trip_null() {
    #[derive(Record, Debug, PartialEq)]
    struct MaybeNamed {
        id: i32,
        name: Option<String>,
    }
    let query = people_query();
    let typed = query.into_record::<MaybeNamed>().unwrap();

    let row = Row::from_values(
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
        &[CqlValue::Int(7), CqlValue::Null],
        V4,
    )
    .unwrap();
    let out = typed.read(&row, V4).unwrap();
    assert_eq!(
        out,
        MaybeNamed {
            id: 7,
            name: None
        }
    );
}

#[test]
fn fields_render_to_json_for_diagnostics() {
    let person = Person {
        id: 7,
        name: "Ann".to_string(),
    };
    let json = person.to_fields().to_json();
    assert_eq!(json, serde_json::json!({ "id": 7, "name": "Ann" }));
}
