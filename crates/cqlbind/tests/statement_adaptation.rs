//! Adaptation behavior shared by all statement kinds: the statement text
//! and declared shapes never move, only the typed ends do.

use cqlbind::prelude::*;
use cqlbind::{DecodeError, EncodeError};

const V4: ProtocolVersion = ProtocolVersion::V4;

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
fn cql_is_invariant_under_adaptation_chains() {
    let query = people_query();
    let adapted = query
        .from_scalar::<i32>()
        .unwrap()
        .map_in(|s: &String| s.parse::<i32>().unwrap_or(0))
        .map(|fields| fields.len());
    assert_eq!(adapted.cql(), query.cql());
    assert_eq!(adapted.params(), query.params());
    assert_eq!(adapted.results(), query.results());
}

#[test]
fn map_in_composes_contravariantly() {
    let query = people_query();
    let one_step = query.map_in(|s: &String| {
        Fields::single("id", CqlType::Int, CqlValue::Int(s.len() as i32))
    });
    let two_step = query
        .map_in(|n: &i32| Fields::single("id", CqlType::Int, CqlValue::Int(*n)))
        .map_in(|s: &String| s.len() as i32);
    let input = "abcd".to_string();
    assert_eq!(
        one_step.write_raw(&input, V4).unwrap(),
        two_step.write_raw(&input, V4).unwrap()
    );
}

#[test]
fn map_composes_covariantly() {
    let query = people_query();
    let one_step = query.map(|fields| fields.len() * 2);
    let two_step = query.map(|fields| fields.len()).map(|n| n * 2);
    let row = person_row(7, "Ann");
    assert_eq!(
        one_step.read(&row, V4).unwrap(),
        two_step.read(&row, V4).unwrap()
    );
}

#[test]
fn decode_failure_skips_every_chained_map() {
    let query = people_query();
    let mapped = query
        .map(|_| -> usize { panic!("first map ran on a failed decode") })
        .map(|_| -> usize { panic!("second map ran on a failed decode") });
    // Row is missing the `name` column the result shape declares.
    let row = Row::from_values(
        vec![ColumnSpec::new("id", CqlType::Int)],
        &[CqlValue::Int(7)],
        V4,
    )
    .unwrap();
    let err = mapped.read(&row, V4).unwrap_err();
    assert!(matches!(err, DecodeError::MissingColumn { column } if column == "name"));
}

#[test]
fn write_raw_then_row_then_read_round_trips() {
    let insert = Insert::build(
        "INSERT INTO people (id, name) VALUES (:id, :name)",
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
        vec![],
    )
    .unwrap();
    let mut input = Fields::empty();
    input.push("id", CqlType::Int, CqlValue::Int(7));
    input.push("name", CqlType::Text, CqlValue::Text("Ann".to_string()));
    let raw = insert.write_raw(&input, V4).unwrap();

    // Feed the encoded values back as a result row and decode them with a
    // query over the same columns.
    let row = Row::new(
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
        raw.into_iter().map(|(_, v)| v).collect(),
    );
    let decoded = people_query().read(&row, V4).unwrap();
    assert_eq!(decoded.get("id"), Some(&CqlValue::Int(7)));
    assert_eq!(
        decoded.get("name"),
        Some(&CqlValue::Text("Ann".to_string()))
    );
}

#[test]
fn fill_follows_the_prepared_handle_not_the_declaration() {
    let update = Update::build(
        "UPDATE people SET name = :name WHERE id = :id",
        vec![
            ColumnSpec::new("name", CqlType::Text),
            ColumnSpec::new("id", CqlType::Int),
        ],
        vec![],
    )
    .unwrap();
    let prepared = PreparedStatement::new(
        vec![0x01, 0x02],
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("name", CqlType::Text),
        ],
    );
    let mut input = Fields::empty();
    input.push("name", CqlType::Text, CqlValue::Text("Bea".to_string()));
    input.push("id", CqlType::Int, CqlValue::Int(3));
    let bound = update.fill(&input, &prepared, V4).unwrap();
    assert_eq!(bound.prepared_id(), &[0x01, 0x02]);
    let names: Vec<&str> = bound.values().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["id", "name"]);
}

#[test]
fn version_gating_surfaces_as_encode_error() {
    let insert = Insert::build(
        "INSERT INTO flags (id, level) VALUES (:id, :level)",
        vec![
            ColumnSpec::new("id", CqlType::Int),
            ColumnSpec::new("level", CqlType::TinyInt),
        ],
        vec![],
    )
    .unwrap();
    let mut input = Fields::empty();
    input.push("id", CqlType::Int, CqlValue::Int(1));
    input.push("level", CqlType::TinyInt, CqlValue::TinyInt(5));
    assert!(insert.write_raw(&input, ProtocolVersion::V4).is_ok());
    let err = insert
        .write_raw(&input, ProtocolVersion::V3)
        .unwrap_err();
    assert!(matches!(err, EncodeError::UnsupportedType { .. }));
}
