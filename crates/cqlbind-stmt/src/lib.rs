//! Typed statement descriptors for cqlbind.
//!
//! ## Role In The Architecture
//!
//! This crate defines the four statement kinds - [`Query`], [`Insert`],
//! [`Update`], and [`Delete`] - as immutable descriptors built once and
//! bound many times. A descriptor fixes its CQL text and its parameter
//! and result shapes at construction; afterwards it only converts typed
//! inputs to wire values and decoded rows to typed outputs. Execution,
//! connections, and retries live elsewhere.
//!
//! Adaptation never mutates. `map_in` retargets the input side, `map`
//! retargets the output side, and the `from_*`/`into_*` correspondence
//! operations do the same by structural field matching, verified while
//! the adapted descriptor is constructed. Every adaptation returns a new
//! descriptor sharing the original's text and shapes.
//!
//! ## Who Uses This Crate
//!
//! Application code, usually through the `cqlbind` facade. Driver glue
//! consumes descriptors through [`Query::fill`]/[`Dml::fill`] and the
//! `read` methods.

mod binder;
mod correspond;
pub mod dml;
pub mod query;

pub use dml::{
    BatchResultReader, Delete, DeleteVerb, Dml, Insert, InsertVerb, Update, UpdateVerb, Verb,
};
pub use query::Query;
