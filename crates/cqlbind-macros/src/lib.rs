//! Procedural macros for cqlbind.
//!
//! Exposes the [`Record`] derive, which generates the structural
//! conversions (`ToFields`/`FromFields`) used by the `from_record` and
//! `into_record` correspondence operations. Usually consumed through the
//! `cqlbind` facade rather than directly.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod record_derive;

/// Derive the field-list conversions for a named-field struct.
///
/// Each field corresponds to a column with the field's name and the CQL
/// type of its Rust type; `#[cql(rename = "...")]` overrides the column
/// name. Every field type must implement `Scalar`.
///
/// ```ignore
/// #[derive(Record)]
/// struct Person {
///     id: i32,
///     #[cql(rename = "full_name")]
///     name: String,
/// }
/// ```
#[proc_macro_derive(Record, attributes(cql))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match record_derive::parse_record(&input) {
        Ok(def) => record_derive::expand_record(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
