//! Implementation of the Record derive macro.
//!
//! Generates the field-list conversions that let a plain struct stand in
//! for a statement's native parameter or result shape. Column names come
//! from field names, overridable per field with `#[cql(rename = "...")]`.

use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::{Data, DeriveInput, Error, Field, Fields, Ident, Lit, Result, Type};

/// Parsed record definition from a struct with `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordDef {
    /// The struct name.
    pub name: Ident,
    /// Parsed fields, in declaration order.
    pub fields: Vec<RecordFieldDef>,
    /// Generics from the struct.
    pub generics: syn::Generics,
}

/// One field of a record struct.
#[derive(Debug)]
pub struct RecordFieldDef {
    /// The field name.
    pub name: Ident,
    /// The field type.
    pub ty: Type,
    /// The column name the field corresponds to.
    pub column: String,
}

/// Parse a `DeriveInput` into a `RecordDef`.
pub fn parse_record(input: &DeriveInput) -> Result<RecordDef> {
    let name = input.ident.clone();
    let generics = input.generics.clone();

    let fields = match &input.data {
        Data::Struct(data) => parse_record_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Record can only be derived for structs, not unions",
            ));
        }
    };

    if fields.is_empty() {
        return Err(Error::new_spanned(
            input,
            "Record requires at least one field",
        ));
    }

    Ok(RecordDef {
        name,
        fields,
        generics,
    })
}

/// Parse all fields from a struct.
fn parse_record_fields(fields: &Fields) -> Result<Vec<RecordFieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_record_field).collect(),
        Fields::Unnamed(_) | Fields::Unit => Err(Error::new_spanned(
            fields,
            "Record requires a struct with named fields (tuples bind positionally without a derive)",
        )),
    }
}

/// Parse a single field and its `#[cql(...)]` attributes.
fn parse_record_field(field: &Field) -> Result<RecordFieldDef> {
    let name = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;
    let ty = field.ty.clone();

    let mut column = name.to_string();

    for attr in &field.attrs {
        if !attr.path().is_ident("cql") {
            continue;
        }

        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: Lit = meta.value()?.parse()?;
                if let Lit::Str(lit_str) = value {
                    column = lit_str.value();
                } else {
                    return Err(Error::new_spanned(
                        value,
                        "expected string literal for rename",
                    ));
                }
            } else {
                let attr_name = meta.path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    &meta.path,
                    format!("unknown cql attribute `{attr_name}`. Valid attributes are: rename"),
                ));
            }
            Ok(())
        })?;
    }

    Ok(RecordFieldDef { name, ty, column })
}

/// Generate the `ToFields` and `FromFields` impls for a parsed record.
pub fn expand_record(def: &RecordDef) -> TokenStream {
    let name = &def.name;
    let (impl_generics, ty_generics, where_clause) = def.generics.split_for_impl();

    let shape_entries: Vec<TokenStream> = def
        .fields
        .iter()
        .map(|f| {
            let ty = &f.ty;
            let column = &f.column;
            quote! {
                ::cqlbind::ColumnSpec::new(
                    #column,
                    <#ty as ::cqlbind::Scalar>::cql_type(),
                )
            }
        })
        .collect();

    let to_field_entries: Vec<TokenStream> = def
        .fields
        .iter()
        .map(|f| {
            let field = &f.name;
            let ty = &f.ty;
            let column = &f.column;
            quote! {
                fields.push(
                    #column,
                    <#ty as ::cqlbind::Scalar>::cql_type(),
                    ::cqlbind::Scalar::to_value(&self.#field),
                );
            }
        })
        .collect();

    let from_field_entries: Vec<TokenStream> = def
        .fields
        .iter()
        .map(|f| {
            let field = &f.name;
            let ty = &f.ty;
            let column = &f.column;
            quote! {
                #field: <#ty as ::cqlbind::Scalar>::from_value(
                    fields
                        .get(#column)
                        .ok_or_else(|| ::cqlbind::DecodeError::MissingColumn {
                            column: #column.to_string(),
                        })?,
                    #column,
                )?,
            }
        })
        .collect();

    quote! {
        impl #impl_generics ::cqlbind::ToFields for #name #ty_generics #where_clause {
            fn shape() -> ::std::vec::Vec<::cqlbind::ColumnSpec> {
                vec![#(#shape_entries),*]
            }

            fn to_fields(&self) -> ::cqlbind::Fields {
                let mut fields = ::cqlbind::Fields::empty();
                #(#to_field_entries)*
                fields
            }
        }

        impl #impl_generics ::cqlbind::FromFields for #name #ty_generics #where_clause {
            fn shape() -> ::std::vec::Vec<::cqlbind::ColumnSpec> {
                <Self as ::cqlbind::ToFields>::shape()
            }

            fn from_fields(
                fields: &::cqlbind::Fields,
            ) -> ::std::result::Result<Self, ::cqlbind::DecodeError> {
                Ok(Self {
                    #(#from_field_entries)*
                })
            }
        }
    }
}
