//! Derive macros generating the per-entity column vocabulary used by
//! `quarry` query builders.
//!
//! Generated code refers to `::quarry::...` paths, so the macros are meant to
//! be used through the `quarry` facade crate.

use proc_macro::TokenStream;

mod column_value;
mod entity_state;
mod util;

/// Column constants, `EntityState`, `RecordView`, and a `<Name>Columns`
/// accessor trait implemented for `QueryBuilder<I, Name>`.
///
/// Attributes: `#[entity(name = "..")]` on the struct;
/// `#[column(skip)]`, `#[column(name = "..")]` and
/// `#[column(accessor = "..")]` on fields.
#[proc_macro_derive(EntityState, attributes(entity, column))]
pub fn derive_entity_state(input: TokenStream) -> TokenStream {
    entity_state::derive_entity_state(input.into()).into()
}

/// `ColumnValue` for unit enums (enum values), named-field structs (message
/// values) and single-field tuple structs (the inner value).
///
/// Attributes: `#[value(name = "..")]` overrides the type name;
/// `#[value(ordered)]` on a newtype also implements `OrderedValue`.
#[proc_macro_derive(ColumnValue, attributes(value, column))]
pub fn derive_column_value(input: TokenStream) -> TokenStream {
    column_value::derive_column_value(input.into()).into()
}
