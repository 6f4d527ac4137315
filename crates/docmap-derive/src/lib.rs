//! Derive and attribute macros for docmap entities.
//!
//! Generated code refers to the runtime through `::docmap`, so these macros
//! are meant to be used via the `docmap` facade crate.

use proc_macro::TokenStream;

mod entity;
mod helper;
mod sharded;

/// Derive `Path`, `EntityKind` and `EntityValue` for a struct with named
/// fields.
///
/// Container options, all under `#[entity(...)]`:
/// - `name = "..."` entity name used in diagnostics (defaults to the type name)
/// - `collection = "..."` (defaults to the name with a lowercased first letter)
/// - `id = "field"` identifier field, stored as `_id` (defaults to `id`)
/// - `extends = "Parent"` inherit mapping metadata from another entity
/// - `sharded`, `sharded("a, b")`, `sharded(value = "a, b")` or
///   `sharded(shard_key = "a, b")`
///
/// Field options: `rename = "..."`, `skip`.
#[proc_macro_derive(Entity, attributes(entity))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    entity::derive_entity(input.into()).into()
}

/// Declare the shard key of a persistent entity.
///
/// `#[sharded]` shards on `_id`; `#[sharded("tenant, ts")]`,
/// `#[sharded(value = "tenant, ts")]` and `#[sharded(shard_key = "tenant, ts")]`
/// are equivalent. The struct is made an
/// entity if it does not already derive `Entity`. Place this attribute above
/// the derive list.
#[proc_macro_attribute]
pub fn sharded(attr: TokenStream, item: TokenStream) -> TokenStream {
    match sharded::expand(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.write_errors().into(),
    }
}
