//! Runtime data model definitions.
//!
//! This module contains the *runtime representations* of declarative entity
//! metadata, as opposed to their macro-time forms. Types in `model` are
//! produced by `#[derive(Entity)]` (or written by hand as `const`s) and read
//! by the mapping registry and the write pipeline.
//!
//! In general:
//! - Derive code defines *what is declared*
//! - `model` defines *what is resolved*
pub mod entity;
pub mod shard_key;
pub mod sharded;

#[cfg(test)]
mod tests;
