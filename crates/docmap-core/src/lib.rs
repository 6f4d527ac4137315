//! Core runtime for docmap: document values, entity models, shard-key
//! metadata, the mapping registry, and the single-document write pipeline.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Document field that carries the entity identifier.
pub const ID_FIELD: &str = "_id";

/// Default bound on the ancestry walk used to find an inherited descriptor.
pub const MAX_INHERITANCE_DEPTH: usize = 16;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        model::{entity::EntityModel, shard_key::ShardKey, sharded::Sharded},
        traits::{EntityKind, EntityValue, FieldValue, Path},
        value::{Document, Value},
    };
}
