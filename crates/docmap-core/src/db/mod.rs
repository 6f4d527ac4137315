//! Mapping registry and the single-document write pipeline.
//!
//! `registry` turns declared entity models into cached persistent-entity
//! records; `executor` consults those records when it builds write filters.

pub mod collection;
pub mod executor;
pub mod filter;
pub mod registry;

// re-exports
pub use collection::{Collection, JournalEntry, MemoryCollection, WriteOp, WriteResult};
pub use executor::{SaveExecutor, UpdateDefinition, WriteError};
pub use filter::Filter;
pub use registry::{MappingContext, MappingError, PersistentEntity, mapping_context};
