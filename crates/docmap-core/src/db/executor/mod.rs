mod save;
mod shard;

use crate::{
    error::ErrorClass,
    value::{Document, Value},
};
use thiserror::Error as ThisError;

// re-exports
pub use save::SaveExecutor;

///
/// WriteError
///
/// Per-write failures surfaced to the caller of a save or update.
///

#[derive(Clone, Debug, PartialEq, ThisError)]
pub enum WriteError {
    #[error("entity '{entity}' has no identifier value under '_id'")]
    MissingId { entity: &'static str },

    #[error("entity '{entity}' has no value for shard key field '{field}'")]
    MissingShardKeyField { entity: &'static str, field: String },

    #[error(
        "entity '{entity}' shard key field '{field}' is filtered on {filter_value} but the entity holds {entity_value}"
    )]
    ShardKeyConflict {
        entity: &'static str,
        field: String,
        filter_value: Value,
        entity_value: Value,
    },
}

impl WriteError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingId { .. } | Self::MissingShardKeyField { .. } => {
                ErrorClass::InvariantViolation
            }
            Self::ShardKeyConflict { .. } => ErrorClass::Conflict,
        }
    }
}

///
/// UpdateDefinition
///
/// Payload of an update. Only a full entity copy carries enough state to
/// derive the shard key; partial updates must filter on it explicitly.
///

#[derive(Clone, Debug)]
pub enum UpdateDefinition<'a, E> {
    Replacement(&'a E),
    Set(Document),
}

impl<E> UpdateDefinition<'_, E> {
    #[must_use]
    pub const fn is_full_copy(&self) -> bool {
        matches!(self, Self::Replacement(_))
    }
}
