use crate::{
    config::MappingConfig,
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{entity::EntityModel, shard_key::ShardKey, sharded::ShardedError},
    obs::sink::{self, MetricsEvent},
    traits::EntityKind,
};
use std::{
    collections::HashMap,
    sync::{Arc, LazyLock, RwLock},
};
use thiserror::Error as ThisError;
use tracing::{debug, warn};

static MAPPING_CONTEXT: LazyLock<MappingContext> = LazyLock::new(MappingContext::default);

/// Process-wide mapping context with default configuration.
pub fn mapping_context() -> &'static MappingContext {
    &MAPPING_CONTEXT
}

///
/// MappingError
///
/// Configuration errors raised while building a persistent-entity record.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum MappingError {
    #[error("entity '{entity}' has an invalid shard key declaration: {source}")]
    Sharded {
        entity: &'static str,
        #[source]
        source: ShardedError,
    },

    #[error("entity '{entity}' inheritance chain exceeds {depth} levels")]
    InheritanceTooDeep { entity: &'static str, depth: usize },
}

impl MappingError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Sharded { .. } | Self::InheritanceTooDeep { .. } => {
                ErrorClass::InvariantViolation
            }
        }
    }

    #[must_use]
    pub const fn entity(&self) -> &'static str {
        match self {
            Self::Sharded { entity, .. } | Self::InheritanceTooDeep { entity, .. } => entity,
        }
    }
}

///
/// PersistentEntity
///
/// Cached mapping metadata for one entity type. Owns the resolved shard key.
///

#[derive(Debug)]
pub struct PersistentEntity {
    model: &'static EntityModel,
    shard_key: ShardKey,
    sharded_by: Option<&'static EntityModel>,
}

impl PersistentEntity {
    fn build(model: &'static EntityModel, config: &MappingConfig) -> Result<Self, MappingError> {
        let found = model
            .sharded_descriptor(config.max_inheritance_depth)
            .map_err(|depth| MappingError::InheritanceTooDeep {
                entity: model.entity_name,
                depth,
            })?;

        let Some((owner, sharded)) = found else {
            return Ok(Self {
                model,
                shard_key: ShardKey::none(),
                sharded_by: None,
            });
        };

        let shard_key = sharded
            .resolve(config.duplicate_shard_fields)
            .map_err(|source| MappingError::Sharded {
                entity: owner.entity_name,
                source,
            })?;

        for field in shard_key.fields() {
            if !model.has_field(field) && !field.contains('.') {
                debug!(
                    entity = model.path,
                    field, "shard key field is not a declared entity field"
                );
            }
        }

        Ok(Self {
            model,
            shard_key,
            sharded_by: Some(owner),
        })
    }

    #[must_use]
    pub const fn model(&self) -> &'static EntityModel {
        self.model
    }

    #[must_use]
    pub const fn path(&self) -> &'static str {
        self.model.path
    }

    #[must_use]
    pub const fn collection(&self) -> &'static str {
        self.model.collection
    }

    /// Resolved shard key; `ShardKey::none()` when no descriptor applies.
    #[must_use]
    pub const fn shard_key(&self) -> &ShardKey {
        &self.shard_key
    }

    #[must_use]
    pub const fn is_sharded(&self) -> bool {
        self.sharded_by.is_some()
    }

    /// Path of the model the descriptor was declared on.
    #[must_use]
    pub fn sharded_by(&self) -> Option<&'static str> {
        self.sharded_by.map(|model| model.path)
    }
}

///
/// MappingContext
///
/// Registry of persistent-entity records keyed by type path.
/// Records are built once and read concurrently; a race between two
/// builders of the same type stores equal records.
///

#[derive(Debug, Default)]
pub struct MappingContext {
    config: MappingConfig,
    entities: RwLock<HashMap<&'static str, Arc<PersistentEntity>>>,
}

impl MappingContext {
    /// Build a context; an inheritance depth of zero is raised to one.
    #[must_use]
    pub fn new(mut config: MappingConfig) -> Self {
        config.max_inheritance_depth = config.max_inheritance_depth.max(1);

        Self {
            config,
            entities: RwLock::default(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Record for an entity type, resolving it on first use.
    pub fn persistent_entity<E: EntityKind>(&self) -> Result<Arc<PersistentEntity>, InternalError> {
        self.resolve(E::MODEL)
    }

    /// Record for a model, resolving it on first use.
    pub fn resolve(
        &self,
        model: &'static EntityModel,
    ) -> Result<Arc<PersistentEntity>, InternalError> {
        if let Some(entity) = self.get(model.path)? {
            return Ok(entity);
        }

        let entity = match PersistentEntity::build(model, &self.config) {
            Ok(entity) => Arc::new(entity),
            Err(err) => {
                warn!(entity = model.path, error = %err, "entity mapping failed");
                sink::record(MetricsEvent::ResolutionFailed {
                    entity_path: model.path,
                });

                return Err(err.into());
            }
        };

        debug!(
            entity = model.path,
            collection = model.collection,
            shard_key = %entity.shard_key(),
            sharded_by = ?entity.sharded_by(),
            "resolved persistent entity"
        );
        sink::record(MetricsEvent::EntityResolved {
            entity_path: model.path,
            shard_fields: u64::try_from(entity.shard_key().size()).unwrap_or(u64::MAX),
        });

        self.entities
            .write()
            .map_err(|_| poisoned())?
            .insert(model.path, Arc::clone(&entity));

        Ok(entity)
    }

    /// Resolve a batch of models up front, failing on the first invalid one.
    pub fn register(&self, models: &[&'static EntityModel]) -> Result<(), InternalError> {
        for &model in models {
            self.resolve(model)?;
        }

        Ok(())
    }

    /// Cached record for a type path, without resolving.
    pub fn get(&self, path: &str) -> Result<Option<Arc<PersistentEntity>>, InternalError> {
        let entities = self.entities.read().map_err(|_| poisoned())?;

        Ok(entities.get(path).cloned())
    }

    pub fn len(&self) -> Result<usize, InternalError> {
        Ok(self.entities.read().map_err(|_| poisoned())?.len())
    }

    pub fn is_empty(&self) -> Result<bool, InternalError> {
        Ok(self.len()? == 0)
    }
}

fn poisoned() -> InternalError {
    InternalError::new(
        ErrorClass::Internal,
        ErrorOrigin::Mapping,
        "mapping registry lock poisoned",
    )
}
