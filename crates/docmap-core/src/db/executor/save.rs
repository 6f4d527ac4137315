use crate::{
    ID_FIELD,
    config::WriteConfig,
    db::{
        collection::{Collection, WriteResult},
        executor::{UpdateDefinition, WriteError, shard::augment_filter},
        filter::Filter,
        registry::{MappingContext, PersistentEntity},
    },
    error::InternalError,
    obs::sink::{self, MetricsEvent, WriteKind},
    traits::EntityValue,
    value::Document,
};
use std::{marker::PhantomData, sync::Arc};
use tracing::debug;

///
/// SaveExecutor
///
/// Single-document write path for one entity type. Replaces driven by a full
/// entity copy carry the entity's shard key in their filter.
///

pub struct SaveExecutor<'a, E, C: ?Sized> {
    mapping: &'a MappingContext,
    collection: &'a C,
    config: WriteConfig,
    _marker: PhantomData<fn(&E)>,
}

impl<'a, E, C> SaveExecutor<'a, E, C>
where
    E: EntityValue,
    C: Collection + ?Sized,
{
    // ======================================================================
    // Construction & configuration
    // ======================================================================

    #[must_use]
    pub fn new(mapping: &'a MappingContext, collection: &'a C) -> Self {
        Self {
            mapping,
            collection,
            config: WriteConfig::default(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn with_config(mut self, config: WriteConfig) -> Self {
        self.config = config;
        self
    }

    // ======================================================================
    // Single-entity writes
    // ======================================================================

    /// Insert a new document. Inserts carry no filter.
    pub fn insert(&self, entity: &E) -> Result<WriteResult, InternalError> {
        Self::start(WriteKind::Insert);

        self.collection.insert_one(entity.to_document())
    }

    /// Replace the stored copy of `entity`, inserting it when
    /// `upsert_on_save` is set and no document matches.
    pub fn save(&self, entity: &E) -> Result<WriteResult, InternalError> {
        Self::start(WriteKind::Save);

        let (filter, doc) = self.prepare_replace(entity)?;
        debug!(entity = E::PATH, %filter, "save");

        self.collection
            .replace_one(&filter, doc, self.config.upsert_on_save)
    }

    /// Replace the stored copy of `entity`; errors if none matches.
    pub fn replace(&self, entity: &E) -> Result<WriteResult, InternalError> {
        Self::start(WriteKind::Replace);

        let (filter, doc) = self.prepare_replace(entity)?;
        debug!(entity = E::PATH, %filter, "replace");

        let result = self.collection.replace_one(&filter, doc, false)?;
        if result.matched == 0 {
            return Err(InternalError::store_not_found(filter.to_string()));
        }

        Ok(result)
    }

    /// Update the first document matching `filter`.
    ///
    /// A full entity copy replaces the document and extends the filter with
    /// the shard key; a partial `Set` is applied as given.
    pub fn update_one(
        &self,
        mut filter: Filter,
        update: UpdateDefinition<'_, E>,
        upsert: bool,
    ) -> Result<WriteResult, InternalError> {
        Self::start(WriteKind::Update);

        match update {
            UpdateDefinition::Replacement(entity) => {
                let persistent = self.persistent()?;
                let doc = entity.to_document();
                augment_filter(&persistent, &mut filter, &doc)?;
                debug!(entity = E::PATH, %filter, upsert, "update with full copy");

                self.collection.replace_one(&filter, doc, upsert)
            }
            UpdateDefinition::Set(set) => {
                debug!(entity = E::PATH, %filter, upsert, "partial update");

                self.collection.update_one(&filter, &set, upsert)
            }
        }
    }

    /// Filter a replace of `entity` is issued with: identifier plus shard key.
    pub fn replace_filter(&self, entity: &E) -> Result<Filter, InternalError> {
        Ok(self.prepare_replace(entity)?.0)
    }

    // ======================================================================
    // Internals
    // ======================================================================

    fn prepare_replace(&self, entity: &E) -> Result<(Filter, Document), InternalError> {
        let persistent = self.persistent()?;
        let doc = entity.to_document();

        let Some(id) = doc.get(ID_FIELD).filter(|v| !v.is_null()) else {
            return Err(WriteError::MissingId {
                entity: persistent.model().entity_name,
            }
            .into());
        };

        let mut filter = Filter::by_id(id.clone());
        augment_filter(&persistent, &mut filter, &doc)?;

        Ok((filter, doc))
    }

    fn persistent(&self) -> Result<Arc<PersistentEntity>, InternalError> {
        self.mapping.persistent_entity::<E>()
    }

    fn start(kind: WriteKind) {
        sink::record(MetricsEvent::WriteStart {
            kind,
            entity_path: E::PATH,
        });
    }
}
