use crate::{
    db::{executor::WriteError, filter::Filter, registry::PersistentEntity},
    obs::sink::{self, MetricsEvent},
    value::Document,
};
use tracing::{debug, warn};

/// Extend `filter` with the entity's current shard-key values.
///
/// Clauses already present with an equal value are left untouched; a
/// differing value is a conflict. Returns the number of clauses added.
pub(crate) fn augment_filter(
    entity: &PersistentEntity,
    filter: &mut Filter,
    source: &Document,
) -> Result<usize, WriteError> {
    let shard_key = entity.shard_key();
    if shard_key.is_none() {
        return Ok(0);
    }

    let entity_path = entity.path();
    let mut added = 0;

    for field in shard_key.fields() {
        // Null reads as absent.
        let Some(entity_value) = source.get_path(field).filter(|v| !v.is_null()) else {
            return Err(WriteError::MissingShardKeyField {
                entity: entity.model().entity_name,
                field: field.to_string(),
            });
        };

        match filter.get(field) {
            Some(existing) if existing == entity_value => {}
            Some(existing) => {
                warn!(
                    entity = entity_path,
                    field,
                    filter_value = %existing,
                    entity_value = %entity_value,
                    "shard key conflicts with filter"
                );
                sink::record(MetricsEvent::ShardKeyConflict { entity_path });

                return Err(WriteError::ShardKeyConflict {
                    entity: entity.model().entity_name,
                    field: field.to_string(),
                    filter_value: existing.clone(),
                    entity_value: entity_value.clone(),
                });
            }
            None => {
                filter.insert(field, entity_value.clone());
                added += 1;
            }
        }
    }

    debug!(entity = entity_path, shard_key = %shard_key, added, "augmented filter with shard key");
    sink::record(MetricsEvent::ShardFilterAugmented {
        entity_path,
        fields_added: u64::try_from(added).unwrap_or(u64::MAX),
    });

    Ok(added)
}
