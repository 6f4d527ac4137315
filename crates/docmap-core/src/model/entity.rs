use crate::model::sharded::Sharded;

///
/// EntityModel
/// Minimal, macro-generated runtime model for one persistent entity type.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Type name as declared; used in configuration errors.
    pub entity_name: &'static str,
    /// Collection the documents live in.
    pub collection: &'static str,
    /// Document field names in declaration order (identifier first).
    pub fields: &'static [&'static str],
    /// Shard-key descriptor declared directly on this type.
    pub sharded: Option<Sharded>,
    /// Supertype whose metadata this type inherits.
    pub parent: Option<&'static Self>,
}

impl EntityModel {
    /// Walk this model and then its supertypes, nearest first.
    pub fn ancestors(&'static self) -> impl Iterator<Item = &'static Self> {
        std::iter::successors(Some(self), |model| model.parent)
    }

    /// Nearest model in the ancestry (self included) bearing a descriptor.
    ///
    /// The walk stops after `max_depth` models; `Err(depth)` reports that the
    /// chain was longer than allowed, which also catches parent cycles.
    pub fn sharded_descriptor(
        &'static self,
        max_depth: usize,
    ) -> Result<Option<(&'static Self, Sharded)>, usize> {
        for (depth, model) in self.ancestors().enumerate() {
            if depth >= max_depth {
                return Err(depth);
            }
            if let Some(sharded) = model.sharded {
                return Ok(Some((model, sharded)));
            }
        }

        Ok(None)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains(&name)
    }
}
