use crate::{ID_FIELD, model::shard_key::ShardKey};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error as ThisError;

///
/// Sharded
///
/// Declarative shard-key descriptor attached to a persistent entity type.
///
/// The descriptor exposes two names for one logical attribute, `value` and
/// `shard_key`. Both declarations are kept as written so that resolution can
/// tell "defaulted" apart from "explicitly set"; every read goes through the
/// same canonicalisation, so `value()` and `shard_key()` always agree.
///
/// Bearing a descriptor also marks the type persistent, and subtypes inherit
/// it unless they declare their own (see `EntityModel::sharded_descriptor`).
///
/// Required indexes are not created from this descriptor; declare them
/// through the indexing facility.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Sharded {
    value: Option<&'static [&'static str]>,
    shard_key: Option<&'static [&'static str]>,
}

impl Sharded {
    /// Effective field list when neither alias is set.
    pub const DEFAULT_FIELDS: &'static [&'static str] = &[ID_FIELD];

    #[must_use]
    pub const fn new() -> Self {
        Self {
            value: None,
            shard_key: None,
        }
    }

    /// Set the `value` alias.
    #[must_use]
    pub const fn with_value(mut self, fields: &'static [&'static str]) -> Self {
        self.value = Some(fields);
        self
    }

    /// Set the `shard_key` alias.
    #[must_use]
    pub const fn with_shard_key(mut self, fields: &'static [&'static str]) -> Self {
        self.shard_key = Some(fields);
        self
    }

    /// Effective field list, read through the `value` name.
    pub fn value(&self) -> Result<&'static [&'static str], ShardedError> {
        self.effective_fields()
    }

    /// Effective field list, read through the `shard_key` name.
    pub fn shard_key(&self) -> Result<&'static [&'static str], ShardedError> {
        self.effective_fields()
    }

    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.value.is_some() || self.shard_key.is_some()
    }

    /// Resolve the descriptor into a [`ShardKey`] under the given policy.
    pub fn resolve(&self, duplicates: DuplicateFieldPolicy) -> Result<ShardKey, ShardedError> {
        let fields = self.effective_fields()?;

        if fields.is_empty() {
            return Err(ShardedError::EmptyDeclaration);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        for (index, field) in fields.iter().enumerate() {
            if field.trim().is_empty() {
                return Err(ShardedError::EmptyField { index });
            }
            if !seen.insert(*field) && duplicates == DuplicateFieldPolicy::Reject {
                return Err(ShardedError::DuplicateField {
                    field: (*field).to_string(),
                });
            }
        }

        Ok(ShardKey::of(fields.iter().copied()))
    }

    // Alias rule: one explicit side wins; two explicit sides must agree.
    fn effective_fields(&self) -> Result<&'static [&'static str], ShardedError> {
        match (self.value, self.shard_key) {
            (Some(value), Some(shard_key)) if value != shard_key => {
                Err(ShardedError::AliasConflict {
                    value: to_owned_list(value),
                    shard_key: to_owned_list(shard_key),
                })
            }
            (Some(fields), _) | (None, Some(fields)) => Ok(fields),
            (None, None) => Ok(Self::DEFAULT_FIELDS),
        }
    }
}

fn to_owned_list(fields: &[&str]) -> Vec<String> {
    fields.iter().map(ToString::to_string).collect()
}

///
/// DuplicateFieldPolicy
///
/// How resolution treats a field path that appears more than once.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateFieldPolicy {
    /// Keep the list as declared; the index document collapses repeats.
    #[default]
    Allow,
    Reject,
}

///
/// ShardedError
///
/// Invalid shard-key declarations, detected when the descriptor is read.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ShardedError {
    #[error("conflicting shard key aliases: value = {value:?}, shard_key = {shard_key:?}")]
    AliasConflict {
        value: Vec<String>,
        shard_key: Vec<String>,
    },

    #[error("shard key declaration must name at least one field")]
    EmptyDeclaration,

    #[error("shard key field at position {index} is empty")]
    EmptyField { index: usize },

    #[error("shard key field '{field}' is declared more than once")]
    DuplicateField { field: String },
}
