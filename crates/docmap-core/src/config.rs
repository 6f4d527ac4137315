//! Mapper configuration, loaded from TOML.
//!
//! Every section and key is optional; unknown keys are rejected so typos
//! surface at startup instead of silently falling back to defaults.
use crate::{MAX_INHERITANCE_DEPTH, model::sharded::DuplicateFieldPolicy};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

///
/// MapperConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    pub mapping: MappingConfig,
    pub write: WriteConfig,
}

impl MapperConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&raw)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mapping.max_inheritance_depth == 0 {
            return Err(ConfigError::Invalid(
                "mapping.max_inheritance_depth must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// MappingConfig
/// Options read when persistent-entity records are resolved.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MappingConfig {
    pub duplicate_shard_fields: DuplicateFieldPolicy,
    pub max_inheritance_depth: usize,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            duplicate_shard_fields: DuplicateFieldPolicy::default(),
            max_inheritance_depth: MAX_INHERITANCE_DEPTH,
        }
    }
}

///
/// WriteConfig
/// Options for the single-document write path.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct WriteConfig {
    /// `save` inserts the document when no existing one matches.
    pub upsert_on_save: bool,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            upsert_on_save: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_defaults() {
        let config = MapperConfig::from_toml_str("").expect("parse empty config");

        assert_eq!(config, MapperConfig::default());
        assert!(config.write.upsert_on_save);
        assert_eq!(config.mapping.max_inheritance_depth, MAX_INHERITANCE_DEPTH);
    }

    #[test]
    fn sections_override_defaults() {
        let config = MapperConfig::from_toml_str(
            r#"
            [mapping]
            duplicate_shard_fields = "reject"

            [write]
            upsert_on_save = false
            "#,
        )
        .expect("parse config");

        assert_eq!(
            config.mapping.duplicate_shard_fields,
            DuplicateFieldPolicy::Reject
        );
        assert!(!config.write.upsert_on_save);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = MapperConfig::from_toml_str("[write]\nupsert = true\n").unwrap_err();

        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn zero_inheritance_depth_is_invalid() {
        let err = MapperConfig::from_toml_str("[mapping]\nmax_inheritance_depth = 0\n")
            .unwrap_err();

        assert!(matches!(err, ConfigError::Invalid(_)), "got {err:?}");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = MapperConfig::load("/nonexistent/docmap.toml").unwrap_err();

        assert!(err.to_string().contains("/nonexistent/docmap.toml"));
    }
}
