//! ## Crate layout
//! - `core`: runtime values, entity models, shard keys, and the write pipeline.
//! - `macros`: `#[derive(Entity)]` and `#[sharded(...)]`.
//!
//! Core modules are re-exported at the top level so generated code can refer
//! to `::docmap::model`, `::docmap::traits` and `::docmap::value` directly.

pub use docmap_core as core;
pub use docmap_derive as macros;

pub use docmap_core::{ID_FIELD, config, db, error, model, obs, traits, value};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//
// Macros
//

pub use docmap_derive::{Entity, sharded};

pub use error::InternalError as Error;

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Entity,
        core::{
            db::{Filter, MappingContext, SaveExecutor, UpdateDefinition, mapping_context},
            model::{shard_key::ShardKey, sharded::Sharded},
            traits::{EntityKind as _, EntityValue as _, Path as _},
            value::{Document, Value},
        },
        sharded,
    };
}
