use crate::value::{Document, Value};
use derive_more::Deref;
use std::{
    fmt::{self, Display},
    sync::{Arc, LazyLock},
};

static NONE: LazyLock<ShardKey> = LazyLock::new(|| ShardKey(Arc::from(Vec::new())));

///
/// ShardKey
///
/// Immutable, ordered list of document field paths that make up a
/// collection's shard key. Field order mirrors the compound index the server
/// expects. Cloning shares the underlying list.
///

#[derive(Clone, Debug, Deref, Eq, Hash, PartialEq)]
#[deref(forward)]
pub struct ShardKey(Arc<[String]>);

impl ShardKey {
    /// Build a shard key from an ordered list of field paths.
    pub fn of<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Self::none();
        }

        Self(Arc::from(fields))
    }

    /// The canonical "no shard key declared" instance.
    #[must_use]
    pub fn none() -> Self {
        NONE.clone()
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Index-spec document `{ f1: 1, f2: 1, ... }` in field order.
    ///
    /// A repeated field collapses into its first position; the value is
    /// always the integer `1` (ascending).
    #[must_use]
    pub fn to_index_document(&self) -> Document {
        self.fields().map(|field| (field, Value::Int(1))).collect()
    }

    /// Whether both keys share the same underlying allocation.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl Default for ShardKey {
    fn default() -> Self {
        Self::none()
    }
}

impl Display for ShardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}
