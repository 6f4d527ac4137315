use crate::{
    ID_FIELD,
    value::{Document, Value},
};
use std::fmt;

///
/// Filter
///
/// Conjunction of equality clauses over document field paths, kept in
/// insertion order. This is the predicate handed to single-document writes.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    clauses: Document,
}

impl Filter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Document::new(),
        }
    }

    /// Filter matching one document by identifier.
    #[must_use]
    pub fn by_id(id: impl Into<Value>) -> Self {
        Self::new().eq(ID_FIELD, id)
    }

    /// Add an equality clause (builder form).
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Add or replace an equality clause.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.clauses.insert(field, value)
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.clauses.get(field)
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn fields(&self) -> impl ExactSizeIterator<Item = &str> {
        self.clauses.keys()
    }

    /// Whether every clause holds for the given document.
    #[must_use]
    pub fn matches(&self, doc: &Document) -> bool {
        self.clauses
            .iter()
            .all(|(field, expected)| doc.get_path(field) == Some(expected))
    }

    #[must_use]
    pub fn to_document(&self) -> Document {
        self.clauses.clone()
    }
}

impl From<Document> for Filter {
    fn from(clauses: Document) -> Self {
        Self { clauses }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.clauses)
    }
}
