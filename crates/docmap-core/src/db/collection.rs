use crate::{
    ID_FIELD,
    db::filter::Filter,
    error::InternalError,
    value::{Document, Value},
};
use std::sync::{Mutex, MutexGuard};

///
/// WriteResult
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteResult {
    pub matched: u64,
    pub modified: u64,
    pub upserted_id: Option<Value>,
}

///
/// Collection
///
/// Single-collection driver seam used by the write pipeline.
/// Implementations apply each call to at most one document.
///

pub trait Collection {
    fn insert_one(&self, doc: Document) -> Result<WriteResult, InternalError>;

    fn replace_one(
        &self,
        filter: &Filter,
        replacement: Document,
        upsert: bool,
    ) -> Result<WriteResult, InternalError>;

    /// Set the given fields on the first matching document.
    fn update_one(
        &self,
        filter: &Filter,
        set: &Document,
        upsert: bool,
    ) -> Result<WriteResult, InternalError>;

    fn find(&self, filter: &Filter) -> Result<Vec<Document>, InternalError>;
}

///
/// WriteOp
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteOp {
    InsertOne,
    ReplaceOne { upsert: bool },
    UpdateOne { upsert: bool },
}

///
/// JournalEntry
/// One write as issued against a [`MemoryCollection`].
///

#[derive(Clone, Debug, PartialEq)]
pub struct JournalEntry {
    pub op: WriteOp,
    pub filter: Filter,
}

///
/// MemoryCollection
///
/// Thread-safe in-process collection with a journal of issued writes.
///

#[derive(Debug, Default)]
pub struct MemoryCollection {
    name: String,
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    docs: Vec<Document>,
    journal: Vec<JournalEntry>,
}

impl MemoryCollection {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            state: Mutex::default(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes issued so far, oldest first.
    pub fn journal(&self) -> Result<Vec<JournalEntry>, InternalError> {
        Ok(self.lock()?.journal.clone())
    }

    pub fn len(&self) -> Result<usize, InternalError> {
        Ok(self.lock()?.docs.len())
    }

    pub fn is_empty(&self) -> Result<bool, InternalError> {
        Ok(self.lock()?.docs.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, InternalError> {
        self.state.lock().map_err(|_| {
            InternalError::store_internal(format!("collection '{}' lock poisoned", self.name))
        })
    }

    fn upsert_document(
        state: &mut MemoryState,
        filter: &Filter,
        mut doc: Document,
    ) -> Result<WriteResult, InternalError> {
        // Equality clauses seed the inserted document, as the server does.
        for field in filter.fields() {
            if !field.contains('.')
                && !doc.contains_key(field)
                && let Some(value) = filter.get(field)
            {
                doc.insert(field, value.clone());
            }
        }

        let id = doc.get(ID_FIELD).cloned();
        if let Some(id) = &id
            && state.docs.iter().any(|d| d.get(ID_FIELD) == Some(id))
        {
            return Err(InternalError::store_duplicate_key(id.to_string()));
        }
        state.docs.push(doc);

        Ok(WriteResult {
            matched: 0,
            modified: 0,
            upserted_id: id,
        })
    }
}

impl Collection for MemoryCollection {
    fn insert_one(&self, doc: Document) -> Result<WriteResult, InternalError> {
        let mut state = self.lock()?;
        state.journal.push(JournalEntry {
            op: WriteOp::InsertOne,
            filter: Filter::new(),
        });

        Self::upsert_document(&mut state, &Filter::new(), doc)
    }

    fn replace_one(
        &self,
        filter: &Filter,
        replacement: Document,
        upsert: bool,
    ) -> Result<WriteResult, InternalError> {
        let mut state = self.lock()?;
        state.journal.push(JournalEntry {
            op: WriteOp::ReplaceOne { upsert },
            filter: filter.clone(),
        });

        match state.docs.iter().position(|doc| filter.matches(doc)) {
            Some(pos) => {
                let existing = &mut state.docs[pos];
                let modified = u64::from(*existing != replacement);
                *existing = replacement;

                Ok(WriteResult {
                    matched: 1,
                    modified,
                    upserted_id: None,
                })
            }
            None if upsert => Self::upsert_document(&mut state, filter, replacement),
            None => Ok(WriteResult::default()),
        }
    }

    fn update_one(
        &self,
        filter: &Filter,
        set: &Document,
        upsert: bool,
    ) -> Result<WriteResult, InternalError> {
        let mut state = self.lock()?;
        state.journal.push(JournalEntry {
            op: WriteOp::UpdateOne { upsert },
            filter: filter.clone(),
        });

        match state.docs.iter().position(|doc| filter.matches(doc)) {
            Some(pos) => {
                let existing = &mut state.docs[pos];
                let before = existing.clone();
                for (field, value) in set.iter() {
                    existing.insert(field, value.clone());
                }

                Ok(WriteResult {
                    matched: 1,
                    modified: u64::from(*existing != before),
                    upserted_id: None,
                })
            }
            None if upsert => Self::upsert_document(&mut state, filter, set.clone()),
            None => Ok(WriteResult::default()),
        }
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Document>, InternalError> {
        let state = self.lock()?;

        Ok(state
            .docs
            .iter()
            .filter(|doc| filter.matches(doc))
            .cloned()
            .collect())
    }
}
