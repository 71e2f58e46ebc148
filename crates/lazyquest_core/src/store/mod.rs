//! In-memory entity collections.
//!
//! # Responsibility
//! - Hold one ordered collection per entity kind.
//! - Provide the shared add/lookup/remove contract.
//!
//! # Invariants
//! - Insertion order is preserved (display order).
//! - Ids are unique within a collection.

use crate::model::{Record, RecordId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level lookup/validation error.
///
/// Callers may ignore `NotFound`: a UI can race a delete with a pending edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    NotFound { kind: &'static str, id: RecordId },
    EmptyText(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::EmptyText(field) => write!(f, "{field} cannot be empty"),
        }
    }
}

impl Error for StoreError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection<T> {
    kind: &'static str,
    items: Vec<T>,
}

impl<T: Record> Collection<T> {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Loads persisted records; later duplicates of an id are dropped.
    pub fn from_records(kind: &'static str, records: Vec<T>) -> Self {
        let mut collection = Self::new(kind);
        for record in records {
            if collection.get(record.id()).is_none() {
                collection.items.push(record);
            }
        }
        collection
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Appends a freshly minted record.
    pub fn push(&mut self, record: T) {
        self.items.push(record);
    }

    pub fn require(&self, id: &str) -> StoreResult<&T> {
        self.get(id).ok_or_else(|| self.not_found(id))
    }

    pub fn require_mut(&mut self, id: &str) -> StoreResult<&mut T> {
        let kind = self.kind;
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .ok_or_else(|| StoreError::NotFound {
                kind,
                id: id.to_string(),
            })
    }

    pub fn remove(&mut self, id: &str) -> StoreResult<T> {
        let position = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| self.not_found(id))?;
        Ok(self.items.remove(position))
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.clone()
    }

    fn not_found(&self, id: &str) -> StoreError {
        StoreError::NotFound {
            kind: self.kind,
            id: id.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Collection, StoreError};
    use crate::model::Record;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Item(String);

    impl Record for Item {
        fn id(&self) -> &str {
            &self.0
        }
    }

    #[test]
    fn from_records_drops_duplicate_ids() {
        let collection = Collection::from_records(
            "item",
            vec![Item("a".into()), Item("b".into()), Item("a".into())],
        );
        assert_eq!(collection.len(), 2);
    }

    #[test]
    fn missing_ids_report_not_found() {
        let mut collection = Collection::<Item>::new("item");
        let err = collection.remove("ghost").unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                kind: "item",
                id: "ghost".to_string()
            }
        );
        assert!(collection.require_mut("ghost").is_err());
    }
}
