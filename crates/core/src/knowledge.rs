//! Knowledge base entries used to ground customer-service replies.

use serde::{Deserialize, Serialize};

use crate::error::KnowledgeError;

/// A curated question/answer pair.
///
/// Entries are never patched in place: an edit replaces the whole entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    pub id: String,

    #[serde(default)]
    pub category: String,

    /// The trigger text matched against operator queries.
    pub question: String,

    pub answer: String,
}

impl KnowledgeEntry {
    pub fn new(
        id: impl Into<String>,
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// An ordered knowledge collection with unique ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<KnowledgeEntry>", into = "Vec<KnowledgeEntry>")]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl TryFrom<Vec<KnowledgeEntry>> for KnowledgeBase {
    type Error = KnowledgeError;

    fn try_from(entries: Vec<KnowledgeEntry>) -> Result<Self, Self::Error> {
        Self::from_entries(entries)
    }
}

impl From<KnowledgeBase> for Vec<KnowledgeEntry> {
    fn from(base: KnowledgeBase) -> Self {
        base.entries
    }
}

impl KnowledgeBase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a base from loaded entries. Later duplicates of an id are rejected.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self, KnowledgeError> {
        let mut base = Self::new();
        for entry in entries {
            base.insert(entry)?;
        }
        Ok(base)
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<KnowledgeEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&KnowledgeEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Append a new entry.
    pub fn insert(&mut self, entry: KnowledgeEntry) -> Result<(), KnowledgeError> {
        if self.get(&entry.id).is_some() {
            return Err(KnowledgeError::DuplicateId(entry.id));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Replace the entry with the same id, keeping its position.
    ///
    /// Returns the previous entry.
    pub fn replace(&mut self, entry: KnowledgeEntry) -> Result<KnowledgeEntry, KnowledgeError> {
        let slot = self
            .entries
            .iter_mut()
            .find(|e| e.id == entry.id)
            .ok_or_else(|| KnowledgeError::UnknownId(entry.id.clone()))?;
        Ok(std::mem::replace(slot, entry))
    }

    pub fn remove(&mut self, id: &str) -> Option<KnowledgeEntry> {
        let index = self.entries.iter().position(|e| e.id == id)?;
        Some(self.entries.remove(index))
    }
}
