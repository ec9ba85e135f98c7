//! In-memory store: useful for testing and ephemeral sessions.

use async_trait::async_trait;
use std::sync::Arc;
use storepilot_core::error::StoreError;
use storepilot_core::knowledge::KnowledgeEntry;
use storepilot_core::series::FactRow;
use storepilot_core::store::{FactStore, KnowledgeStore};
use tokio::sync::RwLock;

/// Holds knowledge entries and fact rows in plain vectors.
#[derive(Default)]
pub struct InMemoryStore {
    knowledge: Arc<RwLock<Vec<KnowledgeEntry>>>,
    facts: Arc<RwLock<Vec<FactRow>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_knowledge(entries: Vec<KnowledgeEntry>) -> Self {
        Self {
            knowledge: Arc::new(RwLock::new(entries)),
            ..Self::default()
        }
    }

    pub fn with_facts(mut self, rows: Vec<FactRow>) -> Self {
        self.facts = Arc::new(RwLock::new(rows));
        self
    }
}

#[async_trait]
impl KnowledgeStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load_knowledge_base(&self) -> Result<Vec<KnowledgeEntry>, StoreError> {
        Ok(self.knowledge.read().await.clone())
    }

    async fn save_knowledge_base(&self, entries: &[KnowledgeEntry]) -> Result<(), StoreError> {
        *self.knowledge.write().await = entries.to_vec();
        Ok(())
    }
}

#[async_trait]
impl FactStore for InMemoryStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn query_fact_rows(&self, start: &str, end: &str) -> Result<Vec<FactRow>, StoreError> {
        let facts = self.facts.read().await;
        Ok(facts
            .iter()
            .filter(|r| r.date.as_str() >= start && r.date.as_str() <= end)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_replaces_whole_collection() {
        let store = InMemoryStore::with_knowledge(vec![
            KnowledgeEntry::new("a", "c", "q1", "x"),
            KnowledgeEntry::new("b", "c", "q2", "y"),
        ]);

        store
            .save_knowledge_base(&[KnowledgeEntry::new("z", "c", "q3", "w")])
            .await
            .unwrap();

        let loaded = store.load_knowledge_base().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id, "z");
    }

    #[tokio::test]
    async fn query_range_is_inclusive() {
        let store = InMemoryStore::new().with_facts(vec![
            FactRow::new("A", "2024-01-01", 1.0),
            FactRow::new("B", "2024-01-02", 1.0),
            FactRow::new("A", "2024-01-03", 1.0),
            FactRow::new("A", "2024-01-04", 1.0),
        ]);

        let rows = store.query_fact_rows("2024-01-01", "2024-01-03").await.unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().any(|r| r.identifier == "B"));
    }
}
