//! Store traits: the persistence boundary.
//!
//! The pipeline never talks to storage itself. Callers load a snapshot through
//! these traits and hand it in, read-only, for the duration of one request.
//!
//! Implementations: in-memory (testing), JSON files on disk.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::knowledge::KnowledgeEntry;
use crate::series::FactRow;

#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// The backend name (e.g., "in_memory", "file").
    fn name(&self) -> &str;

    /// Load the whole knowledge base in insertion order.
    async fn load_knowledge_base(&self) -> Result<Vec<KnowledgeEntry>, StoreError>;

    /// Replace the whole knowledge base.
    async fn save_knowledge_base(&self, entries: &[KnowledgeEntry]) -> Result<(), StoreError>;
}

#[async_trait]
pub trait FactStore: Send + Sync {
    fn name(&self) -> &str;

    /// All rows with `start <= date <= end`, any identifier, unordered.
    async fn query_fact_rows(&self, start: &str, end: &str) -> Result<Vec<FactRow>, StoreError>;
}
