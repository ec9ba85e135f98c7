//! Storage implementations for StorePilot.
//!
//! Both backends implement `KnowledgeStore` and `FactStore` from
//! `storepilot-core`; the pipeline only ever sees the loaded snapshots.

pub mod file_backend;
pub mod in_memory;
pub mod seed;

pub use file_backend::FileStore;
pub use in_memory::InMemoryStore;
pub use seed::default_knowledge_base;
