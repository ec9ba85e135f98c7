//! `storepilot kb`: Knowledge base management commands.
//!
//! Every change loads the whole base, applies one edit, and saves the whole
//! base back.

use storepilot_core::knowledge::{KnowledgeBase, KnowledgeEntry};
use storepilot_core::store::KnowledgeStore;
use uuid::Uuid;

use super::{CmdResult, load_config, open_store};

async fn load(store: &impl KnowledgeStore) -> Result<KnowledgeBase, Box<dyn std::error::Error>> {
    Ok(KnowledgeBase::from_entries(store.load_knowledge_base().await?)?)
}

pub fn new_entry_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("kb-{}", &id[..8])
}

pub async fn list() -> CmdResult {
    let config = load_config()?;
    let store = open_store(&config);
    let base = load(&store).await?;

    println!("📚 Knowledge Base ({} entries)", base.len());
    println!("==============================");
    if base.is_empty() {
        println!("   No entries yet. Add one with `storepilot kb add`.");
    }
    for entry in base.entries() {
        let category = if entry.category.is_empty() {
            "-"
        } else {
            entry.category.as_str()
        };
        println!("  [{}] ({category}) {}", entry.id, entry.question);
        println!("      → {}", entry.answer);
    }
    Ok(())
}

pub async fn add(question: String, answer: String, category: Option<String>) -> CmdResult {
    let config = load_config()?;
    let store = open_store(&config);
    let mut base = load(&store).await?;

    let entry = KnowledgeEntry::new(new_entry_id(), category.unwrap_or_default(), question, answer);
    let id = entry.id.clone();
    base.insert(entry)?;
    store.save_knowledge_base(base.entries()).await?;

    println!("✅ Added entry {id}");
    Ok(())
}

pub async fn edit(
    id: String,
    question: Option<String>,
    answer: Option<String>,
    category: Option<String>,
) -> CmdResult {
    let config = load_config()?;
    let store = open_store(&config);
    let mut base = load(&store).await?;

    let current = base
        .get(&id)
        .cloned()
        .ok_or_else(|| format!("No entry with id: {id}"))?;
    let replacement = KnowledgeEntry::new(
        id.clone(),
        category.unwrap_or(current.category),
        question.unwrap_or(current.question),
        answer.unwrap_or(current.answer),
    );
    base.replace(replacement)?;
    store.save_knowledge_base(base.entries()).await?;

    println!("✅ Updated entry {id}");
    Ok(())
}

pub async fn remove(id: String) -> CmdResult {
    let config = load_config()?;
    let store = open_store(&config);
    let mut base = load(&store).await?;

    if base.remove(&id).is_none() {
        return Err(format!("No entry with id: {id}").into());
    }
    store.save_knowledge_base(base.entries()).await?;

    println!("🗑️  Removed entry {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_short_and_distinct() {
        let a = new_entry_id();
        let b = new_entry_id();
        assert!(a.starts_with("kb-"));
        assert_eq!(a.len(), 11);
        assert_ne!(a, b);
    }
}
