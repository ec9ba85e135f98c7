//! `storepilot onboard`: First-time setup.

use storepilot_config::AppConfig;
use storepilot_core::store::KnowledgeStore;
use storepilot_store::{FileStore, default_knowledge_base};

use super::CmdResult;

pub async fn run() -> CmdResult {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("🛒 StorePilot — First-Time Setup");
    println!("================================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("✅ Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    let config = if config_path.exists() {
        println!("\n⚠️  Config already exists at: {}", config_path.display());
        println!("   Edit it manually or delete and re-run onboard.\n");
        AppConfig::load_from(&config_path)?
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("✅ Created config.toml at: {}", config_path.display());
        AppConfig::default()
    };

    let store = FileStore::new(config.store.resolved_data_dir());
    if store.knowledge_path().exists() {
        println!("  Knowledge base exists: {}", store.knowledge_path().display());
    } else {
        let seed = default_knowledge_base();
        store.save_knowledge_base(&seed).await?;
        println!(
            "✅ Seeded knowledge base with {} entries: {}",
            seed.len(),
            store.knowledge_path().display()
        );
    }

    println!("\n📝 Next steps:");
    println!("   1. Set STOREPILOT_API_KEY or add api_key to {}", config_path.display());
    println!("   2. Import history: storepilot facts import sales.jsonl");
    println!("   3. Run: storepilot chat \"这个价格多少\" --price 199\n");

    Ok(())
}
