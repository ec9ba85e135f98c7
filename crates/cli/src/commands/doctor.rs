//! `storepilot doctor`: Diagnose setup and endpoint health.

use storepilot_config::AppConfig;
use storepilot_core::inference::InferenceBackend;
use storepilot_core::knowledge::KnowledgeBase;
use storepilot_core::store::{FactStore, KnowledgeStore};
use storepilot_providers::OpenAiCompatClient;

use super::{CmdResult, open_store};

pub async fn run() -> CmdResult {
    println!("🩺 StorePilot Doctor — System Diagnostics");
    println!("=========================================\n");

    let mut issues = 0;

    let config_path = AppConfig::config_dir().join("config.toml");
    if !config_path.exists() {
        println!("  ⚠️  No config file, using defaults. Run `storepilot onboard`");
        issues += 1;
    }

    let config = match AppConfig::load() {
        Ok(config) => {
            println!("  ✅ Config valid");
            config
        }
        Err(e) => {
            println!("  ❌ Config invalid: {e}");
            println!("\n  ⚠️  Fix the config before running further checks.");
            return Ok(());
        }
    };

    println!("     Endpoint: {}", config.endpoint.base_url);
    println!("     Model:    {}", config.endpoint.model);

    let store = open_store(&config);
    match store.load_knowledge_base().await {
        Ok(entries) => match KnowledgeBase::from_entries(entries) {
            Ok(base) if base.is_empty() => {
                println!("  ⚠️  Knowledge base is empty. Chat replies will be ungrounded");
                issues += 1;
            }
            Ok(base) => println!("  ✅ Knowledge base: {} entries", base.len()),
            Err(e) => {
                println!("  ❌ Knowledge base invalid: {e}");
                issues += 1;
            }
        },
        Err(e) => {
            println!("  ❌ Knowledge base unreadable: {e}");
            issues += 1;
        }
    }

    match store.query_fact_rows("0000-01-01", "9999-12-31").await {
        Ok(rows) if rows.is_empty() => {
            println!("  ⚠️  No fact rows imported. Forecasts need history");
            issues += 1;
        }
        Ok(rows) => println!("  ✅ Fact rows: {}", rows.len()),
        Err(e) => {
            println!("  ❌ Fact rows unreadable: {e}");
            issues += 1;
        }
    }

    if config.has_api_key() {
        println!("  ✅ API key configured");
        let client = OpenAiCompatClient::from_config(&config)?;
        match client.health_check().await {
            Ok(true) => println!("  ✅ Endpoint reachable"),
            Ok(false) => {
                println!("  ⚠️  Endpoint answered but did not report healthy");
                issues += 1;
            }
            Err(e) => {
                println!("  ❌ Endpoint check failed: {e}");
                issues += 1;
            }
        }
    } else {
        println!("  ⚠️  No API key configured. Set STOREPILOT_API_KEY or add api_key to config.toml");
        issues += 1;
    }

    println!();
    if issues == 0 {
        println!("  🎉 All checks passed!");
    } else {
        println!("  ⚠️  {issues} issue(s) found. See above for details.");
    }

    Ok(())
}
