//! `storepilot chat`: Answer a customer question.

use storepilot_core::knowledge::KnowledgeBase;
use storepilot_core::store::KnowledgeStore;

use super::{CmdResult, ProductArgs, build_pipeline, load_config, open_store, report};

pub async fn run(question: String, product: ProductArgs) -> CmdResult {
    let config = load_config()?;
    let pipeline = build_pipeline(&config)?;
    let store = open_store(&config);

    let knowledge = KnowledgeBase::from_entries(store.load_knowledge_base().await?)?;

    eprint!("  Thinking...");
    let answer = pipeline
        .chat(&question, product.into_attributes(), knowledge.entries())
        .await;
    eprint!("\r              \r");

    let answer = answer.inspect_err(report)?;
    for line in answer.lines() {
        println!("  Assistant > {line}");
    }
    Ok(())
}
