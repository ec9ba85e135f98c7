//! `storepilot copy`: Generate platform marketing copy.

use storepilot_core::intent::{CopyIntent, Platform, Strategy};

use super::{CmdResult, ProductArgs, build_pipeline, context_with_parameters, load_config, report};

pub async fn run(
    platform: Platform,
    strategy: Strategy,
    product: ProductArgs,
    params: Vec<(String, String)>,
    json: bool,
) -> CmdResult {
    let config = load_config()?;
    let pipeline = build_pipeline(&config)?;
    let context = context_with_parameters(product.into_attributes(), params);

    let copy = pipeline
        .copy(CopyIntent { platform, strategy }, context)
        .await
        .inspect_err(report)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&copy)?);
        return Ok(());
    }

    println!("✍️  {} / {strategy}", platform.display_name());
    println!("================================\n");
    println!("  Headline: {}\n", copy.headline);
    for line in copy.copy.lines() {
        println!("  {line}");
    }
    println!("\n  Visual hooks: {}", copy.visual_hooks);
    if !copy.keywords.is_empty() {
        println!("  Keywords:     {}", copy.keywords.join(", "));
    }
    Ok(())
}
