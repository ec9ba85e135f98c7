//! `storepilot image`: Synthesize a product photograph.

use storepilot_core::intent::{AspectRatio, ImageIntent, Lighting, SceneStyle};

use super::{CmdResult, ProductArgs, build_pipeline, load_config, report};

pub async fn run(
    scene: SceneStyle,
    lighting: Lighting,
    aspect_ratio: AspectRatio,
    details: Option<String>,
    product: ProductArgs,
) -> CmdResult {
    let config = load_config()?;
    let pipeline = build_pipeline(&config)?;

    let intent = ImageIntent {
        scene,
        lighting,
        aspect_ratio,
        details: details.unwrap_or_default(),
    };

    eprint!("  Rendering...");
    let image = pipeline.image(intent, product.into_attributes()).await;
    eprint!("\r              \r");

    let image = image.inspect_err(report)?;
    println!("🖼️  {}", image.url);
    Ok(())
}
