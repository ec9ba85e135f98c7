pub mod chat;
pub mod copy;
pub mod doctor;
pub mod facts;
pub mod forecast;
pub mod image;
pub mod kb;
pub mod onboard;

use std::sync::Arc;

use clap::Args;
use storepilot_config::AppConfig;
use storepilot_core::context::{GroundingContext, ProductAttributes};
use storepilot_core::error::Error;
use storepilot_pipeline::{Pipeline, PromptComposer, ResponseValidator};
use storepilot_providers::OpenAiCompatClient;
use storepilot_store::FileStore;
use tracing::debug;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Live product data passed on the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct ProductArgs {
    /// Product name
    #[arg(long)]
    pub name: Option<String>,

    /// Product code / SKU
    #[arg(long)]
    pub code: Option<String>,

    /// Current price
    #[arg(long)]
    pub price: Option<String>,

    /// Configuration or variant description
    #[arg(long)]
    pub configuration: Option<String>,

    /// Fulfillment mode (e.g. "ships in 48h", "pre-order")
    #[arg(long)]
    pub fulfillment: Option<String>,

    /// Extra attribute, repeatable: --attr color=white
    #[arg(long = "attr", value_parser = parse_key_value)]
    pub attrs: Vec<(String, String)>,
}

impl ProductArgs {
    pub fn into_attributes(self) -> ProductAttributes {
        ProductAttributes {
            name: self.name,
            code: self.code,
            price: self.price,
            configuration: self.configuration,
            fulfillment: self.fulfillment,
            extra: self.attrs.into_iter().collect(),
        }
    }
}

/// Parse `key=value`.
pub fn parse_key_value(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

pub fn load_config() -> Result<AppConfig, Box<dyn std::error::Error>> {
    Ok(AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?)
}

pub fn open_store(config: &AppConfig) -> FileStore {
    FileStore::new(config.store.resolved_data_dir())
}

/// Build the pipeline against the configured endpoint.
pub fn build_pipeline(config: &AppConfig) -> Result<Pipeline, Box<dyn std::error::Error>> {
    if !config.has_api_key() {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set STOREPILOT_API_KEY (or OPENAI_API_KEY), or add api_key to:");
        eprintln!("    {}", AppConfig::config_dir().join("config.toml").display());
        eprintln!();
        return Err("No API key found. See above for setup instructions.".into());
    }

    let client = OpenAiCompatClient::from_config(config)?;
    debug!(
        base_url = %config.endpoint.base_url,
        model = %config.endpoint.model,
        timeout_secs = config.endpoint.timeout_secs,
        "Inference client ready"
    );
    Ok(Pipeline::new(
        Arc::new(client),
        PromptComposer::new(&config.endpoint.model),
        ResponseValidator::new(&config.chat.fallback_message),
    )
    .with_min_points(config.forecast.min_points))
}

pub fn context_with_parameters(
    product: ProductAttributes,
    params: Vec<(String, String)>,
) -> GroundingContext {
    params
        .into_iter()
        .fold(GroundingContext::new(product), |ctx, (k, v)| {
            ctx.with_parameter(k, v)
        })
}

/// Print an operator-facing hint for a failed request.
pub fn report(err: &Error) {
    let hint = match err {
        Error::History(_) => "Widen the date range with --start/--end or import more facts.",
        Error::Inference(_) => {
            "The endpoint could not be reached or refused the request. Run `storepilot doctor`."
        }
        Error::Schema(_) => "The model replied in an unexpected format. Try again.",
        _ => return,
    };
    eprintln!("  ❌ {err}");
    eprintln!("     {hint}");
}
