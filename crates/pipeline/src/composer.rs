//! Prompt composition.
//!
//! Turns an intent plus its grounding context into a single [`ModelRequest`].
//! Composition is pure: the same inputs always produce byte-identical output,
//! which is why every map in the context is a `BTreeMap`.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use storepilot_core::context::{GroundingContext, ProductAttributes};
use storepilot_core::inference::{ModelRequest, PromptMessage};
use storepilot_core::intent::{ChatIntent, CopyIntent, ForecastIntent, ImageIntent, Intent};
use storepilot_core::series::DailyPoint;

const NAME_PLACEHOLDER: &str = "this product";
const CODE_PLACEHOLDER: &str = "N/A";
const PRICE_PLACEHOLDER: &str = "see the product page";
const CONFIGURATION_PLACEHOLDER: &str = "standard configuration";
const FULFILLMENT_PLACEHOLDER: &str = "standard shipping";

const CHAT_SYSTEM: &str = "You are a friendly, accurate customer-service agent for an online store. \
Answer only from the product facts and store policy below. \
If the facts do not cover the question, say so and offer to check with a colleague.";

const FORECAST_SYSTEM: &str = "You are a retail demand analyst. \
Respond with a single JSON object and nothing else, shaped exactly as: \
{\"summary\": string, \"analysis\": string, \"forecast\": [{\"date\": \"YYYY-MM-DD\", \"predicted_sales\": number}]}. \
Return an empty forecast array if the history does not support a forecast.";

const COPY_SCHEMA: &str = "Respond with a single JSON object and nothing else, shaped exactly as: \
{\"headline\": string, \"copy\": string, \"visualHooks\": string, \"keywords\": [string]}.";

const LIFESTYLE_TONE: &str = "Write in an expressive, personal voice with short lines and fitting emoji, \
like a genuine user sharing a discovery.";

const MARKETPLACE_TONE: &str = "Write in a formal, authoritative voice focused on specifications, \
guarantees and trust. Do not use emoji.";

/// Builds model requests for every intent.
#[derive(Debug, Clone)]
pub struct PromptComposer {
    model: String,
}

impl PromptComposer {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Compose the request for `intent`. Never performs I/O.
    pub fn compose(&self, intent: &Intent, context: &GroundingContext) -> ModelRequest {
        match intent {
            Intent::Chat(chat) => self.compose_chat(chat, context),
            Intent::Forecast(forecast) => self.compose_forecast(forecast, context),
            Intent::Copy(copy) => self.compose_copy(copy, context),
            Intent::Image(image) => compose_image(image, &context.product),
        }
    }

    fn compose_chat(&self, chat: &ChatIntent, context: &GroundingContext) -> ModelRequest {
        let mut system = String::from(CHAT_SYSTEM);
        system.push_str("\n\n");
        system.push_str(&product_block(&context.product));

        if let Some(entry) = &context.matched_knowledge {
            let _ = write!(system, "\n\nStore policy:\n{}", entry.answer);
        }

        let mut user = chat.question.clone();
        push_parameters(&mut user, &context.user_parameters);

        self.completion(system, user, false)
    }

    fn compose_forecast(&self, forecast: &ForecastIntent, context: &GroundingContext) -> ModelRequest {
        let series = context.series.as_deref().unwrap_or_default();
        let spec = non_empty(&forecast.spec).unwrap_or(CONFIGURATION_PLACEHOLDER);
        let factors = non_empty(&forecast.factors).unwrap_or("none");

        let mut user = String::new();
        let _ = writeln!(user, "Product identifier: {}", forecast.identifier);
        let _ = writeln!(user, "Model / spec: {spec}");
        let _ = writeln!(user, "Daily sales history: {}", series_json(series));
        let _ = writeln!(user, "External factors: {factors}");
        let _ = write!(
            user,
            "Forecast the next {} day(s) of sales, one entry per day.",
            forecast.horizon_days
        );
        push_parameters(&mut user, &context.user_parameters);

        self.completion(FORECAST_SYSTEM.to_string(), user, true)
    }

    fn compose_copy(&self, copy: &CopyIntent, context: &GroundingContext) -> ModelRequest {
        let tone = if copy.platform.is_lifestyle() {
            LIFESTYLE_TONE
        } else {
            MARKETPLACE_TONE
        };
        let system = format!(
            "You are a senior e-commerce copywriter for {}. {tone}\n{COPY_SCHEMA}",
            copy.platform.display_name()
        );

        let mut user = product_block(&context.product);
        let _ = write!(
            user,
            "\n\nStrategy: {}. {}",
            copy.strategy,
            copy.strategy.guidance()
        );
        push_parameters(&mut user, &context.user_parameters);

        self.completion(system, user, true)
    }

    fn completion(&self, system: String, user: String, structured_output: bool) -> ModelRequest {
        ModelRequest::Completion {
            model: self.model.clone(),
            messages: vec![PromptMessage::system(system), PromptMessage::user(user)],
            structured_output,
        }
    }
}

fn compose_image(image: &ImageIntent, product: &ProductAttributes) -> ModelRequest {
    let subject = product.name.as_deref().unwrap_or(NAME_PLACEHOLDER);
    let mut prompt = format!(
        "Product photograph of {subject}, {}, {}, aspect ratio {}",
        image.scene.descriptor(),
        image.lighting.descriptor(),
        image.aspect_ratio
    );
    if let Some(details) = non_empty(&image.details) {
        let _ = write!(prompt, ", {details}");
    }

    ModelRequest::Image {
        prompt,
        aspect_ratio: Some(image.aspect_ratio.as_str().to_string()),
    }
}

fn product_block(product: &ProductAttributes) -> String {
    let field = |v: &Option<String>, placeholder: &'static str| -> String {
        v.as_deref().and_then(non_empty).unwrap_or(placeholder).to_string()
    };

    let mut block = String::from("Product facts:\n");
    let _ = writeln!(block, "- Name: {}", field(&product.name, NAME_PLACEHOLDER));
    let _ = writeln!(block, "- Code: {}", field(&product.code, CODE_PLACEHOLDER));
    let _ = writeln!(block, "- Price: {}", field(&product.price, PRICE_PLACEHOLDER));
    let _ = writeln!(
        block,
        "- Configuration: {}",
        field(&product.configuration, CONFIGURATION_PLACEHOLDER)
    );
    let _ = write!(
        block,
        "- Fulfillment: {}",
        field(&product.fulfillment, FULFILLMENT_PLACEHOLDER)
    );
    for (key, value) in &product.extra {
        let _ = write!(block, "\n- {key}: {value}");
    }
    block
}

fn push_parameters(out: &mut String, parameters: &BTreeMap<String, String>) {
    if parameters.is_empty() {
        return;
    }
    out.push_str("\n\nAdditional parameters:");
    for (key, value) in parameters {
        let _ = write!(out, "\n- {key}: {value}");
    }
}

/// `[{"date": .., "sales": ..}]` in series order.
fn series_json(series: &[DailyPoint]) -> String {
    let items: Vec<serde_json::Value> = series
        .iter()
        .map(|p| serde_json::json!({ "date": p.date, "sales": p.value }))
        .collect();
    serde_json::Value::Array(items).to_string()
}

fn non_empty(s: &str) -> Option<&str> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
