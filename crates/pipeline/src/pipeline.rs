//! The grounded generation pipeline.
//!
//! Every request follows the same path:
//!
//! 1. **Ground**: match a knowledge entry (chat) or aggregate history (forecast)
//! 2. **Compose** the model request from the intent and its context
//! 3. **Dispatch** exactly once to the inference backend
//! 4. **Validate** the raw output against the intent's contract
//!
//! Each lifecycle transition is logged under a per-request span. Failures are
//! terminal; nothing is retried.

use std::sync::Arc;

use storepilot_core::context::{GroundingContext, ProductAttributes};
use storepilot_core::error::{Error, SchemaViolation};
use storepilot_core::inference::InferenceBackend;
use storepilot_core::intent::{ChatIntent, CopyIntent, ForecastIntent, ImageIntent, Intent};
use storepilot_core::knowledge::KnowledgeEntry;
use storepilot_core::result::{CopyResult, ForecastResult, ImageResult, ValidatedResult};
use storepilot_core::series::FactRow;
use storepilot_core::state::RequestState;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::aggregator::aggregate;
use crate::composer::PromptComposer;
use crate::matcher::match_entry;
use crate::validator::ResponseValidator;

pub const DEFAULT_MIN_POINTS: usize = 7;

/// Inclusive date range, `YYYY-MM-DD` on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// Wires matcher, aggregator, composer, backend, and validator together.
pub struct Pipeline {
    backend: Arc<dyn InferenceBackend>,
    composer: PromptComposer,
    validator: ResponseValidator,
    min_points: usize,
}

impl Pipeline {
    pub fn new(
        backend: Arc<dyn InferenceBackend>,
        composer: PromptComposer,
        validator: ResponseValidator,
    ) -> Self {
        Self {
            backend,
            composer,
            validator,
            min_points: DEFAULT_MIN_POINTS,
        }
    }

    /// Minimum number of distinct dates a forecast needs.
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Compose, dispatch, and validate one request.
    pub async fn run(
        &self,
        intent: &Intent,
        context: &GroundingContext,
    ) -> Result<ValidatedResult, Error> {
        let span = info_span!(
            "request",
            id = %uuid::Uuid::new_v4(),
            intent = intent.name(),
            backend = self.backend.name(),
        );
        self.execute(intent, context).instrument(span).await
    }

    async fn execute(
        &self,
        intent: &Intent,
        context: &GroundingContext,
    ) -> Result<ValidatedResult, Error> {
        let request = self.composer.compose(intent, context);
        let mut lifecycle = Lifecycle::start();

        lifecycle.advance(RequestState::Dispatched);
        let raw = match self.backend.invoke(&request).await {
            Ok(raw) => raw,
            Err(e) => {
                lifecycle.advance(e.terminal_state());
                warn!(error = %e, "Inference request failed");
                return Err(e.into());
            }
        };
        lifecycle.advance(RequestState::Received);

        match self.validator.validate(intent, raw) {
            Ok(result) => {
                lifecycle.advance(RequestState::Validated);
                Ok(result)
            }
            Err(violation) => {
                lifecycle.advance(RequestState::FailedSchema);
                warn!(field = %violation.field, reason = %violation.reason, "Model output rejected");
                Err(violation.into())
            }
        }
    }

    /// Answer a customer question, grounded in the best-matching entry.
    pub async fn chat(
        &self,
        question: &str,
        product: ProductAttributes,
        knowledge: &[KnowledgeEntry],
    ) -> Result<String, Error> {
        let matched = match_entry(question, knowledge).cloned();
        match &matched {
            Some(entry) => debug!(entry = %entry.id, "Knowledge entry matched"),
            None => debug!("No knowledge entry matched; answering ungrounded"),
        }

        let intent = Intent::Chat(ChatIntent {
            question: question.to_string(),
        });
        let context = GroundingContext::new(product).with_knowledge(matched);

        match self.run(&intent, &context).await? {
            ValidatedResult::Text { text } => Ok(text),
            other => Err(unexpected(&other)),
        }
    }

    /// Generate platform-specific marketing copy.
    pub async fn copy(
        &self,
        intent: CopyIntent,
        context: GroundingContext,
    ) -> Result<CopyResult, Error> {
        match self.run(&Intent::Copy(intent), &context).await? {
            ValidatedResult::Copy(copy) => Ok(copy),
            other => Err(unexpected(&other)),
        }
    }

    /// Forecast sales for `intent.identifier` from the rows in `range`.
    ///
    /// Fails with insufficient history before any request is sent.
    pub async fn forecast(
        &self,
        intent: ForecastIntent,
        rows: &[FactRow],
        range: &DateRange,
        context: GroundingContext,
    ) -> Result<ForecastResult, Error> {
        let series = aggregate(
            rows,
            &intent.identifier,
            &range.start,
            &range.end,
            self.min_points,
        )?;
        let context = context.with_series(series);

        match self.run(&Intent::Forecast(intent), &context).await? {
            ValidatedResult::Forecast(forecast) => {
                info!(
                    points = forecast.forecast.len(),
                    total = forecast.total_predicted_sales(),
                    "Forecast ready"
                );
                Ok(forecast)
            }
            other => Err(unexpected(&other)),
        }
    }

    /// Synthesize a product photograph.
    pub async fn image(
        &self,
        intent: ImageIntent,
        product: ProductAttributes,
    ) -> Result<ImageResult, Error> {
        let context = GroundingContext::new(product);
        match self.run(&Intent::Image(intent), &context).await? {
            ValidatedResult::Image(image) => Ok(image),
            other => Err(unexpected(&other)),
        }
    }
}

fn unexpected(result: &ValidatedResult) -> Error {
    let kind = match result {
        ValidatedResult::Text { .. } => "text",
        ValidatedResult::Copy(_) => "copy",
        ValidatedResult::Forecast(_) => "forecast",
        ValidatedResult::Image(_) => "image",
    };
    SchemaViolation::new("$", format!("unexpected {kind} result")).into()
}

/// Tracks and logs the state of one request.
struct Lifecycle {
    state: RequestState,
}

impl Lifecycle {
    fn start() -> Self {
        debug!(state = %RequestState::Composed, "Request composed");
        Self {
            state: RequestState::Composed,
        }
    }

    fn advance(&mut self, next: RequestState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {} -> {next}",
            self.state
        );
        if next.is_terminal() {
            info!(from = %self.state, to = %next, "Request finished");
        } else {
            debug!(from = %self.state, to = %next, "Request state changed");
        }
        self.state = next;
    }
}
