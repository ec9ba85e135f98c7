//! Grounded generation pipeline for StorePilot.
//!
//! - [`matcher`]: knowledge lookup for chat questions
//! - [`aggregator`]: fact rows to a daily sales series
//! - [`composer`]: intent plus context to a model request
//! - [`validator`]: raw model output to a typed result
//! - [`pipeline`]: the orchestrator that runs them in order

pub mod aggregator;
pub mod composer;
pub mod matcher;
pub mod pipeline;
pub mod validator;

#[cfg(test)]
mod test_helpers;

pub use aggregator::aggregate;
pub use composer::PromptComposer;
pub use matcher::match_entry;
pub use pipeline::{DEFAULT_MIN_POINTS, DateRange, Pipeline};
pub use validator::ResponseValidator;
