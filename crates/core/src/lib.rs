//! # StorePilot Core
//!
//! Domain types, traits, and error definitions for the StorePilot grounded
//! generation pipeline. This crate has **no I/O dependencies**: it defines the
//! model that the pipeline, the inference client, and the stores implement
//! against.
//!
//! ## Layout
//!
//! - [`knowledge`] / [`series`]: the grounding data (knowledge entries, fact rows)
//! - [`context`] / [`intent`]: what a single request is asking for
//! - [`inference`]: the wire-neutral request/response and the backend trait
//! - [`result`] / [`state`]: validated outputs and the per-request state machine
//! - [`store`]: the persistence boundary

pub mod context;
pub mod error;
pub mod inference;
pub mod intent;
pub mod knowledge;
pub mod result;
pub mod series;
pub mod state;
pub mod store;

// Re-export key types at crate root for ergonomics
pub use context::{GroundingContext, ProductAttributes};
pub use error::{Error, InferenceError, InsufficientHistory, Result, SchemaViolation};
pub use inference::{InferenceBackend, ModelRequest, PromptMessage, RawModelOutput, Role};
pub use intent::{AspectRatio, Intent, Lighting, Platform, SceneStyle, Strategy};
pub use knowledge::{KnowledgeBase, KnowledgeEntry};
pub use result::{CopyResult, ForecastPoint, ForecastResult, ImageResult, ValidatedResult};
pub use series::{DailyPoint, FactRow};
pub use state::RequestState;
pub use store::{FactStore, KnowledgeStore};
