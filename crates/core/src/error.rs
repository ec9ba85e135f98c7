//! Error types for the StorePilot domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error type; [`Error`] wraps them all.

use thiserror::Error;

use crate::state::RequestState;

/// The top-level error type for all StorePilot operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Aggregation ---
    #[error(transparent)]
    History(#[from] InsufficientHistory),

    // --- Inference endpoint ---
    #[error("Link interrupted: {0}")]
    Inference(#[from] InferenceError),

    // --- Response contract ---
    #[error("Model answered, but the answer is malformed: {0}")]
    Schema(#[from] SchemaViolation),

    // --- Knowledge base editing ---
    #[error("Knowledge base error: {0}")]
    Knowledge(#[from] KnowledgeError),

    // --- Persistence ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// The terminal pipeline state this failure corresponds to, if it came
    /// from the dispatch/validate half of a request.
    pub fn terminal_state(&self) -> Option<RequestState> {
        match self {
            Error::Inference(e) => Some(e.terminal_state()),
            Error::Schema(_) => Some(RequestState::FailedSchema),
            _ => None,
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Fewer distinct dates survived aggregation than the caller requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Insufficient history: {found} daily point(s) available, at least {required} required")]
pub struct InsufficientHistory {
    pub found: usize,
    pub required: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InferenceError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Endpoint returned {status}: {message}")]
    Endpoint { status: u16, message: String },

    #[error("Endpoint returned no usable content: {0}")]
    EmptyResponse(String),
}

impl InferenceError {
    pub fn terminal_state(&self) -> RequestState {
        match self {
            InferenceError::Transport(_) => RequestState::FailedTransport,
            InferenceError::Endpoint { .. } | InferenceError::EmptyResponse(_) => {
                RequestState::FailedEndpoint
            }
        }
    }
}

/// The model output does not satisfy the contract of the intent that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field `{field}`: {reason}")]
pub struct SchemaViolation {
    pub field: String,
    pub reason: String,
}

impl SchemaViolation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KnowledgeError {
    #[error("Entry id already exists: {0}")]
    DuplicateId(String),

    #[error("No entry with id: {0}")]
    UnknownId(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Failed to decode {what}: {reason}")]
    Decode { what: String, reason: String },
}
