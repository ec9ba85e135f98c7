//! Inference backend trait: the abstraction over the generative endpoint.
//!
//! A backend knows how to send one composed [`ModelRequest`] and hand back the
//! raw output. It never validates content; that is the response validator's job.
//!
//! Implementations: the HTTP client in `storepilot-providers`, scripted
//! backends in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::InferenceError;

/// The role of a prompt message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions and grounding
    System,
    /// The operator's request
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// A fully composed request, independent of any wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelRequest {
    /// Text completion (chat, copy, forecast).
    Completion {
        model: String,
        messages: Vec<PromptMessage>,
        /// Ask the endpoint to constrain output to a JSON object.
        #[serde(default, rename = "structuredOutput", skip_serializing_if = "std::ops::Not::not")]
        structured_output: bool,
    },

    /// Image synthesis.
    Image {
        prompt: String,
        #[serde(default, rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
        aspect_ratio: Option<String>,
    },
}

impl ModelRequest {
    pub fn is_structured(&self) -> bool {
        matches!(
            self,
            ModelRequest::Completion {
                structured_output: true,
                ..
            }
        )
    }
}

/// What came back from the endpoint, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RawModelOutput {
    Text(String),
    ImageUrl(String),
}

/// The core inference trait.
///
/// One call is exactly one outbound request: implementations must not retry.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// A human-readable name for this backend (e.g. "openai", "scripted").
    fn name(&self) -> &str;

    async fn invoke(&self, request: &ModelRequest) -> Result<RawModelOutput, InferenceError>;

    /// Health check: can we reach the endpoint?
    async fn health_check(&self) -> Result<bool, InferenceError> {
        Ok(true)
    }
}
