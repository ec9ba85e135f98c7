//! OpenAI-compatible inference client.
//!
//! Works with: OpenAI, DeepSeek, Qwen (DashScope compatible mode), Ollama,
//! vLLM, and any endpoint exposing `/chat/completions`. Image synthesis goes to
//! a separate endpoint that takes `{prompt, aspectRatio}` and answers `{url}`.
//!
//! Failure classification:
//! - request never got a response → [`InferenceError::Transport`]
//! - non-2xx → [`InferenceError::Endpoint`], message taken from the
//!   `{"error": {"message": ...}}` envelope when present
//! - 2xx without usable content → [`InferenceError::EmptyResponse`]
//!
//! Exactly one HTTP request is sent per `invoke`. Retrying is the caller's call.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use storepilot_config::AppConfig;
use storepilot_core::error::{Error, InferenceError};
use storepilot_core::inference::{InferenceBackend, ModelRequest, PromptMessage, RawModelOutput, Role};
use tracing::{debug, warn};

/// An OpenAI-compatible inference client.
pub struct OpenAiCompatClient {
    name: String,
    base_url: String,
    image_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl OpenAiCompatClient {
    /// Create a new client.
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        image_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("Failed to create HTTP client: {e}"),
            })?;

        Ok(Self {
            name: name.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            image_url: image_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
            client,
        })
    }

    /// Build a client from the `[endpoint]` section of the configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        Self::new(
            "openai_compat",
            &config.endpoint.base_url,
            &config.endpoint.image_url,
            config.api_key.clone(),
            Duration::from_secs(config.endpoint.timeout_secs),
        )
    }

    /// Convert prompt messages to the OpenAI wire format.
    fn to_api_messages(messages: &[PromptMessage]) -> Vec<ApiMessage> {
        messages
            .iter()
            .map(|m| ApiMessage {
                role: match m.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                },
                content: m.content.clone(),
            })
            .collect()
    }

    /// Build the `/chat/completions` body.
    fn completion_body(model: &str, messages: &[PromptMessage], structured: bool) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model": model,
            "messages": Self::to_api_messages(messages),
            "stream": false,
        });

        if structured {
            body["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        body
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        let builder = self
            .client
            .post(url)
            .header("Content-Type", "application/json");
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {key}")),
            None => builder,
        }
    }

    /// Send the request and turn any non-2xx status into an endpoint error.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<String, InferenceError> {
        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let message = endpoint_error_message(status, &error_body);
            warn!(provider = %self.name, status = status.as_u16(), message = %message, "Endpoint returned error");
            return Err(InferenceError::Endpoint {
                status: status.as_u16(),
                message,
            });
        }

        response
            .text()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))
    }

    async fn complete(
        &self,
        model: &str,
        messages: &[PromptMessage],
        structured: bool,
    ) -> Result<RawModelOutput, InferenceError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = Self::completion_body(model, messages, structured);

        debug!(provider = %self.name, model = %model, structured, "Sending completion request");

        let text = self.send(self.post(&url).json(&body)).await?;

        let api_response: ApiResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::EmptyResponse(format!("unreadable response body: {e}")))?;

        let content = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| InferenceError::EmptyResponse("no choices in response".into()))?
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| InferenceError::EmptyResponse("choice has no message content".into()))?;

        Ok(RawModelOutput::Text(content))
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: Option<&str>,
    ) -> Result<RawModelOutput, InferenceError> {
        let body = ImageApiRequest {
            prompt,
            aspect_ratio,
        };

        debug!(provider = %self.name, aspect_ratio = ?aspect_ratio, "Sending image request");

        let text = self.send(self.post(&self.image_url).json(&body)).await?;

        let api_response: ImageApiResponse = serde_json::from_str(&text)
            .map_err(|e| InferenceError::EmptyResponse(format!("unreadable image response: {e}")))?;

        match api_response.url {
            Some(url) if !url.trim().is_empty() => Ok(RawModelOutput::ImageUrl(url)),
            _ => Err(InferenceError::EmptyResponse("image response has no url".into())),
        }
    }
}

#[async_trait]
impl InferenceBackend for OpenAiCompatClient {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, request: &ModelRequest) -> Result<RawModelOutput, InferenceError> {
        match request {
            ModelRequest::Completion {
                model,
                messages,
                structured_output,
            } => self.complete(model, messages, *structured_output).await,
            ModelRequest::Image {
                prompt,
                aspect_ratio,
            } => self.generate_image(prompt, aspect_ratio.as_deref()).await,
        }
    }

    async fn health_check(&self) -> Result<bool, InferenceError> {
        let url = format!("{}/models", self.base_url);
        let mut builder = self.client.get(&url);
        if let Some(key) = &self.api_key {
            builder = builder.header("Authorization", format!("Bearer {key}"));
        }
        let response = builder
            .send()
            .await
            .map_err(|e| InferenceError::Transport(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

/// Pull a human-readable message out of an error body.
///
/// Prefers `{"error": {"message": "..."}}`, falls back to the status reason.
fn endpoint_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|env| env.error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown status")
                .to_string()
        })
}

// --- OpenAI API types (internal) ---

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    #[serde(default)]
    message: Option<ApiChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ApiChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

// --- Image API types ---

#[derive(Debug, Serialize)]
struct ImageApiRequest<'a> {
    prompt: &'a str,
    #[serde(rename = "aspectRatio", skip_serializing_if = "Option::is_none")]
    aspect_ratio: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ImageApiResponse {
    #[serde(default)]
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_default_config() {
        let client = OpenAiCompatClient::from_config(&AppConfig::default()).unwrap();
        assert_eq!(client.name(), "openai_compat");
        assert!(client.base_url.contains("api.openai.com"));
        assert!(client.api_key.is_none());
    }

    #[test]
    fn trailing_slash_trimmed() {
        let client = OpenAiCompatClient::new(
            "t",
            "http://localhost:11434/v1/",
            "http://localhost/img",
            Some(String::new()),
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(client.base_url, "http://localhost:11434/v1");
        assert!(client.api_key.is_none(), "empty key is treated as absent");
    }

    #[test]
    fn message_conversion() {
        let messages = vec![PromptMessage::system("rules"), PromptMessage::user("question")];
        let api = OpenAiCompatClient::to_api_messages(&messages);
        assert_eq!(api.len(), 2);
        assert_eq!(api[0].role, "system");
        assert_eq!(api[1].role, "user");
        assert_eq!(api[1].content, "question");
    }

    #[test]
    fn structured_body_requests_json_mode() {
        let body = OpenAiCompatClient::completion_body("m", &[PromptMessage::user("x")], true);
        assert_eq!(body["response_format"]["type"], "json_object");
        assert_eq!(body["stream"], false);

        let body = OpenAiCompatClient::completion_body("m", &[PromptMessage::user("x")], false);
        assert!(body.get("response_format").is_none());
    }

    #[test]
    fn error_message_from_envelope() {
        let msg = endpoint_error_message(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"quota exceeded","type":"insufficient_quota"}}"#,
        );
        assert_eq!(msg, "quota exceeded");
    }

    #[test]
    fn error_message_falls_back_to_status_text() {
        assert_eq!(
            endpoint_error_message(StatusCode::BAD_GATEWAY, "<html>oops</html>"),
            "Bad Gateway"
        );
        assert_eq!(
            endpoint_error_message(StatusCode::INTERNAL_SERVER_ERROR, r#"{"error":{"message":""}}"#),
            "Internal Server Error"
        );
        assert_eq!(
            endpoint_error_message(StatusCode::NOT_FOUND, r#"{"error":"plain string"}"#),
            "Not Found"
        );
    }

    #[test]
    fn parse_response_without_content() {
        let parsed: ApiResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(parsed.choices[0].message.as_ref().unwrap().content.is_none());

        let parsed: ApiResponse = serde_json::from_str(r#"{"id":"x"}"#).unwrap();
        assert!(parsed.choices.is_empty());
    }

    #[test]
    fn image_request_body_shape() {
        let body = serde_json::to_value(ImageApiRequest {
            prompt: "kettle",
            aspect_ratio: Some("3:4"),
        })
        .unwrap();
        assert_eq!(body["prompt"], "kettle");
        assert_eq!(body["aspectRatio"], "3:4");

        let body = serde_json::to_value(ImageApiRequest {
            prompt: "kettle",
            aspect_ratio: None,
        })
        .unwrap();
        assert!(body.get("aspectRatio").is_none());
    }
}
