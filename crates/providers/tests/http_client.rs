//! HTTP-level tests for the OpenAI-compatible client against a local axum server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use storepilot_core::error::InferenceError;
use storepilot_core::inference::{InferenceBackend, ModelRequest, PromptMessage, RawModelOutput};
use storepilot_providers::OpenAiCompatClient;

// ── Fake endpoint ────────────────────────────────────────────────────────

async fn echo(headers: HeaderMap, Json(body): Json<Value>) -> Json<Value> {
    let seen = json!({
        "auth": headers.get("authorization").and_then(|v| v.to_str().ok()),
        "model": body["model"],
        "response_format": body.get("response_format"),
        "roles": body["messages"]
            .as_array()
            .map(|msgs| msgs.iter().map(|m| m["role"].clone()).collect::<Vec<_>>()),
    });
    Json(json!({ "choices": [{ "message": { "content": seen.to_string() } }] }))
}

async fn counted_failure(State(hits): State<Arc<AtomicUsize>>) -> (StatusCode, Json<Value>) {
    hits.fetch_add(1, Ordering::SeqCst);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": { "message": "boom" } })),
    )
}

async fn image_ok(Json(body): Json<Value>) -> Json<Value> {
    let ratio = body["aspectRatio"].as_str().unwrap_or("none").replace(':', "x");
    Json(json!({ "url": format!("https://cdn.example.com/{ratio}.png") }))
}

async fn spawn_endpoint() -> (String, Arc<AtomicUsize>) {
    let hits = Arc::new(AtomicUsize::new(0));

    let app = Router::new()
        .route(
            "/ok/chat/completions",
            post(|| async { Json(json!({ "choices": [{ "message": { "content": "hello" } }] })) }),
        )
        .route("/echo/chat/completions", post(echo))
        .route(
            "/quota/chat/completions",
            post(|| async {
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    Json(json!({ "error": { "message": "quota exceeded" } })),
                )
            }),
        )
        .route(
            "/bare/chat/completions",
            post(|| async { (StatusCode::BAD_GATEWAY, "upstream down") }),
        )
        .route(
            "/no-choices/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        )
        .route(
            "/null-content/chat/completions",
            post(|| async { Json(json!({ "choices": [{ "message": { "content": null } }] })) }),
        )
        .route(
            "/not-json/chat/completions",
            post(|| async { (StatusCode::OK, "definitely not json") }),
        )
        .route("/counted/chat/completions", post(counted_failure))
        .route("/images/ok", post(image_ok))
        .route(
            "/images/no-url",
            post(|| async { Json(json!({ "id": "job-1", "status": "queued" })) }),
        )
        .route(
            "/images/bad",
            post(|| async { (StatusCode::UNPROCESSABLE_ENTITY, "nope") }),
        )
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), hits)
}

fn client(base: &str, prefix: &str, image_path: &str) -> OpenAiCompatClient {
    OpenAiCompatClient::new(
        "test",
        format!("{base}/{prefix}"),
        format!("{base}{image_path}"),
        Some("sk-test".into()),
        Duration::from_secs(5),
    )
    .unwrap()
}

fn completion(structured: bool) -> ModelRequest {
    ModelRequest::Completion {
        model: "test-model".into(),
        messages: vec![PromptMessage::system("rules"), PromptMessage::user("hi")],
        structured_output: structured,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn returns_message_content() {
    let (base, _) = spawn_endpoint().await;
    let out = client(&base, "ok", "/images/ok")
        .invoke(&completion(false))
        .await
        .unwrap();
    assert_eq!(out, RawModelOutput::Text("hello".into()));
}

#[tokio::test]
async fn structured_requests_enable_json_mode() {
    let (base, _) = spawn_endpoint().await;
    let c = client(&base, "echo", "/images/ok");

    let RawModelOutput::Text(seen) = c.invoke(&completion(true)).await.unwrap() else {
        panic!("expected text output");
    };
    let seen: Value = serde_json::from_str(&seen).unwrap();
    assert_eq!(seen["response_format"]["type"], "json_object");
    assert_eq!(seen["auth"], "Bearer sk-test");
    assert_eq!(seen["model"], "test-model");
    assert_eq!(seen["roles"], json!(["system", "user"]));

    let RawModelOutput::Text(seen) = c.invoke(&completion(false)).await.unwrap() else {
        panic!("expected text output");
    };
    let seen: Value = serde_json::from_str(&seen).unwrap();
    assert!(seen["response_format"].is_null());
}

#[tokio::test]
async fn endpoint_error_uses_envelope_message() {
    let (base, _) = spawn_endpoint().await;
    let err = client(&base, "quota", "/images/ok")
        .invoke(&completion(false))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        InferenceError::Endpoint {
            status: 429,
            message: "quota exceeded".into()
        }
    );
}

#[tokio::test]
async fn endpoint_error_without_envelope_uses_status_text() {
    let (base, _) = spawn_endpoint().await;
    let err = client(&base, "bare", "/images/ok")
        .invoke(&completion(false))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        InferenceError::Endpoint {
            status: 502,
            message: "Bad Gateway".into()
        }
    );
}

#[tokio::test]
async fn missing_content_is_empty_response() {
    let (base, _) = spawn_endpoint().await;
    for prefix in ["no-choices", "null-content", "not-json"] {
        let err = client(&base, prefix, "/images/ok")
            .invoke(&completion(true))
            .await
            .unwrap_err();
        assert!(
            matches!(err, InferenceError::EmptyResponse(_)),
            "{prefix}: {err:?}"
        );
    }
}

#[tokio::test]
async fn failure_is_not_retried() {
    let (base, hits) = spawn_endpoint().await;
    let err = client(&base, "counted", "/images/ok")
        .invoke(&completion(false))
        .await
        .unwrap_err();
    assert!(matches!(err, InferenceError::Endpoint { status: 500, .. }));
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unreachable_endpoint_is_transport_error() {
    // Grab a free port, then close it so nothing is listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let base = format!("http://{addr}");
    let err = client(&base, "v1", "/images/ok")
        .invoke(&completion(false))
        .await
        .unwrap_err();
    assert!(matches!(err, InferenceError::Transport(_)), "{err:?}");
}

#[tokio::test]
async fn image_returns_url() {
    let (base, _) = spawn_endpoint().await;
    let out = client(&base, "ok", "/images/ok")
        .invoke(&ModelRequest::Image {
            prompt: "a kettle".into(),
            aspect_ratio: Some("16:9".into()),
        })
        .await
        .unwrap();
    assert_eq!(
        out,
        RawModelOutput::ImageUrl("https://cdn.example.com/16x9.png".into())
    );
}

#[tokio::test]
async fn image_without_url_is_empty_response() {
    let (base, _) = spawn_endpoint().await;
    let err = client(&base, "ok", "/images/no-url")
        .invoke(&ModelRequest::Image {
            prompt: "a kettle".into(),
            aspect_ratio: None,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, InferenceError::EmptyResponse(_)));
}

#[tokio::test]
async fn image_failure_is_endpoint_error() {
    let (base, _) = spawn_endpoint().await;
    let err = client(&base, "ok", "/images/bad")
        .invoke(&ModelRequest::Image {
            prompt: "a kettle".into(),
            aspect_ratio: None,
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        InferenceError::Endpoint {
            status: 422,
            message: "Unprocessable Entity".into()
        }
    );
}
