//! Test utilities for spendsight-core
//!
//! This module provides testing infrastructure including a mock AI server
//! (Gemini, Ollama or OpenAI-compatible) that can be used for development and
//! integration tests.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::sync::oneshot;

/// Canned dashboard returned by default, wrapped in a code fence like real models do
pub const SAMPLE_DASHBOARD_RESPONSE: &str = "Here is your dashboard:\n```html\n<!DOCTYPE html>\n<html>\n<head><script src=\"https://cdn.jsdelivr.net/npm/chart.js\"></script></head>\n<body><h1>AI Finance Dashboard</h1></body>\n</html>\n```\n";

/// What the mock server answers to a generation request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// 200 carrying this text
    Text(String),
    /// 500 with an error body
    ServerError,
    /// 200 with an empty completion
    Empty,
    /// 200 with no candidates and a SAFETY block reason (Gemini)
    NoCandidates,
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    calls: Arc<AtomicUsize>,
}

/// Mock AI server for testing and development
///
/// Speaks one backend's wire protocol, chosen by the constructor.
pub struct MockAIServer {
    addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockAIServer {
    /// Gemini `generateContent` plus the model metadata endpoint
    pub async fn gemini(reply: MockReply) -> Self {
        Self::spawn(reply, |router| {
            router.route(
                "/v1beta/models/:model",
                get(handle_get_model).post(handle_gemini_generate),
            )
        })
        .await
    }

    /// Ollama `/api/generate` and `/api/tags`
    pub async fn ollama(reply: MockReply) -> Self {
        Self::spawn(reply, |router| {
            router
                .route("/api/generate", post(handle_ollama_generate))
                .route("/api/tags", get(handle_ollama_tags))
        })
        .await
    }

    /// OpenAI-compatible `/v1/chat/completions` and `/v1/models`
    pub async fn openai(reply: MockReply) -> Self {
        Self::spawn(reply, |router| {
            router
                .route("/v1/chat/completions", post(handle_chat_completions))
                .route("/v1/models", get(handle_list_models))
        })
        .await
    }

    async fn spawn(
        reply: MockReply,
        routes: impl FnOnce(Router<MockState>) -> Router<MockState>,
    ) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let state = MockState {
            reply,
            calls: calls.clone(),
        };

        let app = routes(Router::new()).with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            calls,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of generation calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockAIServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": {"code": 500, "message": "internal"}})),
    )
        .into_response()
}

/// Text to put in a 200 reply; `None` for the error variant
fn reply_text(reply: &MockReply) -> Option<&str> {
    match reply {
        MockReply::Text(text) => Some(text.as_str()),
        MockReply::Empty | MockReply::NoCandidates => Some(""),
        MockReply::ServerError => None,
    }
}

fn has_api_key(headers: &HeaderMap) -> bool {
    headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| !v.is_empty())
}

fn unauthorized() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({"error": {"code": 403, "message": "API key missing"}})),
    )
        .into_response()
}

/// Model metadata endpoint (health check)
async fn handle_get_model(Path(model): Path<String>, headers: HeaderMap) -> Response {
    if !has_api_key(&headers) {
        return unauthorized();
    }
    Json(json!({
        "name": format!("models/{}", model),
        "displayName": model,
    }))
    .into_response()
}

/// generateContent endpoint (`/v1beta/models/{model}:generateContent`)
async fn handle_gemini_generate(
    State(state): State<MockState>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
) -> Response {
    if !model_action.ends_with(":generateContent") {
        return StatusCode::NOT_FOUND.into_response();
    }
    if !has_api_key(&headers) {
        return unauthorized();
    }
    state.calls.fetch_add(1, Ordering::SeqCst);

    match state.reply {
        MockReply::Text(text) => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": text}]},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        MockReply::Empty => Json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": ""}]},
                "finishReason": "STOP"
            }]
        }))
        .into_response(),
        MockReply::ServerError => server_error(),
        MockReply::NoCandidates => Json(json!({
            "promptFeedback": {"blockReason": "SAFETY"}
        }))
        .into_response(),
    }
}

/// Ollama `/api/generate` (non-streaming)
async fn handle_ollama_generate(
    State(state): State<MockState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    match reply_text(&state.reply) {
        Some(text) => Json(json!({
            "model": body["model"],
            "response": text,
            "done": true
        }))
        .into_response(),
        None => server_error(),
    }
}

/// Ollama model list (health check)
async fn handle_ollama_tags() -> Json<serde_json::Value> {
    Json(json!({"models": [{"name": "llama3.2:latest"}]}))
}

/// OpenAI-compatible chat completion
async fn handle_chat_completions(
    State(state): State<MockState>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    match reply_text(&state.reply) {
        Some(text) => Json(json!({
            "id": "chatcmpl-mock",
            "object": "chat.completion",
            "model": body["model"],
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": text},
                "finish_reason": "stop"
            }]
        }))
        .into_response(),
        None => server_error(),
    }
}

/// OpenAI-compatible model list (health check)
async fn handle_list_models() -> Json<serde_json::Value> {
    Json(json!({"object": "list", "data": [{"id": "gpt-4o-mini", "object": "model"}]}))
}
