//! Health check handler

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use spendsight_core::AIBackend;

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub ai_backend: &'static str,
    pub ai_model: String,
}

/// GET /api/health - Liveness plus the configured AI backend
///
/// Does not call the backend; use `spendsight ai test` for that.
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let client = state.requester.client();
    Json(HealthResponse {
        status: "ok",
        ai_backend: client.kind(),
        ai_model: client.model().to_string(),
    })
}
