//! Insight generation and display handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use tracing::warn;

use crate::{AppError, AppState};
use spendsight_core::{Error, InsightView};

/// Policy for the generated document: scripts run, but in an opaque origin
const FRAME_CSP: &str = "sandbox allow-scripts";

/// Publishes a failed status if the generation future is dropped before it
/// records an outcome
struct PendingGeneration<'a> {
    state: &'a AppState,
    settled: bool,
}

impl Drop for PendingGeneration<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Insight generation cancelled before completion");
            self.state.session().abandon_generation();
        }
    }
}

/// Run one generation against the current ledger and record the outcome
///
/// The session lock is released before the remote call and re-taken to
/// record the result, while the busy guard is held across the whole call.
async fn run_generation(state: &AppState) -> Result<InsightView, Error> {
    let (guard, total_spent, summary) = {
        let mut session = state.session();
        if session.ledger().is_empty() {
            return Err(Error::EmptyLedger);
        }
        let guard = state.requester.try_acquire()?;
        session.begin_generation();
        (
            guard,
            session.ledger().total_spent(),
            session.ledger().summary().clone(),
        )
    };
    let mut pending = PendingGeneration {
        state,
        settled: false,
    };

    let result = state
        .requester
        .request_with_guard(&guard, total_spent, &summary)
        .await;
    pending.settled = true;

    let mut session = state.session();
    match result {
        Ok(document) => {
            session.record_insight(document);
            Ok(session.insight_view())
        }
        Err(e) => {
            session.record_failure(&e);
            Err(e)
        }
    }
}

/// POST /api/insights - Generate a new insight document
///
/// 400 when the ledger is empty, 409 while another request is in flight,
/// 502 when the AI backend fails.
pub async fn generate_insight(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InsightView>, AppError> {
    run_generation(&state)
        .await
        .map(Json)
        .map_err(AppError::from_insight)
}

/// POST /insights/generate - Form submission from the dashboard page
///
/// Outcomes are shown on the page through the insight status.
pub async fn submit_generate_form(State(state): State<Arc<AppState>>) -> Redirect {
    if let Err(e) = run_generation(&state).await {
        warn!(error = %e, "Insight generation from dashboard did not complete");
    }
    Redirect::to("/")
}

/// GET /api/insights - Current insight state
pub async fn get_insight(
    State(state): State<Arc<AppState>>,
) -> Result<Json<InsightView>, AppError> {
    Ok(Json(state.session().insight_view()))
}

/// GET /insights/frame/:key - The current document, sandboxed
///
/// Only the current render key resolves; older keys are gone for good.
pub async fn insight_frame(
    State(state): State<Arc<AppState>>,
    Path(key): Path<u64>,
) -> Result<Response, AppError> {
    let html = state
        .session()
        .frame_document(key)
        .map(str::to_string)
        .ok_or_else(|| AppError::not_found("No insight document for this key"))?;

    let mut response = Html(html).into_response();
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(FRAME_CSP),
    );
    Ok(response)
}
