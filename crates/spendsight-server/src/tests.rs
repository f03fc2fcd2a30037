//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use spendsight_core::{MockBackend, PromptId, PromptLibrary};
use std::time::Duration;
use tokio::sync::Semaphore;
use tower::ServiceExt;

fn setup_with(backend: MockBackend) -> (Router, Arc<AppState>) {
    let prompt = PromptLibrary::embedded_only()
        .get(PromptId::InsightDashboard)
        .unwrap()
        .clone();
    let state = Arc::new(AppState::new(
        DashboardConfig::default(),
        AIClient::Mock(backend),
        prompt,
        ServerConfig::default(),
    ));
    (create_router(state.clone()), state)
}

fn setup_test_app() -> Router {
    setup_with(MockBackend::new()).0
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn get_body_text(response: axum::response::Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn add(app: &Router, amount: serde_json::Value, category: &str) -> serde_json::Value {
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/expenses",
            serde_json::json!({"amount": amount, "category": category}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    get_body_json(response).await
}

// ========== Health ==========

#[tokio::test]
async fn test_health() {
    let app = setup_test_app();
    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["ai_backend"], "mock");
    assert_eq!(json["ai_model"], "mock");
}

// ========== Expense API Tests ==========

#[tokio::test]
async fn test_add_expense() {
    let app = setup_test_app();

    let json = add(&app, serde_json::json!(100), "Food").await;
    assert_eq!(json["added"], true);
    assert_eq!(json["expense_count"], 1);

    let json = add(&app, serde_json::json!("50"), "Rent").await;
    assert_eq!(json["added"], true);
    assert_eq!(json["expense_count"], 2);

    let response = app.oneshot(get("/api/expenses")).await.unwrap();
    let json = get_body_json(response).await;
    let expenses = json.as_array().unwrap();
    assert_eq!(expenses.len(), 2);
    assert_eq!(expenses[0]["category"], "Food");
    assert_eq!(expenses[1]["amount"], 50.0);
}

#[tokio::test]
async fn test_falsy_amount_not_added() {
    let app = setup_test_app();

    let json = add(&app, serde_json::json!(""), "Food").await;
    assert_eq!(json["added"], false);
    assert_eq!(json["expense_count"], 0);

    let json = add(&app, serde_json::json!(0), "Food").await;
    assert_eq!(json["added"], false);
    assert_eq!(json["expense_count"], 0);
}

#[tokio::test]
async fn test_summary_keeps_first_appearance_order() {
    let app = setup_test_app();
    add(&app, serde_json::json!(100), "Food").await;
    add(&app, serde_json::json!(50), "Rent").await;
    add(&app, serde_json::json!(25), "Food").await;

    let response = app.oneshot(get("/api/summary")).await.unwrap();
    let text = get_body_text(response).await;
    assert!(text.contains("\"categories\":{\"Food\":125,\"Rent\":50}"));

    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["total_spent"], 175.0);
    assert_eq!(json["monthly_income"], 50000.0);
    assert_eq!(json["category_count"], 2);
}

#[tokio::test]
async fn test_expense_form_redirects() {
    let (app, state) = setup_with(MockBackend::new());

    let response = app
        .oneshot(post_form("/expenses", "amount=100&category=Transport"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()["location"], "/");

    let session = state.session();
    assert_eq!(session.ledger().len(), 1);
    assert_eq!(session.form().amount, "");
    assert_eq!(session.form().category.as_str(), "Transport");
}

// ========== Insight API Tests ==========

#[tokio::test]
async fn test_generate_with_empty_ledger_rejected() {
    let backend = MockBackend::new();
    let (app, _state) = setup_with(backend.clone());

    let response = app
        .oneshot(post_json("/api/insights", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_generate_and_fetch_frame() {
    let app = setup_test_app();
    add(&app, serde_json::json!(100), "Food").await;

    let response = app
        .clone()
        .oneshot(post_json("/api/insights", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = get_body_json(response).await;
    assert_eq!(json["render_key"], 1);
    assert_eq!(json["status"]["state"], "ready");
    assert_eq!(json["document"]["model"], "mock");

    let response = app.clone().oneshot(get("/insights/frame/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-security-policy"],
        "sandbox allow-scripts"
    );
    let html = get_body_text(response).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<h1>AI Finance Dashboard</h1>"));

    let response = app.oneshot(get("/insights/frame/0")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_render_key_increments_per_generation() {
    let app = setup_test_app();
    add(&app, serde_json::json!(100), "Food").await;

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(post_json("/api/insights", serde_json::json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app.clone().oneshot(get("/api/insights")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["render_key"], 2);

    let stale = app.oneshot(get("/insights/frame/1")).await.unwrap();
    assert_eq!(stale.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_remote_failure_is_bad_gateway() {
    let (app, state) = setup_with(MockBackend::new().failing("quota exceeded for key abc"));
    add(&app, serde_json::json!(100), "Food").await;

    let response = app
        .clone()
        .oneshot(post_json("/api/insights", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = get_body_json(response).await;
    assert_eq!(json["error"], "Insight generation failed");

    assert!(!state.requester.is_busy());
    let response = app.oneshot(get("/api/insights")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["render_key"], 0);
    assert_eq!(json["status"]["state"], "failed");
    assert!(json["document"].is_null());
}

#[tokio::test]
async fn test_concurrent_generate_conflict() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = MockBackend::new().with_gate(gate.clone());
    let (app, state) = setup_with(backend.clone());
    add(&app, serde_json::json!(100), "Food").await;

    let first = tokio::spawn(
        app.clone()
            .oneshot(post_json("/api/insights", serde_json::json!({}))),
    );
    while backend.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(state.requester.is_busy());

    let response = app
        .clone()
        .oneshot(post_json("/api/insights", serde_json::json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // Page shows the disabled, in-progress control
    let page = get_body_text(app.oneshot(get("/")).await.unwrap()).await;
    assert!(page.contains("Generating...</button>"));

    gate.add_permits(1);
    let response = first.await.unwrap().unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(backend.calls(), 1);
    assert!(!state.requester.is_busy());
}

#[tokio::test]
async fn test_cancelled_generate_does_not_stay_generating() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = MockBackend::new().with_gate(gate.clone());
    let (app, state) = setup_with(backend.clone());
    add(&app, serde_json::json!(100), "Food").await;

    let first = tokio::spawn(
        app.clone()
            .oneshot(post_json("/api/insights", serde_json::json!({}))),
    );
    while backend.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    first.abort();
    assert!(first.await.unwrap_err().is_cancelled());
    assert!(!state.requester.is_busy());

    let response = app.clone().oneshot(get("/api/insights")).await.unwrap();
    let json = get_body_json(response).await;
    assert_eq!(json["status"]["state"], "failed");
    assert_eq!(json["render_key"], 0);

    let page = get_body_text(app.oneshot(get("/")).await.unwrap()).await;
    assert!(!page.contains("Generating insights..."));
    assert!(!page.contains("Generating...</button>"));
}

#[tokio::test]
async fn test_generate_form_redirects() {
    let (app, state) = setup_with(MockBackend::new());
    add(&app, serde_json::json!(100), "Food").await;

    let response = app
        .oneshot(post_form("/insights/generate", ""))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(state.session().render_key(), 1);
}

// ========== Dashboard Page Tests ==========

#[tokio::test]
async fn test_dashboard_page() {
    let app = setup_test_app();
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers()["content-security-policy"]
        .to_str()
        .unwrap()
        .contains("frame-ancestors 'self'"));

    let html = get_body_text(response).await;
    assert!(html.contains("AI Expense Insight Dashboard"));
    assert!(html.contains("₹50,000"));
    assert!(html.contains(" disabled class=\"bg-indigo-600"));
}

#[tokio::test]
async fn test_dashboard_page_embeds_frame_after_generation() {
    let app = setup_test_app();
    add(&app, serde_json::json!(100), "Food").await;
    app.clone()
        .oneshot(post_json("/api/insights", serde_json::json!({})))
        .await
        .unwrap();

    let html = get_body_text(app.oneshot(get("/")).await.unwrap()).await;
    assert!(html.contains("<iframe id=\"insight-frame-1\" sandbox=\"allow-scripts\""));
    assert!(html.contains("<span>Food</span><span>₹100</span>"));
}
