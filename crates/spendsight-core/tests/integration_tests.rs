//! Integration tests for spendsight-core
//!
//! These tests exercise the full ledger → prompt → backend → dashboard workflow
//! against the mock backend.

use std::sync::Arc;
use std::time::Duration;

use spendsight_core::{
    AIClient, Category, Dashboard, DashboardConfig, Error, InsightRequester, InsightStatus,
    MockBackend, PromptId, PromptLibrary,
};
use tokio::sync::Semaphore;

fn requester(backend: MockBackend) -> InsightRequester {
    let mut library = PromptLibrary::embedded_only();
    let prompt = library
        .get(PromptId::InsightDashboard)
        .expect("embedded prompt")
        .clone();
    InsightRequester::new(AIClient::Mock(backend), prompt, 50000.0)
}

fn dashboard_with(expenses: &[(&str, Category)]) -> Dashboard {
    let mut dashboard = Dashboard::new(DashboardConfig::default());
    for (amount, category) in expenses {
        dashboard.submit_expense(amount, category.clone());
    }
    dashboard
}

// =============================================================================
// Ledger → Dashboard
// =============================================================================

#[test]
fn test_two_expense_scenario() {
    let dashboard = dashboard_with(&[("100", Category::Food), ("50", Category::Rent)]);
    let ledger = dashboard.ledger();

    assert_eq!(ledger.total_spent(), 150.0);
    let entries: Vec<(&str, f64)> = ledger.summary().iter().collect();
    assert_eq!(entries, vec![("Food", 100.0), ("Rent", 50.0)]);
    assert_eq!(ledger.summary().get("Transport"), None);
}

#[test]
fn test_total_matches_sum_of_amounts() {
    let amounts = ["12.5", "7", "-3", "100.25", "40"];
    let categories = [
        Category::Food,
        Category::Shopping,
        Category::Food,
        Category::Others,
        Category::Shopping,
    ];
    let mut dashboard = Dashboard::new(DashboardConfig::default());
    for (amount, category) in amounts.iter().zip(categories.iter()) {
        assert!(dashboard.submit_expense(amount, category.clone()));
    }

    let ledger = dashboard.ledger();
    assert!((ledger.total_spent() - 156.75).abs() < 1e-9);
    assert!((ledger.summary().get("Food").unwrap() - 9.5).abs() < 1e-9);
    assert!((ledger.summary().get("Shopping").unwrap() - 47.0).abs() < 1e-9);
    assert!((ledger.summary().total() - ledger.total_spent()).abs() < 1e-9);
}

#[test]
fn test_falsy_input_leaves_ledger_unchanged() {
    let dashboard = dashboard_with(&[("", Category::Food), ("0", Category::Rent)]);
    assert!(dashboard.ledger().is_empty());
    assert_eq!(dashboard.ledger().revision(), 0);
}

// =============================================================================
// Insight workflow
// =============================================================================

#[tokio::test]
async fn test_generate_and_render_workflow() {
    let mut dashboard = dashboard_with(&[("100", Category::Food), ("50", Category::Rent)]);
    let requester = requester(MockBackend::new());

    let ledger = dashboard.ledger().clone();
    let document = requester
        .request_insight(ledger.total_spent(), ledger.summary())
        .await
        .expect("mock generation succeeds");
    dashboard.record_insight(document);

    assert_eq!(dashboard.render_key(), 1);
    assert_eq!(dashboard.status(), &InsightStatus::Ready);

    let page = dashboard.render_page(requester.is_busy());
    assert!(page.contains("sandbox=\"allow-scripts\""));
    assert!(page.contains("data-render-key=\"1\""));
    assert!(page.contains("&lt;h1&gt;AI Finance Dashboard&lt;/h1&gt;"));
}

#[tokio::test]
async fn test_empty_ledger_prevents_request() {
    let backend = MockBackend::new();
    let requester = requester(backend.clone());
    let dashboard = Dashboard::new(DashboardConfig::default());

    assert!(!dashboard.can_generate(requester.is_busy()));
    let ledger = dashboard.ledger();
    let result = requester
        .request_insight(ledger.total_spent(), ledger.summary())
        .await;

    assert!(matches!(result, Err(Error::EmptyLedger)));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_rapid_triggers_issue_one_remote_call() {
    let gate = Arc::new(Semaphore::new(0));
    let backend = MockBackend::new().with_gate(gate.clone());
    let requester = Arc::new(requester(backend.clone()));
    let dashboard = dashboard_with(&[("100", Category::Food)]);
    let ledger = dashboard.ledger().clone();

    let first = tokio::spawn({
        let requester = requester.clone();
        let ledger = ledger.clone();
        async move {
            requester
                .request_insight(ledger.total_spent(), ledger.summary())
                .await
        }
    });

    while backend.calls() == 0 {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert!(requester.is_busy());
    assert!(!dashboard.can_generate(requester.is_busy()));

    let second = requester
        .request_insight(ledger.total_spent(), ledger.summary())
        .await;
    assert!(matches!(second, Err(Error::Busy)));

    gate.add_permits(1);
    let document = first.await.expect("task joins").expect("first succeeds");
    assert!(!document.is_empty());
    assert_eq!(backend.calls(), 1);
    assert!(!requester.is_busy());
}

#[tokio::test]
async fn test_failure_keeps_previous_document() {
    let mut dashboard = dashboard_with(&[("100", Category::Food)]);
    let ledger = dashboard.ledger().clone();

    let ok = requester(MockBackend::new());
    let document = ok
        .request_insight(ledger.total_spent(), ledger.summary())
        .await
        .expect("first generation");
    dashboard.record_insight(document);

    let failing = requester(MockBackend::new().failing("503 Service Unavailable"));
    dashboard.begin_generation();
    let err = failing
        .request_insight(ledger.total_spent(), ledger.summary())
        .await
        .expect_err("remote failure");
    assert!(err.is_remote_failure());
    dashboard.record_failure(&err);

    assert!(!failing.is_busy());
    assert_eq!(dashboard.render_key(), 1);
    assert!(dashboard.frame_document(1).is_some());
    assert!(matches!(dashboard.status(), InsightStatus::Failed(_)));
    assert!(dashboard
        .render_page(false)
        .contains("Insight generation failed"));
}

#[tokio::test]
async fn test_unfenced_reply_used_whole() {
    let dashboard = dashboard_with(&[("100", Category::Food)]);
    let ledger = dashboard.ledger();
    let requester = requester(MockBackend::new().with_reply("  <html><body>raw</body></html>\n"));

    let document = requester
        .request_insight(ledger.total_spent(), ledger.summary())
        .await
        .unwrap();
    assert_eq!(document.html, "<html><body>raw</body></html>");
}
