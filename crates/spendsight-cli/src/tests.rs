//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use spendsight_core::{
    AIBackend, AIClient, Category, DashboardConfig, MockBackend, Prompt, PromptId, PromptLibrary,
};

use crate::commands;

fn embedded_prompt() -> Prompt {
    PromptLibrary::embedded_only()
        .get(PromptId::InsightDashboard)
        .unwrap()
        .clone()
}

fn args(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ========== Expense Argument Tests ==========

#[test]
fn test_parse_expense_arg() {
    let (amount, category) = commands::parse_expense_arg("100:Food").unwrap();
    assert_eq!(amount, "100");
    assert_eq!(category, Category::Food);
}

#[test]
fn test_parse_expense_arg_custom_category() {
    let (amount, category) = commands::parse_expense_arg(" 12.5 : Pets ").unwrap();
    assert_eq!(amount, "12.5");
    assert_eq!(category, Category::Custom("Pets".into()));
}

#[test]
fn test_parse_expense_arg_bare_amount_uses_default() {
    let (amount, category) = commands::parse_expense_arg("42").unwrap();
    assert_eq!(amount, "42");
    assert_eq!(category, Category::Food);
}

#[test]
fn test_parse_expense_arg_negative_amount() {
    let (amount, category) = commands::parse_expense_arg("-20:Food").unwrap();
    assert_eq!(amount, "-20");
    assert_eq!(category, Category::Food);
}

#[test]
fn test_expense_flag_accepts_negative_amount() {
    use clap::Parser;

    let argv = "spendsight summary -e -20:Food -e 100:Rent".split(' ');
    let cli = crate::cli::Cli::try_parse_from(argv).unwrap();
    match cli.command {
        crate::cli::Commands::Summary { expenses } => {
            assert_eq!(expenses, vec!["-20:Food", "100:Rent"]);
        }
        _ => panic!("expected summary command"),
    }
}

#[test]
fn test_model_override_flag() {
    use clap::Parser;

    let argv = "spendsight insight -e 100:Food --model gemini-2.5-pro".split(' ');
    let cli = crate::cli::Cli::try_parse_from(argv).unwrap();
    let model = match cli.command {
        crate::cli::Commands::Insight { model, .. } => model,
        _ => panic!("expected insight command"),
    };

    let client = AIClient::gemini("key", "gemini-2.5-flash");
    let client = commands::with_model_override(client, model.as_deref());
    assert_eq!(client.model(), "gemini-2.5-pro");

    let client = commands::with_model_override(AIClient::gemini("key", "gemini-2.5-flash"), None);
    assert_eq!(client.model(), "gemini-2.5-flash");
}

#[test]
fn test_parse_expense_arg_missing_category() {
    assert!(commands::parse_expense_arg("100:").is_err());
}

#[test]
fn test_build_dashboard_skips_falsy() {
    let dashboard = commands::build_dashboard(
        DashboardConfig::default(),
        &args(&["100:Food", "0:Rent", ":Transport", "50:Rent"]),
    )
    .unwrap();

    let ledger = dashboard.ledger();
    assert_eq!(ledger.len(), 2);
    assert_eq!(ledger.total_spent(), 150.0);
}

// ========== Summary Tests ==========

#[test]
fn test_format_summary() {
    let dashboard = commands::build_dashboard(
        DashboardConfig::default(),
        &args(&["100:Food", "50:Rent", "25:Food"]),
    )
    .unwrap();

    let out = commands::format_summary(&dashboard);
    assert!(out.contains("Total Spent:     ₹175"));
    assert!(out.contains("Categories:      2"));
    assert!(out.contains("Monthly Income:  ₹50,000"));

    let food = out.find("Food").unwrap();
    let rent = out.find("Rent").unwrap();
    assert!(food < rent);
    assert!(out.contains("₹125"));
}

#[test]
fn test_format_summary_empty() {
    let dashboard = commands::build_dashboard(DashboardConfig::default(), &[]).unwrap();
    let out = commands::format_summary(&dashboard);
    assert!(out.contains("(no expenses)"));
    assert!(out.contains("Categories:      0"));
}

#[test]
fn test_load_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendsight.toml");
    std::fs::write(&path, "[dashboard]\nmonthly_income = 1000\ncurrency_symbol = \"$\"\n").unwrap();

    let config = commands::load_config(Some(path.as_path())).unwrap();
    assert_eq!(config.monthly_income, 1000.0);

    let dashboard = commands::build_dashboard(config, &args(&["10:Food"])).unwrap();
    assert!(commands::format_summary(&dashboard).contains("Monthly Income:  $1,000"));
}

#[test]
fn test_load_config_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spendsight.toml");
    std::fs::write(&path, "[dashboard\n").unwrap();
    assert!(commands::load_config(Some(path.as_path())).is_err());
}

// ========== Insight Tests ==========

#[tokio::test]
async fn test_run_insight_with_mock() {
    let document = commands::run_insight(
        AIClient::mock(),
        embedded_prompt(),
        DashboardConfig::default(),
        &args(&["100:Food", "50:Rent"]),
    )
    .await
    .unwrap();

    assert!(document.html.starts_with("<!DOCTYPE html>"));
    assert_eq!(document.model, "mock");
}

#[tokio::test]
async fn test_run_insight_requires_expenses() {
    let result = commands::run_insight(
        AIClient::mock(),
        embedded_prompt(),
        DashboardConfig::default(),
        &args(&["0:Food"]),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_run_insight_remote_failure() {
    let client = AIClient::Mock(MockBackend::new().failing("unavailable"));
    let err = commands::run_insight(
        client,
        embedded_prompt(),
        DashboardConfig::default(),
        &args(&["100:Food"]),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Insight generation failed"));
}

#[tokio::test]
async fn test_run_insight_empty_document() {
    let client = AIClient::Mock(MockBackend::new().with_reply("```html\n```"));
    let err = commands::run_insight(
        client,
        embedded_prompt(),
        DashboardConfig::default(),
        &args(&["100:Food"]),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("empty document"));
}

// ========== AI / Prompts Command Tests ==========

#[tokio::test]
async fn test_run_ai_test_with_mock() {
    assert!(commands::run_ai_test(&AIClient::mock(), true).await.is_ok());
}

#[tokio::test]
async fn test_run_ai_test_unhealthy() {
    let client = AIClient::Mock(MockBackend::unhealthy());
    assert!(commands::run_ai_test(&client, true).await.is_ok());
}

#[test]
fn test_cmd_prompts_list() {
    assert!(commands::cmd_prompts_list().is_ok());
}

#[test]
fn test_cmd_prompts_show_unknown_id() {
    assert!(commands::cmd_prompts_show("no_such_prompt").is_ok());
}

#[test]
fn test_cmd_prompts_path() {
    assert!(commands::cmd_prompts_path().is_ok());
}
