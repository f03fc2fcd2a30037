//! Shared utilities for commands
//!
//! This module contains:
//! - `load_config` - Resolve the dashboard config
//! - `parse_expense_arg` - Parse an `AMOUNT:CATEGORY` argument
//! - `build_dashboard` - Replay expense arguments into a fresh dashboard
//! - `load_prompt` / `ai_client` / `with_model_override` - Insight generation inputs

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tracing::warn;

use spendsight_core::{
    AIClient, Category, Dashboard, DashboardConfig, Prompt, PromptId, PromptLibrary,
};

/// Load the dashboard config from an explicit path or the default locations
pub fn load_config(path: Option<&Path>) -> Result<DashboardConfig> {
    match path {
        Some(path) => DashboardConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => DashboardConfig::load().context("Failed to load config"),
    }
}

/// Parse `AMOUNT:CATEGORY` (or a bare `AMOUNT`, which uses the default category)
///
/// The amount is returned as typed; the ledger applies its own validation.
pub fn parse_expense_arg(arg: &str) -> Result<(String, Category)> {
    match arg.split_once(':') {
        Some((amount, category)) => {
            let category = category.trim();
            if category.is_empty() {
                return Err(anyhow!("Missing category in expense '{}'", arg));
            }
            Ok((amount.trim().to_string(), Category::from(category)))
        }
        None => Ok((arg.trim().to_string(), Category::default())),
    }
}

/// Build a dashboard from expense arguments, in order
///
/// Falsy amounts are skipped with a warning, as the entry form would.
pub fn build_dashboard(config: DashboardConfig, expenses: &[String]) -> Result<Dashboard> {
    let mut dashboard = Dashboard::new(config);
    for arg in expenses {
        let (amount, category) = parse_expense_arg(arg)?;
        if !dashboard.submit_expense(&amount, category) {
            warn!(expense = %arg, "Skipping expense with empty or zero amount");
        }
    }
    Ok(dashboard)
}

/// Load the insight prompt (override or embedded)
pub fn load_prompt() -> Result<Prompt> {
    let mut library = PromptLibrary::new();
    let prompt = library
        .get(PromptId::InsightDashboard)
        .context("Failed to load insight prompt")?;
    Ok(prompt.clone())
}

/// Build the AI client from the environment
pub fn ai_client() -> Result<AIClient> {
    AIClient::from_env().context(
        "AI backend not configured: set GEMINI_API_KEY, or AI_BACKEND=openai_compatible|ollama|mock with its host variables",
    )
}

/// Swap in the `--model` override, if one was given
pub fn with_model_override(client: AIClient, model: Option<&str>) -> AIClient {
    match model {
        Some(model) => client.with_model(model),
        None => client,
    }
}
