//! One-shot insight generation command

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use spendsight_core::{
    AIBackend, AIClient, DashboardConfig, InsightDocument, InsightRequester, Prompt,
};

use super::{ai_client, build_dashboard, load_config, load_prompt, with_model_override};

/// Generate a document for the given expenses with an explicit client
pub async fn run_insight(
    client: AIClient,
    prompt: Prompt,
    config: DashboardConfig,
    expenses: &[String],
) -> Result<InsightDocument> {
    let monthly_income = config.monthly_income;
    let dashboard = build_dashboard(config, expenses)?;
    if dashboard.ledger().is_empty() {
        bail!("No expenses given; add at least one with -e AMOUNT:CATEGORY");
    }

    let requester = InsightRequester::new(client, prompt, monthly_income);
    let ledger = dashboard.ledger();
    let document = requester
        .request_insight(ledger.total_spent(), ledger.summary())
        .await
        .context("Insight generation failed")?;

    if document.is_empty() {
        bail!("The model returned an empty document");
    }
    Ok(document)
}

pub async fn cmd_insight(
    config_path: Option<&Path>,
    expenses: &[String],
    out: Option<&Path>,
    model: Option<&str>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let client = with_model_override(ai_client()?, model);
    let prompt = load_prompt()?;

    eprintln!(
        "🤖 Generating insights with {} ({})...",
        client.kind(),
        client.model()
    );
    let document = run_insight(client, prompt, config, expenses).await?;

    match out {
        Some(path) => {
            fs::write(path, &document.html)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = document.html.len(), "Insight document written");
            eprintln!("✅ Dashboard written to {}", path.display());
        }
        None => println!("{}", document.html),
    }
    Ok(())
}
