//! AI backend command implementations

use anyhow::Result;
use spendsight_core::{extract_code_block, AIBackend, AIClient};

use super::{ai_client, with_model_override};

/// Prompt small enough to be cheap on any backend
const TEST_PROMPT: &str = "Reply with the single word OK inside a ```text code block.";

/// Test the configured AI backend
pub async fn cmd_ai_test(generate: bool, model: Option<&str>) -> Result<()> {
    println!("🔍 Testing AI backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "gemini".to_string());
    println!("  AI_BACKEND: {}", backend);

    let client = with_model_override(ai_client()?, model);
    run_ai_test(&client, generate).await
}

/// Health check plus an optional round trip through `generate`
pub async fn run_ai_test(client: &AIClient, generate: bool) -> Result<()> {
    let info = client.info();
    println!("  Backend: {}", info.kind);
    println!("  Host:    {}", info.host);
    println!("  Model:   {}\n", info.model);

    print!("Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Failed");
        println!("\n⚠️  Could not reach {} at {}", info.kind, info.host);
        println!("\nCheck that:");
        println!("  1. The host is reachable from this machine");
        println!("  2. The API key (if any) is set in the environment");
        println!("  3. The model name exists on this backend");
        return Ok(());
    }

    if !generate {
        return Ok(());
    }

    print!("Sending test prompt... ");
    match client.generate(TEST_PROMPT).await {
        Ok(response) => {
            let extracted = extract_code_block(&response);
            println!("✅ {} chars", response.len());
            println!("  Extracted: {:?}", extracted);
        }
        Err(e) => {
            println!("❌ Error: {}", e);
        }
    }

    Ok(())
}
