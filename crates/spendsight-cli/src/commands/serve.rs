//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use spendsight_core::AIBackend;

use super::{ai_client, load_config, load_prompt};

pub async fn cmd_serve(
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    cors_origins: Vec<String>,
) -> Result<()> {
    let dashboard = load_config(config_path)?;
    let client = ai_client()?;
    let prompt = load_prompt()?;

    println!("🚀 Starting Spendsight web server...");
    println!("   Listening: http://{}:{}", host, port);
    match &dashboard.source {
        Some(path) => println!("   Config: {}", path.display()),
        None => println!("   Config: built-in defaults"),
    }
    println!(
        "   AI backend: {} ({}, model {})",
        client.kind(),
        client.host(),
        client.model()
    );
    if prompt.is_override {
        if let Some(ref path) = prompt.override_path {
            println!("   Prompt override: {}", path.display());
        }
    }
    if !cors_origins.is_empty() {
        println!("   CORS origins: {}", cors_origins.join(", "));
    }
    println!();

    let config = spendsight_server::ServerConfig {
        allowed_origins: cors_origins,
    };

    spendsight_server::serve_with_config(dashboard, client, prompt, host, port, config)
        .await
        .context("Server error")
}
