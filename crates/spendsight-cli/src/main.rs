//! Spendsight CLI - Expense tracker with AI insight dashboards
//!
//! Usage:
//!   spendsight serve --port 3000                 Start the web dashboard
//!   spendsight summary -e 100:Food -e 50:Rent    Print the category summary
//!   spendsight insight -e 100:Food --out d.html  Generate a dashboard once

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve {
            port,
            host,
            cors_origins,
        } => commands::cmd_serve(config_path, &host, port, cors_origins).await,
        Commands::Summary { expenses } => commands::cmd_summary(config_path, &expenses),
        Commands::Prompt { expenses } => commands::cmd_prompt(config_path, &expenses),
        Commands::Insight {
            expenses,
            out,
            model,
        } => {
            commands::cmd_insight(config_path, &expenses, out.as_deref(), model.as_deref()).await
        }
        Commands::Prompts { action } => match action {
            None | Some(PromptsAction::List) => commands::cmd_prompts_list(),
            Some(PromptsAction::Show { prompt_id }) => commands::cmd_prompts_show(&prompt_id),
            Some(PromptsAction::Path) => commands::cmd_prompts_path(),
        },
        Commands::Ai { action } => match action {
            AiAction::Test { no_generate, model } => {
                commands::cmd_ai_test(!no_generate, model.as_deref()).await
            }
        },
    }
}
