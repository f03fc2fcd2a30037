//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendsight - Track expenses and get an AI-generated spending dashboard
#[derive(Parser)]
#[command(name = "spendsight")]
#[command(about = "Expense tracker with AI-generated insight dashboards", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Dashboard config file (defaults to the data-dir override, then built-in defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web dashboard
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Additional allowed CORS origin (repeatable)
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Print stat cards and the category summary for the given expenses
    Summary {
        /// Expense as AMOUNT:CATEGORY (repeatable, e.g. -e 100:Food -e 50:Rent)
        #[arg(
            short = 'e',
            long = "expense",
            value_name = "AMOUNT:CATEGORY",
            allow_hyphen_values = true
        )]
        expenses: Vec<String>,
    },

    /// Print the insight prompt that would be sent (no network access)
    Prompt {
        /// Expense as AMOUNT:CATEGORY (repeatable)
        #[arg(
            short = 'e',
            long = "expense",
            value_name = "AMOUNT:CATEGORY",
            allow_hyphen_values = true
        )]
        expenses: Vec<String>,
    },

    /// Generate an insight dashboard once and write the HTML document
    Insight {
        /// Expense as AMOUNT:CATEGORY (repeatable)
        #[arg(
            short = 'e',
            long = "expense",
            value_name = "AMOUNT:CATEGORY",
            allow_hyphen_values = true
        )]
        expenses: Vec<String>,

        /// Write the document to this file instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Model to use instead of the backend's configured one
        #[arg(long)]
        model: Option<String>,
    },

    /// Manage AI prompts (list, show, customize)
    Prompts {
        #[command(subcommand)]
        action: Option<PromptsAction>,
    },

    /// Check the configured AI backend
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
}

#[derive(Subcommand)]
pub enum PromptsAction {
    /// List all available prompts and their override status
    List,

    /// Show the content of a specific prompt
    Show {
        /// Prompt ID (e.g., insight_dashboard)
        prompt_id: String,
    },

    /// Show the path where prompt overrides should be placed
    Path,
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Test the AI backend connection with a short prompt
    Test {
        /// Only run the health check, don't send a prompt
        #[arg(long)]
        no_generate: bool,

        /// Model to use instead of the backend's configured one
        #[arg(long)]
        model: Option<String>,
    },
}
