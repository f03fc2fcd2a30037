//! Spendsight Core Library
//!
//! Shared functionality for the Spendsight expense tracker:
//! - Append-only expense ledger with memoized category summary and total
//! - Dashboard session state and server-side page rendering
//! - Pluggable AI backends (Gemini, OpenAI-compatible, Ollama, mock)
//! - Single-flight insight requests with code-fence extraction
//! - Prompt library for customizable AI prompts
//! - Layered dashboard configuration

pub mod ai;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod insight;
pub mod ledger;
pub mod models;
pub mod prompts;
pub mod summary;

/// Test utilities including mock Gemini server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    extract_code_block, AIBackend, AIClient, BackendInfo, GeminiBackend, MockBackend,
    OllamaBackend, OpenAICompatibleBackend,
};
pub use config::DashboardConfig;
pub use dashboard::{render_insight_frame, Dashboard, InsightView};
pub use error::{Error, Result};
pub use insight::{BusyGuard, InsightRequester};
pub use ledger::{Ledger, LedgerSnapshot};
pub use models::{parse_amount, Category, Expense, ExpenseForm, InsightDocument, InsightStatus};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use summary::{compute_summary, compute_total, CategorySummary};
