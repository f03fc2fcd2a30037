//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `ai` - AI backend check
//! - `core` - Shared utilities (config, expense arguments, prompt, client)
//! - `insight` - One-shot insight generation
//! - `prompts` - Prompt library management commands
//! - `serve` - Web server command
//! - `summary` - Summary and prompt preview commands

pub mod ai;
pub mod core;
pub mod insight;
pub mod prompts;
pub mod serve;
pub mod summary;

// Re-export command functions for main.rs
pub use ai::*;
pub use core::*;
pub use insight::*;
pub use prompts::*;
pub use serve::*;
pub use summary::*;
