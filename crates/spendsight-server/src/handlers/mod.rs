//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific area.

pub mod dashboard;
pub mod expenses;
pub mod health;
pub mod insights;

// Re-export all handlers for use in router
pub use dashboard::*;
pub use expenses::*;
pub use health::*;
pub use insights::*;
