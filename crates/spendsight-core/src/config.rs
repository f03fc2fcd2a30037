//! Dashboard configuration
//!
//! Config is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/spendsight/config/spendsight.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! The AI backend is configured separately through environment variables
//! (see [`crate::ai::AIClient::from_env`]) so credentials never live in files
//! that might be committed.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::Category;

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/spendsight.toml");

/// Resolved dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Fixed monthly income shown on the dashboard and sent in the prompt
    pub monthly_income: f64,
    /// Symbol shown before amounts
    pub currency_symbol: String,
    /// Categories offered by the entry form
    pub categories: Vec<Category>,
    /// Path the config was read from (None = embedded defaults)
    pub source: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            monthly_income: 50000.0,
            currency_symbol: "₹".to_string(),
            categories: Category::all().to_vec(),
            source: None,
        }
    }
}

impl DashboardConfig {
    /// Load from the default override location, falling back to embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (falls back to defaults if it doesn't exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("spendsight").join("config").join("spendsight.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<DashboardConfig> {
    let path = match override_path {
        Some(p) => Some(p.to_path_buf()),
        None => default_config_path(),
    };

    match path {
        Some(p) if p.exists() => {
            let content = fs::read_to_string(&p)
                .map_err(|e| Error::Config(format!("Failed to read config: {}", e)))?;
            let mut config = parse_config(&content)?;
            config.source = Some(p);
            Ok(config)
        }
        _ => parse_config(DEFAULT_CONFIG),
    }
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    dashboard: Option<RawDashboard>,
}

#[derive(Debug, Deserialize)]
struct RawDashboard {
    monthly_income: Option<f64>,
    currency_symbol: Option<String>,
    categories: Option<Vec<String>>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<DashboardConfig> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    let mut config = DashboardConfig::default();

    if let Some(dashboard) = raw.dashboard {
        if let Some(income) = dashboard.monthly_income {
            if !income.is_finite() {
                return Err(Error::Config("monthly_income must be a finite number".into()));
            }
            config.monthly_income = income;
        }
        if let Some(symbol) = dashboard.currency_symbol {
            config.currency_symbol = symbol;
        }
        if let Some(categories) = dashboard.categories {
            if categories.is_empty() {
                return Err(Error::Config("categories must not be empty".into()));
            }
            config.categories = categories.into_iter().map(Category::from).collect();
        }
    }

    Ok(config)
}
