//! Domain models for Spendsight

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Expense category
///
/// The dashboard offers a fixed set of categories, but any other label is kept
/// verbatim as `Custom` when the selection control is bypassed (JSON API, CLI).
/// Matching is exact: "food" is a custom category distinct from `Food`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Food,
    Rent,
    Transport,
    Shopping,
    Others,
    Custom(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Food => "Food",
            Self::Rent => "Rent",
            Self::Transport => "Transport",
            Self::Shopping => "Shopping",
            Self::Others => "Others",
            Self::Custom(name) => name,
        }
    }

    /// Categories offered by the entry form, in display order
    pub fn all() -> &'static [Category] {
        &[
            Self::Food,
            Self::Rent,
            Self::Transport,
            Self::Shopping,
            Self::Others,
        ]
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Food
    }
}

impl From<&str> for Category {
    fn from(s: &str) -> Self {
        match s {
            "Food" => Self::Food,
            "Rent" => Self::Rent,
            "Transport" => Self::Transport,
            "Shopping" => Self::Shopping,
            "Others" => Self::Others,
            other => Self::Custom(other.to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(s: String) -> Self {
        Category::from(s.as_str())
    }
}

impl From<Category> for String {
    fn from(c: Category) -> Self {
        match c {
            Category::Custom(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Category::from(s))
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded expense (immutable once created)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub amount: f64,
    pub category: Category,
    pub recorded_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(amount: f64, category: Category) -> Self {
        Self {
            amount,
            category,
            recorded_at: Utc::now(),
        }
    }
}

/// Parse raw amount input, applying the entry form's only validation gate
///
/// Returns `None` for "falsy" input: empty or whitespace-only text, zero, and
/// anything that doesn't parse to a finite number. Negative amounts pass.
pub fn parse_amount(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value: f64 = trimmed.parse().ok()?;
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    Some(value)
}

/// Pending state of the "Add Expense" form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseForm {
    /// Raw amount text as typed
    pub amount: String,
    /// Selected category (persists across submissions)
    pub category: Category,
}

/// HTML document extracted from an AI response
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightDocument {
    pub html: String,
    pub model: String,
    pub generated_at: DateTime<Utc>,
}

impl InsightDocument {
    /// The response had no fenced block and only whitespace
    pub fn is_empty(&self) -> bool {
        self.html.is_empty()
    }
}

/// Outcome of the most recent insight request, as shown to the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum InsightStatus {
    #[default]
    Idle,
    Generating,
    Ready,
    /// Generation succeeded but the extracted document was empty
    Empty,
    Failed(String),
}

impl InsightStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Generating => "generating",
            Self::Ready => "ready",
            Self::Empty => "empty",
            Self::Failed(_) => "failed",
        }
    }
}
