//! Aggregation over the expense ledger
//!
//! Both views are pure folds over the ledger slice. The category summary keeps
//! first-appearance order so rendered tables and the prompt JSON are byte-stable.

use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::Expense;

/// Largest integer an f64 represents exactly (2^53)
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Per-category cumulative amounts in first-appearance order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategorySummary {
    totals: IndexMap<String, f64>,
}

impl CategorySummary {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.totals.get(category).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.totals.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.totals.keys().map(|k| k.as_str())
    }

    /// Number of distinct categories (the "Categories" stat card)
    pub fn len(&self) -> usize {
        self.totals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    /// Sum of all category values
    ///
    /// Adds subtotals in key order, so it may differ from a ledger-order sum
    /// by floating-point rounding.
    pub fn total(&self) -> f64 {
        self.totals.values().sum()
    }

    /// Pretty-printed JSON with 2-space indent, as embedded in the prompt
    pub fn to_pretty_json(&self) -> String {
        // Serializing a map of strings to numbers cannot fail
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Serialize for CategorySummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.totals.len()))?;
        for (category, amount) in &self.totals {
            map.serialize_entry(category, &JsonAmount(*amount))?;
        }
        map.end()
    }
}

/// Serializes integral amounts as JSON integers (`100`, not `100.0`)
#[derive(Debug, Clone, Copy)]
pub struct JsonAmount(pub f64);

impl Serialize for JsonAmount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let v = self.0;
        if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT {
            serializer.serialize_i64(v as i64)
        } else {
            serializer.serialize_f64(v)
        }
    }
}

/// Fold the ledger into per-category totals
pub fn compute_summary(expenses: &[Expense]) -> CategorySummary {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    for expense in expenses {
        *totals
            .entry(expense.category.as_str().to_string())
            .or_insert(0.0) += expense.amount;
    }
    CategorySummary { totals }
}

/// Sum every amount in the ledger
pub fn compute_total(expenses: &[Expense]) -> f64 {
    expenses.iter().fold(0.0, |sum, e| sum + e.amount)
}

/// Format an amount the way the dashboard shows it (`150`, `12.5`)
pub fn format_amount(amount: f64) -> String {
    format!("{}", amount)
}

/// Format an amount with thousands separators (`50,000`), used for income
pub fn format_grouped(amount: f64) -> String {
    let plain = format_amount(amount.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (plain, None),
    };

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}
