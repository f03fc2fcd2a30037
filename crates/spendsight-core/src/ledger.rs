//! Append-only expense ledger
//!
//! The ledger owns the only stored state. Category summary and total are
//! memoized derivations keyed on the ledger revision: every append bumps the
//! revision and drops the memo, so the views can never drift from the records.

use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::models::{parse_amount, Category, Expense, ExpenseForm};
use crate::summary::{compute_summary, compute_total, CategorySummary};

#[derive(Debug, Clone, Default)]
pub struct Ledger {
    expenses: Vec<Expense>,
    revision: u64,
    summary: OnceLock<CategorySummary>,
    total: OnceLock<f64>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an expense from raw amount input
    ///
    /// Falsy amounts (empty, zero, non-numeric) are silently ignored and the
    /// ledger is left untouched. Returns whether a record was appended.
    pub fn add_expense(&mut self, amount: &str, category: Category) -> bool {
        match parse_amount(amount) {
            Some(value) => {
                self.push(Expense::new(value, category));
                true
            }
            None => {
                debug!(input = %amount, "Ignoring expense with falsy amount");
                false
            }
        }
    }

    /// Submit the entry form: append on success and clear the amount field
    ///
    /// The selected category stays as it was. On rejection the form is left
    /// unchanged so the user can correct the input.
    pub fn submit(&mut self, form: &mut ExpenseForm) -> bool {
        let added = self.add_expense(&form.amount, form.category.clone());
        if added {
            form.amount.clear();
        }
        added
    }

    fn push(&mut self, expense: Expense) {
        self.expenses.push(expense);
        self.revision += 1;
        self.summary = OnceLock::new();
        self.total = OnceLock::new();
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Monotonic counter bumped on every append
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn summary(&self) -> &CategorySummary {
        self.summary.get_or_init(|| compute_summary(&self.expenses))
    }

    /// Sum of all amounts in ledger order
    ///
    /// This can differ from `summary().total()` in the last bits, since that
    /// one adds per-category subtotals and f64 addition is not associative.
    pub fn total_spent(&self) -> f64 {
        *self.total.get_or_init(|| compute_total(&self.expenses))
    }

    /// Serializable snapshot of the derived views
    pub fn snapshot(&self, monthly_income: f64) -> LedgerSnapshot {
        LedgerSnapshot {
            total_spent: self.total_spent(),
            monthly_income,
            category_count: self.summary().len(),
            expense_count: self.len(),
            categories: self.summary().clone(),
        }
    }
}

/// Derived views plus the stat-card numbers
#[derive(Debug, Clone, Serialize)]
pub struct LedgerSnapshot {
    pub total_spent: f64,
    pub monthly_income: f64,
    pub category_count: usize,
    pub expense_count: usize,
    pub categories: CategorySummary,
}
