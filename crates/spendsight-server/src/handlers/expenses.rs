//! Expense entry and summary handlers

use std::sync::Arc;

use axum::{extract::State, response::Redirect, Form, Json};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{AppError, AppState};
use spendsight_core::{Category, Expense, LedgerSnapshot};

/// Amount as sent by API clients: a JSON number or the raw input text
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    Number(f64),
    Text(String),
}

impl AmountInput {
    fn as_input(&self) -> String {
        match self {
            AmountInput::Number(n) => n.to_string(),
            AmountInput::Text(s) => s.clone(),
        }
    }
}

/// Request body for adding an expense
#[derive(Debug, Deserialize)]
pub struct AddExpenseRequest {
    pub amount: AmountInput,
    #[serde(default)]
    pub category: Category,
}

/// Response for adding an expense
#[derive(Debug, Serialize)]
pub struct AddExpenseResponse {
    /// False when the amount was falsy and nothing was recorded
    pub added: bool,
    pub expense_count: usize,
}

/// Fields posted by the dashboard's "Add Expense" form
#[derive(Debug, Deserialize)]
pub struct ExpenseFormInput {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub category: Category,
}

/// GET /api/expenses - List recorded expenses in entry order
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let expenses = state.session().ledger().expenses().to_vec();
    Ok(Json(expenses))
}

/// POST /api/expenses - Add an expense
///
/// Falsy amounts are not an error: the response reports `added: false`.
pub async fn add_expense(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddExpenseRequest>,
) -> Result<Json<AddExpenseResponse>, AppError> {
    let mut session = state.session();
    let added = session.submit_expense(&req.amount.as_input(), req.category);
    Ok(Json(AddExpenseResponse {
        added,
        expense_count: session.ledger().len(),
    }))
}

/// POST /expenses - Form submission from the dashboard page
pub async fn submit_expense_form(
    State(state): State<Arc<AppState>>,
    Form(input): Form<ExpenseFormInput>,
) -> Redirect {
    let added = state
        .session()
        .submit_expense(&input.amount, input.category);
    debug!(added, "Expense form submitted");
    Redirect::to("/")
}

/// GET /api/summary - Stat-card numbers and the category summary
pub async fn get_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LedgerSnapshot>, AppError> {
    let session = state.session();
    let snapshot = session
        .ledger()
        .snapshot(session.config().monthly_income);
    Ok(Json(snapshot))
}
