//! Dashboard session state and page rendering
//!
//! A [`Dashboard`] is one user's view: the ledger, the pending entry form,
//! and the latest insight document with its render key. It holds no async
//! state; the busy flag lives in [`crate::insight::InsightRequester`] and is
//! passed in when rendering.

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::Serialize;
use tracing::debug;

use crate::config::DashboardConfig;
use crate::error::Error;
use crate::ledger::Ledger;
use crate::models::{Category, ExpenseForm, InsightDocument, InsightStatus};
use crate::summary::{format_amount, format_grouped};

#[derive(Debug, Clone, Default)]
pub struct Dashboard {
    config: DashboardConfig,
    ledger: Ledger,
    form: ExpenseForm,
    document: Option<InsightDocument>,
    render_key: u64,
    status: InsightStatus,
}

/// Current insight state, as returned by the JSON API
#[derive(Debug, Clone, Serialize)]
pub struct InsightView {
    pub render_key: u64,
    pub status: InsightStatus,
    pub document: Option<InsightDocument>,
}

impl Dashboard {
    pub fn new(config: DashboardConfig) -> Self {
        let form = ExpenseForm {
            amount: String::new(),
            category: config.categories.first().cloned().unwrap_or_default(),
        };
        Self {
            config,
            form,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn form(&self) -> &ExpenseForm {
        &self.form
    }

    pub fn document(&self) -> Option<&InsightDocument> {
        self.document.as_ref()
    }

    pub fn render_key(&self) -> u64 {
        self.render_key
    }

    pub fn status(&self) -> &InsightStatus {
        &self.status
    }

    /// Submit the entry form with the given input
    ///
    /// The category selection is kept either way; the amount field is cleared
    /// only when the expense was recorded.
    pub fn submit_expense(&mut self, amount: &str, category: Category) -> bool {
        self.form.amount = amount.to_string();
        self.form.category = category;
        self.ledger.submit(&mut self.form)
    }

    /// Whether the "Generate AI Insights" control is enabled
    pub fn can_generate(&self, busy: bool) -> bool {
        !busy && !self.ledger.is_empty()
    }

    pub fn begin_generation(&mut self) {
        self.status = InsightStatus::Generating;
    }

    /// Install a freshly generated document under a new render key
    ///
    /// An empty document still bumps the key, so stale frames disappear.
    pub fn record_insight(&mut self, document: InsightDocument) {
        self.render_key += 1;
        self.status = if document.is_empty() {
            InsightStatus::Empty
        } else {
            InsightStatus::Ready
        };
        debug!(render_key = self.render_key, status = self.status.as_str(), "Insight recorded");
        self.document = Some(document);
    }

    /// Mark the last request as failed; the previous document and key stay
    ///
    /// Remote failures are reported generically. The details are already in
    /// the log and may include provider messages not meant for the page.
    pub fn record_failure(&mut self, error: &Error) {
        let message = if error.is_remote_failure() {
            "the AI service request failed".to_string()
        } else {
            error.to_string()
        };
        self.status = InsightStatus::Failed(message);
    }

    /// Close out a generation that ended without an outcome (e.g. the caller
    /// went away mid-request)
    ///
    /// Only a pending `Generating` status is touched.
    pub fn abandon_generation(&mut self) {
        if self.status == InsightStatus::Generating {
            self.status = InsightStatus::Failed("the request was cancelled".to_string());
        }
    }

    pub fn insight_view(&self) -> InsightView {
        InsightView {
            render_key: self.render_key,
            status: self.status.clone(),
            document: self.document.clone(),
        }
    }

    /// The displayable document, only if `key` is the current render key
    pub fn frame_document(&self, key: u64) -> Option<&str> {
        if key != self.render_key {
            return None;
        }
        self.document
            .as_ref()
            .filter(|d| !d.is_empty())
            .map(|d| d.html.as_str())
    }

    /// Render the full dashboard page
    pub fn render_page(&self, busy: bool) -> String {
        let symbol = encode_text(&self.config.currency_symbol);
        let mut page = String::with_capacity(4096);

        page.push_str(PAGE_HEAD);
        page.push_str(
            "<h1 class=\"text-2xl font-bold mb-6\">AI Expense Insight Dashboard</h1>\n",
        );

        // Add Expense
        page.push_str(
            "<div class=\"bg-white p-4 rounded shadow mb-6\">\n\
             <h2 class=\"font-semibold mb-3\">Add Expense</h2>\n\
             <form method=\"post\" action=\"/expenses\" class=\"flex gap-3\">\n",
        );
        page.push_str(&format!(
            "<input type=\"number\" step=\"any\" name=\"amount\" placeholder=\"Amount\" value=\"{}\" class=\"border p-2 rounded w-32\">\n",
            encode_double_quoted_attribute(&self.form.amount)
        ));
        page.push_str("<select name=\"category\" class=\"border p-2 rounded\">\n");
        for category in &self.config.categories {
            let selected = if *category == self.form.category {
                " selected"
            } else {
                ""
            };
            page.push_str(&format!(
                "<option value=\"{}\"{}>{}</option>\n",
                encode_double_quoted_attribute(category.as_str()),
                selected,
                encode_text(category.as_str())
            ));
        }
        page.push_str(
            "</select>\n\
             <button type=\"submit\" class=\"bg-blue-600 text-white px-4 rounded\">Add</button>\n\
             </form>\n</div>\n",
        );

        // Stat cards
        page.push_str("<div class=\"grid grid-cols-3 gap-4 mb-6\">\n");
        page.push_str(&stat_card(
            "Total Spent",
            &format!("{}{}", symbol, format_amount(self.ledger.total_spent())),
        ));
        page.push_str(&stat_card(
            "Categories",
            &self.ledger.summary().len().to_string(),
        ));
        page.push_str(&stat_card(
            "Monthly Income",
            &format!("{}{}", symbol, format_grouped(self.config.monthly_income)),
        ));
        page.push_str("</div>\n");

        // Expense Summary
        page.push_str(
            "<div class=\"bg-white p-4 rounded shadow mb-6\">\n\
             <h2 class=\"font-semibold mb-3\">Expense Summary</h2>\n",
        );
        for (category, amount) in self.ledger.summary().iter() {
            page.push_str(&format!(
                "<div class=\"flex justify-between border-b py-2\"><span>{}</span><span>{}{}</span></div>\n",
                encode_text(category),
                symbol,
                format_amount(amount)
            ));
        }
        page.push_str("</div>\n");

        // Generate control
        let disabled = if self.can_generate(busy) { "" } else { " disabled" };
        let label = if busy {
            "Generating..."
        } else {
            "Generate AI Insights"
        };
        page.push_str(&format!(
            "<form method=\"post\" action=\"/insights/generate\" class=\"flex justify-end mb-4\">\n\
             <button type=\"submit\"{} class=\"bg-indigo-600 text-white px-6 py-2 rounded disabled:opacity-50\">{}</button>\n\
             </form>\n",
            disabled, label
        ));

        // AI Insights panel
        page.push_str(
            "<div class=\"bg-indigo-50 p-4 rounded border border-indigo-200\">\n\
             <h2 class=\"font-semibold mb-2\">AI Insights</h2>\n",
        );
        page.push_str(&format!(
            "<p class=\"text-sm text-gray-600\" data-status=\"{}\">{}</p>\n</div>\n",
            self.status.as_str(),
            encode_text(&status_message(&self.status))
        ));

        if let Some(html) = self.frame_document(self.render_key) {
            page.push_str("<div class=\"h-screen\">\n");
            page.push_str(&render_insight_frame(html, self.render_key));
            page.push_str("\n</div>\n");
        }

        page.push_str(PAGE_FOOT);
        page
    }
}

const PAGE_HEAD: &str = "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>Spendsight</title>\n\
<script src=\"https://cdn.tailwindcss.com\"></script>\n\
</head>\n<body>\n<div class=\"min-h-screen bg-gray-100 p-6\">\n";

const PAGE_FOOT: &str = "</div>\n</body>\n</html>\n";

fn stat_card(label: &str, value: &str) -> String {
    format!(
        "<div class=\"bg-white p-4 rounded shadow\"><p class=\"text-gray-500 text-sm\">{}</p><p class=\"text-xl font-bold\">{}</p></div>\n",
        label, value
    )
}

fn status_message(status: &InsightStatus) -> String {
    match status {
        InsightStatus::Idle | InsightStatus::Ready => {
            "AI-generated financial insights will appear here after sending summarized data to backend."
                .to_string()
        }
        InsightStatus::Generating => "Generating insights...".to_string(),
        InsightStatus::Empty => "The model returned an empty document.".to_string(),
        InsightStatus::Failed(message) => format!("Insight generation failed: {}", message),
    }
}

/// Embed a generated document in an isolated frame
///
/// The sandbox allows scripts but not same-origin access, so the document's
/// scripts and styles cannot reach the host page. `data-render-key` changes on
/// every generation, which makes the frame a new element each time.
pub fn render_insight_frame(html: &str, key: u64) -> String {
    format!(
        "<iframe id=\"insight-frame-{key}\" sandbox=\"allow-scripts\" data-render-key=\"{key}\" srcdoc=\"{}\" class=\"w-full h-full bg-white text-black\"></iframe>",
        encode_double_quoted_attribute(html)
    )
}
