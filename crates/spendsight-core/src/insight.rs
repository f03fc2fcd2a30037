//! Single-flight insight requests
//!
//! [`InsightRequester`] owns the AI client and the prompt template. It builds
//! the dashboard prompt from the ledger's derived views, sends it to the
//! backend, and extracts the HTML document from the reply.
//!
//! At most one request is outstanding at a time. The busy flag is an
//! `AtomicBool` taken with `compare_exchange` and released by [`BusyGuard`]
//! on drop, so it clears on success, on failure and when the caller's future
//! is dropped mid-flight.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::ai::{extract_code_block, AIBackend, AIClient};
use crate::error::{Error, Result};
use crate::models::InsightDocument;
use crate::prompts::Prompt;
use crate::summary::CategorySummary;

/// Holds the busy flag for the lifetime of one request
#[must_use = "the busy flag is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

pub struct InsightRequester {
    client: AIClient,
    prompt: Prompt,
    monthly_income: f64,
    busy: AtomicBool,
}

impl InsightRequester {
    pub fn new(client: AIClient, prompt: Prompt, monthly_income: f64) -> Self {
        Self {
            client,
            prompt,
            monthly_income,
            busy: AtomicBool::new(false),
        }
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    /// Whether a request is currently in flight
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Take the busy flag, or fail with [`Error::Busy`] if it is already held
    pub fn try_acquire(&self) -> Result<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard { flag: &self.busy })
            .map_err(|_| {
                warn!("Insight request rejected: another request is in flight");
                Error::Busy
            })
    }

    /// Render the dashboard prompt for the given numbers
    pub fn build_prompt(&self, total_spent: f64, summary: &CategorySummary) -> String {
        self.prompt
            .render_insight(self.monthly_income, total_spent, summary)
    }

    /// Request a dashboard document for the current ledger views
    ///
    /// Rejects an empty summary with [`Error::EmptyLedger`] and a concurrent
    /// call with [`Error::Busy`]; neither reaches the backend.
    pub async fn request_insight(
        &self,
        total_spent: f64,
        summary: &CategorySummary,
    ) -> Result<InsightDocument> {
        if summary.is_empty() {
            return Err(Error::EmptyLedger);
        }
        let guard = self.try_acquire()?;
        self.request_with_guard(&guard, total_spent, summary).await
    }

    /// Same as [`InsightRequester::request_insight`], for callers that took the
    /// busy flag themselves (e.g. to publish a "generating" state first)
    pub async fn request_with_guard(
        &self,
        _guard: &BusyGuard<'_>,
        total_spent: f64,
        summary: &CategorySummary,
    ) -> Result<InsightDocument> {
        let prompt = self.build_prompt(total_spent, summary);
        info!(
            backend = self.client.kind(),
            model = self.client.model(),
            categories = summary.len(),
            "Requesting insight dashboard"
        );

        let response = match self.client.generate(&prompt).await {
            Ok(response) => response,
            Err(e) => {
                error!(error = %e, "Insight request failed");
                return Err(e);
            }
        };
        debug!(len = response.len(), "Raw insight response");

        let html = extract_code_block(&response);
        if html.is_empty() {
            warn!("Insight response contained no usable document");
        } else {
            info!(len = html.len(), "Insight document ready");
        }

        Ok(InsightDocument {
            html,
            model: self.client.model().to_string(),
            generated_at: Utc::now(),
        })
    }
}
