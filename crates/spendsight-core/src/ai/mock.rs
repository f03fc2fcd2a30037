//! Mock backend for testing
//!
//! Returns a canned fenced-HTML dashboard without touching the network.
//! Useful for unit tests, the server test-suite and offline development.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::error::{Error, Result};

use super::AIBackend;

/// Canned response, fenced the way real models answer
const MOCK_DASHBOARD: &str = "```html\n<!DOCTYPE html>\n<html>\n<head><title>AI Finance Dashboard</title></head>\n<body><h1>AI Finance Dashboard</h1></body>\n</html>\n```";

#[derive(Debug, Clone)]
enum MockOutcome {
    Reply(String),
    Fail(String),
}

/// Mock AI backend for testing
///
/// Every clone shares the same call counter and gate, so a test can keep a
/// handle while the client is moved into a requester.
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    outcome: MockOutcome,
    calls: Arc<AtomicUsize>,
    gate: Option<Arc<Semaphore>>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy by default)
    pub fn new() -> Self {
        Self {
            healthy: true,
            outcome: MockOutcome::Reply(MOCK_DASHBOARD.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            gate: None,
        }
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Answer every prompt with this text
    pub fn with_reply(mut self, reply: &str) -> Self {
        self.outcome = MockOutcome::Reply(reply.to_string());
        self
    }

    /// Fail every prompt with a remote-request error
    pub fn failing(mut self, message: &str) -> Self {
        self.outcome = MockOutcome::Fail(message.to_string());
        self
    }

    /// Hold each response until a permit is added to `gate`
    pub fn with_gate(mut self, gate: Arc<Semaphore>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of `generate` calls received so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AIBackend for MockBackend {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            let permit = gate
                .acquire()
                .await
                .map_err(|_| Error::RemoteRequest("mock gate closed".into()))?;
            permit.forget();
        }

        match &self.outcome {
            MockOutcome::Reply(text) => Ok(text.clone()),
            MockOutcome::Fail(message) => Err(Error::RemoteRequest(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}
