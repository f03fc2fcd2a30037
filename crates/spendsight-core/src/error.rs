//! Error types for Spendsight

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The text-generation service failed or returned nothing usable
    #[error("Remote request failed: {0}")]
    RemoteRequest(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An insight request is already in flight
    #[error("An insight request is already in progress")]
    Busy,

    /// Insight generation needs at least one expense
    #[error("No expenses recorded yet")]
    EmptyLedger,
}

impl Error {
    /// Whether this error came from the remote text-generation service
    ///
    /// Network errors, malformed payloads and service-side errors all count
    /// as one failure class.
    pub fn is_remote_failure(&self) -> bool {
        matches!(
            self,
            Error::RemoteRequest(_) | Error::Http(_) | Error::Json(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
