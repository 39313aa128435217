//! Error types for a single status collection cycle.

use thiserror::Error;

/// Result type for status reads and translation.
pub type Result<T> = std::result::Result<T, StatusError>;

/// Terminal failures of one scrape.
///
/// A field that is merely absent from the status document is not an error;
/// the mapper skips it.
#[derive(Error, Debug)]
pub enum StatusError {
    /// The status read failed (connectivity, transaction error, timeout).
    #[error("Status unavailable: {0}")]
    StatusUnavailable(String),

    /// The status payload is not valid JSON.
    #[error("Malformed status document: {0}")]
    MalformedStatus(#[from] serde_json::Error),
}

impl StatusError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::StatusUnavailable(msg.into())
    }

    /// Whether this error came from the read side rather than from parsing.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::StatusUnavailable(_))
    }
}
