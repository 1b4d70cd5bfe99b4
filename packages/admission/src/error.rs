//! Typed errors for the admission library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell a
//! rejected request apart from a storage failure.

use thiserror::Error;

/// Errors that abort a callback.
///
/// External-dependency failures never show up here: each stage degrades to
/// its fail-open or fail-closed default instead.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// Callback payload failed validation
    #[error("invalid callback: {0}")]
    Validation(#[from] ValidationError),

    /// Persistence adapter failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Caller cancelled the batch
    #[error("operation cancelled")]
    Cancelled,

    /// Batch did not finish within the callback deadline
    #[error("callback deadline of {secs}s exceeded")]
    DeadlineExceeded { secs: u64 },

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl AdmissionError {
    /// Wrap any error as a storage failure.
    pub fn storage(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Storage(err.into())
    }
}

/// Reasons a callback body is rejected before anything runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("malformed body: {0}")]
    Malformed(String),

    #[error("too many entities: {count} (max {max})")]
    TooManyEntities { count: usize, max: usize },

    #[error("error message too long: {len} chars (max {max})")]
    ErrorMessageTooLong { len: usize, max: usize },

    #[error("entity {index} has an empty {field}")]
    EmptyField { index: usize, field: &'static str },
}

/// Errors from outbound collaborator calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Call exceeded its timeout
    #[error("timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response body did not have the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

impl ClientError {
    /// Whether a retry has a chance of succeeding.
    pub fn is_transient(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            ClientError::Api { status, .. } => *status == 429 || *status >= 500,
            ClientError::Timeout { .. } => true,
            ClientError::Parse(_) => false,
        }
    }
}

/// Result type alias for admission operations.
pub type Result<T> = std::result::Result<T, AdmissionError>;

/// Result type alias for collaborator calls.
pub type ClientResult<T> = std::result::Result<T, ClientError>;
