//! Error types for the CloudWatch Logs client

use crate::types::AppendCursor;
use thiserror::Error;

/// Result type for log client operations
pub type LogClientResult<T> = Result<T, LogClientError>;

/// Failures reported by a [`crate::LogStore`]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Group or stream already exists
    #[error("Resource already exists: {0}")]
    AlreadyExists(String),

    /// Caller is not authorized for the operation
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The sequence token sent with an append is stale.
    ///
    /// `expected` carries the store's structured hint when it provides one;
    /// `message` keeps the human-readable detail for text parsing.
    #[error("Invalid sequence token: {message}")]
    SequenceTokenConflict {
        expected: Option<AppendCursor>,
        message: String,
    },

    /// Any other service-side failure
    #[error("Service error {code}: {message}")]
    Service { code: String, message: String },

    /// Transport, timeout or request construction failure
    #[error("Log store error: {0}")]
    Other(String),
}

impl StoreError {
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::SequenceTokenConflict { .. })
    }
}

/// Errors that abort the caller
#[derive(Error, Debug)]
pub enum LogClientError {
    /// Log group or stream could not be created
    #[error("Failed to set up {resource}: {source}")]
    Setup {
        resource: String,
        #[source]
        source: StoreError,
    },

    /// Record could not be serialized into a log message
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
