//! Error taxonomy for the persistence and sync layer.
//!
//! ERROR HANDLING
//! ==============
//! `ClientError` is the only error type that reaches callers. Storage failures
//! are modelled separately by `StorageError` and never leave the storage
//! adapter; transport failures feed the API fallback path instead of failing.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors surfaced to callers of the client layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    /// Caller-supplied input failed a precondition.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The operation needs a signed-in session.
    #[error("no authenticated user")]
    NotAuthenticated,
    /// Neither the remote endpoint nor its static fallback produced data.
    #[error("both API and fallback failed for {endpoint} (fallback: {fallback})")]
    Unavailable { endpoint: String, fallback: String },
    /// Malformed JSON in an import file or response body.
    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures raised by a key-value backend.
///
/// Converted into log lines and empty results by `StorageAdapter`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
