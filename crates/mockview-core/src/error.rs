//! Collaborator error types.
//!
//! `ProviderError` covers failures talking to a generative model, and is
//! defined here so the feedback engine can log and classify them before
//! falling back to heuristic scoring. `StoreError` covers record-store I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of a generative-model call.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP 429; `retry_after_ms` comes from `retry-after` when present.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// Any other HTTP status of 400 or above.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("network error: {0}")]
    NetworkError(String),

    /// The provider answered but with no usable text.
    #[error("empty response from {0}")]
    EmptyResponse(String),
}

impl ProviderError {
    /// Returns `true` if retrying the same request cannot succeed.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            ProviderError::AuthenticationFailed(_) | ProviderError::ModelNotFound(_)
        )
    }
}

/// Errors raised by record stores.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access record store {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("record store {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
