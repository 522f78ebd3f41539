//! Chat transport error types

use std::time::Duration;
use thiserror::Error;

/// Errors from the chat surface
#[derive(Debug, Error)]
pub enum ChatError {
    /// Rate limited by the API, with the wait it asked for
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Bot API rejected the call
    #[error("API error {code}: {description}")]
    Api { code: u16, description: String },

    /// Network-level failure
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Response body didn't match expectations
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChatError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, ChatError::RateLimited { .. })
    }

    /// Wait the API asked for, if this is a rate limit error
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ChatError::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }

    /// Edits and deletes racing a vanished message come back as 400s;
    /// flows treat those as already-done rather than failures
    pub fn is_bad_request(&self) -> bool {
        matches!(self, ChatError::Api { code: 400, .. })
    }
}
