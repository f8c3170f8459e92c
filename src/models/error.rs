//! Error types for the Meridian SDK.
//!
//! Epistemic taxonomy:
//! - B_i falsified: Expected failures (not found, already exists, invalid input)
//! - I^B materialized: Infrastructure failures (network, non-2xx responses)
//! - K_i violated: Internal invariant violations (bugs)

use std::time::Duration;

use thiserror::Error;

/// Top-level error type for the Meridian SDK.
#[derive(Debug, Error)]
pub enum MeridianError {
    // ═══════════════════════════════════════════════════════════════════
    // B_i FALSIFIED — Belief proven wrong (expected failures)
    // ═══════════════════════════════════════════════════════════════════
    #[error("Configuration error: {0}")]
    Config(#[from] super::ConfigError),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid routing constraint: {0}")]
    InvalidConstraint(String),

    #[error("Malformed resource name: {0:?} (expected '.../{{kind}}/{{id}}')")]
    MalformedResourceName(String),

    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    #[error("{resource} already exists: {id}")]
    AlreadyExists { resource: &'static str, id: String },

    // ═══════════════════════════════════════════════════════════════════
    // I^B MATERIALIZED — Bounded ignorance became known-bad
    // ═══════════════════════════════════════════════════════════════════
    #[error("Request failed (status {status}): {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Training job {job_id} did not reach a terminal state within {waited:?}")]
    Timeout { job_id: String, waited: Duration },

    #[error("Parse error: {0}")]
    Parse(String),

    // ═══════════════════════════════════════════════════════════════════
    // K_i VIOLATED — Invariant broken (bug, should not happen)
    // ═══════════════════════════════════════════════════════════════════
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MeridianError {
    /// A typed not-found error for the given resource kind and id.
    pub fn not_found(resource: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            id: id.into(),
        }
    }

    /// A typed already-exists error for the given resource kind and id.
    pub fn already_exists(resource: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource,
            id: id.into(),
        }
    }

    /// Wrap a non-2xx response the caller could not otherwise classify.
    pub fn request_failed(status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            status,
            body: body.into(),
        }
    }

    /// True when retrying the same call later could plausibly succeed.
    ///
    /// The SDK itself never retries; this is a hint for callers.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) | Self::Timeout { .. } => true,
            Self::RequestFailed { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Result type alias for the Meridian SDK.
pub type Result<T> = std::result::Result<T, MeridianError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(MeridianError::request_failed(503, "unavailable").is_retryable());
        assert!(MeridianError::request_failed(429, "slow down").is_retryable());
        assert!(!MeridianError::request_failed(400, "bad request").is_retryable());
        assert!(!MeridianError::not_found("judge", "j1").is_retryable());
    }

    #[test]
    fn test_messages_carry_ids() {
        let err = MeridianError::not_found("router", "my-router");
        assert!(err.to_string().contains("my-router"));

        let err = MeridianError::Timeout {
            job_id: "job-7".to_string(),
            waited: Duration::from_secs(30),
        };
        assert!(err.to_string().contains("job-7"));
    }
}
