//! Error types for the perception boundary.

use thiserror::Error;

/// Perception error enumeration.
#[derive(Debug, Error, Clone)]
pub enum PerceptionError {
    /// The service could not be reached.
    #[error("Perception service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service answered with a payload that does not parse into the
    /// typed contract.
    #[error("Malformed perception response: {0}")]
    MalformedResponse(String),

    /// The service did not answer within its deadline.
    #[error("Perception call timed out: {0}")]
    Timeout(String),

    /// The service declined the request (bad input, quota, policy).
    #[error("Perception request rejected: {0}")]
    Rejected(String),
}

impl PerceptionError {
    /// Whether retrying the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PerceptionError::ServiceUnavailable(_) | PerceptionError::Timeout(_)
        )
    }
}
