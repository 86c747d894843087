//! Error types for the actuator boundary.

use thiserror::Error;

/// Actuator error enumeration.
///
/// Implementations report failure through these variants and must not
/// panic across the boundary.
#[derive(Debug, Error, Clone)]
pub enum ActuatorError {
    /// The browser session was closed underneath the caller.
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// The session could not be opened.
    #[error("Session open failed: {0}")]
    OpenFailed(String),

    /// Navigation did not complete.
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// No element matched the requested target.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// An operation failed for a reason the actuator could name.
    #[error("Operation '{operation}' failed: {reason}")]
    OperationFailed { operation: String, reason: String },

    /// The operation did not finish within its deadline.
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl ActuatorError {
    /// Whether retrying the same call could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ActuatorError::Timeout(_) | ActuatorError::ElementNotFound(_)
        )
    }

    /// Whether the session is gone and the run must stop.
    pub fn is_session_closed(&self) -> bool {
        matches!(self, ActuatorError::SessionClosed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ActuatorError::Timeout("click".into()).is_retryable());
        assert!(!ActuatorError::SessionClosed("gone".into()).is_retryable());
        assert!(ActuatorError::SessionClosed("gone".into()).is_session_closed());
        assert!(!ActuatorError::NavigationFailed("dns".into()).is_session_closed());
    }
}
