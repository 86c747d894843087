//! Error taxonomy for the execution engine.

use thiserror::Error;

/// Engine error enumeration.
///
/// Nothing here escapes the public entry point; terminal errors are
/// rendered into the final report's `error` field.
#[derive(Debug, Error, Clone)]
pub enum EngineError {
    /// The actuator session could not open. Always fatal.
    #[error("Initialization failed: {0}")]
    Initialization(String),

    /// No discovery candidate cleared the confidence floor. Recoverable;
    /// execution proceeds best-effort on the plan's own hints.
    #[error("Discovery failed: {0}")]
    Discovery(String),

    /// An actuator call failed while executing an action.
    #[error("Action '{description}' failed: {reason}")]
    ActionExecution { description: String, reason: String },

    /// The expected outcome was not observed.
    #[error("Validation failed for '{description}': {reason}")]
    Validation { description: String, reason: String },

    /// The continuity invariant broke. Always fatal, any strategy.
    #[error("Step order violation: {0}")]
    StepOrderViolation(String),

    /// A critical action failed outright or exhausted its retries.
    #[error("Critical failure: {0}")]
    CriticalFailure(String),

    /// The browser session disappeared underneath the run.
    #[error("Session closed: {0}")]
    SessionClosed(String),

    /// The run was cancelled from outside.
    #[error("Run cancelled: {0}")]
    Cancelled(String),
}

impl EngineError {
    /// Whether this error terminates the run on the spot.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            EngineError::Initialization(_)
                | EngineError::StepOrderViolation(_)
                | EngineError::CriticalFailure(_)
                | EngineError::SessionClosed(_)
                | EngineError::Cancelled(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(EngineError::Initialization("no browser".into()).is_fatal());
        assert!(EngineError::StepOrderViolation("gap".into()).is_fatal());
        assert!(!EngineError::Discovery("nothing above floor".into()).is_fatal());
        assert!(!EngineError::Validation {
            description: "click save".into(),
            reason: "dialog still open".into()
        }
        .is_fatal());
    }
}
