//! Tour steps - the append-only audit trail of executed plan positions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use webtour_core_types::TargetRef;

use crate::action::PlannedAction;

/// An immutable record of one processed plan position.
///
/// Appended exactly once per position, at its terminal disposition, and
/// never mutated afterwards; the final success rate is computed from
/// these records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TourStep {
    /// Plan position this record covers.
    pub order: usize,

    /// The action as attempted (after any regeneration).
    pub action: PlannedAction,

    /// Final selector or coordinates used, if the action was targeted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_target: Option<TargetRef>,

    /// Description of the intent at execution time.
    pub description: String,

    /// When the record was appended.
    pub timestamp: DateTime<Utc>,

    /// Whether the position completed successfully.
    pub success: bool,

    /// Failure detail, present only on failed steps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl TourStep {
    /// Record a successfully completed position.
    pub fn succeeded(order: usize, action: PlannedAction, resolved_target: Option<TargetRef>) -> Self {
        let description = action.description.clone();
        Self {
            order,
            action,
            resolved_target,
            description,
            timestamp: Utc::now(),
            success: true,
            error_message: None,
        }
    }

    /// Record a failed position.
    pub fn failed(
        order: usize,
        action: PlannedAction,
        resolved_target: Option<TargetRef>,
        error_message: impl Into<String>,
    ) -> Self {
        let description = action.description.clone();
        Self {
            order,
            action,
            resolved_target,
            description,
            timestamp: Utc::now(),
            success: false,
            error_message: Some(error_message.into()),
        }
    }
}
