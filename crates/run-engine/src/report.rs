//! The final report returned by the public entry point.

use serde::{Deserialize, Serialize};
use tour_model::TourStep;

/// Result of one complete run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TourReport {
    /// Overall verdict: no critical failure and more than half of the
    /// plan completed.
    pub success: bool,

    /// The audit trail, one record per processed plan position.
    pub steps: Vec<TourStep>,

    /// Length of the plan.
    pub total_steps: usize,

    /// Wall-clock duration of the run.
    pub processing_time_ms: u64,

    /// URL the browser ended on, when it could still be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,

    /// Terminal error, when the run did not succeed cleanly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// completed positions / plan length.
    pub success_rate: f64,
}

impl TourReport {
    /// Number of steps that succeeded.
    pub fn completed_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.success).count()
    }
}
