//! Step continuity validation - the safety net against skipped or
//! duplicated plan positions.

use thiserror::Error;

use crate::state::{AdaptationStrategy, ExecutionState};

/// Continuity violation enumeration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ContinuityViolation {
    /// The cursor and the processed count disagree.
    #[error("Index drift: cursor at {cursor}, {processed} positions processed")]
    IndexDrift { cursor: usize, processed: usize },

    /// The processed positions are not a contiguous prefix of the plan.
    #[error("Sequence gap: {gaps} positions missing below {max_seen}")]
    SequenceGap { gaps: usize, max_seen: usize },
}

/// Checks that the run processes plan positions in order, without skips
/// or duplicates.
///
/// Strict mode demands an exact match. Flexible/adaptive modes tolerate
/// [`Self::DEFAULT_MAX_DRIFT`] positions of drift and one sequence gap,
/// once; a second tolerated violation in the same run still halts.
#[derive(Debug, Default)]
pub struct ContinuityValidator {
    tolerated: u32,
}

impl ContinuityValidator {
    /// Drift allowed under flexible/adaptive modes. One position matches
    /// the observed behavior of discovery-driven retries; treat it as a
    /// tunable, not a domain law.
    pub const DEFAULT_MAX_DRIFT: usize = 1;

    /// Gaps allowed in the processed sequence under flexible/adaptive.
    pub const DEFAULT_MAX_GAPS: usize = 1;

    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the state after an advance. Ok(()) means the run may
    /// continue.
    pub fn check(&mut self, state: &ExecutionState) -> Result<(), ContinuityViolation> {
        let cursor = state.current_index;
        let processed = state.processed();

        let drift = cursor.abs_diff(processed);
        let gaps = sequence_gaps(state);

        match state.adaptation_strategy {
            AdaptationStrategy::Strict => {
                if drift != 0 {
                    return Err(ContinuityViolation::IndexDrift { cursor, processed });
                }
                if gaps > 0 {
                    return Err(self.gap_violation(state));
                }
                Ok(())
            }
            AdaptationStrategy::Flexible | AdaptationStrategy::Adaptive => {
                if drift > Self::DEFAULT_MAX_DRIFT {
                    return Err(ContinuityViolation::IndexDrift { cursor, processed });
                }
                if gaps > Self::DEFAULT_MAX_GAPS {
                    return Err(self.gap_violation(state));
                }
                if drift > 0 || gaps > 0 {
                    self.tolerated += 1;
                    if self.tolerated > 1 {
                        return Err(ContinuityViolation::IndexDrift { cursor, processed });
                    }
                }
                Ok(())
            }
        }
    }

    fn gap_violation(&self, state: &ExecutionState) -> ContinuityViolation {
        let max_seen = state
            .completed
            .iter()
            .chain(state.failed.iter())
            .copied()
            .max()
            .unwrap_or(0);
        ContinuityViolation::SequenceGap {
            gaps: sequence_gaps(state),
            max_seen,
        }
    }
}

/// Count positions missing from the processed set below its maximum.
fn sequence_gaps(state: &ExecutionState) -> usize {
    let processed: std::collections::BTreeSet<usize> = state
        .completed
        .iter()
        .chain(state.failed.iter())
        .copied()
        .collect();
    match processed.iter().next_back() {
        Some(&max) => (0..=max).filter(|i| !processed.contains(i)).count(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_model::{ActionDetail, ActionPlan, PlannedAction, TourStep};

    fn state(n: usize) -> ExecutionState {
        let actions = (0..n)
            .map(|i| {
                PlannedAction::new(ActionDetail::Click { target: None }, format!("step {}", i))
            })
            .collect();
        ExecutionState::new(ActionPlan::new("demo", actions), "demo", None, 3)
    }

    fn mark(state: &mut ExecutionState, index: usize, success: bool) {
        let action = state.plan.get(index).unwrap().clone();
        if success {
            state.record_success(index, TourStep::succeeded(index, action, None));
        } else {
            state.record_failure(index, TourStep::failed(index, action, None, "x"), false);
        }
    }

    #[test]
    fn test_strict_accepts_contiguous_progress() {
        let mut state = state(3);
        mark(&mut state, 0, true);
        mark(&mut state, 1, false);
        state.current_index = 2;

        let mut validator = ContinuityValidator::new();
        assert!(validator.check(&state).is_ok());
    }

    #[test]
    fn test_strict_rejects_drift() {
        let mut state = state(3);
        mark(&mut state, 0, true);
        state.current_index = 2;

        let mut validator = ContinuityValidator::new();
        assert_eq!(
            validator.check(&state),
            Err(ContinuityViolation::IndexDrift {
                cursor: 2,
                processed: 1
            })
        );
    }

    #[test]
    fn test_strict_rejects_gap() {
        let mut state = state(4);
        mark(&mut state, 0, true);
        mark(&mut state, 2, true);
        state.current_index = 2;

        let mut validator = ContinuityValidator::new();
        assert!(matches!(
            validator.check(&state),
            Err(ContinuityViolation::SequenceGap { gaps: 1, .. })
        ));
    }

    #[test]
    fn test_flexible_tolerates_one_drift_then_halts() {
        let mut state = state(4);
        state.adaptation_strategy = AdaptationStrategy::Flexible;
        mark(&mut state, 0, true);
        state.current_index = 2;

        let mut validator = ContinuityValidator::new();
        assert!(validator.check(&state).is_ok());
        // Same bounded drift a second time in one run is no longer
        // tolerated.
        assert!(validator.check(&state).is_err());
    }

    #[test]
    fn test_adaptive_still_rejects_large_drift() {
        let mut state = state(5);
        state.adaptation_strategy = AdaptationStrategy::Adaptive;
        mark(&mut state, 0, true);
        state.current_index = 3;

        let mut validator = ContinuityValidator::new();
        assert!(validator.check(&state).is_err());
    }
}
