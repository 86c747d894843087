//! Execution state - the single mutable aggregate a run threads through
//! every phase.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tour_model::{ActionPlan, TourStep};

/// How much continuity drift the run tolerates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdaptationStrategy {
    /// Exact step ordering, no drift.
    #[default]
    Strict,

    /// Tolerates bounded drift once.
    Flexible,

    /// Tolerates bounded drift and one sequence gap.
    Adaptive,
}

impl AdaptationStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            AdaptationStrategy::Strict => "strict",
            AdaptationStrategy::Flexible => "flexible",
            AdaptationStrategy::Adaptive => "adaptive",
        }
    }
}

/// Engine phase enumeration. One iteration of the loop walks
/// Analyzing → Discovering → Executing → Validating → Adapting →
/// Advancing; Initializing and Completing bracket the loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnginePhase {
    Initializing,
    Analyzing,
    Discovering,
    Executing,
    Validating,
    Adapting,
    Advancing,
    Completing,
}

impl EnginePhase {
    pub fn name(&self) -> &'static str {
        match self {
            EnginePhase::Initializing => "initializing",
            EnginePhase::Analyzing => "analyzing",
            EnginePhase::Discovering => "discovering",
            EnginePhase::Executing => "executing",
            EnginePhase::Validating => "validating",
            EnginePhase::Adapting => "adapting",
            EnginePhase::Advancing => "advancing",
            EnginePhase::Completing => "completing",
        }
    }
}

/// Mutable state of one plan run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionState {
    /// The plan being executed. Read-only except for in-place action
    /// replacement during intelligent retry.
    pub plan: ActionPlan,

    /// Plan position currently being processed.
    pub current_index: usize,

    /// Positions that completed successfully.
    pub completed: BTreeSet<usize>,

    /// Positions that terminally failed.
    pub failed: BTreeSet<usize>,

    /// The subset of failed positions that were classified critical.
    pub critical_failed: BTreeSet<usize>,

    /// Append-only log of processed positions.
    pub tour_steps: Vec<TourStep>,

    /// Intelligent retries consumed so far.
    pub retry_count: u32,

    /// Intelligent-retry budget.
    pub max_retries: u32,

    /// Current continuity tolerance.
    pub adaptation_strategy: AdaptationStrategy,

    /// Key/value bag filled by extract and evaluate actions.
    pub extracted_data: BTreeMap<String, serde_json::Value>,

    /// The overall goal of the run.
    pub goal: String,

    /// Feature usage context supplied by the caller.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_context: Option<String>,

    /// Narrative of notable decisions, for the final report.
    pub reasoning_trace: Vec<String>,

    /// Whether the run reached a terminal state.
    pub is_complete: bool,

    /// Final verdict, meaningful once `is_complete` is set.
    pub success: bool,

    pub started_at: DateTime<Utc>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,

    /// Most recent error, kept for the final report.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    /// Set when a validated failure schedules the current position for
    /// another attempt; consumed by the advancing phase.
    #[serde(skip)]
    pub retry_scheduled: bool,
}

impl ExecutionState {
    pub fn new(
        plan: ActionPlan,
        goal: impl Into<String>,
        feature_context: Option<String>,
        max_retries: u32,
    ) -> Self {
        Self {
            plan,
            current_index: 0,
            completed: BTreeSet::new(),
            failed: BTreeSet::new(),
            critical_failed: BTreeSet::new(),
            tour_steps: Vec::new(),
            retry_count: 0,
            max_retries,
            adaptation_strategy: AdaptationStrategy::default(),
            extracted_data: BTreeMap::new(),
            goal: goal.into(),
            feature_context,
            reasoning_trace: Vec::new(),
            is_complete: false,
            success: false,
            started_at: Utc::now(),
            finished_at: None,
            last_error: None,
            retry_scheduled: false,
        }
    }

    /// Number of terminally processed positions.
    pub fn processed(&self) -> usize {
        self.completed.len() + self.failed.len()
    }

    /// Running failure rate over the positions touched so far.
    pub fn failure_rate(&self) -> f64 {
        self.failed.len() as f64 / (self.current_index + 1) as f64
    }

    /// Fraction of the whole plan that completed.
    pub fn success_rate(&self) -> f64 {
        if self.plan.is_empty() {
            return 0.0;
        }
        self.completed.len() as f64 / self.plan.len() as f64
    }

    /// Record a successful position.
    pub fn record_success(&mut self, index: usize, step: TourStep) {
        self.completed.insert(index);
        self.tour_steps.push(step);
    }

    /// Record a terminally failed position.
    pub fn record_failure(&mut self, index: usize, step: TourStep, critical: bool) {
        self.failed.insert(index);
        if critical {
            self.critical_failed.insert(index);
        }
        if let Some(error) = &step.error_message {
            self.last_error = Some(error.clone());
        }
        self.tour_steps.push(step);
    }

    /// Append to the reasoning narrative.
    pub fn note(&mut self, entry: impl Into<String>) {
        self.reasoning_trace.push(entry.into());
    }

    /// Mark the run terminal.
    pub fn finish(&mut self, success: bool) {
        self.is_complete = true;
        self.success = success;
        self.finished_at = Some(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_model::{ActionDetail, PlannedAction};

    fn plan(n: usize) -> ActionPlan {
        let actions = (0..n)
            .map(|i| {
                PlannedAction::new(ActionDetail::Click { target: None }, format!("step {}", i))
            })
            .collect();
        ActionPlan::new("demo", actions)
    }

    fn step(order: usize, success: bool) -> TourStep {
        let action = PlannedAction::new(ActionDetail::Click { target: None }, "x");
        if success {
            TourStep::succeeded(order, action, None)
        } else {
            TourStep::failed(order, action, None, "boom")
        }
    }

    #[test]
    fn test_rates() {
        let mut state = ExecutionState::new(plan(5), "demo", None, 3);
        state.record_success(0, step(0, true));
        state.record_failure(1, step(1, false), false);
        state.current_index = 1;

        assert_eq!(state.processed(), 2);
        assert_eq!(state.failure_rate(), 0.5);
        assert_eq!(state.success_rate(), 0.2);
        assert_eq!(state.last_error.as_deref(), Some("boom"));
    }

    #[test]
    fn test_critical_failures_tracked_separately() {
        let mut state = ExecutionState::new(plan(2), "demo", None, 3);
        state.record_failure(0, step(0, false), true);
        state.record_failure(1, step(1, false), false);
        assert_eq!(state.failed.len(), 2);
        assert_eq!(state.critical_failed.len(), 1);
        assert!(state.critical_failed.contains(&0));
    }

    #[test]
    fn test_finish_stamps_end_time() {
        let mut state = ExecutionState::new(plan(1), "demo", None, 3);
        assert!(state.finished_at.is_none());
        state.finish(true);
        assert!(state.is_complete);
        assert!(state.success);
        assert!(state.finished_at.is_some());
    }
}
