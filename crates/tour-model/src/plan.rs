//! Action plans - ordered sequences of planned actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::{ActionKind, PlannedAction};

/// An ordered sequence of planned actions for one feature tour.
///
/// Created once by an external planning step; read-only to the engine
/// except for in-place action replacement during intelligent retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPlan {
    /// Name of the feature this tour demonstrates.
    pub feature_name: String,

    /// Ordered actions.
    actions: Vec<PlannedAction>,

    /// Aggregate counts by action kind.
    pub counts: BTreeMap<ActionKind, usize>,

    /// Sum of the per-action duration estimates.
    pub estimated_duration_secs: u64,
}

impl ActionPlan {
    /// Build a plan, computing the per-kind counts and duration estimate.
    pub fn new(feature_name: impl Into<String>, actions: Vec<PlannedAction>) -> Self {
        let mut counts = BTreeMap::new();
        let mut estimated_duration_secs = 0;
        for action in &actions {
            *counts.entry(action.kind()).or_insert(0) += 1;
            estimated_duration_secs += action.estimated_duration_secs.unwrap_or(0);
        }
        Self {
            feature_name: feature_name.into(),
            actions,
            counts,
            estimated_duration_secs,
        }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action at a plan position, if in range.
    pub fn get(&self, index: usize) -> Option<&PlannedAction> {
        self.actions.get(index)
    }

    pub fn actions(&self) -> &[PlannedAction] {
        &self.actions
    }

    /// Substitute a regenerated action at the same plan position.
    ///
    /// This is the only mutation the plan supports after authoring.
    /// Returns false when the index is out of range.
    pub fn replace(&mut self, index: usize, action: PlannedAction) -> bool {
        match self.actions.get_mut(index) {
            Some(slot) => {
                let old_kind = slot.kind();
                let new_kind = action.kind();
                if old_kind != new_kind {
                    *self.counts.entry(old_kind).or_insert(1) -= 1;
                    *self.counts.entry(new_kind).or_insert(0) += 1;
                }
                *slot = action;
                true
            }
            None => false,
        }
    }
}
