//! The perception client trait.

use async_trait::async_trait;
use browser_bridge::{PageContext, Screenshot};
use tour_model::PlannedAction;

use crate::errors::PerceptionError;
use crate::types::{CoordinateProposal, TargetProposal, ValidationVerdict};

/// The external vision/semantic service, seen from the engine.
///
/// Given page evidence and a text description, the service proposes
/// candidate targets, validates outcomes, and rewrites failed actions.
/// Implementations parse the service's raw responses with the helpers in
/// [`crate::payload`] so malformed answers surface as typed errors.
#[async_trait]
pub trait PerceptionClient: Send + Sync {
    /// Propose ranked selector candidates for a described target.
    async fn propose_targets(
        &self,
        description: &str,
        context: &PageContext,
        extra_context: &str,
    ) -> Result<Vec<TargetProposal>, PerceptionError>;

    /// Propose ranked pixel candidates from a screenshot.
    async fn propose_coordinates(
        &self,
        description: &str,
        screenshot: &Screenshot,
        extra_context: &str,
    ) -> Result<Vec<CoordinateProposal>, PerceptionError>;

    /// Judge whether an executed action achieved its expected outcome.
    async fn validate_outcome(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        expected_outcome: &str,
    ) -> Result<ValidationVerdict, PerceptionError>;

    /// Produce an improved action after a validated failure.
    async fn regenerate_action(
        &self,
        failed_action: &PlannedAction,
        failure_reason: &str,
        context: &PageContext,
        goal: &str,
        attempt: u32,
    ) -> Result<PlannedAction, PerceptionError>;
}
