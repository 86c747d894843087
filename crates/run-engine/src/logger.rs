//! Run logger boundary - optional structured record of action attempts.

use async_trait::async_trait;
use browser_bridge::PageContext;
use tour_model::PlannedAction;
use tracing::debug;
use webtour_core_types::RunId;

/// Optional observer persisting a structured record of every action
/// attempt. The engine calls it at the attempt boundaries and never
/// depends on its storage format.
#[async_trait]
pub trait RunLogger: Send + Sync {
    /// Record the start of an action attempt.
    async fn log_start(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        metadata: &serde_json::Value,
    ) -> RunId;

    /// Record the attempt's outcome.
    async fn log_complete(&self, run_id: &RunId, success: bool, error: Option<&str>);

    /// Record that a fallback action was executed in place of the
    /// original.
    async fn log_fallback_used(
        &self,
        run_id: &RunId,
        fallback: &PlannedAction,
        success: bool,
        error: Option<&str>,
    );

    /// Record a validation verdict.
    async fn log_validation(&self, run_id: &RunId, success: bool, reasoning: &str, was_critical: bool);
}

/// Logger that records nothing. Used when the caller supplies no logger.
#[derive(Debug, Default)]
pub struct NoopRunLogger;

#[async_trait]
impl RunLogger for NoopRunLogger {
    async fn log_start(
        &self,
        action: &PlannedAction,
        _context: &PageContext,
        _metadata: &serde_json::Value,
    ) -> RunId {
        debug!("Starting action: {}", action.description);
        RunId::new()
    }

    async fn log_complete(&self, _run_id: &RunId, _success: bool, _error: Option<&str>) {}

    async fn log_fallback_used(
        &self,
        _run_id: &RunId,
        _fallback: &PlannedAction,
        _success: bool,
        _error: Option<&str>,
    ) {
    }

    async fn log_validation(
        &self,
        _run_id: &RunId,
        _success: bool,
        _reasoning: &str,
        _was_critical: bool,
    ) {
    }
}
