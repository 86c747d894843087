//! Cascade orchestration: run strategies in order, pick the best match.

use std::sync::Arc;

use browser_bridge::{BrowserActuator, PageContext};
use perception_bridge::PerceptionClient;
use tour_model::PlannedAction;
use tracing::{debug, info, warn};

use crate::errors::DiscoveryError;
use crate::strategies::{
    AttributePatternStrategy, CoordinateStrategy, DiscoveryStrategy, FallbackStrategy,
    SemanticStrategy, TextMatchStrategy,
};
use crate::types::{DiscoveryResult, TargetMatch};

/// Runs the fixed strategy cascade for one action at a time.
pub struct DiscoveryEngine {
    strategies: Vec<Arc<dyn DiscoveryStrategy>>,
}

impl DiscoveryEngine {
    /// Build the engine with the standard cascade.
    pub fn new(actuator: Arc<dyn BrowserActuator>, perception: Arc<dyn PerceptionClient>) -> Self {
        let strategies: Vec<Arc<dyn DiscoveryStrategy>> = vec![
            Arc::new(SemanticStrategy::new(perception.clone(), actuator.clone())),
            Arc::new(TextMatchStrategy::new()),
            Arc::new(AttributePatternStrategy::new(actuator.clone())),
            Arc::new(CoordinateStrategy::new(perception)),
            Arc::new(FallbackStrategy::new(actuator)),
        ];
        Self { strategies }
    }

    /// Build the engine with a custom strategy list (tests, tuning).
    pub fn with_strategies(strategies: Vec<Arc<dyn DiscoveryStrategy>>) -> Self {
        Self { strategies }
    }

    /// Resolve an action description to a concrete target.
    ///
    /// Short-circuits on the first strategy whose best candidate clears
    /// the confidence floor. A strategy error counts as "no match". When
    /// every strategy comes up empty the result carries `best_match:
    /// None` and a recommendation; it never errors for that case.
    pub async fn discover(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        extra_context: &str,
    ) -> Result<DiscoveryResult, DiscoveryError> {
        if action.description.trim().is_empty() {
            return Err(DiscoveryError::InvalidRequest(
                "action description is empty".to_string(),
            ));
        }
        if !context.supports_discovery() {
            return Err(DiscoveryError::InvalidRequest(
                "page context lacks a URL plus DOM snapshot or screenshot".to_string(),
            ));
        }

        info!("Discovering target: {}", action.description);
        let mut all_candidates: Vec<TargetMatch> = Vec::new();

        for strategy in &self.strategies {
            if !strategy.applies_to(action, context) {
                debug!("Strategy {} not applicable, skipping", strategy.name());
                continue;
            }
            debug!("Trying strategy: {}", strategy.name());

            let candidates = match strategy.discover(action, context, extra_context).await {
                Ok(candidates) => candidates,
                Err(e) => {
                    warn!("Strategy {} failed: {}", strategy.name(), e);
                    continue;
                }
            };
            if candidates.is_empty() {
                debug!("Strategy {} returned no candidates", strategy.name());
                continue;
            }

            let best = best_candidate(&candidates);
            if let Some(best) = best {
                if best.above_floor() {
                    info!(
                        "Resolved target using {} strategy (confidence: {:.2})",
                        strategy.name(),
                        best.confidence
                    );
                    let best = best.clone();
                    return Ok(DiscoveryResult::found(
                        action.description.clone(),
                        strategy.kind(),
                        candidates,
                        best,
                    ));
                }
                debug!(
                    "Strategy {} best candidate below floor ({:.2})",
                    strategy.name(),
                    best.confidence
                );
            }
            all_candidates.extend(candidates);
        }

        let best_seen = best_candidate(&all_candidates)
            .map(|c| format!(" (best seen confidence {:.2})", c.confidence))
            .unwrap_or_default();
        Ok(DiscoveryResult::not_found(
            action.description.clone(),
            all_candidates,
            format!(
                "No candidate cleared the confidence floor for '{}'{}. \
                 Consider refining the description or adding a selector hint.",
                action.description, best_seen
            ),
        ))
    }
}

/// Highest-confidence candidate; ties keep the first found.
fn best_candidate(candidates: &[TargetMatch]) -> Option<&TargetMatch> {
    let mut best: Option<&TargetMatch> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.confidence > current.confidence => best = Some(candidate),
            None => best = Some(candidate),
            _ => {}
        }
    }
    best
}
