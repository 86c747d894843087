//! The execution state machine.
//!
//! Fixed transition topology:
//!
//! ```text
//! Initializing -> { Analyzing -> Discovering -> Executing -> Validating
//!                   -> Adapting -> Advancing } (loop) -> Completing
//! ```
//!
//! with `CriticalFailure` and `Errored` as absorbing exits. One engine
//! instance drives one browser session; the loop is single-threaded and
//! cooperative, suspending only on actuator and perception calls.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use browser_bridge::{ActuatorError, BrowserActuator, PageContext};
use perception_bridge::verdict::{analyze_outcome_text, find_failure_indicator};
use perception_bridge::{PerceptionClient, PerceptionError, ValidationVerdict};
use serde_json::json;
use tokio::time::{sleep, timeout, Duration};
use tokio_util::sync::CancellationToken;
use tour_model::{ActionDetail, ActionPlan, Credentials, PlannedAction, TourStep};
use tracing::{debug, info, warn};
use webtour_core_types::{RunId, TargetRef};

use crate::config::EngineConfig;
use crate::continuity::ContinuityValidator;
use crate::delta::compute_delta;
use crate::errors::EngineError;
use crate::failure::{build_fallback, is_critical, same_domain};
use crate::logger::{NoopRunLogger, RunLogger};
use crate::report::TourReport;
use crate::state::{AdaptationStrategy, EnginePhase, ExecutionState};
use target_discovery::DiscoveryEngine;

/// Terminal disposition of the loop.
enum Terminal {
    Completed,
    Critical(String),
    Errored(EngineError),
}

/// Side effect of executing one action.
enum ExecEffect {
    None,
    Extracted(String, serde_json::Value),
}

/// The adaptive plan-execution engine.
pub struct TourEngine {
    actuator: Arc<dyn BrowserActuator>,
    perception: Arc<dyn PerceptionClient>,
    discovery: DiscoveryEngine,
    logger: Arc<dyn RunLogger>,
    config: EngineConfig,
    cancel: CancellationToken,
}

impl TourEngine {
    /// Create an engine over an actuator and a perception client.
    pub fn new(actuator: Arc<dyn BrowserActuator>, perception: Arc<dyn PerceptionClient>) -> Self {
        let discovery = DiscoveryEngine::new(actuator.clone(), perception.clone());
        Self {
            actuator,
            perception,
            discovery,
            logger: Arc::new(NoopRunLogger),
            config: EngineConfig::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a run logger.
    pub fn with_logger(mut self, logger: Arc<dyn RunLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Token that aborts the run when cancelled. The loop observes it at
    /// the top of every iteration.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Execute a plan to completion. Never panics and never returns an
    /// error: every outcome is rendered into the report.
    pub async fn run(
        &self,
        plan: ActionPlan,
        goal: &str,
        feature_context: Option<&str>,
        credentials: Option<Credentials>,
    ) -> TourReport {
        let started = Instant::now();
        let total_steps = plan.len();
        info!(
            "Starting tour '{}': {} actions, goal: {}",
            plan.feature_name, total_steps, goal
        );

        let mut state = ExecutionState::new(
            plan,
            goal,
            feature_context.map(str::to_string),
            self.config.max_retries,
        );
        let mut continuity = ContinuityValidator::new();
        let extra_context = match feature_context {
            Some(feature) => format!("{}\n\nFeature usage:\n{}", goal, feature),
            None => goal.to_string(),
        };

        let terminal = self
            .drive(&mut state, &mut continuity, &extra_context, credentials.as_ref())
            .await;

        match terminal {
            Terminal::Completed => {
                let rate = state.success_rate();
                let success = state.critical_failed.is_empty() && rate > 0.5;
                if !success && state.last_error.is_none() {
                    state.last_error = Some(format!(
                        "completed {} of {} steps; success rate {:.2} is not above 0.5",
                        state.completed.len(),
                        total_steps,
                        rate
                    ));
                }
                state.finish(success);
            }
            Terminal::Critical(message) => {
                warn!("Run ended in critical failure: {}", message);
                state.last_error = Some(message);
                state.finish(false);
            }
            Terminal::Errored(error) => {
                warn!("Run errored: {}", error);
                state.last_error = Some(error.to_string());
                state.finish(false);
            }
        }

        let final_url = self.actuator.current_url().await.ok();
        if let Err(e) = self.actuator.close().await {
            debug!("Session close reported: {}", e);
        }
        let error = if state.success {
            None
        } else {
            state.last_error.clone()
        };
        info!(
            "Tour finished: success={}, rate={:.2}, {} steps recorded",
            state.success,
            state.success_rate(),
            state.tour_steps.len()
        );

        TourReport {
            success: state.success,
            steps: state.tour_steps.clone(),
            total_steps,
            processing_time_ms: started.elapsed().as_millis() as u64,
            final_url,
            error,
            success_rate: state.success_rate(),
        }
    }

    /// Drive the loop from Initializing to a terminal disposition.
    async fn drive(
        &self,
        state: &mut ExecutionState,
        continuity: &mut ContinuityValidator,
        extra_context: &str,
        credentials: Option<&Credentials>,
    ) -> Terminal {
        enter(EnginePhase::Initializing);
        if let Err(error) = self.initialize(state).await {
            return Terminal::Errored(error);
        }

        loop {
            if self.cancel.is_cancelled() {
                return Terminal::Errored(EngineError::Cancelled(
                    "cancellation token triggered".to_string(),
                ));
            }

            enter(EnginePhase::Analyzing);
            if state.current_index >= state.plan.len() {
                enter(EnginePhase::Completing);
                return Terminal::Completed;
            }
            let context = match self.observe_page().await {
                Ok(context) => context,
                Err(error) => return Terminal::Errored(error),
            };
            let index = state.current_index;
            let mut action = match state.plan.get(index) {
                Some(action) => action.clone(),
                None => {
                    enter(EnginePhase::Completing);
                    return Terminal::Completed;
                }
            };
            debug!("Position {}: {}", index, action.description);

            enter(EnginePhase::Discovering);
            let mut target = self.discover_target(state, &action, &context, extra_context).await;
            if let Some(resolved) = &target {
                action.detail.set_target(resolved.clone());
            } else {
                target = action.planned_target();
            }

            enter(EnginePhase::Executing);
            let metadata = json!({ "plan_index": index, "goal": state.goal });
            let run_id = self.logger.log_start(&action, &context, &metadata).await;

            let mut executed = true;
            match self
                .execute_action(&action, target.as_ref(), credentials)
                .await
            {
                Ok(effect) => {
                    self.logger.log_complete(&run_id, true, None).await;
                    apply_effect(state, effect);
                }
                Err(EngineError::SessionClosed(reason)) => {
                    return Terminal::Errored(EngineError::SessionClosed(reason));
                }
                Err(error) => {
                    self.logger
                        .log_complete(&run_id, false, Some(&error.to_string()))
                        .await;
                    match self
                        .handle_execution_failure(
                            state,
                            &run_id,
                            &mut action,
                            &mut target,
                            &context,
                            credentials,
                            error,
                        )
                        .await
                    {
                        FailureOutcome::Recovered => {}
                        FailureOutcome::Accepted => executed = false,
                        FailureOutcome::Fatal(terminal) => return terminal,
                    }
                }
            }

            if executed {
                enter(EnginePhase::Validating);
                let post_context = match self.observe_page().await {
                    Ok(context) => context,
                    Err(error) => return Terminal::Errored(error),
                };
                if let Some(delta) = compute_delta(&context, &post_context) {
                    debug!("Page delta: {}", delta.impact_summary);
                    state.note(format!("page delta: {}", delta.impact_summary));
                }

                let verdict = self.assess_outcome(&action, &post_context).await;
                let critical = is_critical(&action, state);
                self.logger
                    .log_validation(&run_id, verdict.success, &verdict.reasoning, critical)
                    .await;

                if verdict.success {
                    state.record_success(index, TourStep::succeeded(index, action.clone(), target));
                } else if state.retry_count >= state.max_retries {
                    let message = EngineError::Validation {
                        description: action.description.clone(),
                        reason: verdict.reasoning.clone(),
                    }
                    .to_string();
                    let step = TourStep::failed(index, action.clone(), target, &message);
                    if critical {
                        state.record_failure(index, step, true);
                        return Terminal::Critical(message);
                    }
                    state.record_failure(index, step, false);
                    state.note(format!(
                        "accepted failure at position {} after exhausting retries",
                        index
                    ));
                } else {
                    self.schedule_retry(state, &action, &verdict, &post_context)
                        .await;
                }
            }

            enter(EnginePhase::Adapting);
            self.adapt(state);

            enter(EnginePhase::Advancing);
            if let Err(error) = advance(state, continuity) {
                return Terminal::Errored(error);
            }

            if self.config.step_pause_ms > 0 {
                sleep(Duration::from_millis(self.config.step_pause_ms)).await;
            }
        }
    }

    /// Open the session and capture the baseline snapshot. Any failure
    /// here is fatal.
    async fn initialize(&self, state: &mut ExecutionState) -> Result<(), EngineError> {
        self.bound_actuator("open", self.actuator.open())
            .await
            .map_err(|e| EngineError::Initialization(e.to_string()))?;
        let baseline = self
            .bound_actuator("screenshot", self.actuator.screenshot())
            .await
            .map_err(|e| EngineError::Initialization(e.to_string()))?;
        state.note(format!(
            "session opened; baseline viewport {:.0}x{:.0}",
            baseline.viewport.width, baseline.viewport.height
        ));
        Ok(())
    }

    /// Fetch the current page context. Only a closed session is fatal;
    /// everything else degrades to a thinner context.
    async fn observe_page(&self) -> Result<PageContext, EngineError> {
        let url = match self
            .bound_actuator("current_url", self.actuator.current_url())
            .await
        {
            Ok(url) => url,
            Err(e) if e.is_session_closed() => {
                return Err(EngineError::SessionClosed(e.to_string()))
            }
            Err(e) => {
                warn!("Could not read current URL: {}", e);
                String::new()
            }
        };
        let mut context = PageContext::new(url);
        if let Ok(title) = self
            .bound_actuator("current_title", self.actuator.current_title())
            .await
        {
            context = context.with_title(title);
        }
        if let Ok(shot) = self
            .bound_actuator("screenshot", self.actuator.screenshot())
            .await
        {
            context = context.with_screenshot(shot);
        }
        if let Ok(dom) = self
            .bound_actuator("dom_snapshot", self.actuator.dom_snapshot())
            .await
        {
            context = context.with_dom(dom);
        }
        Ok(context)
    }

    /// Run the discovery cascade. Failure is recoverable: the caller
    /// proceeds best-effort on the plan's own hints.
    async fn discover_target(
        &self,
        state: &mut ExecutionState,
        action: &PlannedAction,
        context: &PageContext,
        extra_context: &str,
    ) -> Option<TargetRef> {
        if !action.detail.needs_target() || !context.supports_discovery() {
            return None;
        }
        let deadline = Duration::from_millis(self.config.perception_timeout_ms);
        match timeout(deadline, self.discovery.discover(action, context, extra_context)).await {
            Ok(Ok(result)) => {
                if let Some(best) = &result.best_match {
                    state.note(format!(
                        "discovered target via {} (confidence {:.2})",
                        result
                            .strategy_used
                            .map(|s| s.name())
                            .unwrap_or("unknown"),
                        best.confidence
                    ));
                    return Some(best.target_ref());
                }
                let message = EngineError::Discovery(
                    result
                        .recommendations
                        .unwrap_or_else(|| "no candidate above the confidence floor".to_string()),
                )
                .to_string();
                debug!("{}", message);
                state.note(message);
                None
            }
            Ok(Err(e)) => {
                warn!("Discovery error: {}", e);
                state.note(format!("discovery error: {}", e));
                None
            }
            Err(_) => {
                warn!("Discovery timed out");
                state.note("discovery timed out".to_string());
                None
            }
        }
    }

    /// Map an action onto the actuator and execute it once.
    async fn execute_action(
        &self,
        action: &PlannedAction,
        target: Option<&TargetRef>,
        credentials: Option<&Credentials>,
    ) -> Result<ExecEffect, EngineError> {
        let result = match &action.detail {
            ActionDetail::Navigate {
                url,
                wait_for_selector,
            } => {
                self.bound_actuator(
                    "navigate",
                    self.actuator.navigate(url, wait_for_selector.as_deref()),
                )
                .await
                .map(|_| ExecEffect::None)
            }
            ActionDetail::Click { .. } => {
                let target = require_target(action, target)?;
                self.bound_actuator("click", self.actuator.click(target))
                    .await
                    .map(|_| ExecEffect::None)
            }
            ActionDetail::Type {
                text, clear_first, ..
            } => {
                let target = require_target(action, target)?;
                let text = match credentials {
                    Some(creds) => creds.fill(text),
                    None => text.clone(),
                };
                self.bound_actuator(
                    "type_text",
                    self.actuator.type_text(target, &text, *clear_first),
                )
                .await
                .map(|_| ExecEffect::None)
            }
            ActionDetail::Wait {
                selector,
                duration_ms,
            } => match selector {
                Some(selector) => {
                    let timeout_ms = duration_ms.unwrap_or(self.config.default_wait_ms);
                    self.bound_actuator("wait_for", self.actuator.wait_for(selector, timeout_ms))
                        .await
                        .map(|_| ExecEffect::None)
                }
                None => {
                    sleep(Duration::from_millis(
                        duration_ms.unwrap_or(self.config.default_wait_ms),
                    ))
                    .await;
                    Ok(ExecEffect::None)
                }
            },
            ActionDetail::Extract { key, .. } => {
                let target = require_target(action, target)?;
                let selector = target.selector().ok_or_else(|| {
                    EngineError::ActionExecution {
                        description: action.description.clone(),
                        reason: "extract requires a selector-addressed target".to_string(),
                    }
                })?;
                let dom = self
                    .bound_actuator("dom_snapshot", self.actuator.dom_snapshot())
                    .await;
                match dom {
                    Ok(dom) => match dom.find(selector) {
                        Some(element) => Ok(ExecEffect::Extracted(
                            key.clone(),
                            serde_json::Value::String(element.text.clone()),
                        )),
                        None => Err(ActuatorError::ElementNotFound(selector.to_string())),
                    },
                    Err(e) => Err(e),
                }
            }
            ActionDetail::Evaluate {
                expression,
                store_key,
            } => self
                .bound_actuator("evaluate", self.actuator.evaluate(expression))
                .await
                .map(|value| match store_key {
                    Some(key) => ExecEffect::Extracted(key.clone(), value),
                    None => ExecEffect::None,
                }),
            ActionDetail::Scroll { to } => self
                .bound_actuator("scroll", self.actuator.scroll(to))
                .await
                .map(|_| ExecEffect::None),
            ActionDetail::Select { option_text, .. } => {
                let target = require_target(action, target)?;
                self.bound_actuator("select", self.actuator.select(target, option_text))
                    .await
                    .map(|_| ExecEffect::None)
            }
        };

        result.map_err(|e| map_actuator_error(action, e))
    }

    /// Central handler for an actuator-level failure: try one fallback,
    /// then classify.
    #[allow(clippy::too_many_arguments)]
    async fn handle_execution_failure(
        &self,
        state: &mut ExecutionState,
        run_id: &RunId,
        action: &mut PlannedAction,
        target: &mut Option<TargetRef>,
        context: &PageContext,
        credentials: Option<&Credentials>,
        error: EngineError,
    ) -> FailureOutcome {
        let critical = is_critical(action, state);
        warn!(
            "Action '{}' failed ({}): {}",
            action.description,
            if critical { "critical" } else { "non-critical" },
            error
        );

        let fallback = action
            .fallback_action
            .as_deref()
            .cloned()
            .or_else(|| build_fallback(action, state, &context.url));

        if let Some(fallback_action) = fallback {
            let fallback_target = fallback_action.planned_target();
            match self
                .execute_action(&fallback_action, fallback_target.as_ref(), credentials)
                .await
            {
                Ok(effect) => {
                    info!("Fallback succeeded for '{}'", action.description);
                    self.logger
                        .log_fallback_used(run_id, &fallback_action, true, None)
                        .await;
                    apply_effect(state, effect);
                    state.note(format!(
                        "fallback '{}' recovered position {}",
                        fallback_action.description, state.current_index
                    ));
                    *action = fallback_action;
                    *target = fallback_target;
                    return FailureOutcome::Recovered;
                }
                Err(EngineError::SessionClosed(reason)) => {
                    return FailureOutcome::Fatal(Terminal::Errored(EngineError::SessionClosed(
                        reason,
                    )));
                }
                Err(fallback_error) => {
                    self.logger
                        .log_fallback_used(
                            run_id,
                            &fallback_action,
                            false,
                            Some(&fallback_error.to_string()),
                        )
                        .await;
                    debug!("Fallback also failed: {}", fallback_error);
                }
            }
        }

        let index = state.current_index;
        let step = TourStep::failed(index, action.clone(), target.clone(), error.to_string());
        if critical {
            state.record_failure(index, step, true);
            let message =
                EngineError::CriticalFailure(format!("{} at position {}", error, index)).to_string();
            FailureOutcome::Fatal(Terminal::Critical(message))
        } else {
            state.record_failure(index, step, false);
            state.retry_count += 1;
            FailureOutcome::Accepted
        }
    }

    /// Judge whether an action's expected outcome was observed.
    ///
    /// Pure over its inputs: the same action and page context always
    /// yield the same verdict (given a deterministic perception client).
    pub async fn assess_outcome(
        &self,
        action: &PlannedAction,
        context: &PageContext,
    ) -> ValidationVerdict {
        // Navigations get a literal domain check before perception has a
        // say.
        if let ActionDetail::Navigate { url, .. } = &action.detail {
            if !same_domain(url, &context.url) {
                return ValidationVerdict::failed(format!(
                    "expected the domain of {} but the browser is at '{}'",
                    url, context.url
                ));
            }
        }

        let expected = action
            .expected_outcome
            .clone()
            .unwrap_or_else(|| action.description.clone());
        let deadline = Duration::from_millis(self.config.perception_timeout_ms);
        match timeout(
            deadline,
            self.perception.validate_outcome(action, context, &expected),
        )
        .await
        {
            Ok(Ok(verdict)) => {
                if !verdict.success && verdict.reasoning.trim().is_empty() {
                    // Bare rejection with no reasoning; let the page text
                    // settle it instead.
                    return self.page_text_verdict(context).unwrap_or_else(|| {
                        ValidationVerdict::failed(
                            "perception rejected the outcome without reasoning",
                        )
                    });
                }
                verdict
            }
            Ok(Err(e)) => self.fallback_verdict(context, &e),
            Err(_) => self.fallback_verdict(
                context,
                &PerceptionError::Timeout("validate_outcome".to_string()),
            ),
        }
    }

    /// Keyword-based verdict when perception cannot answer.
    fn fallback_verdict(&self, context: &PageContext, error: &PerceptionError) -> ValidationVerdict {
        warn!("Perception validation unavailable: {}", error);
        self.page_text_verdict(context).unwrap_or_else(|| {
            ValidationVerdict::passed(
                "perception unavailable; page text carries no outcome indicators",
            )
        })
    }

    /// Grade the visible page text against the outcome indicator lists,
    /// failure indicators first. None when the page says nothing either
    /// way.
    fn page_text_verdict(&self, context: &PageContext) -> Option<ValidationVerdict> {
        let mut page_text = context.title.clone().unwrap_or_default();
        if let Some(dom) = &context.dom {
            for element in &dom.elements {
                page_text.push('\n');
                page_text.push_str(&element.text);
            }
        }
        match analyze_outcome_text(&page_text) {
            Some(false) => {
                let evidence = self
                    .page_failure_evidence(context)
                    .unwrap_or_else(|| "failure indicator in page text".to_string());
                Some(ValidationVerdict::failed(format!(
                    "page shows failure evidence: {}",
                    evidence
                )))
            }
            Some(true) => Some(ValidationVerdict::passed(
                "page text carries success indicators",
            )),
            None => None,
        }
    }

    /// Locate the failure indicator in the title or DOM text, for the
    /// verdict's evidence string.
    fn page_failure_evidence(&self, context: &PageContext) -> Option<String> {
        if let Some(title) = &context.title {
            if let Some(indicator) = find_failure_indicator(title) {
                return Some(format!("title contains '{}'", indicator));
            }
        }
        if let Some(dom) = &context.dom {
            for element in &dom.elements {
                if let Some(indicator) = find_failure_indicator(&element.text) {
                    return Some(format!("'{}' near {}", indicator, element.selector));
                }
            }
        }
        None
    }

    /// Ask perception for an improved action and schedule the position
    /// for another attempt.
    async fn schedule_retry(
        &self,
        state: &mut ExecutionState,
        action: &PlannedAction,
        verdict: &ValidationVerdict,
        context: &PageContext,
    ) {
        let index = state.current_index;
        let attempt = state.retry_count + 1;
        let deadline = Duration::from_millis(self.config.perception_timeout_ms);
        match timeout(
            deadline,
            self.perception.regenerate_action(
                action,
                &verdict.reasoning,
                context,
                &state.goal,
                attempt,
            ),
        )
        .await
        {
            Ok(Ok(improved)) => {
                info!(
                    "Regenerated action for position {} (attempt {}): {}",
                    index, attempt, improved.description
                );
                state.note(format!(
                    "retrying position {} with regenerated action: {}",
                    index, improved.description
                ));
                state.plan.replace(index, improved);
            }
            Ok(Err(e)) => {
                warn!("Regeneration unavailable: {}; retrying original action", e);
                state.note(format!(
                    "retrying position {} with the original action (regeneration unavailable)",
                    index
                ));
            }
            Err(_) => {
                warn!("Regeneration timed out; retrying original action");
                state.note(format!(
                    "retrying position {} with the original action (regeneration timed out)",
                    index
                ));
            }
        }
        state.retry_count += 1;
        state.retry_scheduled = true;
    }

    /// Escalate the adaptation strategy from the running failure rate.
    /// Only the continuity tolerance changes; plan content never does.
    fn adapt(&self, state: &mut ExecutionState) {
        let rate = state.failure_rate();
        match state.adaptation_strategy {
            AdaptationStrategy::Strict if rate > 0.3 => {
                info!("Failure rate {:.2} > 0.3; escalating strict -> flexible", rate);
                state.adaptation_strategy = AdaptationStrategy::Flexible;
                state.note("adaptation escalated to flexible".to_string());
            }
            AdaptationStrategy::Flexible if rate > 0.5 => {
                info!("Failure rate {:.2} > 0.5; escalating flexible -> adaptive", rate);
                state.adaptation_strategy = AdaptationStrategy::Adaptive;
                state.note("adaptation escalated to adaptive".to_string());
            }
            _ => {}
        }
    }

    /// Bound an actuator call with the configured deadline. A timeout is
    /// a failed call, not an engine crash.
    async fn bound_actuator<T, F>(&self, operation: &str, fut: F) -> Result<T, ActuatorError>
    where
        F: Future<Output = Result<T, ActuatorError>> + Send,
    {
        match timeout(Duration::from_millis(self.config.actuator_timeout_ms), fut).await {
            Ok(result) => result,
            Err(_) => Err(ActuatorError::Timeout(operation.to_string())),
        }
    }
}

/// Outcome of the central execution-failure handler.
enum FailureOutcome {
    /// A fallback action executed in place of the original.
    Recovered,
    /// The failure was recorded; the loop moves on.
    Accepted,
    /// The run is over.
    Fatal(Terminal),
}

/// Advance the cursor and check step continuity.
fn advance(
    state: &mut ExecutionState,
    continuity: &mut ContinuityValidator,
) -> Result<(), EngineError> {
    if !state.is_complete {
        if state.retry_scheduled {
            // The scheduled retry steps the cursor back one position; the
            // advance below returns it, so the position is re-entered and
            // never skipped.
            state.retry_scheduled = false;
        } else {
            state.current_index += 1;
        }
    }
    continuity
        .check(state)
        .map_err(|violation| EngineError::StepOrderViolation(violation.to_string()))
}

fn apply_effect(state: &mut ExecutionState, effect: ExecEffect) {
    if let ExecEffect::Extracted(key, value) = effect {
        debug!("Extracted '{}' into the data bag", key);
        state.extracted_data.insert(key, value);
    }
}

fn require_target<'t>(
    action: &PlannedAction,
    target: Option<&'t TargetRef>,
) -> Result<&'t TargetRef, EngineError> {
    target.ok_or_else(|| EngineError::ActionExecution {
        description: action.description.clone(),
        reason: "no resolvable target: discovery failed and the plan carries no hint".to_string(),
    })
}

fn map_actuator_error(action: &PlannedAction, error: ActuatorError) -> EngineError {
    match error {
        e @ ActuatorError::SessionClosed(_) => EngineError::SessionClosed(e.to_string()),
        e => EngineError::ActionExecution {
            description: action.description.clone(),
            reason: e.to_string(),
        },
    }
}

fn enter(phase: EnginePhase) {
    debug!("Entering phase: {}", phase.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ExecutionState;
    use tour_model::ActionPlan;

    fn engine_state(n: usize) -> ExecutionState {
        let actions = (0..n)
            .map(|i| {
                PlannedAction::new(
                    ActionDetail::Click { target: None },
                    format!("click the widget {}", i),
                )
            })
            .collect();
        ExecutionState::new(ActionPlan::new("demo", actions), "demo", None, 3)
    }

    #[test]
    fn test_advance_increments_and_checks() {
        let mut state = engine_state(3);
        state.record_success(
            0,
            TourStep::succeeded(0, state.plan.get(0).unwrap().clone(), None),
        );
        let mut continuity = ContinuityValidator::new();
        advance(&mut state, &mut continuity).unwrap();
        assert_eq!(state.current_index, 1);
    }

    #[test]
    fn test_advance_holds_position_for_scheduled_retry() {
        let mut state = engine_state(3);
        state.retry_scheduled = true;
        let mut continuity = ContinuityValidator::new();
        advance(&mut state, &mut continuity).unwrap();
        assert_eq!(state.current_index, 0);
        assert!(!state.retry_scheduled);
    }

    #[test]
    fn test_advance_surfaces_continuity_violation() {
        let mut state = engine_state(3);
        // Nothing processed, yet the cursor jumps ahead.
        state.current_index = 1;
        let mut continuity = ContinuityValidator::new();
        let err = advance(&mut state, &mut continuity).unwrap_err();
        assert!(matches!(err, EngineError::StepOrderViolation(_)));
    }

    #[test]
    fn test_require_target() {
        let action = PlannedAction::new(ActionDetail::Click { target: None }, "click the widget");
        assert!(require_target(&action, None).is_err());
        let target = TargetRef::Selector("#w".to_string());
        assert!(require_target(&action, Some(&target)).is_ok());
    }
}
