//! Adaptive plan-execution engine for guided browser tours.
//!
//! Walks an authored [`ActionPlan`](tour_model::ActionPlan) against a live
//! page: each iteration observes the page, discovers a concrete target for
//! the next action, executes it through the actuator, validates the
//! outcome through perception, and adapts when reality disagrees with the
//! plan. Failures are classified critical or non-critical; only critical
//! failures and continuity violations end a run early.
//!
//! The public surface is [`TourEngine::run`], which never panics and
//! renders every outcome into a [`TourReport`].

mod config;
mod continuity;
mod delta;
mod errors;
mod failure;
mod logger;
mod machine;
mod report;
mod state;

pub use config::EngineConfig;
pub use continuity::{ContinuityValidator, ContinuityViolation};
pub use delta::{compute_delta, DomDelta};
pub use errors::EngineError;
pub use failure::{build_fallback, is_critical, same_domain, CRITICAL_KEYWORDS};
pub use logger::{NoopRunLogger, RunLogger};
pub use machine::TourEngine;
pub use report::TourReport;
pub use state::{AdaptationStrategy, EnginePhase, ExecutionState};
