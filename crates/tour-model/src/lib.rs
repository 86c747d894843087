//! Plan data model for guided browser tours.
//!
//! A tour is an ordered [`ActionPlan`] of [`PlannedAction`]s authored by an
//! external planning step. Executing a plan yields [`TourStep`] records, the
//! append-only audit trail the final report is computed from.

mod action;
mod credentials;
mod plan;
mod step;

pub use action::{ActionDetail, ActionKind, ActionPriority, PlannedAction};
pub use credentials::Credentials;
pub use plan::ActionPlan;
pub use step::TourStep;
