//! Perception boundary for the webtour engine.
//!
//! The engine consumes an external vision/semantic model through the
//! [`PerceptionClient`] trait. Raw service responses are parsed into the
//! typed contract by [`payload`]; [`verdict`] grades free-text evidence
//! when no structured verdict is available.

mod client;
mod errors;
pub mod payload;
mod types;
pub mod verdict;

pub use client::PerceptionClient;
pub use errors::PerceptionError;
pub use types::{CoordinateProposal, TargetProposal, ValidationVerdict};
