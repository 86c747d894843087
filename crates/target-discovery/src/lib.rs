//! Multi-strategy target discovery.
//!
//! Turns a natural-language action description plus page evidence into a
//! concrete selector or click point. Strategies run in a fixed cascade
//! and the first candidate above [`CONFIDENCE_FLOOR`] wins; an exhausted
//! cascade yields a result with `best_match: None` that callers must
//! treat as a failed search.

mod engine;
mod errors;
pub mod strategies;
mod types;

pub use engine::DiscoveryEngine;
pub use errors::DiscoveryError;
pub use strategies::{extract_significant_terms, simplify_selector, DiscoveryStrategy};
pub use types::{DiscoveryResult, MatchTarget, StrategyKind, TargetMatch, CONFIDENCE_FLOOR};
