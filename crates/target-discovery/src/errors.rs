//! Error types for the discovery cascade.

use thiserror::Error;

/// Discovery error enumeration.
#[derive(Debug, Error, Clone)]
pub enum DiscoveryError {
    /// The request cannot be served (empty description, context without
    /// page evidence).
    #[error("Invalid discovery request: {0}")]
    InvalidRequest(String),

    /// A strategy failed outright. The cascade treats this as "no match"
    /// and moves on.
    #[error("Strategy '{strategy}' failed: {reason}")]
    StrategyFailed { strategy: String, reason: String },
}
