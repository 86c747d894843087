//! Typed payloads for perception-service requests and responses.

use serde::{Deserialize, Serialize};
use webtour_core_types::PixelPoint;

/// A selector candidate proposed by the perception service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetProposal {
    /// CSS selector for the proposed element.
    pub selector: String,

    /// Element kind the service believes it found (button, link, input).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element_kind: Option<String>,

    /// Confidence score in [0, 1].
    pub confidence: f64,

    /// Free-text reasoning behind the proposal.
    #[serde(default)]
    pub reasoning: String,
}

/// A pixel candidate proposed from a screenshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinateProposal {
    /// Proposed click point in viewport pixels.
    pub point: PixelPoint,

    /// Confidence score in [0, 1].
    pub confidence: f64,

    /// Free-text reasoning behind the proposal.
    #[serde(default)]
    pub reasoning: String,
}

/// Verdict on whether an executed action achieved its expected outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationVerdict {
    pub success: bool,

    #[serde(default)]
    pub reasoning: String,
}

impl ValidationVerdict {
    pub fn passed(reasoning: impl Into<String>) -> Self {
        Self {
            success: true,
            reasoning: reasoning.into(),
        }
    }

    pub fn failed(reasoning: impl Into<String>) -> Self {
        Self {
            success: false,
            reasoning: reasoning.into(),
        }
    }
}
