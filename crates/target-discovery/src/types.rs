//! Core types for the discovery cascade.

use serde::{Deserialize, Serialize};
use webtour_core_types::{PixelPoint, TargetRef};

/// Minimum confidence a candidate must exceed to be usable.
///
/// Tunable; the engine treats any best match at or below this score as a
/// failed search.
pub const CONFIDENCE_FLOOR: f64 = 0.3;

/// Discovery strategy enumeration, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Perception-proposed selectors, probed against the live page.
    Semantic,

    /// Significant-term scoring of visible clickable elements.
    TextMatch,

    /// Selector hints, their structural variants, and kind-keyed patterns.
    AttributePattern,

    /// Perception-proposed pixel positions from a screenshot.
    Coordinate,

    /// Bare generic selectors as a last resort.
    Fallback,
}

impl StrategyKind {
    /// Get strategy name as string.
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Semantic => "semantic",
            StrategyKind::TextMatch => "text-match",
            StrategyKind::AttributePattern => "attribute-pattern",
            StrategyKind::Coordinate => "coordinate",
            StrategyKind::Fallback => "fallback",
        }
    }
}

/// What a candidate match points at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTarget {
    /// Selector-addressed element with what is known about it.
    Selector {
        selector: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        element_kind: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        text: Option<String>,
        visible: bool,
        clickable: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        position: Option<PixelPoint>,
    },

    /// Coordinate-addressed point in viewport pixels.
    Coordinates(PixelPoint),
}

/// A single candidate produced by one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetMatch {
    pub target: MatchTarget,

    /// Confidence score in [0, 1].
    pub confidence: f64,

    /// Why the strategy believes in this candidate.
    pub reasoning: String,
}

impl TargetMatch {
    /// Selector-addressed candidate with only a selector known.
    pub fn from_selector(selector: impl Into<String>, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            target: MatchTarget::Selector {
                selector: selector.into(),
                element_kind: None,
                text: None,
                visible: true,
                clickable: true,
                position: None,
            },
            confidence,
            reasoning: reasoning.into(),
        }
    }

    /// Coordinate-addressed candidate.
    pub fn from_point(point: PixelPoint, confidence: f64, reasoning: impl Into<String>) -> Self {
        Self {
            target: MatchTarget::Coordinates(point),
            confidence,
            reasoning: reasoning.into(),
        }
    }

    /// Whether this candidate clears the usability floor.
    pub fn above_floor(&self) -> bool {
        self.confidence > CONFIDENCE_FLOOR
    }

    /// The candidate as an executable target reference.
    pub fn target_ref(&self) -> TargetRef {
        match &self.target {
            MatchTarget::Selector { selector, .. } => TargetRef::Selector(selector.clone()),
            MatchTarget::Coordinates(point) => TargetRef::Coordinates(*point),
        }
    }
}

/// Output of one discovery run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryResult {
    /// The description that was searched for.
    pub target_description: String,

    /// Strategy that produced the best match, when one was found.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy_used: Option<StrategyKind>,

    /// Candidates considered by the winning strategy (or everything seen,
    /// when the search failed).
    pub candidates: Vec<TargetMatch>,

    /// Best usable match. None means the search failed and callers must
    /// not execute against this result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_match: Option<TargetMatch>,

    /// Human-readable advice when the search failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<String>,
}

impl DiscoveryResult {
    /// Result for a successful search.
    pub fn found(
        target_description: impl Into<String>,
        strategy: StrategyKind,
        candidates: Vec<TargetMatch>,
        best_match: TargetMatch,
    ) -> Self {
        Self {
            target_description: target_description.into(),
            strategy_used: Some(strategy),
            candidates,
            best_match: Some(best_match),
            recommendations: None,
        }
    }

    /// Result for an exhausted cascade.
    pub fn not_found(
        target_description: impl Into<String>,
        candidates: Vec<TargetMatch>,
        recommendations: impl Into<String>,
    ) -> Self {
        Self {
            target_description: target_description.into(),
            strategy_used: None,
            candidates,
            best_match: None,
            recommendations: Some(recommendations.into()),
        }
    }

    pub fn is_found(&self) -> bool {
        self.best_match.is_some()
    }
}
