//! Discovery strategies.
//!
//! Five strategies in cascade order:
//! 1. Semantic - perception-proposed selectors probed against the page
//! 2. Text match - significant-term scoring of clickable elements
//! 3. Attribute pattern - selector hints, variants, kind-keyed patterns
//! 4. Coordinate - perception-proposed pixels from a screenshot
//! 5. Fallback - bare generic selectors

use std::sync::Arc;

use async_trait::async_trait;
use browser_bridge::{BrowserActuator, PageContext};
use perception_bridge::PerceptionClient;
use regex::Regex;
use tour_model::{ActionKind, PlannedAction};
use tracing::debug;

use crate::errors::DiscoveryError;
use crate::types::{StrategyKind, TargetMatch};

/// How long a selector probe waits before giving up on a candidate.
pub const PROBE_TIMEOUT_MS: u64 = 1_500;

const HINT_CONFIDENCE: f64 = 0.7;
const SIMPLIFIED_HINT_CONFIDENCE: f64 = 0.55;
const KIND_PATTERN_CONFIDENCE: f64 = 0.5;
const GENERIC_FALLBACK_CONFIDENCE: f64 = 0.4;

/// Strategy trait for target discovery.
#[async_trait]
pub trait DiscoveryStrategy: Send + Sync {
    /// Get strategy type.
    fn kind(&self) -> StrategyKind;

    /// Whether this strategy can contribute for the given action/context.
    fn applies_to(&self, action: &PlannedAction, context: &PageContext) -> bool;

    /// Attempt to find candidates for the described target.
    async fn discover(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        extra_context: &str,
    ) -> Result<Vec<TargetMatch>, DiscoveryError>;

    /// Get strategy name.
    fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Perception-proposed selectors, confirmed against the live page.
pub struct SemanticStrategy {
    perception: Arc<dyn PerceptionClient>,
    actuator: Arc<dyn BrowserActuator>,
}

impl SemanticStrategy {
    pub fn new(perception: Arc<dyn PerceptionClient>, actuator: Arc<dyn BrowserActuator>) -> Self {
        Self {
            perception,
            actuator,
        }
    }
}

#[async_trait]
impl DiscoveryStrategy for SemanticStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Semantic
    }

    fn applies_to(&self, action: &PlannedAction, context: &PageContext) -> bool {
        action.detail.needs_target() && context.supports_discovery()
    }

    async fn discover(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        extra_context: &str,
    ) -> Result<Vec<TargetMatch>, DiscoveryError> {
        let proposals = self
            .perception
            .propose_targets(&action.description, context, extra_context)
            .await
            .map_err(|e| DiscoveryError::StrategyFailed {
                strategy: self.name().to_string(),
                reason: e.to_string(),
            })?;

        let mut candidates = Vec::new();
        for proposal in proposals {
            // Confirm the proposed selector actually exists before scoring.
            if probe(self.actuator.as_ref(), &proposal.selector).await {
                candidates.push(TargetMatch {
                    target: crate::types::MatchTarget::Selector {
                        selector: proposal.selector,
                        element_kind: proposal.element_kind,
                        text: None,
                        visible: true,
                        clickable: true,
                        position: None,
                    },
                    confidence: proposal.confidence,
                    reasoning: proposal.reasoning,
                });
            } else {
                debug!(
                    "Dropping unconfirmed semantic proposal: {}",
                    proposal.selector
                );
            }
        }
        Ok(candidates)
    }
}

/// Significant-term scoring over the visible clickable elements.
pub struct TextMatchStrategy;

impl TextMatchStrategy {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextMatchStrategy {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DiscoveryStrategy for TextMatchStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::TextMatch
    }

    fn applies_to(&self, action: &PlannedAction, context: &PageContext) -> bool {
        action.detail.needs_target() && context.dom.is_some()
    }

    async fn discover(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        _extra_context: &str,
    ) -> Result<Vec<TargetMatch>, DiscoveryError> {
        let terms = extract_significant_terms(&action.description);
        if terms.is_empty() {
            return Ok(Vec::new());
        }
        let dom = context
            .dom
            .as_ref()
            .ok_or_else(|| DiscoveryError::InvalidRequest("no DOM snapshot".to_string()))?;

        let mut candidates = Vec::new();
        for element in dom.interactive() {
            let element_text = element.text.to_lowercase();
            let matched = terms
                .iter()
                .filter(|term| element_text.contains(term.as_str()))
                .count();
            if matched == 0 {
                continue;
            }
            let score = matched as f64 / terms.len() as f64;
            candidates.push(TargetMatch {
                target: crate::types::MatchTarget::Selector {
                    selector: element.selector.clone(),
                    element_kind: Some(element.tag.clone()),
                    text: Some(element.text.clone()),
                    visible: element.visible,
                    clickable: element.clickable,
                    position: element.position,
                },
                confidence: score,
                reasoning: format!(
                    "element text matched {}/{} significant terms",
                    matched,
                    terms.len()
                ),
            });
        }
        Ok(candidates)
    }
}

/// Selector hints, their structural variants, and kind-keyed patterns.
pub struct AttributePatternStrategy {
    actuator: Arc<dyn BrowserActuator>,
}

impl AttributePatternStrategy {
    pub fn new(actuator: Arc<dyn BrowserActuator>) -> Self {
        Self { actuator }
    }
}

#[async_trait]
impl DiscoveryStrategy for AttributePatternStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::AttributePattern
    }

    fn applies_to(&self, action: &PlannedAction, _context: &PageContext) -> bool {
        action.detail.needs_target()
    }

    async fn discover(
        &self,
        action: &PlannedAction,
        _context: &PageContext,
        _extra_context: &str,
    ) -> Result<Vec<TargetMatch>, DiscoveryError> {
        let mut candidates = Vec::new();

        if let Some(hint) = &action.selector_hint {
            if probe(self.actuator.as_ref(), hint).await {
                candidates.push(TargetMatch::from_selector(
                    hint.clone(),
                    HINT_CONFIDENCE,
                    "plan selector hint confirmed on page",
                ));
            }
            if let Some(variant) = simplify_selector(hint) {
                if probe(self.actuator.as_ref(), &variant).await {
                    candidates.push(TargetMatch::from_selector(
                        variant,
                        SIMPLIFIED_HINT_CONFIDENCE,
                        "simplified selector hint confirmed on page",
                    ));
                }
            }
            return Ok(candidates);
        }

        for pattern in kind_patterns(action.kind()) {
            if probe(self.actuator.as_ref(), pattern).await {
                candidates.push(TargetMatch::from_selector(
                    (*pattern).to_string(),
                    KIND_PATTERN_CONFIDENCE,
                    format!("generic {} pattern confirmed on page", action.kind()),
                ));
            }
        }
        Ok(candidates)
    }
}

/// Perception-proposed pixels from a screenshot, clamped to the viewport.
pub struct CoordinateStrategy {
    perception: Arc<dyn PerceptionClient>,
}

impl CoordinateStrategy {
    pub fn new(perception: Arc<dyn PerceptionClient>) -> Self {
        Self { perception }
    }
}

#[async_trait]
impl DiscoveryStrategy for CoordinateStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Coordinate
    }

    fn applies_to(&self, action: &PlannedAction, context: &PageContext) -> bool {
        action.detail.needs_target() && context.screenshot.is_some()
    }

    async fn discover(
        &self,
        action: &PlannedAction,
        context: &PageContext,
        extra_context: &str,
    ) -> Result<Vec<TargetMatch>, DiscoveryError> {
        let screenshot = context
            .screenshot
            .as_ref()
            .ok_or_else(|| DiscoveryError::InvalidRequest("no screenshot".to_string()))?;

        let proposals = self
            .perception
            .propose_coordinates(&action.description, screenshot, extra_context)
            .await
            .map_err(|e| DiscoveryError::StrategyFailed {
                strategy: self.name().to_string(),
                reason: e.to_string(),
            })?;

        let viewport = screenshot.viewport;
        Ok(proposals
            .into_iter()
            .map(|p| TargetMatch::from_point(p.point.clamped(&viewport), p.confidence, p.reasoning))
            .collect())
    }
}

/// Bare generic selectors as a last resort.
pub struct FallbackStrategy {
    actuator: Arc<dyn BrowserActuator>,
}

impl FallbackStrategy {
    pub fn new(actuator: Arc<dyn BrowserActuator>) -> Self {
        Self { actuator }
    }
}

#[async_trait]
impl DiscoveryStrategy for FallbackStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Fallback
    }

    fn applies_to(&self, action: &PlannedAction, _context: &PageContext) -> bool {
        action.detail.needs_target()
    }

    async fn discover(
        &self,
        action: &PlannedAction,
        _context: &PageContext,
        _extra_context: &str,
    ) -> Result<Vec<TargetMatch>, DiscoveryError> {
        let mut candidates = Vec::new();
        for selector in bare_selectors(action.kind()) {
            if probe(self.actuator.as_ref(), selector).await {
                candidates.push(TargetMatch::from_selector(
                    (*selector).to_string(),
                    GENERIC_FALLBACK_CONFIDENCE,
                    "bare generic selector present on page",
                ));
            }
        }
        Ok(candidates)
    }
}

/// Check whether a selector currently resolves on the page.
async fn probe(actuator: &dyn BrowserActuator, selector: &str) -> bool {
    actuator.wait_for(selector, PROBE_TIMEOUT_MS).await.is_ok()
}

/// Generic attribute-qualified patterns keyed by action kind.
fn kind_patterns(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::Click => &["button[type=submit]", "a[href]", "[role=button]"],
        ActionKind::Type => &[
            "input[type=text]",
            "input[type=email]",
            "input[type=search]",
            "textarea",
        ],
        ActionKind::Select => &["select"],
        _ => &[],
    }
}

/// Bare last-resort selectors keyed by action kind.
fn bare_selectors(kind: ActionKind) -> &'static [&'static str] {
    match kind {
        ActionKind::Click => &["button", "a"],
        ActionKind::Type => &["input", "textarea"],
        ActionKind::Select => &["select"],
        _ => &[],
    }
}

/// Words carrying no targeting signal in an action description.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "that", "this", "from", "into", "onto", "then", "their", "your",
    "click", "type", "press", "open", "enter", "select", "choose", "find", "locate", "button",
    "link", "field", "input", "icon", "menu", "item", "page", "area", "box", "tab", "element",
    "option", "text", "new", "now", "all",
];

/// Extract significant terms from a description: lowercase words longer
/// than two characters that are not stop words.
pub fn extract_significant_terms(description: &str) -> Vec<String> {
    description
        .to_lowercase()
        .split(|ch: char| !ch.is_alphanumeric())
        .filter(|word| word.len() > 2 && !STOP_WORDS.contains(word))
        .map(|word| word.to_string())
        .collect()
}

/// Strip bracket-attribute qualifiers from a selector.
///
/// Returns None when stripping changes nothing or empties the selector.
pub fn simplify_selector(selector: &str) -> Option<String> {
    let brackets = Regex::new(r"\[[^\]]*\]").ok()?;
    let simplified = brackets.replace_all(selector, "").to_string();
    let simplified = simplified.trim().to_string();
    if simplified.is_empty() || simplified == selector {
        None
    } else {
        Some(simplified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_significant_terms() {
        let terms = extract_significant_terms("Click the Workflows link");
        assert_eq!(terms, vec!["workflows"]);

        let terms = extract_significant_terms("type the search term into the filter box");
        assert_eq!(terms, vec!["search", "term", "filter"]);
    }

    #[test]
    fn test_extract_ignores_short_words() {
        let terms = extract_significant_terms("go to QA");
        assert!(terms.is_empty());
    }

    #[test]
    fn test_simplify_selector() {
        assert_eq!(
            simplify_selector("button[type=submit]").as_deref(),
            Some("button")
        );
        assert_eq!(
            simplify_selector("input[name=\"q\"][required]").as_deref(),
            Some("input")
        );
        assert_eq!(simplify_selector("button.primary"), None);
        assert_eq!(simplify_selector("[data-test=save]"), None);
    }

    #[test]
    fn test_kind_patterns_cover_targeted_kinds() {
        assert!(!kind_patterns(ActionKind::Click).is_empty());
        assert!(!kind_patterns(ActionKind::Type).is_empty());
        assert!(kind_patterns(ActionKind::Navigate).is_empty());
        assert!(bare_selectors(ActionKind::Scroll).is_empty());
    }
}
