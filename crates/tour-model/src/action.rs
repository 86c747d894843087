//! Planned actions - the unit of intent in a tour plan.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use webtour_core_types::{PixelPoint, TargetRef};

/// Action kind enumeration, used for counting and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Navigate,
    Click,
    Type,
    Wait,
    Extract,
    Evaluate,
    Scroll,
    Select,
}

impl ActionKind {
    /// Get kind name as string.
    pub fn name(&self) -> &'static str {
        match self {
            ActionKind::Navigate => "navigate",
            ActionKind::Click => "click",
            ActionKind::Type => "type",
            ActionKind::Wait => "wait",
            ActionKind::Extract => "extract",
            ActionKind::Evaluate => "evaluate",
            ActionKind::Scroll => "scroll",
            ActionKind::Select => "select",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Kind-specific payload of a planned action.
///
/// Closed tagged union: each variant carries only the fields that kind
/// needs. Element-addressed variants take an optional [`TargetRef`] so a
/// target can be supplied by the plan, by discovery, or not at all
/// (coordinate addressing is a `TargetRef::Coordinates`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionDetail {
    Navigate {
        url: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        wait_for_selector: Option<String>,
    },
    Click {
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<TargetRef>,
    },
    Type {
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<TargetRef>,
        text: String,
        #[serde(default)]
        clear_first: bool,
    },
    Wait {
        #[serde(skip_serializing_if = "Option::is_none")]
        selector: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<u64>,
    },
    Extract {
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<TargetRef>,
        key: String,
    },
    Evaluate {
        expression: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        store_key: Option<String>,
    },
    Scroll {
        to: PixelPoint,
    },
    Select {
        #[serde(skip_serializing_if = "Option::is_none")]
        target: Option<TargetRef>,
        option_text: String,
    },
}

impl ActionDetail {
    /// Kind tag for this payload.
    pub fn kind(&self) -> ActionKind {
        match self {
            ActionDetail::Navigate { .. } => ActionKind::Navigate,
            ActionDetail::Click { .. } => ActionKind::Click,
            ActionDetail::Type { .. } => ActionKind::Type,
            ActionDetail::Wait { .. } => ActionKind::Wait,
            ActionDetail::Extract { .. } => ActionKind::Extract,
            ActionDetail::Evaluate { .. } => ActionKind::Evaluate,
            ActionDetail::Scroll { .. } => ActionKind::Scroll,
            ActionDetail::Select { .. } => ActionKind::Select,
        }
    }

    /// Whether this action addresses an on-screen element and therefore
    /// benefits from target discovery.
    pub fn needs_target(&self) -> bool {
        matches!(
            self,
            ActionDetail::Click { .. }
                | ActionDetail::Type { .. }
                | ActionDetail::Extract { .. }
                | ActionDetail::Select { .. }
        )
    }

    /// The target already carried by the payload, if any.
    pub fn target(&self) -> Option<&TargetRef> {
        match self {
            ActionDetail::Click { target }
            | ActionDetail::Type { target, .. }
            | ActionDetail::Extract { target, .. }
            | ActionDetail::Select { target, .. } => target.as_ref(),
            _ => None,
        }
    }

    /// Replace the payload target. No-op for kinds without one.
    pub fn set_target(&mut self, new_target: TargetRef) {
        match self {
            ActionDetail::Click { target }
            | ActionDetail::Type { target, .. }
            | ActionDetail::Extract { target, .. }
            | ActionDetail::Select { target, .. } => *target = Some(new_target),
            _ => {}
        }
    }
}

/// Declared priority of a planned action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionPriority {
    High,
    #[default]
    Medium,
    Low,
}

/// One step of intent in a tour plan.
///
/// Immutable once authored, except when the retry subsystem substitutes a
/// regenerated action at the same plan position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAction {
    /// Kind-specific payload.
    #[serde(flatten)]
    pub detail: ActionDetail,

    /// Natural-language description of the intent. Required, non-empty.
    pub description: String,

    /// What the author expects to observe after the action succeeds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_outcome: Option<String>,

    /// Declared priority.
    #[serde(default)]
    pub priority: ActionPriority,

    /// Rough duration estimate, used only for plan-level aggregation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_duration_secs: Option<u64>,

    /// Plan positions that must complete before this action may run.
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub prerequisites: BTreeSet<usize>,

    /// Author-supplied selector hint, used when discovery comes up empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector_hint: Option<String>,

    /// Author-supplied fallback executed when the primary action fails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_action: Option<Box<PlannedAction>>,
}

impl PlannedAction {
    /// Create a new action with defaults for the optional envelope fields.
    pub fn new(detail: ActionDetail, description: impl Into<String>) -> Self {
        Self {
            detail,
            description: description.into(),
            expected_outcome: None,
            priority: ActionPriority::default(),
            estimated_duration_secs: None,
            prerequisites: BTreeSet::new(),
            selector_hint: None,
            fallback_action: None,
        }
    }

    pub fn kind(&self) -> ActionKind {
        self.detail.kind()
    }

    /// Set expected outcome.
    pub fn with_expected_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.expected_outcome = Some(outcome.into());
        self
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: ActionPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Set duration estimate.
    pub fn with_estimated_duration_secs(mut self, secs: u64) -> Self {
        self.estimated_duration_secs = Some(secs);
        self
    }

    /// Add a prerequisite plan position.
    pub fn with_prerequisite(mut self, index: usize) -> Self {
        self.prerequisites.insert(index);
        self
    }

    /// Set selector hint.
    pub fn with_selector_hint(mut self, hint: impl Into<String>) -> Self {
        self.selector_hint = Some(hint.into());
        self
    }

    /// Set author-supplied fallback.
    pub fn with_fallback(mut self, fallback: PlannedAction) -> Self {
        self.fallback_action = Some(Box::new(fallback));
        self
    }

    /// Best known target before discovery: the payload target, else the
    /// selector hint.
    pub fn planned_target(&self) -> Option<TargetRef> {
        if let Some(target) = self.detail.target() {
            return Some(target.clone());
        }
        self.selector_hint
            .as_ref()
            .map(|hint| TargetRef::Selector(hint.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_dispatch() {
        let action = PlannedAction::new(
            ActionDetail::Click { target: None },
            "click the save button",
        );
        assert_eq!(action.kind(), ActionKind::Click);
        assert!(action.detail.needs_target());

        let nav = PlannedAction::new(
            ActionDetail::Navigate {
                url: "https://app.example.com".to_string(),
                wait_for_selector: None,
            },
            "open the app",
        );
        assert!(!nav.detail.needs_target());
    }

    #[test]
    fn test_planned_target_prefers_payload_over_hint() {
        let mut action = PlannedAction::new(
            ActionDetail::Click { target: None },
            "click the save button",
        )
        .with_selector_hint("#save");
        assert_eq!(
            action.planned_target(),
            Some(TargetRef::Selector("#save".to_string()))
        );

        action
            .detail
            .set_target(TargetRef::Selector("button.primary".to_string()));
        assert_eq!(
            action.planned_target(),
            Some(TargetRef::Selector("button.primary".to_string()))
        );
    }

    #[test]
    fn test_set_target_is_noop_for_untargeted_kinds() {
        let mut nav = ActionDetail::Navigate {
            url: "https://app.example.com".to_string(),
            wait_for_selector: None,
        };
        nav.set_target(TargetRef::Selector("#x".to_string()));
        assert!(nav.target().is_none());
    }

    #[test]
    fn test_serde_tagging() {
        let action = PlannedAction::new(
            ActionDetail::Type {
                target: None,
                text: "hello".to_string(),
                clear_first: true,
            },
            "type the greeting",
        );
        let value = serde_json::to_value(&action).unwrap();
        assert_eq!(value["kind"], "type");
        assert_eq!(value["text"], "hello");
        let back: PlannedAction = serde_json::from_value(value).unwrap();
        assert_eq!(back, action);
    }
}
