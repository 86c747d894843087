//! Failure classification and deterministic fallback construction.
//!
//! Both functions are pure over the current state and are recomputed on
//! every use; classification is never cached.

use tour_model::{ActionDetail, ActionKind, ActionPriority, PlannedAction};
use url::Url;

use crate::state::ExecutionState;

/// Description phrases that mark an action as critical.
pub const CRITICAL_KEYWORDS: &[&str] = &[
    "login",
    "authenticate",
    "navigate",
    "go to",
    "access",
    "enter",
    "submit",
    "confirm",
    "proceed",
    "continue",
    "next step",
];

/// Failure rate above which every further failure is treated as critical.
pub const CRITICAL_FAILURE_RATE: f64 = 0.5;

/// Known navigation targets and the path segment each maps to.
const NAV_TARGETS: &[(&str, &str)] = &[
    ("workflow", "/workflows"),
    ("dashboard", "/dashboard"),
    ("settings", "/settings"),
    ("profile", "/profile"),
    ("help", "/help"),
    ("home", "/"),
    ("login", "/login"),
];

/// Decide whether failing this action must abort the run.
pub fn is_critical(action: &PlannedAction, state: &ExecutionState) -> bool {
    if action.kind() == ActionKind::Navigate {
        return true;
    }
    if state.current_index == 0 {
        return true;
    }
    if action.priority == ActionPriority::High {
        return true;
    }
    if !action.prerequisites.is_empty() {
        return true;
    }
    let description = action.description.to_lowercase();
    if CRITICAL_KEYWORDS.iter().any(|kw| description.contains(kw)) {
        return true;
    }
    if state.failure_rate() > CRITICAL_FAILURE_RATE {
        return true;
    }
    let feature = state.plan.feature_name.to_lowercase();
    if !feature.is_empty() && description.contains(&feature) {
        return true;
    }
    false
}

/// Build a deterministic fallback for a failed action, or None when no
/// sensible fallback exists (the caller then relies on intelligent retry).
pub fn build_fallback(
    action: &PlannedAction,
    _state: &ExecutionState,
    current_url: &str,
) -> Option<PlannedAction> {
    match &action.detail {
        ActionDetail::Click { .. } => {
            let description = action.description.to_lowercase();
            if let Some((name, path)) = NAV_TARGETS
                .iter()
                .find(|(name, _)| description.contains(name))
            {
                let url = join_path(current_url, path)?;
                return Some(
                    PlannedAction::new(
                        ActionDetail::Navigate {
                            url,
                            wait_for_selector: None,
                        },
                        format!("navigate directly to the {} page", name),
                    )
                    .with_priority(action.priority),
                );
            }
            simplified_selector_action(action)
        }
        ActionDetail::Type { .. } => simplified_selector_action(action),
        ActionDetail::Wait {
            selector: Some(selector),
            ..
        } => Some(PlannedAction::new(
            ActionDetail::Wait {
                selector: Some(selector.clone()),
                duration_ms: None,
            },
            format!("wait again for {}", selector),
        )),
        _ => None,
    }
}

/// Same action kind against a structurally simplified selector, when the
/// action carries one worth simplifying.
fn simplified_selector_action(action: &PlannedAction) -> Option<PlannedAction> {
    let selector = action
        .planned_target()
        .and_then(|t| t.selector().map(|s| s.to_string()))?;

    if let Some(simplified) = target_discovery::simplify_selector(&selector) {
        let mut fallback = action.clone();
        fallback
            .detail
            .set_target(webtour_core_types::TargetRef::Selector(simplified.clone()));
        fallback.selector_hint = Some(simplified);
        fallback.fallback_action = None;
        fallback.description = format!("{} (simplified selector)", action.description);
        return Some(fallback);
    }

    // Nothing to simplify; wait for the same selector to settle instead.
    Some(PlannedAction::new(
        ActionDetail::Wait {
            selector: Some(selector.clone()),
            duration_ms: None,
        },
        format!("wait for {} before retrying", selector),
    ))
}

fn join_path(current_url: &str, path: &str) -> Option<String> {
    let base = Url::parse(current_url).ok()?;
    base.join(path).ok().map(|u| u.to_string())
}

/// Host comparison for validating navigation outcomes.
pub fn same_domain(expected_url: &str, actual_url: &str) -> bool {
    let expected = Url::parse(expected_url).ok().and_then(host_of);
    let actual = Url::parse(actual_url).ok().and_then(host_of);
    match (expected, actual) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn host_of(url: Url) -> Option<String> {
    url.host_str()
        .map(|h| h.trim_start_matches("www.").to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tour_model::ActionPlan;

    fn state_with(actions: Vec<PlannedAction>, current_index: usize) -> ExecutionState {
        let mut state = ExecutionState::new(ActionPlan::new("billing", actions), "demo", None, 3);
        state.current_index = current_index;
        state
    }

    fn click(description: &str) -> PlannedAction {
        PlannedAction::new(ActionDetail::Click { target: None }, description)
    }

    #[test]
    fn test_navigate_kind_is_critical() {
        let nav = PlannedAction::new(
            ActionDetail::Navigate {
                url: "https://app.example.com".to_string(),
                wait_for_selector: None,
            },
            "open the app",
        );
        let state = state_with(vec![nav.clone(), click("b")], 1);
        assert!(is_critical(&nav, &state));
    }

    #[test]
    fn test_first_position_is_critical() {
        let action = click("click the widgets panel");
        let state = state_with(vec![action.clone(), click("b")], 0);
        assert!(is_critical(&action, &state));
    }

    #[test]
    fn test_keyword_and_priority_checks() {
        let state = state_with(vec![click("a"), click("b"), click("c")], 2);

        assert!(is_critical(&click("submit the order form"), &state));
        assert!(is_critical(
            &click("open panel").with_priority(ActionPriority::High),
            &state
        ));
        assert!(is_critical(&click("open panel").with_prerequisite(0), &state));
        assert!(!is_critical(&click("click the widgets panel"), &state));
    }

    #[test]
    fn test_feature_name_mention_is_critical() {
        let state = state_with(vec![click("a"), click("b")], 1);
        assert!(is_critical(&click("show the billing summary"), &state));
    }

    #[test]
    fn test_high_failure_rate_makes_everything_critical() {
        let mut state = state_with(vec![click("a"), click("b"), click("c")], 2);
        state.failed.insert(0);
        state.failed.insert(1);
        // rate = 2/3 > 0.5
        assert!(is_critical(&click("click the widgets panel"), &state));
    }

    #[test]
    fn test_fallback_nav_target() {
        let action = click("click the Dashboard tile");
        let state = state_with(vec![click("a"), action.clone()], 1);
        let fallback = build_fallback(&action, &state, "https://app.example.com/start").unwrap();
        match fallback.detail {
            ActionDetail::Navigate { ref url, .. } => {
                assert_eq!(url, "https://app.example.com/dashboard");
            }
            ref other => panic!("expected navigate fallback, got {:?}", other),
        }
    }

    #[test]
    fn test_fallback_simplifies_selector() {
        let action = click("click the save control").with_selector_hint("button[type=submit]");
        let state = state_with(vec![click("a"), action.clone()], 1);
        let fallback = build_fallback(&action, &state, "https://app.example.com").unwrap();
        assert_eq!(fallback.selector_hint.as_deref(), Some("button"));
    }

    #[test]
    fn test_fallback_none_without_material() {
        let action = click("click the save control");
        let state = state_with(vec![click("a"), action.clone()], 1);
        assert!(build_fallback(&action, &state, "https://app.example.com").is_none());

        let scroll = PlannedAction::new(
            ActionDetail::Scroll {
                to: webtour_core_types::PixelPoint::new(0.0, 400.0),
            },
            "scroll down",
        );
        assert!(build_fallback(&scroll, &state, "https://app.example.com").is_none());
    }

    #[test]
    fn test_same_domain() {
        assert!(same_domain(
            "https://www.example.com/a",
            "https://example.com/b?q=1"
        ));
        assert!(!same_domain("https://example.com", "https://other.com"));
        assert!(!same_domain("not a url", "https://example.com"));
    }
}
