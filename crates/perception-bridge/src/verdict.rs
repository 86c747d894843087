//! Keyword analysis of free-text outcome evidence.
//!
//! Used when perception is unavailable or its verdict carries no usable
//! reasoning: page text is graded against indicator lists, failure
//! indicators first.

/// Phrases that suggest an action landed somewhere good.
pub const SUCCESS_INDICATORS: &[&str] = &[
    "dashboard",
    "profile",
    "welcome",
    "logout",
    "account",
    "settings",
    "authenticated",
    "logged in",
    "success",
    "completed",
];

/// Phrases that suggest an action failed. Checked before success
/// indicators so "login failed" never reads as a pass.
pub const FAILURE_INDICATORS: &[&str] = &[
    "invalid",
    "incorrect",
    "wrong",
    "failed",
    "error",
    "denied",
    "unauthorized",
    "unable to",
    "cannot",
];

/// Grade a piece of free text. Returns `Some(false)` on a failure
/// indicator, `Some(true)` on a success indicator, `None` when the text
/// says nothing either way.
pub fn analyze_outcome_text(text: &str) -> Option<bool> {
    let lowered = text.to_lowercase();
    if FAILURE_INDICATORS.iter().any(|kw| lowered.contains(kw)) {
        return Some(false);
    }
    if SUCCESS_INDICATORS.iter().any(|kw| lowered.contains(kw)) {
        return Some(true);
    }
    None
}

/// First failure indicator present in the text, if any.
pub fn find_failure_indicator(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    FAILURE_INDICATORS
        .iter()
        .find(|kw| lowered.contains(*kw))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_wins_over_success() {
        // Contains both "login failed" and "dashboard"; failure must win.
        assert_eq!(
            analyze_outcome_text("Login failed before reaching the dashboard"),
            Some(false)
        );
    }

    #[test]
    fn test_success_and_neutral() {
        assert_eq!(analyze_outcome_text("Welcome to your dashboard"), Some(true));
        assert_eq!(analyze_outcome_text("A plain page of prose"), None);
    }

    #[test]
    fn test_find_failure_indicator() {
        assert_eq!(
            find_failure_indicator("The password was Invalid"),
            Some("invalid")
        );
        assert_eq!(find_failure_indicator("all good"), None);
    }
}
