//! DOM delta diagnostics - opportunistic comparison of two page
//! snapshots, consumed only as logging/adaptation signals.

use std::collections::BTreeSet;

use browser_bridge::PageContext;
use perception_bridge::verdict::find_failure_indicator;
use serde::{Deserialize, Serialize};

/// What changed between two observations of the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomDelta {
    pub url_changed: bool,
    pub title_changed: bool,

    /// Selectors of interactive elements that appeared.
    pub appeared: Vec<String>,

    /// Selectors of interactive elements that disappeared.
    pub disappeared: Vec<String>,

    /// Error-looking text found in the new snapshot, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_text: Option<String>,

    /// Short natural-language summary of the impact.
    pub impact_summary: String,

    /// Follow-up hints for the adaptation layer.
    pub recommendations: Vec<String>,
}

/// Compare two page contexts. Returns None when neither side carries a
/// DOM snapshot and the URL/title are unchanged - there is nothing to say.
pub fn compute_delta(before: &PageContext, after: &PageContext) -> Option<DomDelta> {
    let url_changed = before.url != after.url;
    let title_changed = before.title != after.title;

    let before_selectors = interactive_selectors(before);
    let after_selectors = interactive_selectors(after);

    let appeared: Vec<String> = after_selectors
        .difference(&before_selectors)
        .cloned()
        .collect();
    let disappeared: Vec<String> = before_selectors
        .difference(&after_selectors)
        .cloned()
        .collect();

    let error_text = after.dom.as_ref().and_then(|dom| {
        dom.elements.iter().find_map(|e| {
            find_failure_indicator(&e.text).map(|indicator| {
                format!("'{}' near {} ({})", indicator, e.selector, e.text.trim())
            })
        })
    });

    if !url_changed
        && !title_changed
        && appeared.is_empty()
        && disappeared.is_empty()
        && error_text.is_none()
    {
        return None;
    }

    let impact_summary = summarize(url_changed, title_changed, &appeared, &disappeared, &error_text);
    let mut recommendations = Vec::new();
    if error_text.is_some() {
        recommendations.push("inspect the reported error text before proceeding".to_string());
    }
    if appeared.len() > 5 {
        recommendations.push("page changed substantially; re-discover targets".to_string());
    }
    if url_changed {
        recommendations.push("URL changed; confirm the navigation was intended".to_string());
    }

    Some(DomDelta {
        url_changed,
        title_changed,
        appeared,
        disappeared,
        error_text,
        impact_summary,
        recommendations,
    })
}

fn interactive_selectors(context: &PageContext) -> BTreeSet<String> {
    context
        .dom
        .as_ref()
        .map(|dom| dom.interactive().map(|e| e.selector.clone()).collect())
        .unwrap_or_default()
}

fn summarize(
    url_changed: bool,
    title_changed: bool,
    appeared: &[String],
    disappeared: &[String],
    error_text: &Option<String>,
) -> String {
    let mut parts = Vec::new();
    if url_changed {
        parts.push("url changed".to_string());
    }
    if title_changed {
        parts.push("title changed".to_string());
    }
    if !appeared.is_empty() {
        parts.push(format!("{} elements appeared", appeared.len()));
    }
    if !disappeared.is_empty() {
        parts.push(format!("{} elements disappeared", disappeared.len()));
    }
    if error_text.is_some() {
        parts.push("error text detected".to_string());
    }
    parts.join(", ")
}
