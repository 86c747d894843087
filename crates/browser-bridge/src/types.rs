//! Wire types crossing the actuator boundary.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use webtour_core_types::{PixelPoint, Viewport};

/// A screenshot captured by the actuator.
///
/// Screenshots are transient: the owning session cleans them up after use
/// and nothing may assume one survives past the call that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Screenshot {
    /// Encoded image bytes (PNG unless the actuator says otherwise).
    pub data: Vec<u8>,

    /// Viewport dimensions the shot was taken at.
    pub viewport: Viewport,
}

impl Screenshot {
    pub fn new(data: Vec<u8>, viewport: Viewport) -> Self {
        Self { data, viewport }
    }

    /// Base64 rendering for perception-service payloads.
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.data)
    }
}

/// One interactive element reported by the actuator's DOM snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomElement {
    /// CSS selector addressing this element.
    pub selector: String,

    /// Tag name (lowercase).
    pub tag: String,

    /// Visible text content, trimmed.
    #[serde(default)]
    pub text: String,

    /// Whether the element is currently visible.
    pub visible: bool,

    /// Whether the element accepts pointer interaction.
    pub clickable: bool,

    /// Center position in viewport pixels, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PixelPoint>,
}

/// A lightweight DOM snapshot: the interactive elements of the page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomSnapshot {
    pub elements: Vec<DomElement>,
}

impl DomSnapshot {
    pub fn new(elements: Vec<DomElement>) -> Self {
        Self { elements }
    }

    /// Elements that are both visible and clickable.
    pub fn interactive(&self) -> impl Iterator<Item = &DomElement> {
        self.elements.iter().filter(|e| e.visible && e.clickable)
    }

    /// Find an element by exact selector.
    pub fn find(&self, selector: &str) -> Option<&DomElement> {
        self.elements.iter().find(|e| e.selector == selector)
    }
}

/// Everything known about the current page at one moment.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageContext {
    /// Current page URL.
    pub url: String,

    /// Page title, when the actuator could read one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Fresh screenshot, when one was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<Screenshot>,

    /// Fresh DOM snapshot, when one was captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dom: Option<DomSnapshot>,
}

impl PageContext {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            screenshot: None,
            dom: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_screenshot(mut self, screenshot: Screenshot) -> Self {
        self.screenshot = Some(screenshot);
        self
    }

    pub fn with_dom(mut self, dom: DomSnapshot) -> Self {
        self.dom = Some(dom);
        self
    }

    /// Whether the context carries enough evidence for target discovery:
    /// a URL plus at least one of DOM snapshot or screenshot.
    pub fn supports_discovery(&self) -> bool {
        !self.url.is_empty() && (self.dom.is_some() || self.screenshot.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(selector: &str, visible: bool, clickable: bool) -> DomElement {
        DomElement {
            selector: selector.to_string(),
            tag: "button".to_string(),
            text: String::new(),
            visible,
            clickable,
            position: None,
        }
    }

    #[test]
    fn test_interactive_filters_hidden_elements() {
        let snapshot = DomSnapshot::new(vec![
            element("#a", true, true),
            element("#b", false, true),
            element("#c", true, false),
        ]);
        let interactive: Vec<_> = snapshot.interactive().collect();
        assert_eq!(interactive.len(), 1);
        assert_eq!(interactive[0].selector, "#a");
    }

    #[test]
    fn test_supports_discovery() {
        let bare = PageContext::new("https://app.example.com");
        assert!(!bare.supports_discovery());

        let with_dom = bare.clone().with_dom(DomSnapshot::default());
        assert!(with_dom.supports_discovery());

        let no_url = PageContext::new("").with_dom(DomSnapshot::default());
        assert!(!no_url.supports_discovery());
    }

    #[test]
    fn test_screenshot_base64() {
        let shot = Screenshot::new(vec![1, 2, 3], Viewport::new(1280.0, 720.0));
        assert_eq!(shot.to_base64(), "AQID");
    }
}
