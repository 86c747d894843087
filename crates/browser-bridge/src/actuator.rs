//! The actuator trait: atomic browser operations.

use async_trait::async_trait;
use webtour_core_types::{PixelPoint, TargetRef};

use crate::errors::ActuatorError;
use crate::types::{DomSnapshot, Screenshot};

/// Atomic operations on a remote-controlled browser.
///
/// One implementation instance owns one browser session. Every operation
/// reports failure as an [`ActuatorError`]; a closed session surfaces as
/// [`ActuatorError::SessionClosed`] on the next call.
#[async_trait]
pub trait BrowserActuator: Send + Sync {
    /// Open the browser session.
    async fn open(&self) -> Result<(), ActuatorError>;

    /// Close the browser session, aborting any in-flight operation.
    async fn close(&self) -> Result<(), ActuatorError>;

    /// Navigate to a URL, optionally waiting for a selector to appear.
    async fn navigate(
        &self,
        url: &str,
        wait_for_selector: Option<&str>,
    ) -> Result<(), ActuatorError>;

    /// Click a target (selector or viewport coordinates).
    async fn click(&self, target: &TargetRef) -> Result<(), ActuatorError>;

    /// Type text into a target, optionally clearing it first.
    async fn type_text(
        &self,
        target: &TargetRef,
        text: &str,
        clear_first: bool,
    ) -> Result<(), ActuatorError>;

    /// Scroll the viewport to the given coordinates.
    async fn scroll(&self, to: &PixelPoint) -> Result<(), ActuatorError>;

    /// Select a dropdown option by visible text.
    async fn select(&self, target: &TargetRef, option_text: &str) -> Result<(), ActuatorError>;

    /// Wait for a selector to appear, bounded by a timeout.
    async fn wait_for(&self, selector: &str, timeout_ms: u64) -> Result<(), ActuatorError>;

    /// Capture a screenshot of the current viewport.
    async fn screenshot(&self) -> Result<Screenshot, ActuatorError>;

    /// Capture a snapshot of the page's interactive elements.
    async fn dom_snapshot(&self) -> Result<DomSnapshot, ActuatorError>;

    /// Evaluate a script expression on the page.
    async fn evaluate(&self, expression: &str) -> Result<serde_json::Value, ActuatorError>;

    /// Current page URL.
    async fn current_url(&self) -> Result<String, ActuatorError>;

    /// Current page title.
    async fn current_title(&self) -> Result<String, ActuatorError>;
}
