//! Shared primitives used by every webtour crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier for one browser session owned by a single run.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for one logged action attempt, handed out by the run logger.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for one executed tour step.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct StepId(pub String);

impl StepId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check whether a point lies inside the viewport.
    pub fn contains(&self, point: &PixelPoint) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

/// A point in viewport pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp the point into the given viewport.
    pub fn clamped(&self, viewport: &Viewport) -> Self {
        Self {
            x: self.x.clamp(0.0, viewport.width),
            y: self.y.clamp(0.0, viewport.height),
        }
    }
}

impl fmt::Display for PixelPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.0}, {:.0})", self.x, self.y)
    }
}

/// A concrete on-screen target, addressed either by selector or by
/// viewport coordinates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetRef {
    /// CSS selector addressing.
    Selector(String),

    /// Raw viewport pixel addressing.
    Coordinates(PixelPoint),
}

impl TargetRef {
    /// Selector string, if this target is selector-addressed.
    pub fn selector(&self) -> Option<&str> {
        match self {
            TargetRef::Selector(selector) => Some(selector.as_str()),
            TargetRef::Coordinates(_) => None,
        }
    }

    /// Pixel coordinates, if this target is coordinate-addressed.
    pub fn coordinates(&self) -> Option<PixelPoint> {
        match self {
            TargetRef::Selector(_) => None,
            TargetRef::Coordinates(point) => Some(*point),
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetRef::Selector(selector) => write!(f, "selector:{}", selector),
            TargetRef::Coordinates(point) => write!(f, "coords:{}", point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(SessionId::new(), SessionId::new());
        assert_ne!(RunId::new(), RunId::new());
    }

    #[test]
    fn test_point_clamped_to_viewport() {
        let viewport = Viewport::new(1280.0, 720.0);
        let point = PixelPoint::new(-10.0, 900.0);
        let clamped = point.clamped(&viewport);
        assert_eq!(clamped, PixelPoint::new(0.0, 720.0));
        assert!(viewport.contains(&clamped));
    }

    #[test]
    fn test_target_ref_accessors() {
        let by_selector = TargetRef::Selector("#submit".to_string());
        assert_eq!(by_selector.selector(), Some("#submit"));
        assert!(by_selector.coordinates().is_none());

        let by_coords = TargetRef::Coordinates(PixelPoint::new(10.0, 20.0));
        assert!(by_coords.selector().is_none());
        assert_eq!(by_coords.coordinates(), Some(PixelPoint::new(10.0, 20.0)));
    }
}
