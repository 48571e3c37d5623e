//! Core types for laco.
//!
//! These types are shared by every layer: the hook registries, the lifecycle
//! entities, the pointer trackers and the builder that switches frames.

use std::fmt;
use std::rc::Rc;

// =============================================================================
// Geometry
// =============================================================================

/// Axis-aligned rectangle in page pixels.
///
/// Used for component hit-testing. Containment is strict on every edge,
/// so a pointer sitting exactly on the border is outside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Strict containment test (`left < x < left + width`, same for y).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.left && x < self.left + self.width && y > self.top && y < self.top + self.height
    }

    /// Translate page coordinates into coordinates local to this rectangle.
    pub fn to_local(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.left, y - self.top)
    }
}

// =============================================================================
// Surfaces
// =============================================================================

/// Identifier of an input surface (the whole viewport or one frame container).
///
/// Input adapters tag every normalized event with the surface it happened on,
/// the builder routes events by comparing these ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SurfaceId(Rc<str>);

impl SurfaceId {
    /// Name reserved for the viewport surface.
    pub const VIEWPORT: &'static str = "viewport";

    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Rc::from(id.as_ref()))
    }

    /// The surface covering the whole viewport.
    pub fn viewport() -> Self {
        Self::new(Self::VIEWPORT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_viewport(&self) -> bool {
        &*self.0 == Self::VIEWPORT
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Subscription options
// =============================================================================

/// Whether a subscription survives the dispatch that invoked it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Persistence {
    /// Removed after the first dispatch that invokes it.
    #[default]
    Once,
    /// Stays registered until explicitly unsubscribed.
    Persistent,
}

impl Persistence {
    pub fn is_persistent(self) -> bool {
        matches!(self, Self::Persistent)
    }
}

/// Whether a lifecycle call propagates to child components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cascade {
    /// Run own hooks, then the same operation on every child.
    #[default]
    Components,
    /// Run own hooks only.
    SelfOnly,
}

// =============================================================================
// Switching
// =============================================================================

/// Direction of a frame switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Next,
    Prev,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Next => f.write_str("next"),
            Self::Prev => f.write_str("prev"),
        }
    }
}
