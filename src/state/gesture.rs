//! Gesture Module - Normalized gestures and per-frame gesture hooks
//!
//! Gesture recognition is left to the input adapter. The core only receives
//! the recognized gesture (swipe, pan, wheel) and fans it out to the frame's
//! registries. Frames in state Off ignore gestures entirely, that check lives
//! on the entity.

use std::fmt;

use crate::engine::SignalRegistry;
use crate::types::Persistence;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureKind {
    SwipeLeft,
    SwipeRight,
    SwipeUp,
    SwipeDown,
    PanLeft,
    PanRight,
    PanUp,
    PanDown,
    WheelUp,
    WheelDown,
}

impl GestureKind {
    pub const COUNT: usize = 10;

    pub fn name(self) -> &'static str {
        match self {
            Self::SwipeLeft => "swipeleft",
            Self::SwipeRight => "swiperight",
            Self::SwipeUp => "swipeup",
            Self::SwipeDown => "swipedown",
            Self::PanLeft => "panleft",
            Self::PanRight => "panright",
            Self::PanUp => "panup",
            Self::PanDown => "pandown",
            Self::WheelUp => "wheelup",
            Self::WheelDown => "wheeldown",
        }
    }
}

impl fmt::Display for GestureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    pub kind: GestureKind,
    pub x: f64,
    pub y: f64,
    pub delta_x: f64,
    pub delta_y: f64,
}

impl GestureEvent {
    pub fn new(kind: GestureKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            delta_x: 0.0,
            delta_y: 0.0,
        }
    }

    /// Wheel event from a vertical delta. Negative deltas scroll up.
    pub fn wheel(x: f64, y: f64, delta_y: f64) -> Self {
        let kind = if delta_y < 0.0 {
            GestureKind::WheelUp
        } else {
            GestureKind::WheelDown
        };
        Self {
            kind,
            x,
            y,
            delta_x: 0.0,
            delta_y,
        }
    }
}

pub struct GestureHooks {
    registries: [SignalRegistry<GestureEvent>; GestureKind::COUNT],
}

impl GestureHooks {
    pub fn new() -> Self {
        Self {
            registries: std::array::from_fn(|_| SignalRegistry::new()),
        }
    }

    pub fn get(&self, kind: GestureKind) -> &SignalRegistry<GestureEvent> {
        &self.registries[kind as usize]
    }

    pub fn subscribe<F>(&self, kind: GestureKind, callback: F, persistence: Persistence)
    where
        F: Fn(&GestureEvent) + 'static,
    {
        self.get(kind).subscribe(callback, persistence);
    }

    pub fn dispatch(&self, event: &GestureEvent) {
        self.get(event.kind).dispatch(event);
    }
}

impl Default for GestureHooks {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_wheel_direction() {
        assert_eq!(GestureEvent::wheel(0.0, 0.0, -3.0).kind, GestureKind::WheelUp);
        assert_eq!(GestureEvent::wheel(0.0, 0.0, 3.0).kind, GestureKind::WheelDown);
        assert_eq!(GestureEvent::wheel(0.0, 0.0, 0.0).kind, GestureKind::WheelDown);
    }

    #[test]
    fn test_dispatch_by_kind() {
        let hooks = GestureHooks::new();
        let lefts = Rc::new(Cell::new(0));

        let l = lefts.clone();
        hooks.subscribe(GestureKind::SwipeLeft, move |_| l.set(l.get() + 1), Persistence::Persistent);

        hooks.dispatch(&GestureEvent::new(GestureKind::SwipeRight, 0.0, 0.0));
        hooks.dispatch(&GestureEvent::new(GestureKind::SwipeLeft, 0.0, 0.0));
        assert_eq!(lefts.get(), 1);
    }
}
