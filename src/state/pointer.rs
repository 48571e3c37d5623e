//! Pointer Module - Per-surface pointer state and pointer hooks
//!
//! A `PointerTracker` follows one input surface: it is fed normalized input
//! events, keeps position / velocity / active state, and fires the pointer
//! hooks of the entity that owns it. The tracker only holds a weak reference
//! to those hooks, so dropping the owner silently detaches it.
//!
//! # Dispatch table
//!
//! | input        | device-specific hook | device-agnostic hook | while active          |
//! |--------------|----------------------|----------------------|-----------------------|
//! | `click`      | `Click`              |                      |                       |
//! | `mousemove`  | `MouseMove`          | `PointerMove`        | `MouseActiveMove`, `PointerActiveMove` |
//! | `mousedown`  | `MouseDown`          | `PointerDown`        |                       |
//! | `mouseup`    | `MouseUp`            | `PointerUp`          |                       |
//! | `touchstart` | `TouchDown`          | `PointerDown`        |                       |
//! | `touchend`   | `TouchUp`            | `PointerUp`          |                       |
//! | `touchmove`  | `TouchMove`          | `PointerMove`        | `PointerActiveMove`   |
//!
//! # Velocity
//!
//! `step()` runs once per animation tick and sets
//! `velocity = current - previous`, so rightward and downward motion is
//! positive.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use laco::{InputEvent, InputKind, PointerHook, PointerHooks, PointerTracker, Persistence, SurfaceId};
//!
//! let hooks = Rc::new(PointerHooks::new());
//! hooks.subscribe(PointerHook::PointerMove, |p| println!("{}, {}", p.x, p.y), Persistence::Persistent);
//!
//! let tracker = PointerTracker::new(&hooks, Some(SurfaceId::viewport()));
//! tracker.handle_input(&InputEvent::new(InputKind::MouseMove, 10.0, 4.0, SurfaceId::viewport()));
//! tracker.step();
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{signal, Signal};

use super::history::PointerHistory;
use crate::engine::SignalRegistry;
use crate::types::{Persistence, SurfaceId};

// =============================================================================
// TYPES
// =============================================================================

/// Last pointing device seen by a tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceKind {
    Mouse,
    #[default]
    Touch,
}

impl DeviceKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Mouse => "mouse",
            Self::Touch => "touch",
        }
    }
}

/// Normalized input kind delivered by an input adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputKind {
    Click,
    MouseMove,
    MouseDown,
    MouseUp,
    TouchStart,
    TouchEnd,
    TouchMove,
}

impl InputKind {
    const ALL: [InputKind; 7] = [
        InputKind::Click,
        InputKind::MouseMove,
        InputKind::MouseDown,
        InputKind::MouseUp,
        InputKind::TouchStart,
        InputKind::TouchEnd,
        InputKind::TouchMove,
    ];

    /// Numeric code stored in history frames.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(usize::from(code)).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseMove => "mousemove",
            Self::MouseDown => "mousedown",
            Self::MouseUp => "mouseup",
            Self::TouchStart => "touchstart",
            Self::TouchEnd => "touchend",
            Self::TouchMove => "touchmove",
        }
    }
}

/// Normalized input event: `{kind, x, y, surface}`.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEvent {
    pub kind: InputKind,
    pub x: f64,
    pub y: f64,
    pub surface: SurfaceId,
}

impl InputEvent {
    pub fn new(kind: InputKind, x: f64, y: f64, surface: SurfaceId) -> Self {
        Self { kind, x, y, surface }
    }

    /// Same event with coordinates replaced, used when forwarding into a
    /// component's local space.
    pub fn with_position(&self, x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            ..self.clone()
        }
    }
}

/// Snapshot handed to every pointer hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub device: DeviceKind,
    pub active: bool,
    /// Ticks since the tracker was created or history was enabled.
    pub frame_time: u64,
    pub vx: f64,
    pub vy: f64,
    /// Input that produced this sample.
    pub action: InputKind,
}

/// Position and button/finger state of one device.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DeviceState {
    pub x: f64,
    pub y: f64,
    pub active: bool,
}

// =============================================================================
// HOOKS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerHook {
    Click,
    MouseMove,
    MouseActiveMove,
    MouseDown,
    MouseUp,
    TouchMove,
    TouchDown,
    TouchUp,
    PointerMove,
    PointerActiveMove,
    PointerDown,
    PointerUp,
    /// Pointer entered a component's bounds.
    HoverBegin,
    /// Pointer left a component's bounds.
    HoverEnd,
    /// Pointer is inside a component's bounds, fired every tick.
    Hover,
}

impl PointerHook {
    pub const COUNT: usize = 15;

    pub fn name(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::MouseMove => "mouse-move",
            Self::MouseActiveMove => "mouse-active-move",
            Self::MouseDown => "mouse-down",
            Self::MouseUp => "mouse-up",
            Self::TouchMove => "touch-move",
            Self::TouchDown => "touch-down",
            Self::TouchUp => "touch-up",
            Self::PointerMove => "pointer-move",
            Self::PointerActiveMove => "pointer-active-move",
            Self::PointerDown => "pointer-down",
            Self::PointerUp => "pointer-up",
            Self::HoverBegin => "hover-begin",
            Self::HoverEnd => "hover-end",
            Self::Hover => "hover",
        }
    }
}

impl fmt::Display for PointerHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Pointer hook registries of one entity (or of the builder's viewport).
pub struct PointerHooks {
    registries: [SignalRegistry<PointerSample>; PointerHook::COUNT],
}

impl PointerHooks {
    pub fn new() -> Self {
        Self {
            registries: std::array::from_fn(|_| SignalRegistry::new()),
        }
    }

    pub fn get(&self, hook: PointerHook) -> &SignalRegistry<PointerSample> {
        &self.registries[hook as usize]
    }

    pub fn subscribe<F>(&self, hook: PointerHook, callback: F, persistence: Persistence)
    where
        F: Fn(&PointerSample) + 'static,
    {
        self.get(hook).subscribe(callback, persistence);
    }

    pub fn dispatch(&self, hook: PointerHook, sample: &PointerSample) {
        self.get(hook).dispatch(sample);
    }
}

impl Default for PointerHooks {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TRACKER
// =============================================================================

pub struct PointerTracker {
    owner: Weak<PointerHooks>,
    surface: Option<SurfaceId>,

    x: Signal<f64>,
    y: Signal<f64>,
    active: Signal<bool>,

    velocity: Cell<(f64, f64)>,
    prev: Cell<(f64, f64)>,
    mouse: Cell<DeviceState>,
    touch: Cell<DeviceState>,
    last_click: Cell<(f64, f64)>,
    device: Cell<DeviceKind>,
    frame_time: Cell<u64>,

    history: RefCell<PointerHistory>,
}

impl PointerTracker {
    /// Tracker bound to `owner`'s hooks. Without a surface the tracker only
    /// receives coordinates forwarded by its parent.
    pub fn new(owner: &Rc<PointerHooks>, surface: Option<SurfaceId>) -> Self {
        Self::with_owner(Rc::downgrade(owner), surface)
    }

    /// Data-only tracker that fires nothing.
    pub fn passive() -> Self {
        Self::with_owner(Weak::new(), None)
    }

    fn with_owner(owner: Weak<PointerHooks>, surface: Option<SurfaceId>) -> Self {
        Self {
            owner,
            surface,
            x: signal(0.0),
            y: signal(0.0),
            active: signal(false),
            velocity: Cell::new((0.0, 0.0)),
            prev: Cell::new((0.0, 0.0)),
            mouse: Cell::new(DeviceState::default()),
            touch: Cell::new(DeviceState::default()),
            last_click: Cell::new((0.0, 0.0)),
            device: Cell::new(DeviceKind::default()),
            frame_time: Cell::new(0),
            history: RefCell::new(PointerHistory::new()),
        }
    }

    pub fn surface(&self) -> Option<&SurfaceId> {
        self.surface.as_ref()
    }

    /// True if this tracker listens on `surface`.
    pub fn listens_on(&self, surface: &SurfaceId) -> bool {
        self.surface.as_ref() == Some(surface)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Apply one input event, fire the owner's hooks and record history.
    ///
    /// Returns the sample the hooks received.
    pub fn handle_input(&self, event: &InputEvent) -> PointerSample {
        let hooks = self.apply_input(event);
        let sample = self.sample_for(event.kind);

        if let Some(owner) = self.owner.upgrade() {
            for hook in &hooks {
                owner.dispatch(*hook, &sample);
            }
        }

        // Click and move frames carry the event position, the rest the
        // tracker position. The two only differ for clicks.
        let mut recorded = sample;
        if event.kind == InputKind::Click {
            recorded.x = event.x;
            recorded.y = event.y;
        }
        self.history.borrow_mut().record(recorded);

        tracing::trace!(input = event.kind.name(), hooks = hooks.len(), "pointer input");
        sample
    }

    /// Update state for `event` and return the hooks to fire, in order.
    fn apply_input(&self, event: &InputEvent) -> Vec<PointerHook> {
        let mut hooks = Vec::with_capacity(4);
        match event.kind {
            InputKind::Click => {
                self.last_click.set((event.x, event.y));
                hooks.push(PointerHook::Click);
            }
            InputKind::MouseMove => {
                self.device.set(DeviceKind::Mouse);
                let mut mouse = self.mouse.get();
                mouse.x = event.x;
                mouse.y = event.y;
                self.mouse.set(mouse);
                self.set_position(event.x, event.y);

                hooks.push(PointerHook::MouseMove);
                hooks.push(PointerHook::PointerMove);
                if mouse.active {
                    hooks.push(PointerHook::MouseActiveMove);
                    hooks.push(PointerHook::PointerActiveMove);
                }
            }
            InputKind::MouseDown => {
                self.set_mouse_active(true);
                hooks.push(PointerHook::MouseDown);
                hooks.push(PointerHook::PointerDown);
            }
            InputKind::MouseUp => {
                self.set_mouse_active(false);
                hooks.push(PointerHook::MouseUp);
                hooks.push(PointerHook::PointerUp);
            }
            InputKind::TouchStart => {
                self.device.set(DeviceKind::Touch);
                self.touch.set(DeviceState {
                    x: event.x,
                    y: event.y,
                    active: true,
                });
                self.active.set(true);
                self.set_position(event.x, event.y);
                hooks.push(PointerHook::TouchDown);
                hooks.push(PointerHook::PointerDown);
            }
            InputKind::TouchEnd => {
                self.device.set(DeviceKind::Touch);
                let mut touch = self.touch.get();
                touch.active = false;
                self.touch.set(touch);
                self.active.set(false);
                hooks.push(PointerHook::TouchUp);
                hooks.push(PointerHook::PointerUp);
            }
            InputKind::TouchMove => {
                self.device.set(DeviceKind::Touch);
                let mut touch = self.touch.get();
                touch.x = event.x;
                touch.y = event.y;
                self.touch.set(touch);
                self.set_position(event.x, event.y);

                hooks.push(PointerHook::TouchMove);
                hooks.push(PointerHook::PointerMove);
                if touch.active {
                    hooks.push(PointerHook::PointerActiveMove);
                }
            }
        }
        hooks
    }

    fn set_mouse_active(&self, active: bool) {
        let mut mouse = self.mouse.get();
        mouse.active = active;
        self.mouse.set(mouse);
        self.active.set(active);
    }

    // -------------------------------------------------------------------------
    // Per-tick
    // -------------------------------------------------------------------------

    /// Advance one animation tick: sample velocity and bump the frame counter.
    pub fn step(&self) {
        let (x, y) = self.position();
        let (px, py) = self.prev.get();
        self.velocity.set((x - px, y - py));
        self.prev.set((x, y));
        self.frame_time.set(self.frame_time.get() + 1);
    }

    // -------------------------------------------------------------------------
    // Direct state access
    // -------------------------------------------------------------------------

    /// Move the pointer without firing hooks.
    pub fn set_position(&self, x: f64, y: f64) {
        self.x.set(x);
        self.y.set(y);
    }

    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x.get(), self.y.get())
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    pub fn velocity(&self) -> (f64, f64) {
        self.velocity.get()
    }

    pub fn device(&self) -> DeviceKind {
        self.device.get()
    }

    pub fn is_mouse(&self) -> bool {
        self.device.get() == DeviceKind::Mouse
    }

    pub fn is_touch(&self) -> bool {
        self.device.get() == DeviceKind::Touch
    }

    pub fn mouse(&self) -> DeviceState {
        self.mouse.get()
    }

    pub fn touch(&self) -> DeviceState {
        self.touch.get()
    }

    pub fn last_click(&self) -> (f64, f64) {
        self.last_click.get()
    }

    pub fn frame_time(&self) -> u64 {
        self.frame_time.get()
    }

    /// Reactive x coordinate.
    pub fn x_signal(&self) -> Signal<f64> {
        self.x.clone()
    }

    /// Reactive y coordinate.
    pub fn y_signal(&self) -> Signal<f64> {
        self.y.clone()
    }

    /// Reactive active flag.
    pub fn active_signal(&self) -> Signal<bool> {
        self.active.clone()
    }

    /// Current state as a sample tagged with `action`.
    pub fn sample_for(&self, action: InputKind) -> PointerSample {
        let (x, y) = self.position();
        let (vx, vy) = self.velocity();
        PointerSample {
            x,
            y,
            device: self.device(),
            active: self.is_active(),
            frame_time: self.frame_time(),
            vx,
            vy,
            action,
        }
    }

    /// Current state tagged as a plain move.
    pub fn sample(&self) -> PointerSample {
        let action = match self.device() {
            DeviceKind::Mouse => InputKind::MouseMove,
            DeviceKind::Touch => InputKind::TouchMove,
        };
        self.sample_for(action)
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// Start recording `size` samples. Resets the frame counter.
    pub fn enable_history(&self, size: usize) {
        self.history.borrow_mut().enable(size);
        self.frame_time.set(0);
    }

    pub fn disable_history(&self) {
        self.history.borrow_mut().disable();
    }

    pub fn history(&self) -> std::cell::Ref<'_, PointerHistory> {
        self.history.borrow()
    }
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTracker")
            .field("surface", &self.surface)
            .field("position", &self.position())
            .field("velocity", &self.velocity())
            .field("active", &self.is_active())
            .field("device", &self.device())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
