//! Lifecycle Entity - The state machine shared by frames, components and menus
//!
//! There is one concrete entity type. A frame, a frame component and the
//! menu differ only in the `Capabilities` they were built with, which decide
//! whether the entity owns a pointer tracker, gesture hooks, adjacency links
//! or a hit-test rectangle.
//!
//! # States
//!
//! ```text
//! Off --start_sequence--> Begin --start_complete--> Wait --stop_sequence--> Stop
//!  ^                                                 |  ^                      |
//!  |                                  wait_sequence  +--+                      |
//!  +------------------------stop_sequence_completed----------------------------+
//!
//! off_sequence forces Off from any state.
//! ```
//!
//! Transitions are not validated. Calling `start_complete()` from Off simply
//! moves to Wait.
//!
//! # Phases
//!
//! Every lifecycle operation is a `Phase` run in two steps: the entity's own
//! work (state change and hook dispatch), then the same phase on every child
//! when the cascade is `Cascade::Components`. The named methods
//! (`start_sequence()`, `resize()`, ...) always cascade. `apply()` lets the
//! caller choose.
//!
//! Children are snapshotted before the cascade, so a hook may add or remove
//! components without invalidating the walk.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use super::capabilities::Capabilities;
use super::hooks::{Hook, HookMap};
use super::registry::SignalRegistry;
use super::traits::{HasChildren, Resizable, Switchable};
use crate::error::FrameError;
use crate::state::{
    classify, Breakpoint, GestureEvent, GestureHooks, GestureKind, InputEvent, PointerHook,
    PointerHooks, PointerSample, PointerTracker, ViewportSource,
};
use crate::types::{Cascade, Persistence, Rect, SurfaceId};

/// Name of an entity that was never given one.
pub const UNNAMED: &str = "NULL";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LifecycleState {
    #[default]
    Off,
    Begin,
    Wait,
    Stop,
}

/// Flags of the Wait poll/retry loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitState {
    /// A wait iteration has begun and not completed.
    pub in_process: bool,
    /// Whether `wait_sequence()` may begin a new iteration.
    pub allow_iteration: bool,
    pub repeat: bool,
}

impl Default for WaitState {
    fn default() -> Self {
        Self {
            in_process: false,
            allow_iteration: true,
            repeat: true,
        }
    }
}

/// One step of the lifecycle protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialization,
    InitializationComplete,
    LoadSequence,
    LoadSequenceComplete,
    PrepareResize,
    Resize,
    StartBeginConditions,
    StartSequence,
    StartImmediately,
    StartComplete,
    StopSequence,
    StopSequenceCompleted,
    StopImmediately,
    StopEndConditions,
    WaitBeginConditions,
    WaitResetConditions,
    WaitSequence,
    WaitSequenceCompleted,
    OffSequence,
    AnimationFrame,
}

/// Identity and adjacency of a frame.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FrameLinks {
    pub id: String,
    pub next: Option<String>,
    pub prev: Option<String>,
    /// Name of the switch effect used when leaving this frame.
    pub switch_effect: Option<String>,
}

impl FrameLinks {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn next(mut self, id: impl Into<String>) -> Self {
        self.next = Some(id.into());
        self
    }

    pub fn prev(mut self, id: impl Into<String>) -> Self {
        self.prev = Some(id.into());
        self
    }

    pub fn switch_effect(mut self, name: impl Into<String>) -> Self {
        self.switch_effect = Some(name.into());
        self
    }
}

/// How a component receives pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverMode {
    /// Fed explicitly through `external_input()`.
    #[default]
    External,
    /// Fed by the parent whenever the pointer is inside the bounds.
    Internal,
}

#[derive(Debug)]
struct ComponentArea {
    bounds: Cell<Rect>,
    mode: Cell<HoverMode>,
    hovered: Cell<bool>,
}

// =============================================================================
// ENTITY
// =============================================================================

pub struct LifecycleEntity {
    name: String,
    capabilities: Capabilities,
    state: Cell<LifecycleState>,
    initialized: Cell<bool>,
    children: RefCell<Vec<Rc<LifecycleEntity>>>,
    hooks: HookMap<LifecycleEntity>,
    breakpoint: Cell<Breakpoint>,
    wait: Cell<WaitState>,
    viewport: Rc<dyn ViewportSource>,

    links: Option<FrameLinks>,
    pointer_hooks: Option<Rc<PointerHooks>>,
    tracker: Option<PointerTracker>,
    gestures: Option<GestureHooks>,
    area: Option<ComponentArea>,
}

impl LifecycleEntity {
    /// Bare entity with only the lifecycle. Use the `frame`, `component` and
    /// `menu` constructors for anything that handles input.
    pub fn new(name: impl Into<String>, viewport: Rc<dyn ViewportSource>) -> Self {
        Self::with_parts(name.into(), Capabilities::empty(), viewport)
    }

    /// Full-screen frame listening on the surface named after its id.
    pub fn frame(links: FrameLinks, viewport: Rc<dyn ViewportSource>) -> Self {
        let hooks = Rc::new(PointerHooks::new());
        let surface = SurfaceId::new(&links.id);
        let mut entity = Self::with_parts(links.id.clone(), Capabilities::FRAME, viewport);
        entity.tracker = Some(PointerTracker::new(&hooks, Some(surface)));
        entity.pointer_hooks = Some(hooks);
        entity.gestures = Some(GestureHooks::new());
        entity.links = Some(links);
        entity
    }

    /// Component hit-tested against `bounds` in its parent's coordinates.
    pub fn component(
        name: impl Into<String>,
        bounds: Rect,
        viewport: Rc<dyn ViewportSource>,
    ) -> Self {
        let hooks = Rc::new(PointerHooks::new());
        let mut entity = Self::with_parts(name.into(), Capabilities::COMPONENT, viewport);
        entity.tracker = Some(PointerTracker::new(&hooks, None));
        entity.pointer_hooks = Some(hooks);
        entity.area = Some(ComponentArea {
            bounds: Cell::new(bounds),
            mode: Cell::new(HoverMode::default()),
            hovered: Cell::new(false),
        });
        entity
    }

    /// Menu frame. Its pointer subscriptions land on `global`, the builder's
    /// viewport-wide hooks.
    pub fn menu(
        name: impl Into<String>,
        viewport: Rc<dyn ViewportSource>,
        global: &Rc<PointerHooks>,
    ) -> Self {
        let mut entity = Self::with_parts(name.into(), Capabilities::MENU, viewport);
        entity.pointer_hooks = Some(Rc::clone(global));
        entity
    }

    fn with_parts(
        name: String,
        capabilities: Capabilities,
        viewport: Rc<dyn ViewportSource>,
    ) -> Self {
        Self {
            name,
            capabilities,
            state: Cell::new(LifecycleState::Off),
            initialized: Cell::new(false),
            children: RefCell::new(Vec::new()),
            hooks: HookMap::new(),
            breakpoint: Cell::new(Breakpoint::default()),
            wait: Cell::new(WaitState::default()),
            viewport,
            links: None,
            pointer_hooks: None,
            tracker: None,
            gestures: None,
            area: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    pub fn has(&self, capability: Capabilities) -> bool {
        self.capabilities.contains(capability)
    }

    pub fn state(&self) -> LifecycleState {
        self.state.get()
    }

    pub fn is_off(&self) -> bool {
        self.state() == LifecycleState::Off
    }

    pub fn is_begin(&self) -> bool {
        self.state() == LifecycleState::Begin
    }

    pub fn is_wait(&self) -> bool {
        self.state() == LifecycleState::Wait
    }

    pub fn is_stop(&self) -> bool {
        self.state() == LifecycleState::Stop
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn wait_state(&self) -> WaitState {
        self.wait.get()
    }

    pub fn links(&self) -> Option<&FrameLinks> {
        self.links.as_ref()
    }

    /// Surface this entity's tracker listens on, if any.
    pub fn surface(&self) -> Option<&SurfaceId> {
        self.tracker.as_ref().and_then(PointerTracker::surface)
    }

    pub fn pointer(&self) -> Option<&PointerTracker> {
        self.tracker.as_ref()
    }

    pub fn pointer_hooks(&self) -> Option<&Rc<PointerHooks>> {
        self.pointer_hooks.as_ref()
    }

    pub fn gesture_hooks(&self) -> Option<&GestureHooks> {
        self.gestures.as_ref()
    }

    // -------------------------------------------------------------------------
    // Hooks
    // -------------------------------------------------------------------------

    pub fn hook(&self, hook: Hook) -> &SignalRegistry<LifecycleEntity> {
        self.hooks.get(hook)
    }

    /// Subscribe to a lifecycle hook.
    pub fn on<F>(&self, hook: Hook, callback: F, persistence: Persistence)
    where
        F: Fn(&LifecycleEntity) + 'static,
    {
        self.hooks.get(hook).subscribe(callback, persistence);
    }

    pub fn on_pointer<F>(
        &self,
        hook: PointerHook,
        callback: F,
        persistence: Persistence,
    ) -> Result<(), FrameError>
    where
        F: Fn(&PointerSample) + 'static,
    {
        let hooks = self
            .pointer_hooks
            .as_ref()
            .filter(|_| self.has(Capabilities::POINTER))
            .ok_or_else(|| self.missing("pointer"))?;
        hooks.subscribe(hook, callback, persistence);
        Ok(())
    }

    pub fn on_gesture<F>(
        &self,
        kind: GestureKind,
        callback: F,
        persistence: Persistence,
    ) -> Result<(), FrameError>
    where
        F: Fn(&GestureEvent) + 'static,
    {
        let gestures = self
            .gestures
            .as_ref()
            .ok_or_else(|| self.missing("gesture"))?;
        gestures.subscribe(kind, callback, persistence);
        Ok(())
    }

    pub(crate) fn missing(&self, capability: &'static str) -> FrameError {
        FrameError::MissingCapability {
            entity: self.name.clone(),
            capability,
        }
    }

    // -------------------------------------------------------------------------
    // Lifecycle
    // -------------------------------------------------------------------------

    /// Run `phase` on this entity and, when asked, on every child.
    ///
    /// Returns false when the entity's own step was refused (repeated
    /// initialization, a disallowed wait iteration). Children are not
    /// touched in that case.
    pub fn apply(&self, phase: Phase, cascade: Cascade) -> bool {
        self.run(phase, cascade, None)
    }

    fn run(&self, phase: Phase, cascade: Cascade, parent: Option<&PointerSample>) -> bool {
        if !self.own_phase(phase, parent) {
            return false;
        }

        if cascade == Cascade::Components {
            // Children hover against this entity's pointer, or against the
            // pointer this entity was ticked with when it has none.
            let forwarded = match phase {
                Phase::AnimationFrame => self
                    .tracker
                    .as_ref()
                    .map(PointerTracker::sample)
                    .or(parent.copied()),
                _ => None,
            };
            for child in self.components() {
                child.run(phase, Cascade::Components, forwarded.as_ref());
            }
        }

        if let (Phase::AnimationFrame, Some(tracker)) = (phase, &self.tracker) {
            tracker.step();
        }
        true
    }

    /// The entity's own part of a phase. No children involved.
    fn own_phase(&self, phase: Phase, parent: Option<&PointerSample>) -> bool {
        match phase {
            Phase::Initialization => {
                if self.initialized.replace(true) {
                    return false;
                }
                self.hooks.dispatch(Hook::BeforeInit, self);
                self.breakpoint.set(classify(self.viewport.width()));
            }
            Phase::InitializationComplete => self.hooks.dispatch(Hook::AfterInit, self),
            Phase::LoadSequence => self.hooks.dispatch(Hook::BeforeLoad, self),
            Phase::LoadSequenceComplete => self.hooks.dispatch(Hook::AfterLoad, self),
            Phase::PrepareResize => self.hooks.dispatch(Hook::PrepareResize, self),
            Phase::Resize => {
                self.hooks.dispatch(Hook::Resize, self);
                self.detect_breakpoint();
            }
            Phase::StartSequence | Phase::StartImmediately => {
                self.transition(LifecycleState::Begin);
                self.hooks.dispatch(Hook::StartBegin, self);
            }
            Phase::StartComplete => {
                self.transition(LifecycleState::Wait);
                self.hooks.dispatch(Hook::StartEnd, self);
            }
            Phase::StopSequence => {
                self.transition(LifecycleState::Stop);
                self.hooks.dispatch(Hook::StopBegin, self);
            }
            Phase::StopSequenceCompleted | Phase::StopImmediately => {
                self.transition(LifecycleState::Off);
                self.hooks.dispatch(Hook::StopEnd, self);
            }
            Phase::WaitResetConditions => self.wait.set(WaitState::default()),
            Phase::WaitSequence => {
                let mut wait = self.wait.get();
                if !wait.allow_iteration {
                    tracing::trace!(entity = %self.name, "wait iteration disallowed");
                    return false;
                }
                wait.in_process = true;
                self.wait.set(wait);
                self.transition(LifecycleState::Wait);
                self.hooks.dispatch(Hook::WaitBegin, self);
            }
            Phase::WaitSequenceCompleted => {
                let mut wait = self.wait.get();
                wait.in_process = false;
                self.wait.set(wait);
                self.hooks.dispatch(Hook::WaitEnd, self);
            }
            Phase::OffSequence => {
                self.transition(LifecycleState::Off);
                self.hooks.dispatch(Hook::Off, self);
            }
            Phase::AnimationFrame => {
                self.hooks.dispatch(Hook::Tick, self);
                if let Some(sample) = parent {
                    self.track_hover(sample);
                }
            }
            // Extension points for composed behavior, nothing of their own.
            Phase::StartBeginConditions
            | Phase::StopEndConditions
            | Phase::WaitBeginConditions => {}
        }
        true
    }

    fn transition(&self, to: LifecycleState) {
        let from = self.state.replace(to);
        tracing::debug!(entity = %self.name, ?from, ?to, "lifecycle transition");
    }

    fn detect_breakpoint(&self) -> Vec<Hook> {
        let current = classify(self.viewport.width());
        self.fire_breakpoint_edges(current)
    }

    fn fire_breakpoint_edges(&self, current: Breakpoint) -> Vec<Hook> {
        let previous = self.breakpoint.replace(current);
        let edges = current.edges_from(previous);
        for hook in &edges {
            tracing::debug!(entity = %self.name, %hook, "breakpoint edge");
            self.hooks.dispatch(*hook, self);
        }
        edges
    }

    pub fn initialization(&self) -> bool {
        self.apply(Phase::Initialization, Cascade::Components)
    }

    pub fn initialization_complete(&self) {
        self.apply(Phase::InitializationComplete, Cascade::Components);
    }

    pub fn load_sequence(&self) {
        self.apply(Phase::LoadSequence, Cascade::Components);
    }

    pub fn load_sequence_complete(&self) {
        self.apply(Phase::LoadSequenceComplete, Cascade::Components);
    }

    pub fn start_begin_conditions(&self) {
        self.apply(Phase::StartBeginConditions, Cascade::Components);
    }

    pub fn start_sequence(&self) {
        self.apply(Phase::StartSequence, Cascade::Components);
    }

    /// Same transition as `start_sequence()`. A zero-length animation is the
    /// animator's business.
    pub fn start_immediately(&self) {
        self.apply(Phase::StartImmediately, Cascade::Components);
    }

    pub fn start_complete(&self) {
        self.apply(Phase::StartComplete, Cascade::Components);
    }

    pub fn stop_sequence(&self) {
        self.apply(Phase::StopSequence, Cascade::Components);
    }

    pub fn stop_sequence_completed(&self) {
        self.apply(Phase::StopSequenceCompleted, Cascade::Components);
    }

    pub fn stop_immediately(&self) {
        self.apply(Phase::StopImmediately, Cascade::Components);
    }

    pub fn stop_end_conditions(&self) {
        self.apply(Phase::StopEndConditions, Cascade::Components);
    }

    pub fn wait_begin_conditions(&self) {
        self.apply(Phase::WaitBeginConditions, Cascade::Components);
    }

    pub fn wait_reset_conditions(&self) {
        self.apply(Phase::WaitResetConditions, Cascade::Components);
    }

    /// Begin a wait iteration. Returns false if iteration is disallowed.
    pub fn wait_sequence(&self) -> bool {
        self.apply(Phase::WaitSequence, Cascade::Components)
    }

    pub fn wait_sequence_completed(&self) {
        self.apply(Phase::WaitSequenceCompleted, Cascade::Components);
    }

    /// Fire the wait-retry hook. Never cascades.
    pub fn wait_retry(&self) {
        self.hooks.dispatch(Hook::WaitRetry, self);
    }

    pub fn is_wait_iteration_in_progress(&self) -> bool {
        self.wait.get().in_process
    }

    pub fn is_wait_iteration_allowed(&self) -> bool {
        self.wait.get().allow_iteration
    }

    pub fn allow_wait_iteration(&self) -> &Self {
        self.update_wait(|wait| wait.allow_iteration = true);
        self
    }

    pub fn disallow_wait_iteration(&self) -> &Self {
        self.update_wait(|wait| wait.allow_iteration = false);
        self
    }

    pub fn set_wait_repeat(&self, repeat: bool) -> &Self {
        self.update_wait(|wait| wait.repeat = repeat);
        self
    }

    fn update_wait(&self, f: impl FnOnce(&mut WaitState)) {
        let mut wait = self.wait.get();
        f(&mut wait);
        self.wait.set(wait);
    }

    pub fn off_sequence(&self) {
        self.apply(Phase::OffSequence, Cascade::Components);
    }

    /// One animation tick: the tick hook, hover tracking against the parent
    /// pointer, the children, then the pointer's velocity step.
    pub fn animation_frame(&self) {
        self.apply(Phase::AnimationFrame, Cascade::Components);
    }

    /// Tick driven by an outside pointer, used for the menu which has no
    /// tracker of its own.
    pub(crate) fn animation_frame_with(&self, pointer: &PointerSample) {
        self.run(Phase::AnimationFrame, Cascade::Components, Some(pointer));
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    /// Feed a native input event to this entity's tracker, then forward it to
    /// internal-mode components under the pointer, in their local space.
    pub fn handle_input(&self, event: &InputEvent) {
        let Some(tracker) = &self.tracker else {
            return;
        };
        tracker.handle_input(event);
        self.forward_input(event);
    }

    fn forward_input(&self, event: &InputEvent) {
        for child in self.components() {
            if !child.has(Capabilities::HIT_AREA) {
                continue;
            }
            let Some(area) = &child.area else {
                continue;
            };
            if area.mode.get() != HoverMode::Internal {
                continue;
            }
            let bounds = area.bounds.get();
            if !bounds.contains(event.x, event.y) {
                continue;
            }
            let (x, y) = bounds.to_local(event.x, event.y);
            child.handle_input(&event.with_position(x, y));
        }
    }

    /// Drive an external-mode component directly. Coordinates are taken
    /// as already local.
    pub fn external_input(&self, event: &InputEvent) {
        if let Some(tracker) = &self.tracker {
            tracker.handle_input(event);
        }
    }

    /// Dispatch a recognized gesture. Ignored while Off or without gesture
    /// hooks. Returns whether it was dispatched.
    pub fn handle_gesture(&self, event: &GestureEvent) -> bool {
        let Some(gestures) = &self.gestures else {
            return false;
        };
        if self.is_off() {
            return false;
        }
        gestures.dispatch(event);
        true
    }

    // -------------------------------------------------------------------------
    // Hit area
    // -------------------------------------------------------------------------

    pub fn bounds(&self) -> Option<Rect> {
        self.area.as_ref().map(|area| area.bounds.get())
    }

    pub fn set_bounds(&self, bounds: Rect) {
        if let Some(area) = &self.area {
            area.bounds.set(bounds);
        }
    }

    pub fn hover_mode(&self) -> Option<HoverMode> {
        self.area.as_ref().map(|area| area.mode.get())
    }

    pub fn set_hover_mode(&self, mode: HoverMode) {
        if let Some(area) = &self.area {
            area.mode.set(mode);
        }
    }

    pub fn is_hovered(&self) -> bool {
        self.area.as_ref().is_some_and(|area| area.hovered.get())
    }

    /// True if `(x, y)` in parent coordinates lies strictly inside the bounds.
    pub fn hit_test(&self, x: f64, y: f64) -> bool {
        self.bounds().is_some_and(|bounds| bounds.contains(x, y))
    }

    /// Resize as a peer of the builder: the resize hook and the component
    /// cascade only. Edges for the entity itself come through
    /// `notify_breakpoint`, components still detect their own.
    pub(crate) fn resize_as_root(&self) {
        self.hooks.dispatch(Hook::Resize, self);
        for child in self.components() {
            child.resize();
        }
    }

    fn track_hover(&self, parent: &PointerSample) {
        if !self.has(Capabilities::HIT_AREA) {
            return;
        }
        let (Some(area), Some(tracker), Some(hooks)) =
            (&self.area, &self.tracker, &self.pointer_hooks)
        else {
            return;
        };

        let bounds = area.bounds.get();
        let (x, y) = bounds.to_local(parent.x, parent.y);
        tracker.set_position(x, y);
        let sample = tracker.sample();

        let inside = bounds.contains(parent.x, parent.y);
        let was_inside = area.hovered.replace(inside);
        match (was_inside, inside) {
            (false, true) => hooks.dispatch(PointerHook::HoverBegin, &sample),
            (true, false) => hooks.dispatch(PointerHook::HoverEnd, &sample),
            _ => {}
        }
        if inside {
            hooks.dispatch(PointerHook::Hover, &sample);
        }
    }
}

// =============================================================================
// CAPABILITY INTERFACES
// =============================================================================

impl Resizable for LifecycleEntity {
    fn prepare_resize(&self) {
        self.apply(Phase::PrepareResize, Cascade::Components);
    }

    fn resize(&self) {
        self.apply(Phase::Resize, Cascade::Components);
    }

    fn breakpoint(&self) -> Breakpoint {
        self.breakpoint.get()
    }

    fn notify_breakpoint(&self, current: Breakpoint) -> Vec<Hook> {
        self.fire_breakpoint_edges(current)
    }
}

impl Switchable for LifecycleEntity {
    /// Frame id for frames, the entity name otherwise.
    fn frame_name(&self) -> &str {
        self.links.as_ref().map_or(&self.name, |links| &links.id)
    }

    fn next_frame(&self) -> Option<&str> {
        self.links.as_ref()?.next.as_deref()
    }

    fn prev_frame(&self) -> Option<&str> {
        self.links.as_ref()?.prev.as_deref()
    }

    fn switch_effect_name(&self) -> Option<&str> {
        self.links.as_ref()?.switch_effect.as_deref()
    }

    fn begin_switch(&self) {
        self.hooks.dispatch(Hook::BeginSwitch, self);
    }

    fn end_switch(&self) {
        self.hooks.dispatch(Hook::EndSwitch, self);
    }
}

impl HasChildren for LifecycleEntity {
    fn add_component(&self, child: LifecycleEntity) -> Rc<LifecycleEntity> {
        let child = Rc::new(child);
        self.children.borrow_mut().push(Rc::clone(&child));
        child
    }

    /// Remove the first component called `name`. The component is handed
    /// back, not torn down.
    fn remove_component(&self, name: &str) -> Option<Rc<LifecycleEntity>> {
        let mut children = self.children.borrow_mut();
        let index = children.iter().position(|child| child.name == name)?;
        Some(children.remove(index))
    }

    fn components(&self) -> Vec<Rc<LifecycleEntity>> {
        self.children.borrow().clone()
    }
}

impl fmt::Debug for LifecycleEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleEntity")
            .field("name", &self.name)
            .field("capabilities", &self.capabilities)
            .field("state", &self.state.get())
            .field("initialized", &self.initialized.get())
            .field("breakpoint", &self.breakpoint.get())
            .field("children", &self.children.borrow().len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{BootstrapTier, DeviceClass, InputKind, ManualViewport};

    fn viewport(width: f64) -> Rc<ManualViewport> {
        Rc::new(ManualViewport::new(width))
    }

    fn log() -> Rc<RefCell<Vec<String>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    fn record(entity: &LifecycleEntity, hook: Hook, log: &Rc<RefCell<Vec<String>>>) {
        let l = log.clone();
        entity.on(
            hook,
            move |e| l.borrow_mut().push(format!("{}:{}", e.name(), hook)),
            Persistence::Persistent,
        );
    }

    #[test]
    fn test_initial_state() {
        let entity = LifecycleEntity::new("plain", viewport(1024.0));
        assert!(entity.is_off());
        assert!(!entity.is_initialized());
        assert_eq!(entity.breakpoint(), Breakpoint::default());
        assert_eq!(LifecycleEntity::new(UNNAMED, viewport(1.0)).frame_name(), "NULL");
    }

    #[test]
    fn test_initialization_is_guarded() {
        let vp = viewport(500.0);
        let parent = LifecycleEntity::new("parent", vp.clone());
        let child = parent.add_component(LifecycleEntity::new("child", vp));
        let events = log();
        record(&parent, Hook::BeforeInit, &events);
        record(&child, Hook::BeforeInit, &events);

        assert!(parent.initialization());
        assert!(!parent.initialization());
        assert_eq!(*events.borrow(), vec!["parent:before-init", "child:before-init"]);
        assert_eq!(parent.breakpoint().device, DeviceClass::Mobile);
        assert_eq!(child.breakpoint().tier, BootstrapTier::Esm);

        parent.initialization_complete();
        assert!(child.is_initialized());
    }

    #[test]
    fn test_full_cycle() {
        let entity = LifecycleEntity::new("intro", viewport(1300.0));
        entity.start_sequence();
        assert!(entity.is_begin());
        entity.start_complete();
        assert!(entity.is_wait());
        entity.stop_sequence();
        assert!(entity.is_stop());
        entity.stop_sequence_completed();
        assert!(entity.is_off());

        entity.start_immediately();
        entity.off_sequence();
        assert!(entity.is_off());
    }

    #[test]
    fn test_start_sequence_state_survives_child_hooks() {
        let vp = viewport(1300.0);
        let parent = LifecycleEntity::new("parent", vp.clone());
        let child = parent.add_component(LifecycleEntity::new("child", vp));
        child.on(Hook::StartBegin, |c| c.start_complete(), Persistence::Persistent);

        parent.start_sequence();
        assert!(parent.is_begin());
        assert!(child.is_wait());

        parent.start_complete();
        assert!(parent.is_wait());
    }

    #[test]
    fn test_cascade_order_and_self_only() {
        let vp = viewport(1300.0);
        let parent = LifecycleEntity::new("parent", vp.clone());
        let a = parent.add_component(LifecycleEntity::new("a", vp.clone()));
        let b = parent.add_component(LifecycleEntity::new("b", vp));
        let events = log();
        for entity in [&parent, &*a, &*b] {
            record(entity, Hook::StopBegin, &events);
        }

        parent.stop_sequence();
        assert_eq!(
            *events.borrow(),
            vec!["parent:stop-begin", "a:stop-begin", "b:stop-begin"]
        );

        events.borrow_mut().clear();
        parent.apply(Phase::StopSequence, Cascade::SelfOnly);
        assert_eq!(*events.borrow(), vec!["parent:stop-begin"]);
    }

    #[test]
    fn test_resize_edge_triggering() {
        let vp = viewport(1300.0);
        let entity = LifecycleEntity::new("frame", vp.clone());
        entity.initialization();
        let events = log();
        for hook in Hook::ALL {
            if hook.name().starts_with("resize-") {
                record(&entity, hook, &events);
            }
        }

        for width in [1300.0, 1300.0, 1000.0, 500.0] {
            vp.set_width(width);
            entity.resize();
        }
        assert_eq!(
            *events.borrow(),
            vec!["frame:resize-bp-lg", "frame:resize-mobile", "frame:resize-bp-esm"]
        );
    }

    #[test]
    fn test_resize_before_initialization_uses_default_state() {
        let vp = viewport(1000.0);
        let entity = LifecycleEntity::new("frame", vp);
        let events = log();
        record(&entity, Hook::ResizeLg, &events);
        record(&entity, Hook::ResizeDesktop, &events);

        entity.resize();
        assert_eq!(*events.borrow(), vec!["frame:resize-bp-lg"]);
    }

    #[test]
    fn test_prepare_resize_is_separate() {
        let entity = LifecycleEntity::new("frame", viewport(1000.0));
        let events = log();
        record(&entity, Hook::PrepareResize, &events);
        record(&entity, Hook::Resize, &events);

        entity.prepare_resize();
        entity.resize();
        assert_eq!(*events.borrow(), vec!["frame:prepare-resize", "frame:resize"]);
    }

    #[test]
    fn test_notify_breakpoint_is_idempotent() {
        let entity = LifecycleEntity::new("frame", viewport(1300.0));
        let current = classify(700.0);
        assert_eq!(
            entity.notify_breakpoint(current),
            vec![Hook::ResizeMobile, Hook::ResizeSm]
        );
        assert!(entity.notify_breakpoint(current).is_empty());
    }

    #[test]
    fn test_wait_iteration_gate() {
        let entity = LifecycleEntity::new("loader", viewport(1300.0));
        let events = log();
        record(&entity, Hook::WaitBegin, &events);
        record(&entity, Hook::WaitEnd, &events);
        record(&entity, Hook::WaitRetry, &events);

        assert!(entity.wait_sequence());
        assert!(entity.is_wait_iteration_in_progress());
        entity.wait_retry();
        entity.wait_sequence_completed();
        assert!(!entity.is_wait_iteration_in_progress());

        entity.disallow_wait_iteration();
        assert!(!entity.wait_sequence());
        assert!(!entity.is_wait_iteration_in_progress());

        entity.wait_reset_conditions();
        assert!(entity.is_wait_iteration_allowed());
        assert_eq!(
            *events.borrow(),
            vec!["loader:wait-begin", "loader:wait-retry", "loader:wait-end"]
        );
    }

    #[test]
    fn test_remove_component_by_name() {
        let vp = viewport(1300.0);
        let parent = LifecycleEntity::new("parent", vp.clone());
        parent.add_component(LifecycleEntity::new("a", vp.clone()));
        parent.add_component(LifecycleEntity::new("b", vp));

        let removed = parent.remove_component("a");
        assert_eq!(removed.map(|c| c.name().to_string()), Some("a".to_string()));
        assert!(parent.remove_component("a").is_none());
        assert_eq!(parent.components().len(), 1);
    }

    #[test]
    fn test_component_added_during_cascade_waits_for_next_call() {
        let vp = viewport(1300.0);
        let parent = Rc::new(LifecycleEntity::new("parent", vp.clone()));
        let first = parent.add_component(LifecycleEntity::new("first", vp.clone()));
        let weak = Rc::downgrade(&parent);
        let spawned = Rc::new(Cell::new(false));
        let s = spawned.clone();
        first.on(
            Hook::StartBegin,
            move |_| {
                if let Some(parent) = weak.upgrade() {
                    parent.add_component(LifecycleEntity::new("late", vp.clone()));
                    s.set(true);
                }
            },
            Persistence::Once,
        );

        parent.start_sequence();
        assert!(spawned.get());
        let late = parent.components().into_iter().find(|c| c.name() == "late");
        assert!(late.is_some_and(|c| c.is_off()));
    }

    #[test]
    fn test_internal_component_receives_local_coordinates() {
        let vp = viewport(1300.0);
        let frame = LifecycleEntity::frame(FrameLinks::new("intro"), vp.clone());
        let button = frame.add_component(LifecycleEntity::component(
            "button",
            Rect::new(100.0, 100.0, 50.0, 20.0),
            vp,
        ));
        button.set_hover_mode(HoverMode::Internal);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let s = seen.clone();
        button
            .on_pointer(
                PointerHook::PointerMove,
                move |p| s.borrow_mut().push((p.x, p.y)),
                Persistence::Persistent,
            )
            .unwrap();

        let surface = SurfaceId::new("intro");
        frame.handle_input(&InputEvent::new(InputKind::MouseMove, 110.0, 105.0, surface.clone()));
        frame.handle_input(&InputEvent::new(InputKind::MouseMove, 100.0, 105.0, surface.clone()));
        frame.handle_input(&InputEvent::new(InputKind::MouseMove, 500.0, 500.0, surface));

        assert_eq!(*seen.borrow(), vec![(10.0, 5.0)]);
    }

    #[test]
    fn test_external_component_ignores_parent_input() {
        let vp = viewport(1300.0);
        let frame = LifecycleEntity::frame(FrameLinks::new("intro"), vp.clone());
        let button = frame.add_component(LifecycleEntity::component(
            "button",
            Rect::new(0.0, 0.0, 50.0, 50.0),
            vp,
        ));
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        button
            .on_pointer(PointerHook::Click, move |_| c.set(c.get() + 1), Persistence::Persistent)
            .unwrap();

        let surface = SurfaceId::new("intro");
        frame.handle_input(&InputEvent::new(InputKind::Click, 10.0, 10.0, surface.clone()));
        assert_eq!(count.get(), 0);

        button.external_input(&InputEvent::new(InputKind::Click, 10.0, 10.0, surface));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_hover_edges_per_tick() {
        let vp = viewport(1300.0);
        let frame = LifecycleEntity::frame(FrameLinks::new("intro"), vp.clone());
        let card = frame.add_component(LifecycleEntity::component(
            "card",
            Rect::new(10.0, 10.0, 10.0, 10.0),
            vp,
        ));
        let events = Rc::new(RefCell::new(Vec::new()));
        for hook in [PointerHook::HoverBegin, PointerHook::HoverEnd, PointerHook::Hover] {
            let e = events.clone();
            card.on_pointer(hook, move |_| e.borrow_mut().push(hook), Persistence::Persistent)
                .unwrap();
        }

        let tracker = frame.pointer().unwrap();
        tracker.set_position(15.0, 15.0);
        frame.animation_frame();
        frame.animation_frame();
        assert!(card.is_hovered());
        tracker.set_position(50.0, 50.0);
        frame.animation_frame();

        assert_eq!(
            *events.borrow(),
            vec![
                PointerHook::HoverBegin,
                PointerHook::Hover,
                PointerHook::Hover,
                PointerHook::HoverEnd,
            ]
        );
        assert_eq!(card.pointer().unwrap().position(), (40.0, 40.0));
    }

    #[test]
    fn test_gestures_ignored_while_off() {
        let frame = LifecycleEntity::frame(FrameLinks::new("intro"), viewport(1300.0));
        let count = Rc::new(Cell::new(0));
        let c = count.clone();
        frame
            .on_gesture(GestureKind::SwipeLeft, move |_| c.set(c.get() + 1), Persistence::Persistent)
            .unwrap();

        let swipe = GestureEvent::new(GestureKind::SwipeLeft, 0.0, 0.0);
        assert!(!frame.handle_gesture(&swipe));
        frame.start_sequence();
        assert!(frame.handle_gesture(&swipe));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_missing_capabilities() {
        let plain = LifecycleEntity::new("plain", viewport(1300.0));
        assert!(plain.on_pointer(PointerHook::Click, |_| {}, Persistence::Once).is_err());
        assert!(plain.on_gesture(GestureKind::PanUp, |_| {}, Persistence::Once).is_err());
        assert!(!plain.handle_gesture(&GestureEvent::new(GestureKind::PanUp, 0.0, 0.0)));
        assert!(!plain.has(Capabilities::POINTER));
        assert_eq!(
            plain.on_pointer(PointerHook::Click, |_| {}, Persistence::Once),
            Err(FrameError::MissingCapability {
                entity: "plain".into(),
                capability: "pointer",
            })
        );
    }

    #[test]
    fn test_capabilities_gate_input() {
        let vp = viewport(1300.0);
        let frame = LifecycleEntity::frame(FrameLinks::new("intro"), vp.clone());
        let menu = LifecycleEntity::menu("menu", vp.clone(), &Rc::new(PointerHooks::new()));
        let button = LifecycleEntity::component("button", Rect::new(0.0, 0.0, 50.0, 50.0), vp);

        assert!(frame.has(Capabilities::POINTER | Capabilities::ROOT));
        assert!(!frame.has(Capabilities::HIT_AREA));
        assert!(menu.has(Capabilities::ROOT));
        assert!(!menu.has(Capabilities::SWITCH_EFFECT));
        assert!(button.has(Capabilities::HIT_AREA));
        assert!(!button.has(Capabilities::ROOT));
        for entity in [&frame, &menu, &button] {
            assert!(entity.on_pointer(PointerHook::PointerMove, |_| {}, Persistence::Once).is_ok());
        }
    }

    #[test]
    fn test_frame_links() {
        let frame = LifecycleEntity::frame(
            FrameLinks::new("intro").next("features").prev("outro").switch_effect("fade"),
            viewport(1300.0),
        );
        assert_eq!(frame.frame_name(), "intro");
        assert_eq!(frame.next_frame(), Some("features"));
        assert_eq!(frame.prev_frame(), Some("outro"));
        assert_eq!(frame.switch_effect_name(), Some("fade"));
        assert_eq!(frame.surface(), Some(&SurfaceId::new("intro")));
        assert!(frame.capabilities().contains(Capabilities::ROOT));
    }
}
