//! Builder Root - Frame registry, navigation and resize fan-out
//!
//! The builder owns every frame plus the optional background and menu
//! frames, the list of switch effects, and the viewport-wide pointer.
//!
//! # Navigation
//!
//! `next()`, `prev()` and `to_frame()` share one flow:
//!
//! 1. Check-and-set the switch guard. A second request while a switch is in
//!    flight is refused before anything else happens.
//! 2. Resolve the target frame by id against the registered frames.
//! 3. Pick the switch effect named by the active frame (or by the caller),
//!    falling back to the effect at index 0. Index 0 is never matched by
//!    name.
//! 4. Point the effect at both frames, set the direction and subscribe a
//!    one-shot completion hook that releases the guard.
//! 5. Fire the global switch hooks, run `effect_sequence()`, then swap the
//!    active frame.
//!
//! The guard is held until step 5 has swapped the active frame, even when
//! the effect completes synchronously inside `effect_sequence()`. Requests
//! made from begin, complete or end-switch hooks during that window are
//! refused.
//!
//! If step 2 or 3 fails the guard is released again and the request is a
//! no-op. The boolean methods hide the reason, the `try_` variants return
//! it.
//!
//! # Resize
//!
//! Raw resize notifications go through a quiet-window debounce. Once it
//! elapses the builder runs `prepare_resize()` then the resize hooks on the
//! menu, active and background frames. Their components detect breakpoint
//! edges themselves. The three root frames do not: the builder classifies
//! the viewport once and hands the result to each of them through
//! `notify_breakpoint()`. The builder's own breakpoint hooks fire only when
//! its stored breakpoint changes.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use spark_signals::{signal, Signal};

use super::switch_effect::FrameSwitchCoordinator;
use crate::config::LandingConfig;
use crate::engine::{Capabilities, LifecycleEntity, Resizable, SignalRegistry, Switchable};
use crate::error::{FrameError, NavigationError};
use crate::state::{
    classify, Breakpoint, GestureEvent, InputEvent, PointerHook, PointerHooks, PointerSample,
    PointerTracker, ResizeDebouncer, ViewportSource,
};
use crate::types::{Direction, Persistence, SurfaceId};

// =============================================================================
// SWITCH GUARD
// =============================================================================

#[derive(Debug, Default)]
struct GuardState {
    busy: Cell<bool>,
    /// Set while `navigate` has not yet swapped the active frame.
    swapping: Cell<bool>,
    /// Completion reported during the swap window, applied once it closes.
    completed: Cell<bool>,
}

/// At-most-one-switch flag. Shared with the completion hook that clears it.
#[derive(Debug, Clone, Default)]
struct SwitchGuard(Rc<GuardState>);

impl SwitchGuard {
    /// Claim the guard. False if a switch is already in flight.
    fn try_begin(&self) -> bool {
        !self.0.busy.replace(true)
    }

    fn end(&self) {
        self.0.busy.set(false);
    }

    fn is_busy(&self) -> bool {
        self.0.busy.get()
    }

    /// Open the swap window. Completions stay pending until `close_swap`.
    fn open_swap(&self) {
        self.0.swapping.set(true);
        self.0.completed.set(false);
    }

    /// Close the swap window, releasing the guard if the effect already
    /// completed inside it.
    fn close_swap(&self) {
        self.0.swapping.set(false);
        if self.0.completed.replace(false) {
            self.end();
        }
    }

    /// Effect completion. Deferred while the swap window is open.
    fn complete(&self) {
        if self.0.swapping.get() {
            self.0.completed.set(true);
        } else {
            self.end();
        }
    }
}

/// Which frame a navigation request is aiming at.
enum Target<'a> {
    Adjacent(Direction),
    Named(&'a str),
}

// =============================================================================
// BUILDER
// =============================================================================

pub struct BuilderRoot {
    config: LandingConfig,
    viewport: Rc<dyn ViewportSource>,

    frames: RefCell<Vec<Rc<LifecycleEntity>>>,
    active: RefCell<Option<Rc<LifecycleEntity>>>,
    background: RefCell<Option<Rc<LifecycleEntity>>>,
    menu: RefCell<Option<Rc<LifecycleEntity>>>,
    switch_effects: RefCell<Vec<Rc<FrameSwitchCoordinator>>>,

    guard: SwitchGuard,
    global_hooks: Rc<PointerHooks>,
    global_pointer: PointerTracker,
    switch_hooks: SignalRegistry<BuilderRoot>,
    breakpoint_hooks: SignalRegistry<Breakpoint>,
    breakpoint: Cell<Breakpoint>,
    debouncer: ResizeDebouncer,
    active_name: Signal<Option<String>>,
}

impl BuilderRoot {
    pub fn new(config: LandingConfig, viewport: Rc<dyn ViewportSource>) -> Self {
        let global_hooks = Rc::new(PointerHooks::new());
        let global_pointer = PointerTracker::new(&global_hooks, Some(SurfaceId::viewport()));
        if config.pointer_history.enabled {
            global_pointer.enable_history(config.pointer_history.size);
        }

        Self {
            debouncer: ResizeDebouncer::new(config.resize_debounce()),
            breakpoint: Cell::new(classify(viewport.width())),
            config,
            viewport,
            frames: RefCell::new(Vec::new()),
            active: RefCell::new(None),
            background: RefCell::new(None),
            menu: RefCell::new(None),
            switch_effects: RefCell::new(Vec::new()),
            guard: SwitchGuard::default(),
            global_hooks,
            global_pointer,
            switch_hooks: SignalRegistry::new(),
            breakpoint_hooks: SignalRegistry::new(),
            active_name: signal(None),
        }
    }

    pub fn config(&self) -> &LandingConfig {
        &self.config
    }

    pub fn viewport(&self) -> &Rc<dyn ViewportSource> {
        &self.viewport
    }

    // -------------------------------------------------------------------------
    // Frames
    // -------------------------------------------------------------------------

    /// Register a frame. The first frame registered becomes the active one.
    pub fn add_frame(&self, frame: LifecycleEntity) -> Result<Rc<LifecycleEntity>, FrameError> {
        if !frame.has(Capabilities::SWITCH_EFFECT) {
            return Err(frame.missing("switch effect"));
        }
        if self.frame(frame.frame_name()).is_some() {
            return Err(FrameError::Duplicate(frame.frame_name().to_string()));
        }

        let frame = Rc::new(frame);
        self.frames.borrow_mut().push(Rc::clone(&frame));
        if self.active.borrow().is_none() {
            self.set_active(Rc::clone(&frame));
        }
        tracing::debug!(frame = frame.frame_name(), "frame registered");
        Ok(frame)
    }

    /// Registered frame with id `name`.
    pub fn frame(&self, name: &str) -> Option<Rc<LifecycleEntity>> {
        self.frames
            .borrow()
            .iter()
            .find(|frame| frame.frame_name() == name)
            .cloned()
    }

    pub fn frames(&self) -> Vec<Rc<LifecycleEntity>> {
        self.frames.borrow().clone()
    }

    /// Make `name` active without running a switch.
    pub fn set_active_frame(&self, name: &str) -> Result<(), NavigationError> {
        let frame = self
            .frame(name)
            .ok_or_else(|| NavigationError::UnknownFrame(name.to_string()))?;
        self.set_active(frame);
        Ok(())
    }

    fn set_active(&self, frame: Rc<LifecycleEntity>) {
        self.active_name.set(Some(frame.frame_name().to_string()));
        *self.active.borrow_mut() = Some(frame);
    }

    pub fn active_frame(&self) -> Option<Rc<LifecycleEntity>> {
        self.active.borrow().clone()
    }

    pub fn current_frame_name(&self) -> Option<String> {
        self.active
            .borrow()
            .as_ref()
            .map(|frame| frame.frame_name().to_string())
    }

    /// Reactive id of the active frame.
    pub fn active_frame_signal(&self) -> Signal<Option<String>> {
        self.active_name.clone()
    }

    /// Install the background frame. Only root entities qualify.
    pub fn set_background_frame(
        &self,
        frame: LifecycleEntity,
    ) -> Result<Rc<LifecycleEntity>, FrameError> {
        if !frame.has(Capabilities::ROOT) {
            return Err(frame.missing("root"));
        }
        let frame = Rc::new(frame);
        *self.background.borrow_mut() = Some(Rc::clone(&frame));
        Ok(frame)
    }

    pub fn background_frame(&self) -> Option<Rc<LifecycleEntity>> {
        self.background.borrow().clone()
    }

    /// Create the menu frame. Its pointer hooks are the global ones.
    pub fn create_menu_frame(&self, name: impl Into<String>) -> Rc<LifecycleEntity> {
        let menu = Rc::new(LifecycleEntity::menu(
            name,
            Rc::clone(&self.viewport),
            &self.global_hooks,
        ));
        *self.menu.borrow_mut() = Some(Rc::clone(&menu));
        menu
    }

    pub fn menu_frame(&self) -> Option<Rc<LifecycleEntity>> {
        self.menu.borrow().clone()
    }

    /// Menu, active and background frames, in resize order.
    fn root_frames(&self) -> Vec<Rc<LifecycleEntity>> {
        [
            self.menu_frame(),
            self.active_frame(),
            self.background_frame(),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    /// Start the active frame. False if there is none.
    pub fn start(&self) -> bool {
        match self.active_frame() {
            Some(frame) => {
                frame.start_sequence();
                true
            }
            None => false,
        }
    }

    // -------------------------------------------------------------------------
    // Switch effects
    // -------------------------------------------------------------------------

    /// Register a switch effect. The first one is the default. Effects
    /// without a duration get the configured one.
    pub fn add_switch_effect(&self, effect: FrameSwitchCoordinator) -> Rc<FrameSwitchCoordinator> {
        if !effect.has_duration() {
            effect.set_duration(self.config.switch_duration());
        }
        let effect = Rc::new(effect);
        self.switch_effects.borrow_mut().push(Rc::clone(&effect));
        effect
    }

    /// Exact lookup by name over every registered effect.
    pub fn switch_effect(&self, name: &str) -> Option<Rc<FrameSwitchCoordinator>> {
        self.switch_effects
            .borrow()
            .iter()
            .find(|effect| effect.name() == name)
            .cloned()
    }

    /// Effect used for a switch: a name match from index 1 on, else the
    /// default at index 0.
    fn find_switch_effect(&self, name: Option<&str>) -> Option<Rc<FrameSwitchCoordinator>> {
        let effects = self.switch_effects.borrow();
        let matched = name.and_then(|name| {
            effects
                .iter()
                .skip(1)
                .find(|effect| effect.name() == name)
        });
        matched.or_else(|| effects.first()).cloned()
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Claim the switch guard. False if a switch is already in flight.
    pub fn try_begin_switch(&self) -> bool {
        self.guard.try_begin()
    }

    /// Release the switch guard.
    pub fn end_switch(&self) {
        self.guard.end();
    }

    pub fn is_switch_in_progress(&self) -> bool {
        self.guard.is_busy()
    }

    pub fn next(&self) -> bool {
        self.try_next().is_ok()
    }

    pub fn prev(&self) -> bool {
        self.try_prev().is_ok()
    }

    /// Switch to frame `name`. Without an effect name the active frame's
    /// effect is used.
    pub fn to_frame(&self, name: &str, effect: Option<&str>, direction: Direction) -> bool {
        self.try_to_frame(name, effect, direction).is_ok()
    }

    pub fn try_next(&self) -> Result<(), NavigationError> {
        self.navigate(Target::Adjacent(Direction::Next), None, Direction::Next)
    }

    pub fn try_prev(&self) -> Result<(), NavigationError> {
        self.navigate(Target::Adjacent(Direction::Prev), None, Direction::Prev)
    }

    pub fn try_to_frame(
        &self,
        name: &str,
        effect: Option<&str>,
        direction: Direction,
    ) -> Result<(), NavigationError> {
        self.navigate(Target::Named(name), effect, direction)
    }

    fn navigate(
        &self,
        target: Target<'_>,
        effect_name: Option<&str>,
        direction: Direction,
    ) -> Result<(), NavigationError> {
        if !self.guard.try_begin() {
            tracing::debug!("switch refused, already in progress");
            return Err(NavigationError::SwitchInProgress);
        }

        let (active, replace, effect) = match self.resolve(target, effect_name) {
            Ok(resolved) => resolved,
            Err(err) => {
                self.guard.end();
                tracing::warn!(error = %err, "navigation request dropped");
                return Err(err);
            }
        };

        effect
            .set_frames(&self.frames.borrow())
            .set_active_frame(&active)
            .set_replace_frame(&replace)
            .set_direction(direction);

        let guard = self.guard.clone();
        effect.on_complete(move |_| guard.complete(), Persistence::Once);

        // An effect completing synchronously must not release the guard
        // before the active frame is swapped.
        self.guard.open_swap();
        self.switch_hooks.dispatch(self);
        effect.effect_sequence();
        self.set_active(replace);
        self.guard.close_swap();
        Ok(())
    }

    fn resolve(
        &self,
        target: Target<'_>,
        effect_name: Option<&str>,
    ) -> Result<
        (
            Rc<LifecycleEntity>,
            Rc<LifecycleEntity>,
            Rc<FrameSwitchCoordinator>,
        ),
        NavigationError,
    > {
        let active = self.active_frame().ok_or(NavigationError::NoActiveFrame)?;

        let replace = match target {
            Target::Adjacent(direction) => {
                let link = match direction {
                    Direction::Next => active.next_frame(),
                    Direction::Prev => active.prev_frame(),
                };
                // Unknown ids would be fetched lazily. Not supported, so the
                // request is dropped.
                link.and_then(|id| self.frame(id))
                    .ok_or_else(|| NavigationError::UnresolvedAdjacency {
                        from: active.frame_name().to_string(),
                        direction,
                    })?
            }
            Target::Named(name) => {
                let frame = self
                    .frame(name)
                    .ok_or_else(|| NavigationError::UnknownFrame(name.to_string()))?;
                if Rc::ptr_eq(&frame, &active) {
                    return Err(NavigationError::AlreadyActive(name.to_string()));
                }
                frame
            }
        };

        let effect_name = effect_name.or_else(|| active.switch_effect_name());
        let effect = self
            .find_switch_effect(effect_name)
            .ok_or(NavigationError::NoSwitchEffects)?;

        Ok((active, replace, effect))
    }

    /// Subscribe to every switch start, fired before the effect begins.
    pub fn on_switch<F>(&self, callback: F, persistence: Persistence)
    where
        F: Fn(&BuilderRoot) + 'static,
    {
        self.switch_hooks.subscribe(callback, persistence);
    }

    // -------------------------------------------------------------------------
    // Resize
    // -------------------------------------------------------------------------

    /// Raw resize notification from the viewport source.
    pub fn on_viewport_resized(&self, now: Instant) {
        self.debouncer.notify(now);
    }

    /// Run the resize fan-out if the quiet window has elapsed.
    pub fn poll_resize(&self, now: Instant) -> bool {
        if !self.debouncer.poll(now) {
            return false;
        }
        self.resize();
        true
    }

    /// Resize fan-out, bypassing the debounce.
    pub fn resize(&self) {
        let frames = self.root_frames();
        for frame in &frames {
            frame.prepare_resize();
        }
        for frame in &frames {
            frame.resize_as_root();
        }

        // Each root frame compares against its own last breakpoint, so a
        // frame that became active since the last change still catches up.
        let current = classify(self.viewport.width());
        for frame in &frames {
            frame.notify_breakpoint(current);
        }

        let previous = self.breakpoint.replace(current);
        if current != previous {
            tracing::debug!(?previous, ?current, "viewport breakpoint changed");
            self.breakpoint_hooks.dispatch(&current);
        }
    }

    pub fn breakpoint(&self) -> Breakpoint {
        self.breakpoint.get()
    }

    /// Subscribe to viewport-level breakpoint changes.
    pub fn on_breakpoint<F>(&self, callback: F, persistence: Persistence)
    where
        F: Fn(&Breakpoint) + 'static,
    {
        self.breakpoint_hooks.subscribe(callback, persistence);
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn global_pointer(&self) -> &PointerTracker {
        &self.global_pointer
    }

    pub fn global_hooks(&self) -> &Rc<PointerHooks> {
        &self.global_hooks
    }

    /// Subscribe to the viewport-wide pointer.
    pub fn on_pointer<F>(&self, hook: PointerHook, callback: F, persistence: Persistence)
    where
        F: Fn(&PointerSample) + 'static,
    {
        self.global_hooks.subscribe(hook, callback, persistence);
    }

    /// Route an input event. The global pointer sees every event, the frame
    /// listening on the event's surface sees it too.
    pub fn handle_input(&self, event: &InputEvent) {
        self.global_pointer.handle_input(event);

        let listeners = self
            .frames()
            .into_iter()
            .chain(self.background_frame())
            .filter(|frame| frame.surface() == Some(&event.surface));
        for frame in listeners {
            frame.handle_input(event);
        }
    }

    /// Gestures go to the active frame.
    pub fn handle_gesture(&self, event: &GestureEvent) -> bool {
        self.active_frame()
            .is_some_and(|frame| frame.handle_gesture(event))
    }

    /// One animation tick for the root frames, then the global pointer.
    pub fn animation_frame(&self) {
        if let Some(menu) = self.menu_frame() {
            menu.animation_frame_with(&self.global_pointer.sample());
        }
        if let Some(active) = self.active_frame() {
            active.animation_frame();
        }
        if let Some(background) = self.background_frame() {
            background.animation_frame();
        }
        self.global_pointer.step();
    }
}

impl fmt::Debug for BuilderRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRoot")
            .field("frames", &self.frames.borrow().len())
            .field("active", &self.current_frame_name())
            .field("switch_effects", &self.switch_effects.borrow().len())
            .field("switch_in_progress", &self.guard.is_busy())
            .field("breakpoint", &self.breakpoint.get())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
