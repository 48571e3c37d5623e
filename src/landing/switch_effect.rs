//! Frame Switch Coordinator - Drives one transition between two frames
//!
//! A coordinator is a reusable prototype: the builder points it at the
//! outgoing (active) and incoming (replace) frames, sets the direction and
//! calls `effect_sequence()`. The animator subscribed to `on_begin` plays the
//! transition and, when done, calls `effect_sequence_complete()`.
//!
//! Frame references are weak. The builder owns the frames.
//!
//! # Hook order
//!
//! ```text
//! effect_sequence():          in_progress = true
//!                             coordinator begin hooks
//!                             active frame begin-switch
//!                             replace frame begin-switch
//!
//! effect_sequence_complete(): in_progress = false
//!                             coordinator complete hooks
//!                             active frame end-switch
//!                             replace frame end-switch
//!
//! effect_immediately():       in_progress = false
//!                             coordinator complete hooks
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::engine::{LifecycleEntity, SignalRegistry, Switchable};
use crate::types::{Direction, Persistence};

/// Advisory duration of a switch effect. Never enforced here.
pub const DEFAULT_SWITCH_DURATION: Duration = Duration::from_millis(3000);

pub struct FrameSwitchCoordinator {
    name: String,
    duration: Cell<Option<Duration>>,
    direction: Cell<Direction>,
    in_progress: Cell<bool>,
    frames: RefCell<Vec<Weak<LifecycleEntity>>>,
    active: RefCell<Weak<LifecycleEntity>>,
    replace: RefCell<Weak<LifecycleEntity>>,
    begin: SignalRegistry<FrameSwitchCoordinator>,
    complete: SignalRegistry<FrameSwitchCoordinator>,
}

impl FrameSwitchCoordinator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            duration: Cell::new(None),
            direction: Cell::new(Direction::Next),
            in_progress: Cell::new(false),
            frames: RefCell::new(Vec::new()),
            active: RefCell::new(Weak::new()),
            replace: RefCell::new(Weak::new()),
            begin: SignalRegistry::new(),
            complete: SignalRegistry::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    // -------------------------------------------------------------------------
    // Setters
    // -------------------------------------------------------------------------

    pub fn set_duration(&self, duration: Duration) -> &Self {
        self.duration.set(Some(duration));
        self
    }

    pub fn duration(&self) -> Duration {
        self.duration.get().unwrap_or(DEFAULT_SWITCH_DURATION)
    }

    /// True once a duration was set, by the caller or from configuration.
    pub fn has_duration(&self) -> bool {
        self.duration.get().is_some()
    }

    pub fn set_frames(&self, frames: &[Rc<LifecycleEntity>]) -> &Self {
        *self.frames.borrow_mut() = frames.iter().map(Rc::downgrade).collect();
        self
    }

    pub fn set_active_frame(&self, frame: &Rc<LifecycleEntity>) -> &Self {
        *self.active.borrow_mut() = Rc::downgrade(frame);
        self
    }

    pub fn set_replace_frame(&self, frame: &Rc<LifecycleEntity>) -> &Self {
        *self.replace.borrow_mut() = Rc::downgrade(frame);
        self
    }

    pub fn set_next_direction(&self) -> &Self {
        self.direction.set(Direction::Next);
        self
    }

    pub fn set_prev_direction(&self) -> &Self {
        self.direction.set(Direction::Prev);
        self
    }

    pub fn set_direction(&self, direction: Direction) -> &Self {
        self.direction.set(direction);
        self
    }

    // -------------------------------------------------------------------------
    // Getters
    // -------------------------------------------------------------------------

    pub fn direction(&self) -> Direction {
        self.direction.get()
    }

    pub fn is_direction_next(&self) -> bool {
        self.direction() == Direction::Next
    }

    pub fn is_direction_prev(&self) -> bool {
        self.direction() == Direction::Prev
    }

    pub fn is_in_progress(&self) -> bool {
        self.in_progress.get()
    }

    pub fn active_frame(&self) -> Option<Rc<LifecycleEntity>> {
        self.active.borrow().upgrade()
    }

    pub fn replace_frame(&self) -> Option<Rc<LifecycleEntity>> {
        self.replace.borrow().upgrade()
    }

    /// Frames still alive from the last `set_frames()`.
    pub fn frames(&self) -> Vec<Rc<LifecycleEntity>> {
        self.frames.borrow().iter().filter_map(Weak::upgrade).collect()
    }

    // -------------------------------------------------------------------------
    // Hooks
    // -------------------------------------------------------------------------

    pub fn on_begin<F>(&self, callback: F, persistence: Persistence)
    where
        F: Fn(&FrameSwitchCoordinator) + 'static,
    {
        self.begin.subscribe(callback, persistence);
    }

    pub fn on_complete<F>(&self, callback: F, persistence: Persistence)
    where
        F: Fn(&FrameSwitchCoordinator) + 'static,
    {
        self.complete.subscribe(callback, persistence);
    }

    // -------------------------------------------------------------------------
    // Sequence
    // -------------------------------------------------------------------------

    /// Start the transition.
    pub fn effect_sequence(&self) {
        self.in_progress.set(true);
        tracing::debug!(
            effect = %self.name,
            direction = %self.direction(),
            active = ?self.active_frame().map(|f| f.frame_name().to_string()),
            replace = ?self.replace_frame().map(|f| f.frame_name().to_string()),
            "switch begin"
        );

        self.begin.dispatch(self);
        if let Some(active) = self.active_frame() {
            active.begin_switch();
        }
        if let Some(replace) = self.replace_frame() {
            replace.begin_switch();
        }
    }

    /// Finish the transition. Called by the animator.
    pub fn effect_sequence_complete(&self) {
        self.in_progress.set(false);
        tracing::debug!(effect = %self.name, "switch complete");

        self.complete.dispatch(self);
        if let Some(active) = self.active_frame() {
            active.end_switch();
        }
        if let Some(replace) = self.replace_frame() {
            replace.end_switch();
        }
    }

    /// Zero-length switch: completion hooks only, no begin phase and no
    /// frame switch hooks.
    pub fn effect_immediately(&self) {
        self.in_progress.set(false);
        tracing::debug!(effect = %self.name, "switch immediate");
        self.complete.dispatch(self);
    }
}

impl fmt::Debug for FrameSwitchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameSwitchCoordinator")
            .field("name", &self.name)
            .field("duration", &self.duration())
            .field("direction", &self.direction())
            .field("in_progress", &self.in_progress.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FrameLinks, Hook};
    use crate::state::ManualViewport;

    fn frame(id: &str) -> Rc<LifecycleEntity> {
        Rc::new(LifecycleEntity::frame(
            FrameLinks::new(id),
            Rc::new(ManualViewport::new(1300.0)),
        ))
    }

    fn record_switch(frame: &LifecycleEntity, log: &Rc<RefCell<Vec<String>>>) {
        for hook in [Hook::BeginSwitch, Hook::EndSwitch] {
            let l = log.clone();
            frame.on(
                hook,
                move |f| l.borrow_mut().push(format!("{}:{}", f.frame_name(), hook)),
                Persistence::Persistent,
            );
        }
    }

    #[test]
    fn test_each_frame_gets_its_own_switch_hooks() {
        let intro = frame("intro");
        let outro = frame("outro");
        let log = Rc::new(RefCell::new(Vec::new()));
        record_switch(&intro, &log);
        record_switch(&outro, &log);

        let effect = FrameSwitchCoordinator::new("fade");
        let l = log.clone();
        effect.on_begin(move |e| l.borrow_mut().push(format!("{}:begin", e.name())), Persistence::Persistent);
        let l = log.clone();
        effect.on_complete(move |e| l.borrow_mut().push(format!("{}:complete", e.name())), Persistence::Persistent);

        effect.set_active_frame(&intro).set_replace_frame(&outro).set_next_direction();
        effect.effect_sequence();
        assert!(effect.is_in_progress());
        effect.effect_sequence_complete();
        assert!(!effect.is_in_progress());

        assert_eq!(
            *log.borrow(),
            vec![
                "fade:begin",
                "intro:begin-switch",
                "outro:begin-switch",
                "fade:complete",
                "intro:end-switch",
                "outro:end-switch",
            ]
        );
    }

    #[test]
    fn test_effect_immediately_skips_begin() {
        let intro = frame("intro");
        let log = Rc::new(RefCell::new(Vec::new()));
        record_switch(&intro, &log);

        let effect = FrameSwitchCoordinator::new("cut");
        let begun = Rc::new(Cell::new(false));
        let b = begun.clone();
        effect.on_begin(move |_| b.set(true), Persistence::Persistent);
        let completed = Rc::new(Cell::new(0));
        let c = completed.clone();
        effect.on_complete(move |_| c.set(c.get() + 1), Persistence::Once);

        effect.set_active_frame(&intro);
        effect.effect_immediately();
        effect.effect_immediately();

        assert!(!begun.get());
        assert_eq!(completed.get(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test_setters_and_defaults() {
        let effect = FrameSwitchCoordinator::new("slide");
        assert!(effect.is_direction_next());
        assert_eq!(effect.duration(), DEFAULT_SWITCH_DURATION);
        assert!(!effect.has_duration());

        effect.set_prev_direction().set_duration(Duration::from_millis(800));
        assert!(effect.is_direction_prev());
        assert_eq!(effect.duration(), Duration::from_millis(800));
    }

    #[test]
    fn test_frame_references_are_weak() {
        let effect = FrameSwitchCoordinator::new("fade");
        let intro = frame("intro");
        let outro = frame("outro");
        effect.set_frames(&[intro.clone(), outro.clone()]).set_active_frame(&intro);
        assert_eq!(effect.frames().len(), 2);

        drop(intro);
        assert!(effect.active_frame().is_none());
        assert_eq!(effect.frames().len(), 1);

        // no frames left to notify, still toggles progress
        effect.effect_sequence();
        assert!(effect.is_in_progress());
    }
}
