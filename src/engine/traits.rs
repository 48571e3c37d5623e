//! Small capability interfaces implemented by `LifecycleEntity`.
//!
//! The builder and the switch coordinator talk to frames through these
//! rather than through the full entity API.

use std::rc::Rc;

use super::entity::LifecycleEntity;
use super::hooks::Hook;
use crate::state::Breakpoint;

/// Something that reacts to viewport size changes.
pub trait Resizable {
    /// Pre-measurement phase, fired before the debounced resize.
    fn prepare_resize(&self);

    /// Generic resize hook, breakpoint edge detection, cascade.
    fn resize(&self);

    /// Last stored classification.
    fn breakpoint(&self) -> Breakpoint;

    /// Compare `current` with the stored classification and fire only the
    /// edges that changed. Returns the hooks that fired.
    fn notify_breakpoint(&self, current: Breakpoint) -> Vec<Hook>;
}

/// Something that can take part in a frame switch.
pub trait Switchable {
    fn frame_name(&self) -> &str;
    fn next_frame(&self) -> Option<&str>;
    fn prev_frame(&self) -> Option<&str>;
    fn switch_effect_name(&self) -> Option<&str>;
    fn begin_switch(&self);
    fn end_switch(&self);
}

/// Something that owns child components.
pub trait HasChildren {
    fn add_component(&self, child: LifecycleEntity) -> Rc<LifecycleEntity>;
    fn remove_component(&self, name: &str) -> Option<Rc<LifecycleEntity>>;
    fn components(&self) -> Vec<Rc<LifecycleEntity>>;
}
