//! Hook names and the per-entity hook map.
//!
//! Every lifecycle entity owns one `SignalRegistry` per `Hook`, allocated up
//! front so that lookups are infallible.

use std::fmt;

use super::registry::SignalRegistry;

/// Named extension point of a lifecycle entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hook {
    BeforeInit,
    AfterInit,
    BeforeLoad,
    AfterLoad,
    PrepareResize,
    Resize,
    StartBegin,
    StartEnd,
    StopBegin,
    StopEnd,
    WaitBegin,
    WaitRetry,
    WaitEnd,
    Off,
    BeginSwitch,
    EndSwitch,
    ResizeDesktop,
    ResizeMobile,
    ResizeXl,
    ResizeLg,
    ResizeMd,
    ResizeSm,
    ResizeEsm,
    /// Fired once per animation tick before children are ticked.
    Tick,
}

impl Hook {
    pub const COUNT: usize = 24;

    pub const ALL: [Hook; Self::COUNT] = [
        Hook::BeforeInit,
        Hook::AfterInit,
        Hook::BeforeLoad,
        Hook::AfterLoad,
        Hook::PrepareResize,
        Hook::Resize,
        Hook::StartBegin,
        Hook::StartEnd,
        Hook::StopBegin,
        Hook::StopEnd,
        Hook::WaitBegin,
        Hook::WaitRetry,
        Hook::WaitEnd,
        Hook::Off,
        Hook::BeginSwitch,
        Hook::EndSwitch,
        Hook::ResizeDesktop,
        Hook::ResizeMobile,
        Hook::ResizeXl,
        Hook::ResizeLg,
        Hook::ResizeMd,
        Hook::ResizeSm,
        Hook::ResizeEsm,
        Hook::Tick,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    pub const fn name(self) -> &'static str {
        match self {
            Hook::BeforeInit => "before-init",
            Hook::AfterInit => "after-init",
            Hook::BeforeLoad => "before-load",
            Hook::AfterLoad => "after-load",
            Hook::PrepareResize => "prepare-resize",
            Hook::Resize => "resize",
            Hook::StartBegin => "start-begin",
            Hook::StartEnd => "start-end",
            Hook::StopBegin => "stop-begin",
            Hook::StopEnd => "stop-end",
            Hook::WaitBegin => "wait-begin",
            Hook::WaitRetry => "wait-retry",
            Hook::WaitEnd => "wait-end",
            Hook::Off => "off",
            Hook::BeginSwitch => "begin-switch",
            Hook::EndSwitch => "end-switch",
            Hook::ResizeDesktop => "resize-desktop",
            Hook::ResizeMobile => "resize-mobile",
            Hook::ResizeXl => "resize-bp-xl",
            Hook::ResizeLg => "resize-bp-lg",
            Hook::ResizeMd => "resize-bp-md",
            Hook::ResizeSm => "resize-bp-sm",
            Hook::ResizeEsm => "resize-bp-esm",
            Hook::Tick => "tick",
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One registry per hook, indexed by the hook's discriminant.
pub struct HookMap<T> {
    registries: [SignalRegistry<T>; Hook::COUNT],
}

impl<T> HookMap<T> {
    pub fn new() -> Self {
        Self {
            registries: std::array::from_fn(|_| SignalRegistry::new()),
        }
    }

    pub fn get(&self, hook: Hook) -> &SignalRegistry<T> {
        &self.registries[hook.index()]
    }

    pub fn dispatch(&self, hook: Hook, arg: &T) {
        self.get(hook).dispatch(arg);
    }
}

impl<T> Default for HookMap<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Persistence;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_all_is_in_discriminant_order() {
        for (i, hook) in Hook::ALL.iter().enumerate() {
            assert_eq!(hook.index(), i, "{hook} out of order");
        }
    }

    #[test]
    fn test_hooks_are_independent() {
        let map: HookMap<()> = HookMap::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        map.get(Hook::Resize)
            .subscribe(move |_| c.set(c.get() + 1), Persistence::Persistent);

        map.dispatch(Hook::PrepareResize, &());
        assert_eq!(count.get(), 0);

        map.dispatch(Hook::Resize, &());
        assert_eq!(count.get(), 1);
    }
}
