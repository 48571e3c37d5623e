//! Signal Registry - Ordered callback lists behind every hook.
//!
//! Each lifecycle phase, pointer event, gesture and switch effect exposes one
//! `SignalRegistry`. Subscriptions are either one-shot or persistent and fire
//! in insertion order.
//!
//! # Dispatch rules
//!
//! - Only subscriptions present when `dispatch` starts are candidates.
//!   Anything subscribed by a callback joins the next dispatch.
//! - A subscription removed by a callback before it is reached is skipped.
//! - One-shot subscriptions are claimed before they run, so a nested dispatch
//!   of the same registry can never invoke them twice.
//! - After the pass every claimed one-shot is removed, nothing else.
//! - A panicking callback aborts the rest of the pass. There is no catch.
//!
//! # Example
//!
//! ```ignore
//! use laco::{Persistence, SignalRegistry};
//!
//! let registry: SignalRegistry<u32> = SignalRegistry::new();
//! registry.subscribe(|value| println!("once: {value}"), Persistence::Once);
//! registry.subscribe(|value| println!("always: {value}"), Persistence::Persistent);
//!
//! registry.dispatch(&1); // both fire
//! registry.dispatch(&2); // only "always"
//! ```

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::types::Persistence;

/// Shared callback stored in a registry.
pub type Callback<T> = Rc<dyn Fn(&T)>;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

struct Entry<T> {
    id: SubscriptionId,
    callback: Callback<T>,
    persistence: Persistence,
    /// Set when a one-shot entry has been invoked and awaits removal.
    spent: bool,
}

/// Ordered list of `(callback, persistence)` pairs.
pub struct SignalRegistry<T> {
    entries: RefCell<Vec<Entry<T>>>,
    next_id: Cell<u64>,
}

impl<T> SignalRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    /// Append a callback. Duplicates are allowed and fire independently.
    pub fn subscribe<F>(&self, callback: F, persistence: Persistence) -> SubscriptionId
    where
        F: Fn(&T) + 'static,
    {
        self.subscribe_rc(Rc::new(callback), persistence)
    }

    /// Append an already shared callback.
    pub fn subscribe_rc(&self, callback: Callback<T>, persistence: Persistence) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get() + 1);

        self.entries.borrow_mut().push(Entry {
            id,
            callback,
            persistence,
            spent: false,
        });
        id
    }

    /// Remove a subscription. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| entry.id != id);
        entries.len() != before
    }

    /// Invoke every callback registered at dispatch start, in order.
    pub fn dispatch(&self, arg: &T) {
        let snapshot: Vec<(SubscriptionId, Callback<T>)> = self
            .entries
            .borrow()
            .iter()
            .filter(|entry| !entry.spent)
            .map(|entry| (entry.id, Rc::clone(&entry.callback)))
            .collect();

        if snapshot.is_empty() {
            return;
        }

        let mut invoked = 0usize;
        for (id, callback) in snapshot {
            if !self.claim(id) {
                continue;
            }
            invoked += 1;
            callback(arg);
        }

        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|entry| !entry.spent);
        tracing::trace!(invoked, removed = before - entries.len(), "signal dispatch");
    }

    /// Mark an entry as running. Returns false if it vanished or was
    /// already consumed by a nested dispatch.
    fn claim(&self, id: SubscriptionId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(entry) = entries.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        if entry.spent {
            return false;
        }
        if !entry.persistence.is_persistent() {
            entry.spent = true;
        }
        true
    }

    /// Number of live subscriptions.
    pub fn len(&self) -> usize {
        self.entries.borrow().iter().filter(|entry| !entry.spent).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every subscription.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }
}

impl<T> Default for SignalRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for SignalRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignalRegistry")
            .field("len", &self.len())
            .finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_dispatch_order_and_one_shot_removal() {
        let registry: SignalRegistry<()> = SignalRegistry::new();
        let log = recorder();

        let l = log.clone();
        registry.subscribe(move |_| l.borrow_mut().push("A"), Persistence::Once);
        let l = log.clone();
        registry.subscribe(move |_| l.borrow_mut().push("B"), Persistence::Persistent);
        let l = log.clone();
        registry.subscribe(move |_| l.borrow_mut().push("C"), Persistence::Once);

        registry.dispatch(&());
        assert_eq!(*log.borrow(), vec!["A", "B", "C"]);
        assert_eq!(registry.len(), 1);

        registry.dispatch(&());
        assert_eq!(*log.borrow(), vec!["A", "B", "C", "B"]);
    }

    #[test]
    fn test_one_shot_fires_exactly_once() {
        let registry: SignalRegistry<()> = SignalRegistry::new();
        let count = Rc::new(Cell::new(0));

        let c = count.clone();
        registry.subscribe(move |_| c.set(c.get() + 1), Persistence::Once);

        for _ in 0..5 {
            registry.dispatch(&());
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_resubscribe_during_dispatch_joins_next_pass() {
        let registry: Rc<SignalRegistry<()>> = Rc::new(SignalRegistry::new());
        let first = Rc::new(Cell::new(0));
        let second = Rc::new(Cell::new(0));

        let reg = Rc::downgrade(&registry);
        let f = first.clone();
        let s = second.clone();
        registry.subscribe(
            move |_| {
                f.set(f.get() + 1);
                if let Some(reg) = reg.upgrade() {
                    let s = s.clone();
                    reg.subscribe(move |_| s.set(s.get() + 1), Persistence::Once);
                }
            },
            Persistence::Once,
        );

        registry.dispatch(&());
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 0);

        registry.dispatch(&());
        assert_eq!(first.get(), 1);
        assert_eq!(second.get(), 1);

        registry.dispatch(&());
        assert_eq!(second.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_removed_during_dispatch_is_skipped() {
        let registry: Rc<SignalRegistry<()>> = Rc::new(SignalRegistry::new());
        let log = recorder();
        let victim: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));

        let reg = Rc::downgrade(&registry);
        let v = victim.clone();
        let l = log.clone();
        registry.subscribe(
            move |_| {
                l.borrow_mut().push("remover");
                if let (Some(reg), Some(id)) = (reg.upgrade(), v.get()) {
                    reg.unsubscribe(id);
                }
            },
            Persistence::Persistent,
        );
        let l = log.clone();
        let id = registry.subscribe(move |_| l.borrow_mut().push("victim"), Persistence::Persistent);
        victim.set(Some(id));
        let l = log.clone();
        registry.subscribe(move |_| l.borrow_mut().push("tail"), Persistence::Once);

        registry.dispatch(&());
        assert_eq!(*log.borrow(), vec!["remover", "tail"]);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_self_unsubscribe_of_one_shot() {
        let registry: Rc<SignalRegistry<()>> = Rc::new(SignalRegistry::new());
        let own_id: Rc<Cell<Option<SubscriptionId>>> = Rc::new(Cell::new(None));
        let count = Rc::new(Cell::new(0));

        let reg = Rc::downgrade(&registry);
        let own = own_id.clone();
        let c = count.clone();
        let id = registry.subscribe(
            move |_| {
                c.set(c.get() + 1);
                if let (Some(reg), Some(id)) = (reg.upgrade(), own.get()) {
                    reg.unsubscribe(id);
                }
            },
            Persistence::Once,
        );
        own_id.set(Some(id));

        registry.dispatch(&());
        registry.dispatch(&());
        assert_eq!(count.get(), 1);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_nested_dispatch_never_double_invokes_one_shot() {
        let registry: Rc<SignalRegistry<u32>> = Rc::new(SignalRegistry::new());
        let once_count = Rc::new(Cell::new(0));

        let reg = Rc::downgrade(&registry);
        registry.subscribe(
            move |depth| {
                if *depth == 0 {
                    if let Some(reg) = reg.upgrade() {
                        reg.dispatch(&1);
                    }
                }
            },
            Persistence::Persistent,
        );
        let c = once_count.clone();
        registry.subscribe(move |_| c.set(c.get() + 1), Persistence::Once);

        registry.dispatch(&0);
        assert_eq!(once_count.get(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_dispatch_passes_argument() {
        let registry: SignalRegistry<String> = SignalRegistry::new();
        let seen = Rc::new(RefCell::new(String::new()));

        let s = seen.clone();
        registry.subscribe(move |value: &String| s.borrow_mut().push_str(value), Persistence::Persistent);

        registry.dispatch(&"intro".to_string());
        assert_eq!(*seen.borrow(), "intro");
    }

    #[test]
    fn test_duplicates_fire_independently() {
        let registry: SignalRegistry<()> = SignalRegistry::new();
        let count = Rc::new(Cell::new(0));
        let callback: Callback<()> = {
            let c = count.clone();
            Rc::new(move |_| c.set(c.get() + 1))
        };

        registry.subscribe_rc(callback.clone(), Persistence::Persistent);
        registry.subscribe_rc(callback, Persistence::Persistent);

        registry.dispatch(&());
        assert_eq!(count.get(), 2);
    }
}
