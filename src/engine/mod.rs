//! Lifecycle Engine - Registries, hooks and the lifecycle entity.
//!
//! - Registry: Ordered one-shot / persistent callback lists
//! - Hooks: Named hook points and the per-entity hook map
//! - Capabilities: What a given entity can do (pointer, switch, hit area)
//! - Entity: The Off/Begin/Wait/Stop state machine with child cascade
//! - Traits: Resizable, Switchable, HasChildren
//!
//! # Architecture
//!
//! Frames are NOT a class hierarchy. They are one entity type with a
//! capability set:
//!
//! ```text
//! frame:     POINTER | SWITCH_EFFECT | ROOT   (tracker, gestures, links)
//! component: POINTER | HIT_AREA               (tracker, bounds, hover)
//! menu:      POINTER | ROOT                   (shares the global pointer)
//! ```
//!
//! Everything is single-threaded. Entities use `Cell` / `RefCell` so hooks
//! can call back into the entity that is dispatching them.

mod capabilities;
mod entity;
mod hooks;
mod registry;
mod traits;

pub use capabilities::*;
pub use entity::*;
pub use hooks::*;
pub use registry::*;
pub use traits::*;
