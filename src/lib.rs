//! # laco
//!
//! Lifecycle and event orchestration core for full-screen, frame-based
//! landing pages.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! the reactive pointer and navigation state.
//!
//! ## Architecture
//!
//! A page is a set of full-screen frames. One frame is active at a time and
//! the builder switches between them through a switch effect. Every frame,
//! every component inside a frame and the menu share one lifecycle entity
//! type whose capabilities decide what input it handles:
//!
//! ```text
//! BuilderRoot
//!  ├─ frames[]        LifecycleEntity (FRAME)      ── PointerTracker, gestures
//!  │   └─ components  LifecycleEntity (COMPONENT)  ── hit area, hover
//!  ├─ background      LifecycleEntity (FRAME)
//!  ├─ menu            LifecycleEntity (MENU)       ── global pointer hooks
//!  ├─ switch effects  FrameSwitchCoordinator[]
//!  └─ global pointer  PointerTracker on the viewport
//! ```
//!
//! Everything runs on one thread. Callbacks receive `&T` and may call back
//! into the object that is dispatching them.
//!
//! ## Modules
//!
//! - [`types`] - Geometry, surface ids, persistence, direction
//! - [`engine`] - Signal registries, hooks, the lifecycle entity
//! - [`state`] - Breakpoints, pointer tracking, history, gestures, resize debounce
//! - [`landing`] - Builder root and frame switch coordinator
//! - [`input`] - crossterm adapter
//! - [`config`] - TOML configuration
//! - [`error`] - Error types

pub mod config;
pub mod engine;
pub mod error;
pub mod input;
pub mod landing;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{LandingConfig, PointerHistoryConfig};

pub use error::{ConfigError, FrameError, NavigationError};

pub use engine::{
    Capabilities, FrameLinks, HasChildren, Hook, HoverMode, LifecycleEntity, LifecycleState,
    Phase, Resizable, SignalRegistry, SubscriptionId, Switchable, WaitState,
};

pub use landing::{BuilderRoot, FrameSwitchCoordinator};

pub use state::{
    // Breakpoints
    classify, BootstrapTier, Breakpoint, DeviceClass, ManualViewport, ViewportSource,
    // Pointer
    DeviceKind, InputEvent, InputKind, PointerHook, PointerHooks, PointerSample, PointerTracker,
    // Gestures
    GestureEvent, GestureHooks, GestureKind,
    // Resize
    ResizeDebouncer,
};

pub use input::{CellSize, MouseTranslator, TerminalViewport, TranslatedInput};
