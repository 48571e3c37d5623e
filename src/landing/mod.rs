//! Landing - Frame navigation
//!
//! - `builder` - Frame registry, switch guard, resize fan-out, input routing
//! - `switch_effect` - One transition between an outgoing and incoming frame

mod builder;
mod switch_effect;

pub use builder::BuilderRoot;
pub use switch_effect::{FrameSwitchCoordinator, DEFAULT_SWITCH_DURATION};
