//! Input Adapters - Native events to normalized input
//!
//! The core only understands `InputEvent` and `GestureEvent`. Adapters turn
//! whatever the host delivers into those.
//!
//! - `terminal` - crossterm mouse events and terminal size

mod terminal;

pub use terminal::*;
