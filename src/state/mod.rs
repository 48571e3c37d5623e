//! State Module - Input and viewport state
//!
//! - **Breakpoint** - Width classification, edge detection, viewport source
//! - **Pointer** - Per-surface pointer tracker and pointer hooks
//! - **History** - Bounded pointer history ring and raw frame decoders
//! - **Gesture** - Normalized swipe/pan/wheel gestures and their hooks
//! - **Resize** - Quiet-window debounce for viewport resizes

mod breakpoint;
mod gesture;
pub mod history;
mod pointer;
mod resize;

pub use breakpoint::*;
pub use gesture::*;
pub use history::{PointerHistory, DEFAULT_HISTORY_SIZE, HISTORY_FRAME_LEN};
pub use pointer::*;
pub use resize::*;
