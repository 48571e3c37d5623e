//! Terminal Input - crossterm mouse events as pointer input
//!
//! Terminal coordinates are cells. They are scaled by a nominal `CellSize`
//! so the breakpoint thresholds, which are in pixels, stay meaningful.
//!
//! # Mapping
//!
//! | crossterm                | produces                                   |
//! |--------------------------|--------------------------------------------|
//! | `Moved`                  | mousemove                                  |
//! | `Drag(Left)`             | mousemove (active)                         |
//! | `Down(Left)`             | mousedown                                  |
//! | `Up(Left)`               | mouseup, then click or swipe               |
//! | `ScrollUp` / `ScrollDown`| wheel gesture                              |
//! | `ScrollLeft` / `Right`   | pan gesture                                |
//!
//! Terminals report no click, so one is synthesized on release at the press
//! position. A release far enough from the press along one axis is a swipe
//! instead.

use std::cell::Cell;

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::state::{GestureEvent, GestureKind, InputEvent, InputKind, ViewportSource};
use crate::types::SurfaceId;

/// Default swipe distance, in pixels.
pub const DEFAULT_SWIPE_THRESHOLD: f64 = 48.0;

// =============================================================================
// CELL GEOMETRY
// =============================================================================

/// Nominal pixel size of one terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CellSize {
    fn default() -> Self {
        Self {
            width: 8.0,
            height: 16.0,
        }
    }
}

impl CellSize {
    pub fn to_pixels(self, column: u16, row: u16) -> (f64, f64) {
        (
            f64::from(column) * self.width,
            f64::from(row) * self.height,
        )
    }
}

/// Viewport width in pixels for a terminal `columns` wide.
pub fn viewport_width(columns: u16, cell: CellSize) -> f64 {
    f64::from(columns) * cell.width
}

/// Viewport backed by the terminal size. Update it from resize events.
#[derive(Debug)]
pub struct TerminalViewport {
    columns: Cell<u16>,
    cell: CellSize,
}

impl TerminalViewport {
    pub fn new(columns: u16, cell: CellSize) -> Self {
        Self {
            columns: Cell::new(columns),
            cell,
        }
    }

    /// Query the current terminal size.
    pub fn detect(cell: CellSize) -> std::io::Result<Self> {
        let (columns, _rows) = crossterm::terminal::size()?;
        Ok(Self::new(columns, cell))
    }

    pub fn set_columns(&self, columns: u16) {
        self.columns.set(columns);
    }

    pub fn columns(&self) -> u16 {
        self.columns.get()
    }
}

impl ViewportSource for TerminalViewport {
    fn width(&self) -> f64 {
        viewport_width(self.columns.get(), self.cell)
    }
}

// =============================================================================
// MOUSE TRANSLATION
// =============================================================================

/// One normalized event produced from a terminal mouse event.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslatedInput {
    Pointer(InputEvent),
    Gesture(GestureEvent),
}

/// Stateful crossterm mouse translator. Remembers the press position to
/// synthesize clicks and recognize swipes.
#[derive(Debug)]
pub struct MouseTranslator {
    cell: CellSize,
    swipe_threshold: f64,
    pressed_at: Cell<Option<(f64, f64)>>,
}

impl Default for MouseTranslator {
    fn default() -> Self {
        Self::new(CellSize::default())
    }
}

impl MouseTranslator {
    pub fn new(cell: CellSize) -> Self {
        Self {
            cell,
            swipe_threshold: DEFAULT_SWIPE_THRESHOLD,
            pressed_at: Cell::new(None),
        }
    }

    pub fn with_swipe_threshold(mut self, threshold: f64) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    /// Translate one mouse event. Pointer events are addressed to `surface`.
    pub fn translate(&self, event: &MouseEvent, surface: &SurfaceId) -> Vec<TranslatedInput> {
        let (x, y) = self.cell.to_pixels(event.column, event.row);
        let pointer = |kind| TranslatedInput::Pointer(InputEvent::new(kind, x, y, surface.clone()));

        match event.kind {
            MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                vec![pointer(InputKind::MouseMove)]
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.pressed_at.set(Some((x, y)));
                vec![pointer(InputKind::MouseDown)]
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let mut out = vec![pointer(InputKind::MouseUp)];
                if let Some((px, py)) = self.pressed_at.take() {
                    out.push(match self.recognize_swipe(px, py, x, y) {
                        Some(kind) => TranslatedInput::Gesture(GestureEvent {
                            kind,
                            x,
                            y,
                            delta_x: x - px,
                            delta_y: y - py,
                        }),
                        None => TranslatedInput::Pointer(InputEvent::new(
                            InputKind::Click,
                            px,
                            py,
                            surface.clone(),
                        )),
                    });
                }
                out
            }
            MouseEventKind::ScrollUp => vec![TranslatedInput::Gesture(GestureEvent::wheel(x, y, -1.0))],
            MouseEventKind::ScrollDown => vec![TranslatedInput::Gesture(GestureEvent::wheel(x, y, 1.0))],
            MouseEventKind::ScrollLeft => vec![TranslatedInput::Gesture(GestureEvent {
                delta_x: -1.0,
                ..GestureEvent::new(GestureKind::PanLeft, x, y)
            })],
            MouseEventKind::ScrollRight => vec![TranslatedInput::Gesture(GestureEvent {
                delta_x: 1.0,
                ..GestureEvent::new(GestureKind::PanRight, x, y)
            })],
            // Right and middle buttons carry no pointer meaning here.
            MouseEventKind::Down(_) | MouseEventKind::Up(_) | MouseEventKind::Drag(_) => Vec::new(),
        }
    }

    /// Swipe along the dominant axis, if the travel reaches the threshold.
    fn recognize_swipe(&self, from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> Option<GestureKind> {
        let (dx, dy) = (to_x - from_x, to_y - from_y);
        if dx.abs() >= dy.abs() {
            if dx.abs() < self.swipe_threshold {
                return None;
            }
            Some(if dx < 0.0 {
                GestureKind::SwipeLeft
            } else {
                GestureKind::SwipeRight
            })
        } else {
            if dy.abs() < self.swipe_threshold {
                return None;
            }
            Some(if dy < 0.0 {
                GestureKind::SwipeUp
            } else {
                GestureKind::SwipeDown
            })
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
