//! Pointer history ring.
//!
//! A bounded, most-recent-first buffer of pointer samples. Disabled by
//! default. Enabling it pre-fills every slot with an empty placeholder, and
//! each recorded sample is pushed to the front while the oldest slot drops off
//! the back.
//!
//! Samples can be exported as raw 8-element frames
//! `(x, y, is_mouse, active, frame_time, vx, vy, action)` and decoded back
//! field by field. Decoders reject frames of the wrong arity.

use std::collections::VecDeque;

use super::pointer::{DeviceKind, InputKind, PointerSample};

/// Number of fields in a raw history frame.
pub const HISTORY_FRAME_LEN: usize = 8;

/// Ring capacity used when none is configured.
pub const DEFAULT_HISTORY_SIZE: usize = 20;

/// Text returned by the textual decoders for malformed frames.
pub const INVALID_FRAME: &str = "Wrong history array element";

/// Raw encoded sample.
pub type HistoryFrame = [f64; HISTORY_FRAME_LEN];

#[derive(Debug, Clone)]
pub struct PointerHistory {
    enabled: bool,
    capacity: usize,
    slots: VecDeque<Option<PointerSample>>,
}

impl PointerHistory {
    pub fn new() -> Self {
        Self {
            enabled: false,
            capacity: DEFAULT_HISTORY_SIZE,
            slots: VecDeque::new(),
        }
    }

    /// Enable recording with `capacity` slots, all placeholders.
    ///
    /// A zero capacity is bumped to one so the ring is never degenerate.
    pub fn enable(&mut self, capacity: usize) {
        let capacity = capacity.max(1);
        self.enabled = true;
        self.capacity = capacity;
        self.slots = std::iter::repeat_n(None, capacity).collect();
    }

    /// Stop recording and drop every slot.
    pub fn disable(&mut self) {
        self.enabled = false;
        self.slots.clear();
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Push a sample to the front. No-op while disabled.
    pub fn record(&mut self, sample: PointerSample) {
        if !self.enabled {
            return;
        }
        self.slots.pop_back();
        self.slots.push_front(Some(sample));
    }

    /// Every slot, most recent first, placeholders included.
    pub fn slots(&self) -> impl Iterator<Item = Option<&PointerSample>> {
        self.slots.iter().map(Option::as_ref)
    }

    /// Recorded samples only, most recent first.
    pub fn samples(&self) -> impl Iterator<Item = &PointerSample> {
        self.slots.iter().flatten()
    }

    pub fn latest(&self) -> Option<&PointerSample> {
        self.slots.front().and_then(Option::as_ref)
    }

    /// Raw export. Placeholders encode as a single `0.0`, which every decoder
    /// rejects.
    pub fn to_frames(&self) -> Vec<Vec<f64>> {
        self.slots
            .iter()
            .map(|slot| match slot {
                Some(sample) => encode(sample).to_vec(),
                None => vec![0.0],
            })
            .collect()
    }
}

impl Default for PointerHistory {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// ENCODING
// =============================================================================

pub fn encode(sample: &PointerSample) -> HistoryFrame {
    [
        sample.x,
        sample.y,
        flag(sample.device == DeviceKind::Mouse),
        flag(sample.active),
        sample.frame_time as f64,
        sample.vx,
        sample.vy,
        f64::from(sample.action.code()),
    ]
}

fn flag(value: bool) -> f64 {
    if value { 1.0 } else { 0.0 }
}

fn field(frame: &[f64], index: usize) -> Option<f64> {
    if frame.len() != HISTORY_FRAME_LEN {
        return None;
    }
    frame.get(index).copied()
}

pub fn decode_x(frame: &[f64]) -> Option<f64> {
    field(frame, 0)
}

pub fn decode_y(frame: &[f64]) -> Option<f64> {
    field(frame, 1)
}

pub fn decode_device(frame: &[f64]) -> Option<DeviceKind> {
    field(frame, 2).map(|v| {
        if v != 0.0 {
            DeviceKind::Mouse
        } else {
            DeviceKind::Touch
        }
    })
}

pub fn decode_active(frame: &[f64]) -> Option<bool> {
    field(frame, 3).map(|v| v != 0.0)
}

pub fn decode_frame_time(frame: &[f64]) -> Option<u64> {
    field(frame, 4).map(|v| v as u64)
}

pub fn decode_velocity(frame: &[f64]) -> Option<(f64, f64)> {
    Some((field(frame, 5)?, field(frame, 6)?))
}

/// Action of a frame. Codes that are not a whole number in `u8` range are
/// rejected rather than truncated.
pub fn decode_action(frame: &[f64]) -> Option<InputKind> {
    let code = field(frame, 7)?;
    if code.fract() != 0.0 || !(0.0..=f64::from(u8::MAX)).contains(&code) {
        return None;
    }
    InputKind::from_code(code as u8)
}

/// Full decode of a raw frame.
pub fn decode(frame: &[f64]) -> Option<PointerSample> {
    let (vx, vy) = decode_velocity(frame)?;
    Some(PointerSample {
        x: decode_x(frame)?,
        y: decode_y(frame)?,
        device: decode_device(frame)?,
        active: decode_active(frame)?,
        frame_time: decode_frame_time(frame)?,
        vx,
        vy,
        action: decode_action(frame)?,
    })
}

/// `"mouse"` / `"touch"`, or the invalid marker.
pub fn device_text(frame: &[f64]) -> &'static str {
    decode_device(frame).map_or(INVALID_FRAME, DeviceKind::name)
}

/// Action name such as `"click"` or `"mousemove"`, or the invalid marker.
pub fn action_text(frame: &[f64]) -> &'static str {
    decode_action(frame).map_or(INVALID_FRAME, InputKind::name)
}
