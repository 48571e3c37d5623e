//! Breakpoint Module - Width classification and edge detection
//!
//! Classifies a viewport width into a device class (desktop/mobile) and one of
//! five bootstrap tiers, and computes which resize hooks an entity has to fire
//! when its stored classification changes.
//!
//! # Thresholds
//!
//! ```text
//! device:  mobile <= 768 < desktop
//! tier:    esm < 576 <= sm < 768 <= md < 992 <= lg < 1200 <= xl
//! ```
//!
//! Width itself comes from an injected `ViewportSource` so the core can run
//! without a real display.

use std::cell::Cell;

use crate::engine::Hook;

/// Widest viewport still considered mobile.
pub const MAX_MOBILE_WIDTH: f64 = 768.0;

pub const BOOTSTRAP_XL: f64 = 1200.0;
pub const BOOTSTRAP_LG: f64 = 992.0;
pub const BOOTSTRAP_MD: f64 = 768.0;
pub const BOOTSTRAP_SM: f64 = 576.0;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DeviceClass {
    #[default]
    Desktop,
    Mobile,
}

impl DeviceClass {
    pub fn hook(self) -> Hook {
        match self {
            Self::Desktop => Hook::ResizeDesktop,
            Self::Mobile => Hook::ResizeMobile,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BootstrapTier {
    #[default]
    Xl,
    Lg,
    Md,
    Sm,
    Esm,
}

impl BootstrapTier {
    pub fn hook(self) -> Hook {
        match self {
            Self::Xl => Hook::ResizeXl,
            Self::Lg => Hook::ResizeLg,
            Self::Md => Hook::ResizeMd,
            Self::Sm => Hook::ResizeSm,
            Self::Esm => Hook::ResizeEsm,
        }
    }
}

/// Classification of one width measurement.
///
/// The default (desktop, xl) is what an entity holds before its first
/// `initialization()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Breakpoint {
    pub device: DeviceClass,
    pub tier: BootstrapTier,
}

impl Breakpoint {
    /// Hooks to fire when moving from `previous` to `self`.
    ///
    /// At most one device hook and one tier hook, device first.
    pub fn edges_from(self, previous: Breakpoint) -> Vec<Hook> {
        let mut edges = Vec::with_capacity(2);
        if self.device != previous.device {
            edges.push(self.device.hook());
        }
        if self.tier != previous.tier {
            edges.push(self.tier.hook());
        }
        edges
    }
}

/// Classify a width. Total over every `f64`: negative, zero and NaN land in
/// mobile/esm.
pub fn classify(width: f64) -> Breakpoint {
    let device = if width > MAX_MOBILE_WIDTH {
        DeviceClass::Desktop
    } else {
        DeviceClass::Mobile
    };

    let tier = if width >= BOOTSTRAP_XL {
        BootstrapTier::Xl
    } else if width >= BOOTSTRAP_LG {
        BootstrapTier::Lg
    } else if width >= BOOTSTRAP_MD {
        BootstrapTier::Md
    } else if width >= BOOTSTRAP_SM {
        BootstrapTier::Sm
    } else {
        BootstrapTier::Esm
    };

    Breakpoint { device, tier }
}

// =============================================================================
// VIEWPORT SOURCE
// =============================================================================

/// Synchronous source of the current viewport width.
pub trait ViewportSource {
    fn width(&self) -> f64;
}

/// Viewport whose width is set by hand (tests, terminal adapters).
#[derive(Debug, Default)]
pub struct ManualViewport {
    width: Cell<f64>,
}

impl ManualViewport {
    pub fn new(width: f64) -> Self {
        Self {
            width: Cell::new(width),
        }
    }

    pub fn set_width(&self, width: f64) {
        self.width.set(width);
    }
}

impl ViewportSource for ManualViewport {
    fn width(&self) -> f64 {
        self.width.get()
    }
}

// =============================================================================
// TESTS
// =============================================================================
