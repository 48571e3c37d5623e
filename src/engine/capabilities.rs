//! Capability set of a lifecycle entity.
//!
//! Frames, components and the menu are all the same `LifecycleEntity` type.
//! What sets them apart is which capabilities they were built with.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Capabilities: u8 {
        /// Owns a pointer tracker and pointer hooks.
        const POINTER = 0b0000_0001;
        /// Declares adjacency links and a switch effect name.
        const SWITCH_EFFECT = 0b0000_0010;
        /// Registered directly on the builder rather than as a child.
        const ROOT = 0b0000_0100;
        /// Has a bounds rectangle used for hit-testing against its parent.
        const HIT_AREA = 0b0000_1000;
    }
}

impl Capabilities {
    /// Capabilities of a full-screen frame.
    pub const FRAME: Self = Self::POINTER
        .union(Self::SWITCH_EFFECT)
        .union(Self::ROOT);

    /// Capabilities of a frame component.
    pub const COMPONENT: Self = Self::POINTER.union(Self::HIT_AREA);

    /// Capabilities of the menu frame, which shares the global pointer.
    pub const MENU: Self = Self::POINTER.union(Self::ROOT);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        assert!(Capabilities::FRAME.contains(Capabilities::ROOT));
        assert!(Capabilities::FRAME.contains(Capabilities::SWITCH_EFFECT));
        assert!(!Capabilities::COMPONENT.contains(Capabilities::ROOT));
        assert!(Capabilities::COMPONENT.contains(Capabilities::HIT_AREA));
        assert!(!Capabilities::MENU.contains(Capabilities::SWITCH_EFFECT));
    }
}
