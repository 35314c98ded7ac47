use serde::{Deserialize, Serialize};

use crate::viewport::ViewportMode;

/// Pointer coordinates in viewport space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

impl PointerPosition {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Latest pointer sample. Sits at the origin until the first move.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    position: PointerPosition,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a pointer move. Constrained displays ignore pointer input
    /// entirely. Returns whether the stored position changed.
    pub fn record(&mut self, x: f64, y: f64, mode: ViewportMode) -> bool {
        if mode.is_constrained() {
            return false;
        }
        let next = PointerPosition::new(x, y);
        if next == self.position {
            return false;
        }
        self.position = next;
        true
    }

    pub fn position(&self) -> PointerPosition {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_origin() {
        assert_eq!(PointerTracker::new().position(), PointerPosition::new(0.0, 0.0));
    }

    #[test]
    fn ignores_constrained_input() {
        let mut t = PointerTracker::new();
        assert!(!t.record(10.0, 20.0, ViewportMode::Constrained));
        assert_eq!(t.position(), PointerPosition::default());
        assert!(t.record(10.0, 20.0, ViewportMode::Unrestricted));
        assert!(!t.record(10.0, 20.0, ViewportMode::Unrestricted));
        assert_eq!(t.position(), PointerPosition::new(10.0, 20.0));
    }
}
