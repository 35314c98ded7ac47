use serde::{Deserialize, Serialize};

/// Display class that gates which sub-systems run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewportMode {
    /// Narrow ("mobile") display: fixed catalogs, no pointer physics.
    Constrained,
    /// Wide ("desktop") display: randomized fields and repulsion.
    Unrestricted,
}

impl ViewportMode {
    pub fn classify(width: f64, breakpoint: f64) -> Self {
        if width < breakpoint {
            Self::Constrained
        } else {
            Self::Unrestricted
        }
    }

    pub fn is_constrained(self) -> bool {
        self == Self::Constrained
    }
}

/// Viewport dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }
}

/// Tracks the current mode and reports only transitions.
///
/// Resize events arrive at browser cadence; the field generator must only run
/// when the mode flips, so `observe` filters out same-mode resizes.
#[derive(Debug, Clone)]
pub struct ModeDetector {
    breakpoint: f64,
    current: Option<ViewportMode>,
}

impl ModeDetector {
    pub fn new(breakpoint: f64) -> Self {
        Self { breakpoint, current: None }
    }

    /// Feed a window width. Returns the new mode on the first observation and
    /// on every change, `None` otherwise.
    pub fn observe(&mut self, width: f64) -> Option<ViewportMode> {
        let mode = ViewportMode::classify(width, self.breakpoint);
        if self.current == Some(mode) {
            return None;
        }
        self.current = Some(mode);
        Some(mode)
    }

    /// Current mode; unrestricted until the first observation.
    pub fn mode(&self) -> ViewportMode {
        self.current.unwrap_or(ViewportMode::Unrestricted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoint_is_exclusive_for_constrained() {
        assert_eq!(ViewportMode::classify(767.9, 768.0), ViewportMode::Constrained);
        assert_eq!(ViewportMode::classify(768.0, 768.0), ViewportMode::Unrestricted);
    }

    #[test]
    fn detector_reports_only_transitions() {
        let mut d = ModeDetector::new(768.0);
        assert_eq!(d.observe(1280.0), Some(ViewportMode::Unrestricted));
        assert_eq!(d.observe(1100.0), None);
        assert_eq!(d.observe(900.0), None);
        assert_eq!(d.observe(500.0), Some(ViewportMode::Constrained));
        assert_eq!(d.observe(400.0), None);
        assert_eq!(d.observe(1024.0), Some(ViewportMode::Unrestricted));
        assert_eq!(d.mode(), ViewportMode::Unrestricted);
    }

    #[test]
    fn first_observation_always_reports() {
        let mut d = ModeDetector::new(768.0);
        assert_eq!(d.observe(320.0), Some(ViewportMode::Constrained));
    }
}
