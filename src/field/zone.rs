use crate::config::ZoneSize;
use crate::viewport::Viewport;

/// Rectangle centred on the viewport that decorative elements must avoid.
///
/// Edges are exclusive: a point exactly on the border is outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExclusionZone {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl ExclusionZone {
    pub fn centered(viewport: Viewport, size: ZoneSize) -> Self {
        let (cx, cy) = viewport.center();
        Self {
            left: cx - size.width / 2.0,
            right: cx + size.width / 2.0,
            top: cy - size.height / 2.0,
            bottom: cy + size.height / 2.0,
        }
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x > self.left && x < self.right && y > self.top && y < self.bottom
    }
}
