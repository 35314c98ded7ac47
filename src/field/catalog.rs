//! Fixed layouts for constrained viewports.
//!
//! Small screens get a hand-placed ring of elements around the text instead
//! of random placement, which keeps the text area clear and the layout
//! deterministic.

use super::{DecorativeElement, DecorativeLayoutStrategy, DoodleKind, ElementKind, Placement};
use crate::viewport::{Viewport, ViewportMode};

/// (x%, y%, size px)
pub const MOBILE_EYES: [(f64, f64, f64); 15] = [
    (5.0, 8.0, 28.0),
    (75.0, 5.0, 32.0),
    (88.0, 15.0, 24.0),
    (8.0, 25.0, 22.0),
    (80.0, 30.0, 30.0),
    (3.0, 45.0, 26.0),
    (85.0, 50.0, 28.0),
    (10.0, 65.0, 24.0),
    (78.0, 68.0, 32.0),
    (5.0, 82.0, 30.0),
    (82.0, 85.0, 26.0),
    (20.0, 12.0, 20.0),
    (60.0, 88.0, 22.0),
    (35.0, 5.0, 18.0),
    (92.0, 40.0, 20.0),
];

/// (x%, y%, size px, symbol)
pub const MOBILE_DOODLES: [(f64, f64, f64, DoodleKind); 10] = [
    (5.0, 10.0, 30.0, DoodleKind::Pencil),
    (80.0, 8.0, 35.0, DoodleKind::Controller),
    (8.0, 30.0, 28.0, DoodleKind::Loop),
    (85.0, 25.0, 32.0, DoodleKind::Checkmark),
    (3.0, 55.0, 30.0, DoodleKind::Arrow),
    (88.0, 50.0, 28.0, DoodleKind::Eraser),
    (6.0, 75.0, 35.0, DoodleKind::Pc),
    (82.0, 72.0, 30.0, DoodleKind::Scribble),
    (15.0, 88.0, 26.0, DoodleKind::Cross),
    (75.0, 90.0, 28.0, DoodleKind::Loop),
];

/// Mobile strategy: the same layout for every viewport, no randomness.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedCatalogLayout;

impl DecorativeLayoutStrategy for FixedCatalogLayout {
    fn mode(&self) -> ViewportMode {
        ViewportMode::Constrained
    }

    fn eyes(&mut self, _viewport: Viewport) -> Vec<DecorativeElement> {
        MOBILE_EYES
            .iter()
            .enumerate()
            .map(|(i, &(x, y, size))| {
                DecorativeElement::new(i as u32, Placement::Percent { x, y }, size, ElementKind::Eye)
            })
            .collect()
    }

    fn doodles(&mut self, _viewport: Viewport) -> Vec<DecorativeElement> {
        MOBILE_DOODLES
            .iter()
            .enumerate()
            .map(|(i, &(x, y, size, kind))| {
                DecorativeElement::new(
                    i as u32,
                    Placement::Percent { x, y },
                    size,
                    ElementKind::Doodle(kind),
                )
            })
            .collect()
    }
}
