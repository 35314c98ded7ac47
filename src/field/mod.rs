//! Decorative element fields for the first two chapters.
//!
//! Two populations exist: clustered "eyes" for the first chapter and scattered
//! editing "doodles" for the second. How they are placed depends on the
//! viewport mode:
//! - `scatter`: randomized rejection sampling around a central text zone,
//!   with the random source passed in (desktop)
//! - `catalog`: hand-authored percentage positions (mobile)
//!
//! Both are [`DecorativeLayoutStrategy`] implementations; [`layout_for`]
//! picks one per mode transition.

mod catalog;
mod scatter;
mod zone;

pub use catalog::{FixedCatalogLayout, MOBILE_DOODLES, MOBILE_EYES};
pub use scatter::{scatter_doodles, scatter_eyes, ScatteredLayout};
pub use zone::ExclusionZone;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::NarrativeConfig;
use crate::viewport::{Viewport, ViewportMode};

/// Which chapter a decorative element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Population {
    Eye,
    Doodle,
}

/// Hand-drawn editing symbols used by the doodle population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoodleKind {
    Pencil,
    Eraser,
    Arrow,
    Loop,
    Checkmark,
    Cross,
    Scribble,
    Bracket,
    Controller,
    Pc,
}

impl DoodleKind {
    pub const ALL: [DoodleKind; 10] = [
        DoodleKind::Pencil,
        DoodleKind::Eraser,
        DoodleKind::Arrow,
        DoodleKind::Loop,
        DoodleKind::Checkmark,
        DoodleKind::Cross,
        DoodleKind::Scribble,
        DoodleKind::Bracket,
        DoodleKind::Controller,
        DoodleKind::Pc,
    ];
}

/// Visual kind of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "symbol", rename_all = "snake_case")]
pub enum ElementKind {
    Eye,
    Doodle(DoodleKind),
}

impl ElementKind {
    pub fn population(self) -> Population {
        match self {
            ElementKind::Eye => Population::Eye,
            ElementKind::Doodle(_) => Population::Doodle,
        }
    }
}

/// Where an element sits. Absolute positions are element centres in viewport
/// pixels; percentage positions come from the fixed mobile catalogs and are
/// the element's top-left corner as a share of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "snake_case")]
pub enum Placement {
    Absolute { x: f64, y: f64 },
    Percent { x: f64, y: f64 },
}

impl Placement {
    /// CSS `left`/`top` for an element of `size` pixels.
    pub fn css(&self, size: f64) -> (String, String) {
        match *self {
            Placement::Absolute { x, y } => {
                let half = size / 2.0;
                (format!("{}px", x - half), format!("{}px", y - half))
            }
            Placement::Percent { x, y } => (format!("{x}%"), format!("{y}%")),
        }
    }

    /// Centre in viewport pixels, if the placement is absolute.
    pub fn center(&self) -> Option<(f64, f64)> {
        match *self {
            Placement::Absolute { x, y } => Some((x, y)),
            Placement::Percent { .. } => None,
        }
    }
}

/// One decorative element. Never mutated after generation; pointer
/// displacement is derived at render time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorativeElement {
    pub id: u32,
    pub position: Placement,
    pub size: f64,
    pub kind: ElementKind,
    pub population: Population,
}

impl DecorativeElement {
    pub fn new(id: u32, position: Placement, size: f64, kind: ElementKind) -> Self {
        Self {
            id,
            position,
            size,
            kind,
            population: kind.population(),
        }
    }
}

/// Both populations plus the mode that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecorativeField {
    pub mode: ViewportMode,
    pub eyes: Vec<DecorativeElement>,
    pub doodles: Vec<DecorativeElement>,
}

impl DecorativeField {
    pub fn empty(mode: ViewportMode) -> Self {
        Self {
            mode,
            eyes: Vec::new(),
            doodles: Vec::new(),
        }
    }

    pub fn population(&self, population: Population) -> &[DecorativeElement] {
        match population {
            Population::Eye => &self.eyes,
            Population::Doodle => &self.doodles,
        }
    }

    pub fn len(&self) -> usize {
        self.eyes.len() + self.doodles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A way of laying out both populations for a viewport.
pub trait DecorativeLayoutStrategy {
    fn mode(&self) -> ViewportMode;
    fn eyes(&mut self, viewport: Viewport) -> Vec<DecorativeElement>;
    fn doodles(&mut self, viewport: Viewport) -> Vec<DecorativeElement>;

    fn layout(&mut self, viewport: Viewport) -> DecorativeField {
        let eyes = self.eyes(viewport);
        let doodles = self.doodles(viewport);
        DecorativeField {
            mode: self.mode(),
            eyes,
            doodles,
        }
    }
}

/// Generate the field for a mode. Called once per mode transition.
pub fn layout_for<R: Rng + ?Sized>(
    mode: ViewportMode,
    viewport: Viewport,
    config: &NarrativeConfig,
    rng: &mut R,
) -> DecorativeField {
    let field = match mode {
        ViewportMode::Constrained => FixedCatalogLayout.layout(viewport),
        ViewportMode::Unrestricted => ScatteredLayout::new(rng, config).layout(viewport),
    };
    log::debug!(
        "decorative field regenerated: mode={mode:?} eyes={} doodles={}",
        field.eyes.len(),
        field.doodles.len()
    );
    field
}
