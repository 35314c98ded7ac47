//! Pointer repulsion physics for decorative elements.
//!
//! Every element within a class radius of the pointer is pushed directly away
//! from it, scaled linearly by proximity. The push is a *target*; the rendered
//! offset chases it through a damped spring so elements glide instead of
//! snapping. Constrained viewports skip all of this.

use serde::{Deserialize, Serialize};

use crate::config::{RepulsionConfig, SpringConfig};
use crate::field::{DecorativeElement, DecorativeField, ElementKind, Population};
use crate::pointer::PointerPosition;
use crate::viewport::ViewportMode;

/// Largest integration step; longer frames are subdivided.
const MAX_STEP: f64 = 1.0 / 120.0;
const SETTLE_EPSILON: f64 = 0.01;

/// 2D offset in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f64 {
        self.x.hypot(self.y)
    }
}

/// Proximity radius and maximum displacement for one class of element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepulsionClass {
    pub radius: f64,
    pub magnitude: f64,
}

impl RepulsionClass {
    /// Large interactive eyes: flee far.
    pub const EYE: RepulsionClass = RepulsionClass { radius: 150.0, magnitude: 60.0 };
    /// Small decorative glyphs: a nudge.
    pub const GLYPH: RepulsionClass = RepulsionClass { radius: 150.0, magnitude: 8.0 };
    /// Ambient particles: wider radius, moderate push. Reserved: no
    /// population uses it yet, but hosts can read it from the served config.
    pub const PARTICLE: RepulsionClass = RepulsionClass { radius: 200.0, magnitude: 30.0 };
}

/// Displacement of an element centred at `center` away from `pointer`.
///
/// Exactly zero at or beyond the radius; exactly `magnitude` when the pointer
/// sits on the centre (pushed straight up, since there is no direction).
pub fn displacement(center: (f64, f64), pointer: PointerPosition, class: RepulsionClass) -> Vec2 {
    let dx = center.0 - pointer.x;
    let dy = center.1 - pointer.y;
    let dist = dx.hypot(dy);
    if dist >= class.radius {
        return Vec2::ZERO;
    }
    let strength = (class.radius - dist) / class.radius;
    let (ux, uy) = if dist > 0.0 { (dx / dist, dy / dist) } else { (0.0, -1.0) };
    Vec2::new(ux * strength * class.magnitude, uy * strength * class.magnitude)
}

/// Rotation in degrees that turns an upright eye to face the pointer.
pub fn gaze_rotation(center: (f64, f64), pointer: PointerPosition) -> f64 {
    let angle = (pointer.y - center.1).atan2(pointer.x - center.0);
    angle.to_degrees() + 90.0
}

/// Damped harmonic spring with unit mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spring {
    pub stiffness: f64,
    pub damping: f64,
}

impl Spring {
    pub const fn new(stiffness: f64, damping: f64) -> Self {
        Self { stiffness, damping }
    }
}

/// A scalar chasing a target through a [`Spring`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SpringValue {
    pub value: f64,
    pub velocity: f64,
    pub target: f64,
}

impl SpringValue {
    pub fn at(value: f64) -> Self {
        Self { value, velocity: 0.0, target: value }
    }

    /// Advance by `dt` seconds (semi-implicit Euler, sub-stepped).
    pub fn step(&mut self, spring: Spring, dt: f64) {
        let mut remaining = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        while remaining > 0.0 {
            let h = remaining.min(MAX_STEP);
            let accel = -spring.stiffness * (self.value - self.target) - spring.damping * self.velocity;
            self.velocity += accel * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
        if self.is_settled() {
            self.value = self.target;
            self.velocity = 0.0;
        }
    }

    pub fn is_settled(&self) -> bool {
        (self.value - self.target).abs() < SETTLE_EPSILON && self.velocity.abs() < SETTLE_EPSILON
    }

    /// Retarget an angle along the shortest arc from the current value.
    fn aim_angle(&mut self, degrees: f64) {
        let delta = (degrees - self.value + 180.0).rem_euclid(360.0) - 180.0;
        self.target = self.value + delta;
    }
}

/// Animated state of one element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ElementMotion {
    pub offset_x: SpringValue,
    pub offset_y: SpringValue,
    pub rotation: SpringValue,
}

impl ElementMotion {
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x.value, self.offset_y.value)
    }

    fn is_settled(&self) -> bool {
        self.offset_x.is_settled() && self.offset_y.is_settled() && self.rotation.is_settled()
    }
}

/// Per-element spring state for the current field.
#[derive(Debug, Clone, Default)]
pub struct RepulsionField {
    active: bool,
    eyes: Vec<ElementMotion>,
    doodles: Vec<ElementMotion>,
}

impl RepulsionField {
    /// Fresh state for a newly generated field. Only unrestricted fields move.
    pub fn for_field(field: &DecorativeField) -> Self {
        Self {
            active: field.mode == ViewportMode::Unrestricted,
            eyes: vec![ElementMotion::default(); field.eyes.len()],
            doodles: vec![ElementMotion::default(); field.doodles.len()],
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Recompute targets for a new pointer position.
    pub fn retarget(&mut self, field: &DecorativeField, pointer: PointerPosition, classes: &RepulsionConfig) {
        if !self.active {
            return;
        }
        for (motion, element) in self.eyes.iter_mut().zip(&field.eyes) {
            aim(motion, element, pointer, classes);
        }
        for (motion, element) in self.doodles.iter_mut().zip(&field.doodles) {
            aim(motion, element, pointer, classes);
        }
    }

    /// Integrate all springs. Returns `true` while anything is still moving.
    pub fn step(&mut self, dt: f64, springs: &SpringConfig) -> bool {
        if !self.active {
            return false;
        }
        let mut moving = false;
        for motion in self.eyes.iter_mut() {
            motion.offset_x.step(springs.eye, dt);
            motion.offset_y.step(springs.eye, dt);
            motion.rotation.step(springs.ambient, dt);
            moving |= !motion.is_settled();
        }
        for motion in self.doodles.iter_mut() {
            motion.offset_x.step(springs.ambient, dt);
            motion.offset_y.step(springs.ambient, dt);
            moving |= !motion.is_settled();
        }
        moving
    }

    /// Current motion of one element; `None` when inactive or out of range.
    pub fn motion(&self, population: Population, index: usize) -> Option<&ElementMotion> {
        if !self.active {
            return None;
        }
        match population {
            Population::Eye => self.eyes.get(index),
            Population::Doodle => self.doodles.get(index),
        }
    }

    /// Current offsets for a population; all zero when inactive.
    pub fn offsets(&self, population: Population) -> Vec<Vec2> {
        let motions = match population {
            Population::Eye => &self.eyes,
            Population::Doodle => &self.doodles,
        };
        if !self.active {
            return vec![Vec2::ZERO; motions.len()];
        }
        motions.iter().map(ElementMotion::offset).collect()
    }
}

pub fn class_for(kind: ElementKind, classes: &RepulsionConfig) -> RepulsionClass {
    match kind {
        ElementKind::Eye => classes.eye,
        ElementKind::Doodle(_) => classes.glyph,
    }
}

fn aim(motion: &mut ElementMotion, element: &DecorativeElement, pointer: PointerPosition, classes: &RepulsionConfig) {
    let Some(center) = element.position.center() else {
        return;
    };
    let push = displacement(center, pointer, class_for(element.kind, classes));
    motion.offset_x.target = push.x;
    motion.offset_y.target = push.y;
    if element.kind == ElementKind::Eye {
        motion.rotation.aim_angle(gaze_rotation(center, pointer));
    }
}
