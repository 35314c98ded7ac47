//! Randomized placement for unrestricted viewports.
//!
//! Pure functions of (viewport, config, rng): a seeded rng reproduces the
//! exact same field.

use std::f64::consts::TAU;

use rand::Rng;

use super::zone::ExclusionZone;
use super::{DecorativeElement, DecorativeLayoutStrategy, DoodleKind, ElementKind, Placement};
use crate::config::{DoodleFieldConfig, EyeFieldConfig, NarrativeConfig};
use crate::viewport::{Viewport, ViewportMode};

/// Draw up to `max_attempts` uniform points until one lands outside `zone`.
/// If every attempt lands inside, the last attempt is returned anyway.
fn sample_outside<R: Rng + ?Sized>(
    viewport: Viewport,
    zone: &ExclusionZone,
    max_attempts: u32,
    rng: &mut R,
) -> (f64, f64) {
    let mut attempts = 0;
    loop {
        let x = rng.gen::<f64>() * viewport.width;
        let y = rng.gen::<f64>() * viewport.height;
        attempts += 1;
        if !zone.contains(x, y) || attempts >= max_attempts {
            return (x, y);
        }
    }
}

/// Clustered eyes plus a viewport-wide scattering.
///
/// Cluster centres may fall back into the exclusion zone, but individual eyes
/// landing inside it are discarded, so no emitted eye is ever inside.
pub fn scatter_eyes<R: Rng + ?Sized>(
    viewport: Viewport,
    cfg: &EyeFieldConfig,
    rng: &mut R,
) -> Vec<DecorativeElement> {
    let zone = ExclusionZone::centered(viewport, cfg.exclusion);
    let mut eyes = Vec::with_capacity(cfg.clusters * cfg.per_cluster + cfg.scattered);
    let mut next_id = 0u32;
    let mut push = |eyes: &mut Vec<DecorativeElement>, x: f64, y: f64, size: f64| {
        eyes.push(DecorativeElement::new(
            next_id,
            Placement::Absolute { x, y },
            size,
            ElementKind::Eye,
        ));
        next_id += 1;
    };

    for _ in 0..cfg.clusters {
        let (cx, cy) = sample_outside(viewport, &zone, cfg.max_attempts, rng);
        let radius = cfg.cluster_radius.sample(rng);
        for _ in 0..cfg.per_cluster {
            let angle = rng.gen::<f64>() * TAU;
            let dist = rng.gen::<f64>() * radius;
            let x = cx + angle.cos() * dist;
            let y = cy + angle.sin() * dist;
            if zone.contains(x, y) {
                continue;
            }
            let size = cfg.cluster_size.sample(rng);
            push(&mut eyes, x, y, size);
        }
    }

    for _ in 0..cfg.scattered {
        let (x, y) = sample_outside(viewport, &zone, cfg.max_attempts, rng);
        if zone.contains(x, y) {
            continue;
        }
        let size = cfg.scattered_size.sample(rng);
        push(&mut eyes, x, y, size);
    }

    eyes
}

/// Editing doodles scattered around a wider exclusion zone.
pub fn scatter_doodles<R: Rng + ?Sized>(
    viewport: Viewport,
    cfg: &DoodleFieldConfig,
    rng: &mut R,
) -> Vec<DecorativeElement> {
    let zone = ExclusionZone::centered(viewport, cfg.exclusion);
    let mut doodles = Vec::with_capacity(cfg.count);

    for _ in 0..cfg.count {
        let (x, y) = sample_outside(viewport, &zone, cfg.max_attempts, rng);
        if zone.contains(x, y) {
            continue;
        }
        let size = cfg.size.sample(rng);
        let kind = DoodleKind::ALL[rng.gen_range(0..DoodleKind::ALL.len())];
        doodles.push(DecorativeElement::new(
            doodles.len() as u32,
            Placement::Absolute { x, y },
            size,
            ElementKind::Doodle(kind),
        ));
    }

    doodles
}

/// Desktop strategy: randomized fields drawn from a caller-supplied rng.
pub struct ScatteredLayout<'a, R: Rng + ?Sized> {
    rng: &'a mut R,
    eyes: &'a EyeFieldConfig,
    doodles: &'a DoodleFieldConfig,
}

impl<'a, R: Rng + ?Sized> ScatteredLayout<'a, R> {
    pub fn new(rng: &'a mut R, config: &'a NarrativeConfig) -> Self {
        Self {
            rng,
            eyes: &config.eyes,
            doodles: &config.doodles,
        }
    }
}

impl<R: Rng + ?Sized> DecorativeLayoutStrategy for ScatteredLayout<'_, R> {
    fn mode(&self) -> ViewportMode {
        ViewportMode::Unrestricted
    }

    fn eyes(&mut self, viewport: Viewport) -> Vec<DecorativeElement> {
        scatter_eyes(viewport, self.eyes, &mut *self.rng)
    }

    fn doodles(&mut self, viewport: Viewport) -> Vec<DecorativeElement> {
        scatter_doodles(viewport, self.doodles, &mut *self.rng)
    }
}
