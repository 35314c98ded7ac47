//! Tunables for the narrative section.
//!
//! Everything here has a default matching the shipped site, so an empty JSON
//! object (or no config file at all) reproduces the production behaviour.
//! Chapter and reveal thresholds are not configurable; they are constants in
//! [`crate::chapter`] and [`crate::reveal`].

use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{NarrativeError, Result};
use crate::repulsion::{RepulsionClass, Spring};

/// Root configuration for the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NarrativeConfig {
    /// Widths strictly below this are constrained ("mobile").
    pub mobile_breakpoint: f64,
    /// Minimum change in container top offset before a frame is re-sampled.
    pub sample_threshold: f64,
    pub eyes: EyeFieldConfig,
    pub doodles: DoodleFieldConfig,
    pub repulsion: RepulsionConfig,
    pub springs: SpringConfig,
    pub media: MediaConfig,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            sample_threshold: 0.5,
            eyes: EyeFieldConfig::default(),
            doodles: DoodleFieldConfig::default(),
            repulsion: RepulsionConfig::default(),
            springs: SpringConfig::default(),
            media: MediaConfig::default(),
        }
    }
}

impl NarrativeConfig {
    /// Load a config from a JSON file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| NarrativeError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| NarrativeError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Half-open uniform range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f64,
    pub max: f64,
}

impl Span {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.min + rng.gen::<f64>() * (self.max - self.min)
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v <= self.max
    }
}

/// Width/height of a centred exclusion rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneSize {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EyeFieldConfig {
    pub clusters: usize,
    pub per_cluster: usize,
    pub cluster_radius: Span,
    pub scattered: usize,
    pub exclusion: ZoneSize,
    pub max_attempts: u32,
    pub cluster_size: Span,
    pub scattered_size: Span,
}

impl Default for EyeFieldConfig {
    fn default() -> Self {
        Self {
            clusters: 15,
            per_cluster: 10,
            cluster_radius: Span::new(80.0, 180.0),
            scattered: 60,
            exclusion: ZoneSize { width: 500.0, height: 300.0 },
            max_attempts: 20,
            cluster_size: Span::new(20.0, 75.0),
            scattered_size: Span::new(15.0, 65.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoodleFieldConfig {
    pub count: usize,
    pub exclusion: ZoneSize,
    pub max_attempts: u32,
    pub size: Span,
}

impl Default for DoodleFieldConfig {
    fn default() -> Self {
        Self {
            count: 40,
            exclusion: ZoneSize { width: 600.0, height: 350.0 },
            max_attempts: 20,
            size: Span::new(30.0, 80.0),
        }
    }
}

/// Proximity radius and maximum push per element class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepulsionConfig {
    pub eye: RepulsionClass,
    pub glyph: RepulsionClass,
    /// Reserved for an ambient particle layer; no population reads it.
    pub particle: RepulsionClass,
}

impl Default for RepulsionConfig {
    fn default() -> Self {
        Self {
            eye: RepulsionClass::EYE,
            glyph: RepulsionClass::GLYPH,
            particle: RepulsionClass::PARTICLE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub eye: Spring,
    pub ambient: Spring,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            eye: Spring::new(150.0, 15.0),
            ambient: Spring::new(100.0, 20.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    /// Background video for the third chapter.
    pub video_url: String,
    /// Icon used by every eye element.
    pub eye_icon_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            video_url: "https://vaaomblbmlkknefc.public.blob.vercel-storage.com/moonfall.mp4"
                .to_string(),
            eye_icon_url: "/HowWeBuildGames/sub-section1/Eye.svg".to_string(),
        }
    }
}
