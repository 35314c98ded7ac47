//! Side-effect-free projection of section state into render targets.
//!
//! [`project`] turns the current [`NarrativeState`], the decorative field and
//! its spring state into a flat [`SceneFrame`]. Hosts apply the frame as-is;
//! the animated properties here are targets and the host's transition layer
//! eases toward them with the listed durations and delays.

use serde::Serialize;

use crate::chapter::{Chapter, ChapterCopy};
use crate::config::NarrativeConfig;
use crate::field::{DecorativeElement, DecorativeField, ElementKind, Population};
use crate::narrative::NarrativeState;
use crate::repulsion::{RepulsionField, Vec2};
use crate::reveal::{ASSET_COUNT, ASSET_DELAYS_MS, SENTENCES, SENTENCE_COUNT};
use crate::viewport::ViewportMode;

/// Chapter layer cross-fade duration.
pub const LAYER_TRANSITION_S: f64 = 0.7;
/// Vertical lift of the first chapter's layer while it is inactive.
pub const PLAY_LAYER_LIFT: f64 = -50.0;
/// Hidden offset of a floating asset.
pub const ASSET_HIDDEN_OFFSET: f64 = 32.0;
/// Hidden offset of a sentence line.
pub const SENTENCE_HIDDEN_OFFSET: f64 = 20.0;
/// Opacity of a visible doodle.
pub const DOODLE_OPACITY: f64 = 0.6;
/// Entrance rotation of a hidden desktop doodle.
pub const DOODLE_HIDDEN_ROTATION: f64 = -20.0;

const EYE_STAGGER_S: f64 = 0.005;
const STATIC_STAGGER_S: f64 = 0.05;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerFrame {
    pub chapter: Chapter,
    pub active: bool,
    pub opacity: f64,
    pub offset_y: f64,
    pub pointer_events: bool,
    pub transition_s: f64,
    pub copy: ChapterCopy,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementFrame {
    pub id: u32,
    pub kind: ElementKind,
    pub left: String,
    pub top: String,
    pub size: f64,
    pub opacity: f64,
    pub scale: f64,
    pub offset: Vec2,
    pub rotation: f64,
    pub delay_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealFrame {
    pub visible: bool,
    pub opacity: f64,
    pub offset_y: f64,
    pub delay_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceFrame {
    pub text: &'static str,
    #[serde(flatten)]
    pub reveal: RevealFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoFrame {
    pub src: String,
    pub should_play: bool,
    pub muted: bool,
}

/// Everything a host needs to paint one frame of the section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrame {
    pub progress: f64,
    pub chapter: Chapter,
    pub mode: ViewportMode,
    pub layers: [LayerFrame; 3],
    pub eye_icon: String,
    pub eyes: Vec<ElementFrame>,
    pub doodles: Vec<ElementFrame>,
    pub assets: [RevealFrame; ASSET_COUNT],
    pub sentences: [SentenceFrame; SENTENCE_COUNT],
    pub video: VideoFrame,
}

/// Project state into render targets. Pure: same inputs, same frame.
pub fn project(
    state: &NarrativeState,
    field: &DecorativeField,
    motion: &RepulsionField,
    config: &NarrativeConfig,
) -> SceneFrame {
    let chapter = state.scroll.chapter;
    SceneFrame {
        progress: state.scroll.progress,
        chapter,
        mode: field.mode,
        layers: Chapter::ALL.map(|c| layer(c, chapter)),
        eye_icon: config.media.eye_icon_url.clone(),
        eyes: population(field, motion, Population::Eye, chapter == Chapter::Play),
        doodles: population(field, motion, Population::Doodle, chapter == Chapter::Shape),
        assets: std::array::from_fn(|i| {
            reveal(state.reveal.assets_visible[i], ASSET_HIDDEN_OFFSET, ASSET_DELAYS_MS[i])
        }),
        sentences: std::array::from_fn(|i| SentenceFrame {
            text: SENTENCES[i],
            reveal: reveal(state.reveal.sentences_visible[i], SENTENCE_HIDDEN_OFFSET, 0),
        }),
        video: VideoFrame {
            src: config.media.video_url.clone(),
            should_play: chapter == Chapter::Feel,
            muted: true,
        },
    }
}

fn layer(chapter: Chapter, active: Chapter) -> LayerFrame {
    let is_active = chapter == active;
    let offset_y = match (chapter, is_active) {
        (Chapter::Play, false) => PLAY_LAYER_LIFT,
        _ => 0.0,
    };
    LayerFrame {
        chapter,
        active: is_active,
        opacity: if is_active { 1.0 } else { 0.0 },
        offset_y,
        pointer_events: is_active,
        transition_s: LAYER_TRANSITION_S,
        copy: chapter.copy(),
    }
}

fn population(
    field: &DecorativeField,
    motion: &RepulsionField,
    population: Population,
    visible: bool,
) -> Vec<ElementFrame> {
    let offsets = motion.offsets(population);
    field
        .population(population)
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let offset = offsets.get(i).copied().unwrap_or(Vec2::ZERO);
            let rotation = motion
                .motion(population, i)
                .map_or(0.0, |m| m.rotation.value);
            element_frame(i, element, field.mode, visible, offset, rotation)
        })
        .collect()
}

fn element_frame(
    index: usize,
    element: &DecorativeElement,
    mode: ViewportMode,
    visible: bool,
    offset: Vec2,
    gaze: f64,
) -> ElementFrame {
    let (left, top) = element.position.css(element.size);
    let shown = |on: f64| if visible { on } else { 0.0 };
    let (opacity, rotation, stagger) = match (element.kind, mode) {
        (ElementKind::Eye, ViewportMode::Unrestricted) => (shown(1.0), gaze, EYE_STAGGER_S),
        (ElementKind::Eye, ViewportMode::Constrained) => (shown(1.0), 0.0, STATIC_STAGGER_S),
        (ElementKind::Doodle(_), ViewportMode::Unrestricted) => (
            shown(DOODLE_OPACITY),
            if visible { 0.0 } else { DOODLE_HIDDEN_ROTATION },
            STATIC_STAGGER_S,
        ),
        (ElementKind::Doodle(_), ViewportMode::Constrained) => {
            (shown(DOODLE_OPACITY), 0.0, STATIC_STAGGER_S)
        }
    };
    ElementFrame {
        id: element.id,
        kind: element.kind,
        left,
        top,
        size: element.size,
        opacity,
        scale: shown(1.0),
        offset,
        rotation,
        delay_s: index as f64 * stagger,
    }
}

fn reveal(visible: bool, hidden_offset: f64, delay_ms: u32) -> RevealFrame {
    RevealFrame {
        visible,
        opacity: if visible { 1.0 } else { 0.0 },
        offset_y: if visible { 0.0 } else { hidden_offset },
        delay_ms,
    }
}
