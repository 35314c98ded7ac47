//! Chapter selection: a step function from progress to one of three stages.
//!
//! No hysteresis. Jitter around a boundary flips the chapter every tick and
//! the 0.7 s layer cross-fade absorbs it.

use serde::{Deserialize, Serialize};

/// Progress at which the second chapter begins.
pub const SHAPE_START: f64 = 1.0 / 3.0;
/// Progress at which the third chapter begins.
pub const FEEL_START: f64 = 2.0 / 3.0;

/// One of the three narrative stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chapter {
    /// "how we start": curious eyes.
    Play = 0,
    /// "how we shape it": editing doodles and staged sentences.
    Shape = 1,
    /// "how it feels": background video.
    Feel = 2,
}

impl Chapter {
    pub const ALL: [Chapter; 3] = [Chapter::Play, Chapter::Shape, Chapter::Feel];

    pub fn from_progress(progress: f64) -> Self {
        if progress < SHAPE_START {
            Chapter::Play
        } else if progress < FEEL_START {
            Chapter::Shape
        } else {
            Chapter::Feel
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }

    pub fn copy(self) -> ChapterCopy {
        match self {
            Chapter::Play => ChapterCopy {
                eyebrow: "1\u{2014}how we start",
                headline: "We design fun mechanics that make people feel like children again.",
                footnote: "Curiosity comes first. Rules come later.",
            },
            Chapter::Shape => ChapterCopy {
                eyebrow: "2\u{2014}how we shape it",
                headline: "We test early. We test often. We listen.",
                footnote: "Every mechanic earns its place through play.",
            },
            Chapter::Feel => ChapterCopy {
                eyebrow: "3\u{2014}how it feels",
                headline: "Our worlds feel alive responding to every movement.",
                footnote: "Interaction isn't a feature. It's the foundation.",
            },
        }
    }
}

/// Static text for one chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChapterCopy {
    pub eyebrow: &'static str,
    pub headline: &'static str,
    pub footnote: &'static str,
}
