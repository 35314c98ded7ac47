//! Staggered reveal flags for the second chapter.
//!
//! These breakpoints are tuned independently of the chapter thresholds in
//! [`crate::chapter`]; assets start appearing before the chapter switches and
//! sentences start at 0.33 while the chapter switches at 1/3.

use serde::{Deserialize, Serialize};

pub const ASSET_COUNT: usize = 5;
pub const SENTENCE_COUNT: usize = 3;

const ASSET_WINDOW: (f64, f64) = (0.25, 0.75);
const ASSET_THRESHOLDS: [f64; ASSET_COUNT] = [0.0, 0.15, 0.30, 0.45, 0.60];

const SENTENCE_WINDOW: (f64, f64) = (0.33, 0.66);
const SENTENCE_THRESHOLDS: [f64; SENTENCE_COUNT] = [0.0, 0.30, 0.60];

/// Entrance delay per floating asset, in milliseconds.
pub const ASSET_DELAYS_MS: [u32; ASSET_COUNT] = [0, 150, 300, 450, 600];

/// The staged lines of the second chapter, in reveal order.
pub const SENTENCES: [&str; SENTENCE_COUNT] = ["We test early.", "We test often.", "We listen."];

/// Visibility flags derived from progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    pub assets_visible: [bool; ASSET_COUNT],
    pub sentences_visible: [bool; SENTENCE_COUNT],
}

impl RevealState {
    pub const HIDDEN: RevealState = RevealState {
        assets_visible: [false; ASSET_COUNT],
        sentences_visible: [false; SENTENCE_COUNT],
    };

    pub fn from_progress(progress: f64) -> Self {
        Self {
            assets_visible: stage(progress, ASSET_WINDOW, &ASSET_THRESHOLDS),
            sentences_visible: stage(progress, SENTENCE_WINDOW, &SENTENCE_THRESHOLDS),
        }
    }

    pub fn visible_assets(&self) -> usize {
        self.assets_visible.iter().filter(|v| **v).count()
    }

    pub fn visible_sentences(&self) -> usize {
        self.sentences_visible.iter().filter(|v| **v).count()
    }

    pub fn is_fully_visible(&self) -> bool {
        self.visible_assets() == ASSET_COUNT && self.visible_sentences() == SENTENCE_COUNT
    }
}

/// Below the window: all hidden. Inside: each flag compares the normalized
/// sub-progress against its threshold. At or past the upper bound: all shown.
fn stage<const N: usize>(progress: f64, window: (f64, f64), thresholds: &[f64; N]) -> [bool; N] {
    let (lo, hi) = window;
    if progress >= hi {
        return [true; N];
    }
    if progress < lo {
        return [false; N];
    }
    let sub = (progress - lo) / (hi - lo);
    let mut flags = [false; N];
    for (flag, threshold) in flags.iter_mut().zip(thresholds) {
        *flag = sub > *threshold;
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_before_window() {
        assert_eq!(RevealState::from_progress(0.0), RevealState::HIDDEN);
        assert_eq!(RevealState::from_progress(0.2499), RevealState::HIDDEN);
    }

    #[test]
    fn window_start_shows_nothing_until_past_it() {
        // sub-progress is exactly 0 at the lower bound and `0 > 0` is false
        let s = RevealState::from_progress(0.25);
        assert_eq!(s.visible_assets(), 0);
    }

    #[test]
    fn first_asset_just_past_window_start() {
        let s = RevealState::from_progress(0.25 + 1e-9);
        assert_eq!(s.assets_visible, [true, false, false, false, false]);
        assert_eq!(s.visible_sentences(), 0);
    }

    #[test]
    fn assets_all_visible_at_upper_bound() {
        let s = RevealState::from_progress(0.75);
        assert_eq!(s.assets_visible, [true; ASSET_COUNT]);
    }

    #[test]
    fn sentences_stage_by_sub_progress() {
        // sub = (0.40 - 0.33) / 0.33 ~= 0.21
        let s = RevealState::from_progress(0.40);
        assert_eq!(s.sentences_visible, [true, false, false]);
        // sub ~= 0.42
        let s = RevealState::from_progress(0.47);
        assert_eq!(s.sentences_visible, [true, true, false]);
        // sub ~= 0.79
        let s = RevealState::from_progress(0.59);
        assert_eq!(s.sentences_visible, [true, true, true]);
        assert_eq!(RevealState::from_progress(0.66).sentences_visible, [true; SENTENCE_COUNT]);
    }

    #[test]
    fn visibility_count_never_decreases_forward() {
        let mut last_assets = 0;
        let mut last_sentences = 0;
        for i in 0..=10_000 {
            let p = 0.25 + 0.75 * (i as f64 / 10_000.0);
            let s = RevealState::from_progress(p);
            assert!(s.visible_assets() >= last_assets, "assets regressed at {p}");
            assert!(s.visible_sentences() >= last_sentences, "sentences regressed at {p}");
            last_assets = s.visible_assets();
            last_sentences = s.visible_sentences();
        }
        assert_eq!(last_assets, ASSET_COUNT);
        assert_eq!(last_sentences, SENTENCE_COUNT);
    }

    #[test]
    fn scrolling_back_resets() {
        assert!(RevealState::from_progress(0.9).is_fully_visible());
        assert_eq!(RevealState::from_progress(0.1), RevealState::HIDDEN);
    }
}
