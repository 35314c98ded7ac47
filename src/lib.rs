pub mod chapter;
pub mod config;
pub mod contact;
pub mod error;
pub mod field;
pub mod media;
pub mod narrative;
pub mod pointer;
pub mod repulsion;
pub mod reveal;
pub mod runtime;
pub mod sampler;
pub mod scene;
mod util;
pub mod viewport;

#[cfg(not(target_arch = "wasm32"))]
pub mod server;

#[cfg(feature = "wasm")]
pub mod wasm;

use rand::Rng;

pub use chapter::Chapter;
pub use config::NarrativeConfig;
pub use error::{ContactError, NarrativeError, Result};
pub use field::DecorativeField;
pub use narrative::{reduce, MountedSection, NarrativeSection, NarrativeState};
pub use reveal::RevealState;
pub use scene::{project, SceneFrame};
pub use viewport::{Viewport, ViewportMode};

/// Progress script used by `narrative simulate` when none is given.
pub const DEFAULT_SCRIPT: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];

/// Fold a scripted progress sequence through the reducer, one state per step.
pub fn simulate(progresses: &[f64]) -> Vec<NarrativeState> {
    progresses
        .iter()
        .scan(NarrativeState::INITIAL, |state, &p| {
            *state = reduce(state, Some(p));
            Some(*state)
        })
        .collect()
}

/// Generate the decorative field a viewport of this size would get.
pub fn layout<R: Rng + ?Sized>(viewport: Viewport, config: &NarrativeConfig, rng: &mut R) -> DecorativeField {
    let mode = ViewportMode::classify(viewport.width, config.mobile_breakpoint);
    field::layout_for(mode, viewport, config, rng)
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn scripted_scroll_walks_all_chapters() {
        let states = simulate(&DEFAULT_SCRIPT);
        let chapters: Vec<u8> = states.iter().map(|s| s.scroll.chapter.index()).collect();
        assert_eq!(chapters, vec![0, 0, 1, 1, 2, 2]);
        assert!(states[4].reveal.is_fully_visible());
        assert!(states[5].reveal.is_fully_visible());
    }

    #[test]
    fn reverse_scroll_hides_reveal() {
        let states = simulate(&[0.9, 0.5, 0.1]);
        assert!(states[0].reveal.is_fully_visible());
        assert!(states[1].reveal.visible_assets() > 0);
        assert_eq!(states[2].reveal, RevealState::HIDDEN);
    }

    #[test]
    fn layout_picks_mode_from_width() {
        let cfg = NarrativeConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        let phone = layout(Viewport::new(767.0, 800.0), &cfg, &mut rng);
        assert_eq!(phone.mode, ViewportMode::Constrained);
        let desktop = layout(Viewport::new(768.0, 800.0), &cfg, &mut rng);
        assert_eq!(desktop.mode, ViewportMode::Unrestricted);
        assert!(desktop.eyes.len() <= 15 * 10 + 60);
    }
}
