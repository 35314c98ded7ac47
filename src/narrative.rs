//! The pinned three-chapter section: a pure reducer plus the component that
//! owns every piece of per-section state.
//!
//! Data flows one way: host events feed [`NarrativeSection`], which folds
//! each scroll sample through [`reduce`] and exposes the result through
//! [`NarrativeSection::scene`], a side-effect-free projection.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::chapter::Chapter;
use crate::config::NarrativeConfig;
use crate::field::{layout_for, DecorativeField};
use crate::media::{MediaGate, MediaHost};
use crate::pointer::{PointerPosition, PointerTracker};
use crate::repulsion::RepulsionField;
use crate::reveal::RevealState;
use crate::sampler::{ContainerGeometry, FrameHandle, FrameLoop, FrameScheduler, ProgressSampler};
use crate::scene::{project, SceneFrame};
use crate::viewport::{ModeDetector, Viewport, ViewportMode};

/// Normalized scroll position and the chapter it selects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    pub progress: f64,
    pub chapter: Chapter,
}

/// Everything derived from progress in one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NarrativeState {
    pub scroll: ScrollState,
    pub reveal: RevealState,
}

impl NarrativeState {
    pub const INITIAL: NarrativeState = NarrativeState {
        scroll: ScrollState {
            progress: 0.0,
            chapter: Chapter::Play,
        },
        reveal: RevealState::HIDDEN,
    };

    pub fn from_progress(progress: f64) -> Self {
        let progress = if progress.is_finite() { progress.clamp(0.0, 1.0) } else { 0.0 };
        Self {
            scroll: ScrollState {
                progress,
                chapter: Chapter::from_progress(progress),
            },
            reveal: RevealState::from_progress(progress),
        }
    }
}

impl Default for NarrativeState {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Fold one sampler result into the state. `None` (no fresh sample this
/// frame) keeps the previous state; last write wins otherwise.
pub fn reduce(prev: &NarrativeState, sample: Option<f64>) -> NarrativeState {
    match sample {
        Some(progress) => NarrativeState::from_progress(progress),
        None => *prev,
    }
}

/// What a frame changed, for hosts that skip re-rendering idle frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FrameOutcome {
    pub state_changed: bool,
    pub chapter_changed: bool,
    pub animating: bool,
}

impl FrameOutcome {
    pub fn needs_render(&self) -> bool {
        self.state_changed || self.animating
    }
}

/// The "How We Build Games" section.
pub struct NarrativeSection<R: Rng> {
    config: NarrativeConfig,
    detector: ModeDetector,
    viewport: Viewport,
    pointer: PointerTracker,
    sampler: ProgressSampler,
    state: NarrativeState,
    field: DecorativeField,
    motion: RepulsionField,
    media: MediaGate,
    rng: R,
    mounted: bool,
}

impl<R: Rng> NarrativeSection<R> {
    /// Mount: classify the viewport and build the first field.
    pub fn mount(config: NarrativeConfig, viewport: Viewport, rng: R) -> Self {
        let mut section = Self {
            detector: ModeDetector::new(config.mobile_breakpoint),
            sampler: ProgressSampler::new(config.sample_threshold),
            field: DecorativeField::empty(ViewportMode::Unrestricted),
            motion: RepulsionField::default(),
            pointer: PointerTracker::new(),
            state: NarrativeState::INITIAL,
            media: MediaGate::new(),
            viewport,
            config,
            rng,
            mounted: true,
        };
        section.on_resize(viewport);
        section
    }

    /// Window resized. Regenerates the field only on a mode transition;
    /// returns whether it did. The next frame re-measures progress even if
    /// the container top did not move, since the scrollable span changed.
    pub fn on_resize(&mut self, viewport: Viewport) -> bool {
        if !self.mounted {
            return false;
        }
        self.viewport = viewport;
        self.sampler.reset();
        let Some(mode) = self.detector.observe(viewport.width) else {
            return false;
        };
        log::debug!("viewport mode -> {mode:?} ({}x{})", viewport.width, viewport.height);
        self.field = layout_for(mode, viewport, &self.config, &mut self.rng);
        self.motion = RepulsionField::for_field(&self.field);
        true
    }

    /// Pointer moved. Ignored on constrained viewports.
    pub fn on_pointer_move(&mut self, x: f64, y: f64) -> bool {
        if !self.mounted || !self.pointer.record(x, y, self.mode()) {
            return false;
        }
        self.motion
            .retarget(&self.field, self.pointer.position(), &self.config.repulsion);
        true
    }

    /// One display frame: sample, reduce, gate media, advance springs.
    /// `geometry` is `None` when the container is gone; the tick is skipped.
    pub fn on_frame<H: MediaHost + ?Sized>(
        &mut self,
        geometry: Option<ContainerGeometry>,
        dt: f64,
        host: &mut H,
    ) -> FrameOutcome {
        if !self.mounted {
            return FrameOutcome::default();
        }
        let sample = self.sampler.sample(geometry);
        let next = reduce(&self.state, sample);
        let chapter_changed = next.scroll.chapter != self.state.scroll.chapter;
        let state_changed = next != self.state;
        if chapter_changed {
            log::debug!(
                "chapter {} -> {} at progress {:.3}",
                self.state.scroll.chapter.index(),
                next.scroll.chapter.index(),
                next.scroll.progress
            );
        }
        self.state = next;
        self.media.sync(self.state.scroll.chapter, host);
        let animating = self.motion.step(dt, &self.config.springs);
        FrameOutcome {
            state_changed,
            chapter_changed,
            animating,
        }
    }

    /// Document-level pointer-down / touch-start while the gate waits for one.
    pub fn on_user_gesture<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        self.media.on_user_gesture(host);
    }

    /// Asynchronous autoplay refusal reported by the host.
    pub fn on_playback_rejected<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        self.media.on_playback_rejected(host);
    }

    /// Teardown: release listeners and media. Later events are ignored.
    pub fn unmount<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.media.teardown(host);
    }

    pub fn scene(&self) -> SceneFrame {
        project(&self.state, &self.field, &self.motion, &self.config)
    }

    pub fn state(&self) -> &NarrativeState {
        &self.state
    }

    pub fn field(&self) -> &DecorativeField {
        &self.field
    }

    pub fn motion(&self) -> &RepulsionField {
        &self.motion
    }

    pub fn media(&self) -> &MediaGate {
        &self.media
    }

    pub fn mode(&self) -> ViewportMode {
        self.detector.mode()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> PointerPosition {
        self.pointer.position()
    }

    pub fn config(&self) -> &NarrativeConfig {
        &self.config
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }
}

/// A section bound to a running frame loop. Dropping or unmounting it
/// cancels the pending frame.
pub struct MountedSection<S: FrameScheduler, R: Rng> {
    section: NarrativeSection<R>,
    frames: FrameLoop<S>,
}

impl<S: FrameScheduler, R: Rng> MountedSection<S, R> {
    pub fn mount(config: NarrativeConfig, viewport: Viewport, rng: R, scheduler: S) -> Self {
        Self {
            section: NarrativeSection::mount(config, viewport, rng),
            frames: FrameLoop::start(scheduler),
        }
    }

    /// A scheduled frame fired. Stale handles are ignored.
    pub fn tick<H: MediaHost + ?Sized>(
        &mut self,
        handle: FrameHandle,
        geometry: Option<ContainerGeometry>,
        dt: f64,
        host: &mut H,
    ) -> Option<FrameOutcome> {
        if !self.frames.accept(handle) {
            return None;
        }
        Some(self.section.on_frame(geometry, dt, host))
    }

    pub fn section(&self) -> &NarrativeSection<R> {
        &self.section
    }

    pub fn section_mut(&mut self) -> &mut NarrativeSection<R> {
        &mut self.section
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.frames.pending()
    }

    pub fn frames(&self) -> &FrameLoop<S> {
        &self.frames
    }

    /// Stop the loop and tear the section down.
    pub fn unmount<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        self.frames.stop();
        self.section.unmount(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::testing::{Call, RecordingHost};
    use crate::media::PlaybackState;
    use crate::sampler::ManualScheduler;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const DESKTOP: Viewport = Viewport::new(1440.0, 900.0);
    const PHONE: Viewport = Viewport::new(390.0, 844.0);

    /// 300vh container: scrollable distance is twice the viewport height.
    fn at(progress: f64, vp: Viewport) -> Option<ContainerGeometry> {
        let height = vp.height * 3.0;
        Some(ContainerGeometry::new(-progress * (height - vp.height), height, vp.height))
    }

    fn section(vp: Viewport) -> NarrativeSection<StdRng> {
        NarrativeSection::mount(NarrativeConfig::default(), vp, StdRng::seed_from_u64(17))
    }

    #[test]
    fn reduce_keeps_state_without_sample() {
        let s = NarrativeState::from_progress(0.5);
        assert_eq!(reduce(&s, None), s);
        assert_eq!(reduce(&s, Some(0.1)).scroll.chapter, Chapter::Play);
    }

    #[test]
    fn reduce_clamps_and_sanitizes() {
        assert_eq!(reduce(&NarrativeState::INITIAL, Some(1.7)).scroll.progress, 1.0);
        assert_eq!(reduce(&NarrativeState::INITIAL, Some(-0.2)).scroll.progress, 0.0);
        assert_eq!(reduce(&NarrativeState::INITIAL, Some(f64::NAN)), NarrativeState::INITIAL);
    }

    #[test]
    fn frames_drive_chapters_and_media() {
        let mut s = section(DESKTOP);
        let mut host = RecordingHost::default();

        let out = s.on_frame(at(0.5, DESKTOP), 1.0 / 60.0, &mut host);
        assert!(out.state_changed && out.chapter_changed);
        assert_eq!(s.state().scroll.chapter, Chapter::Shape);

        let out = s.on_frame(at(0.5, DESKTOP), 1.0 / 60.0, &mut host);
        assert!(!out.state_changed, "unchanged geometry is not re-sampled");

        s.on_frame(at(0.9, DESKTOP), 1.0 / 60.0, &mut host);
        assert_eq!(s.media().state(), PlaybackState::Playing);
        assert!(host.muted);

        s.on_frame(at(0.4, DESKTOP), 1.0 / 60.0, &mut host);
        assert_eq!(s.media().state(), PlaybackState::Paused);
        assert_eq!(host.calls.last(), Some(&Call::Pause));
    }

    #[test]
    fn missing_container_skips_tick() {
        let mut s = section(DESKTOP);
        let mut host = RecordingHost::default();
        s.on_frame(at(0.8, DESKTOP), 0.016, &mut host);
        let before = *s.state();
        let out = s.on_frame(None, 0.016, &mut host);
        assert!(!out.state_changed);
        assert_eq!(*s.state(), before);
    }

    #[test]
    fn field_regenerates_only_on_mode_change() {
        let mut s = section(DESKTOP);
        let first = s.field().clone();
        assert!(!s.on_resize(Viewport::new(1300.0, 900.0)));
        assert_eq!(*s.field(), first);

        assert!(s.on_resize(PHONE));
        assert_eq!(s.mode(), ViewportMode::Constrained);
        assert_eq!(s.field().mode, ViewportMode::Constrained);

        assert!(s.on_resize(DESKTOP));
        assert_ne!(*s.field(), first, "fresh randomness on the way back");
    }

    #[test]
    fn pointer_ignored_on_phone() {
        let mut s = section(PHONE);
        assert!(!s.on_pointer_move(100.0, 100.0));
        assert_eq!(s.pointer(), PointerPosition::default());
        let mut d = section(DESKTOP);
        assert!(d.on_pointer_move(100.0, 100.0));
    }

    #[test]
    fn unmount_silences_section() {
        let mut s = section(DESKTOP);
        let mut host = RecordingHost::rejecting(1);
        s.on_frame(at(0.9, DESKTOP), 0.016, &mut host);
        assert!(host.listening);
        s.unmount(&mut host);
        assert!(!host.listening);
        assert!(!s.is_mounted());
        let out = s.on_frame(at(0.1, DESKTOP), 0.016, &mut host);
        assert_eq!(out, FrameOutcome::default());
        assert!(!s.on_pointer_move(5.0, 5.0));
    }

    #[test]
    fn resize_after_unmount_keeps_field() {
        let mut s = section(DESKTOP);
        let mut host = RecordingHost::default();
        let field = s.field().clone();
        s.unmount(&mut host);
        assert!(!s.on_resize(PHONE));
        assert_eq!(s.mode(), ViewportMode::Unrestricted);
        assert_eq!(*s.field(), field);
        assert_eq!(s.viewport(), DESKTOP);
    }

    #[test]
    fn resize_remeasures_unmoved_container() {
        let mut s = section(DESKTOP);
        let mut host = RecordingHost::default();
        // top -800 on a 300vh, 800px-tall viewport: 800 / 1600
        let geometry = Some(ContainerGeometry::new(-800.0, 2400.0, 800.0));
        s.on_frame(geometry, 0.016, &mut host);
        assert_eq!(s.state().scroll.progress, 0.5);

        // same top, taller viewport: 800 / 1200
        s.on_resize(Viewport::new(1440.0, 1200.0));
        let taller = Some(ContainerGeometry::new(-800.0, 2400.0, 1200.0));
        let out = s.on_frame(taller, 0.016, &mut host);
        assert!(out.state_changed);
        assert!((s.state().scroll.progress - 800.0 / 1200.0).abs() < 1e-12);
    }

    #[test]
    fn mounted_section_owns_the_loop() {
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::default();
        {
            let mut m = MountedSection::mount(
                NarrativeConfig::default(),
                DESKTOP,
                StdRng::seed_from_u64(1),
                &mut sched,
            );
            let h = m.pending_frame().expect("first frame requested");
            assert!(m.tick(h, at(0.2, DESKTOP), 0.016, &mut host).is_some());
            assert!(m.tick(h, at(0.3, DESKTOP), 0.016, &mut host).is_none(), "stale handle");
            m.unmount(&mut host);
            assert!(m.pending_frame().is_none());
        }
        assert!(!sched.has_pending());
    }
}
