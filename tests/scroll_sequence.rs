use rand::rngs::StdRng;
use rand::SeedableRng;

use scroll_narrative::field::ExclusionZone;
use scroll_narrative::media::{MediaHost, PlaybackRejected, PlaybackState};
use scroll_narrative::sampler::{ContainerGeometry, FrameScheduler, ManualScheduler};
use scroll_narrative::{Chapter, MountedSection, NarrativeConfig, Viewport, ViewportMode};

#[derive(Default)]
struct CountingHost {
    plays: usize,
    pauses: usize,
    muted: bool,
    listening: bool,
    refuse_first: bool,
}

impl MediaHost for CountingHost {
    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        self.plays += 1;
        if std::mem::take(&mut self.refuse_first) {
            return Err(PlaybackRejected);
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.pauses += 1;
    }

    fn listen_for_gesture(&mut self) {
        self.listening = true;
    }

    fn stop_listening_for_gesture(&mut self) {
        self.listening = false;
    }
}

const DESKTOP: Viewport = Viewport::new(1280.0, 800.0);

fn geometry(progress: f64) -> Option<ContainerGeometry> {
    let height = DESKTOP.height * 3.0;
    Some(ContainerGeometry::new(-progress * (height - DESKTOP.height), height, DESKTOP.height))
}

/// Feed one progress value through a fired frame.
fn scroll_to<S: FrameScheduler>(
    section: &mut MountedSection<S, StdRng>,
    progress: f64,
    host: &mut CountingHost,
) -> Chapter {
    let handle = section.pending_frame().expect("loop is running");
    section
        .tick(handle, geometry(progress), 1.0 / 60.0, host)
        .expect("current handle accepted");
    section.section().state().scroll.chapter
}

#[test]
fn scripted_scroll_through_mounted_section() {
    let mut sched = ManualScheduler::new();
    let mut host = CountingHost::default();
    let mut section = MountedSection::mount(
        NarrativeConfig::default(),
        DESKTOP,
        StdRng::seed_from_u64(99),
        &mut sched,
    );

    let chapters: Vec<u8> = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0]
        .iter()
        .map(|&p| scroll_to(&mut section, p, &mut host).index())
        .collect();
    assert_eq!(chapters, vec![0, 0, 1, 1, 2, 2]);
    assert!(section.section().state().reveal.is_fully_visible());

    assert_eq!(section.section().media().state(), PlaybackState::Playing);
    assert_eq!(host.plays, 1, "one play on entering the last chapter");
    assert!(host.muted);

    scroll_to(&mut section, 0.1, &mut host);
    assert_eq!(host.pauses, 1);
    assert!(!section.section().state().reveal.is_fully_visible());

    section.unmount(&mut host);
    drop(section);
    assert!(!sched.has_pending());
}

#[test]
fn refused_autoplay_waits_for_gesture() {
    let mut sched = ManualScheduler::new();
    let mut host = CountingHost {
        refuse_first: true,
        ..CountingHost::default()
    };
    let mut section = MountedSection::mount(
        NarrativeConfig::default(),
        DESKTOP,
        StdRng::seed_from_u64(1),
        &mut sched,
    );
    assert_eq!(scroll_to(&mut section, 0.9, &mut host), Chapter::Feel);
    assert!(host.listening);

    section.section_mut().on_user_gesture(&mut host);
    assert_eq!(host.plays, 2);
    assert!(!host.listening);
}

#[test]
fn generated_fields_keep_text_zone_clear() {
    let config = NarrativeConfig::default();
    for seed in 0..50 {
        let mut rng = StdRng::seed_from_u64(seed);
        let field = scroll_narrative::layout(DESKTOP, &config, &mut rng);
        assert_eq!(field.mode, ViewportMode::Unrestricted);
        let eye_zone = ExclusionZone::centered(DESKTOP, config.eyes.exclusion);
        let doodle_zone = ExclusionZone::centered(DESKTOP, config.doodles.exclusion);
        for e in &field.eyes {
            let (x, y) = e.position.center().expect("absolute");
            assert!(!eye_zone.contains(x, y), "seed {seed}: eye at ({x},{y})");
        }
        for d in &field.doodles {
            let (x, y) = d.position.center().expect("absolute");
            assert!(!doodle_zone.contains(x, y), "seed {seed}: doodle at ({x},{y})");
        }
    }
}

#[test]
fn shrinking_below_breakpoint_swaps_to_catalog() {
    let mut sched = ManualScheduler::new();
    let mut host = CountingHost::default();
    let mut section = MountedSection::mount(
        NarrativeConfig::default(),
        DESKTOP,
        StdRng::seed_from_u64(4),
        &mut sched,
    );
    assert!(section.section_mut().on_pointer_move(640.0, 400.0));

    assert!(section.section_mut().on_resize(Viewport::new(390.0, 844.0)));
    assert_eq!(section.section().mode(), ViewportMode::Constrained);
    assert!(!section.section_mut().on_pointer_move(100.0, 100.0));
    assert!(!section.section_mut().on_resize(Viewport::new(400.0, 844.0)));

    let scene = section.section().scene();
    assert_eq!(scene.eyes.len(), 15);
    assert_eq!(scene.doodles.len(), 10);
    section.unmount(&mut host);
}
