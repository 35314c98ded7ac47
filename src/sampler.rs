//! Scroll progress sampling and the per-frame polling loop.
//!
//! Progress is polled once per display frame rather than pushed by scroll
//! events, so fast flings cannot skip an update. The loop is an explicit,
//! cancellable task: [`FrameLoop`] requests a frame on start, re-requests
//! after every accepted tick, and cancels whatever is pending on stop/drop.

use serde::{Deserialize, Serialize};

/// Geometry of the tall host container relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerGeometry {
    /// Container top edge relative to the viewport top (negative once scrolled past).
    pub top: f64,
    /// Full container height.
    pub height: f64,
    /// Viewport height.
    pub viewport_height: f64,
}

impl ContainerGeometry {
    pub const fn new(top: f64, height: f64, viewport_height: f64) -> Self {
        Self { top, height, viewport_height }
    }
}

/// Map container geometry to progress in `[0, 1]`.
///
/// A container no taller than the viewport (or non-finite geometry) has
/// nothing to scroll and yields 0.
pub fn normalize_progress(geometry: ContainerGeometry) -> f64 {
    let scrolled = (-geometry.top).max(0.0);
    let scrollable = geometry.height - geometry.viewport_height;
    if !(scrollable > 0.0) || !scrolled.is_finite() {
        return 0.0;
    }
    (scrolled / scrollable).clamp(0.0, 1.0)
}

/// Change-detecting sampler over container geometry.
#[derive(Debug, Clone)]
pub struct ProgressSampler {
    threshold: f64,
    /// `None` after a reset: the next frame is accepted unconditionally.
    last_top: Option<f64>,
}

impl ProgressSampler {
    pub fn new(threshold: f64) -> Self {
        Self { threshold, last_top: Some(0.0) }
    }

    /// Sample one frame. Returns fresh progress only when the container top
    /// moved by more than the threshold since the last accepted sample.
    /// A missing container skips the tick.
    pub fn sample(&mut self, geometry: Option<ContainerGeometry>) -> Option<f64> {
        let geometry = geometry?;
        if let Some(last) = self.last_top {
            if !((geometry.top - last).abs() > self.threshold) {
                return None;
            }
        }
        self.last_top = Some(geometry.top);
        Some(normalize_progress(geometry))
    }

    /// Forget the last sample so the next frame is always measured.
    pub fn reset(&mut self) {
        self.last_top = None;
    }
}

/// Opaque id for a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameHandle(pub u32);

/// Source of display-refresh callbacks (e.g. `requestAnimationFrame`).
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Self-rescheduling frame task bound to a component's lifetime.
#[derive(Debug)]
pub struct FrameLoop<S: FrameScheduler> {
    scheduler: S,
    pending: Option<FrameHandle>,
}

impl<S: FrameScheduler> FrameLoop<S> {
    /// Acquire: schedule the first frame.
    pub fn start(mut scheduler: S) -> Self {
        let pending = Some(scheduler.request_frame());
        Self { scheduler, pending }
    }

    /// Called by the host when `handle` fires. Returns `true` if the tick
    /// belongs to this loop, in which case the next frame is already
    /// requested. Stale ticks (after `stop`) return `false`.
    pub fn accept(&mut self, handle: FrameHandle) -> bool {
        if self.pending != Some(handle) {
            return false;
        }
        self.pending = Some(self.scheduler.request_frame());
        true
    }

    /// Release: cancel the pending frame. Idempotent.
    pub fn stop(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }
}

impl<S: FrameScheduler> Drop for FrameLoop<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Deterministic scheduler that hands out sequential ids and records
/// cancellations. Drives scripted runs and tests.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next: u32,
    pub requested: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the most recent request is still live (not cancelled).
    /// A frame loop holds at most one request at a time.
    pub fn has_pending(&self) -> bool {
        self.requested
            .last()
            .map_or(false, |h| !self.cancelled.contains(h))
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        let handle = FrameHandle(self.next);
        self.requested.push(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancelled.push(handle);
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for &mut S {
    fn request_frame(&mut self) -> FrameHandle {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo(top: f64) -> ContainerGeometry {
        // 300vh container on a 1000px viewport: 2000px scrollable
        ContainerGeometry::new(top, 3000.0, 1000.0)
    }

    #[test]
    fn progress_formula() {
        assert_eq!(normalize_progress(geo(100.0)), 0.0);
        assert_eq!(normalize_progress(geo(0.0)), 0.0);
        assert_eq!(normalize_progress(geo(-500.0)), 0.25);
        assert_eq!(normalize_progress(geo(-2000.0)), 1.0);
        assert_eq!(normalize_progress(geo(-9000.0)), 1.0);
    }

    #[test]
    fn degenerate_geometry_is_zero() {
        assert_eq!(normalize_progress(ContainerGeometry::new(-50.0, 0.0, 800.0)), 0.0);
        assert_eq!(normalize_progress(ContainerGeometry::new(-50.0, 800.0, 800.0)), 0.0);
        assert_eq!(normalize_progress(ContainerGeometry::new(-50.0, f64::NAN, 800.0)), 0.0);
        assert_eq!(normalize_progress(ContainerGeometry::new(f64::NEG_INFINITY, 3000.0, 800.0)), 0.0);
    }

    #[test]
    fn sampler_ignores_sub_pixel_motion() {
        let mut s = ProgressSampler::new(0.5);
        assert_eq!(s.sample(Some(geo(-0.4))), None);
        assert_eq!(s.sample(Some(geo(-0.5))), None);
        assert_eq!(s.sample(Some(geo(-500.0))), Some(0.25));
        assert_eq!(s.sample(Some(geo(-500.3))), None);
        assert!(s.sample(Some(geo(-501.0))).is_some());
    }

    #[test]
    fn sampler_skips_missing_container() {
        let mut s = ProgressSampler::new(0.5);
        assert_eq!(s.sample(None), None);
        assert_eq!(s.sample(Some(geo(-1000.0))), Some(0.5));
    }

    #[test]
    fn reset_forces_next_sample() {
        let mut s = ProgressSampler::new(0.5);
        assert!(s.sample(Some(geo(-1000.0))).is_some());
        s.reset();
        assert_eq!(s.sample(Some(geo(-1000.0))), Some(0.5));
        assert_eq!(s.sample(Some(geo(-1000.2))), None);
    }

    #[test]
    fn sampler_keeps_tracking_after_reset() {
        let mut s = ProgressSampler::new(0.5);
        s.reset();
        let after: Vec<_> = [-500.0, -1000.0, -2000.0]
            .into_iter()
            .map(|top| s.sample(Some(geo(top))))
            .collect();
        assert_eq!(after, vec![Some(0.25), Some(0.5), Some(1.0)]);
    }

    #[test]
    fn loop_reschedules_and_cancels() {
        let mut sched = ManualScheduler::new();
        {
            let mut lp = FrameLoop::start(&mut sched);
            let first = lp.pending().expect("frame requested on start");
            assert!(lp.accept(first));
            let second = lp.pending().expect("rescheduled");
            assert_ne!(first, second);
            assert!(!lp.accept(first), "stale handle must be rejected");
            lp.stop();
            assert!(!lp.is_running());
            assert!(!lp.accept(second));
        }
        assert_eq!(sched.requested.len(), 2);
        assert_eq!(sched.cancelled, vec![FrameHandle(2)]);
        assert!(!sched.has_pending());
    }

    #[test]
    fn drop_cancels_pending_frame() {
        let mut sched = ManualScheduler::new();
        {
            let _lp = FrameLoop::start(&mut sched);
        }
        assert!(!sched.has_pending());
    }
}
