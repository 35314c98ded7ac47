//! WASM bindings for the narrative section.
//!
//! The browser side (see [`crate::runtime`]) hands each custom element's
//! host object to [`NarrativeHandle`]; frames, video and gesture listeners
//! are driven through it. Build with: `wasm-pack build --target web --features wasm`

use rand::rngs::StdRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;

use crate::config::NarrativeConfig;
use crate::media::{MediaHost, PlaybackRejected};
use crate::narrative::MountedSection;
use crate::sampler::{ContainerGeometry, FrameHandle, FrameScheduler};
use crate::viewport::Viewport;

#[wasm_bindgen]
extern "C" {
    /// Per-element host object created by the runtime module.
    #[derive(Clone)]
    pub type NarrativeHost;

    #[wasm_bindgen(method, js_name = requestFrame)]
    fn request_frame(this: &NarrativeHost) -> u32;
    #[wasm_bindgen(method, js_name = cancelFrame)]
    fn cancel_frame(this: &NarrativeHost, handle: u32);
    #[wasm_bindgen(method, js_name = setMuted)]
    fn set_muted(this: &NarrativeHost, muted: bool);
    /// `false` when playback was refused synchronously. A promise rejection
    /// arrives later through [`NarrativeHandle::playback_rejected`].
    #[wasm_bindgen(method)]
    fn play(this: &NarrativeHost) -> bool;
    #[wasm_bindgen(method)]
    fn pause(this: &NarrativeHost);
    #[wasm_bindgen(method, js_name = listenForGesture)]
    fn listen_for_gesture(this: &NarrativeHost);
    #[wasm_bindgen(method, js_name = stopListeningForGesture)]
    fn stop_listening_for_gesture(this: &NarrativeHost);
}

struct HostScheduler(NarrativeHost);

impl FrameScheduler for HostScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        FrameHandle(self.0.request_frame())
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.0.cancel_frame(handle.0);
    }
}

struct HostMedia<'a>(&'a NarrativeHost);

impl MediaHost for HostMedia<'_> {
    fn set_muted(&mut self, muted: bool) {
        self.0.set_muted(muted);
    }

    fn play(&mut self) -> Result<(), PlaybackRejected> {
        if self.0.play() {
            Ok(())
        } else {
            Err(PlaybackRejected)
        }
    }

    fn pause(&mut self) {
        self.0.pause();
    }

    fn listen_for_gesture(&mut self) {
        self.0.listen_for_gesture();
    }

    fn stop_listening_for_gesture(&mut self) {
        self.0.stop_listening_for_gesture();
    }
}

/// One mounted section, owned by a custom element.
#[wasm_bindgen]
pub struct NarrativeHandle {
    inner: MountedSection<HostScheduler, StdRng>,
    host: NarrativeHost,
}

#[wasm_bindgen]
impl NarrativeHandle {
    /// Mount and start the frame loop. `config` may be `undefined` for the
    /// shipped defaults; `seed` pins the decorative layout.
    #[wasm_bindgen(constructor)]
    pub fn new(
        host: NarrativeHost,
        config: JsValue,
        width: f64,
        height: f64,
        seed: Option<u32>,
    ) -> Result<NarrativeHandle, JsError> {
        let config: NarrativeConfig = if config.is_undefined() || config.is_null() {
            NarrativeConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?
        };
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(u64::from(seed)),
            None => StdRng::from_entropy(),
        };
        let inner = MountedSection::mount(
            config,
            Viewport::new(width, height),
            rng,
            HostScheduler(host.clone()),
        );
        Ok(NarrativeHandle { inner, host })
    }

    /// A scheduled frame fired. `geometry` is `{top, height, viewport_height}`
    /// or `null` when the container is gone. Returns the new scene when
    /// something needs painting, `undefined` otherwise.
    pub fn frame(&mut self, handle: u32, geometry: JsValue, dt: f64) -> Result<JsValue, JsError> {
        let geometry: Option<ContainerGeometry> = if geometry.is_null() || geometry.is_undefined() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(geometry).map_err(|e| JsError::new(&e.to_string()))?)
        };
        let mut media = HostMedia(&self.host);
        match self.inner.tick(FrameHandle(handle), geometry, dt, &mut media) {
            Some(outcome) if outcome.needs_render() => self.scene(),
            _ => Ok(JsValue::UNDEFINED),
        }
    }

    /// Returns `true` when the decorative field was regenerated.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.inner.section_mut().on_resize(Viewport::new(width, height))
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.inner.section_mut().on_pointer_move(x, y)
    }

    #[wasm_bindgen(js_name = userGesture)]
    pub fn user_gesture(&mut self) {
        let mut media = HostMedia(&self.host);
        self.inner.section_mut().on_user_gesture(&mut media);
    }

    #[wasm_bindgen(js_name = playbackRejected)]
    pub fn playback_rejected(&mut self) {
        let mut media = HostMedia(&self.host);
        self.inner.section_mut().on_playback_rejected(&mut media);
    }

    /// Current projection, regardless of whether anything changed.
    pub fn scene(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(&self.inner.section().scene())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Cancel the frame loop and release media and listeners.
    pub fn unmount(&mut self) {
        let mut media = HostMedia(&self.host);
        self.inner.unmount(&mut media);
    }
}
