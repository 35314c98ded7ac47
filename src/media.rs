//! Background video gating for the third chapter.
//!
//! Two states driven only by whether the active chapter is [`Chapter::Feel`].
//! Entering `Playing` forces mute (browsers only allow unattended autoplay
//! when muted) and attempts playback. A rejected attempt arms one-shot
//! pointer-down / touch-start listeners; the first gesture retries once and
//! disarms them.

use serde::Serialize;

use crate::chapter::Chapter;

/// The browser refused to start playback (autoplay policy).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackRejected;

/// The video element and document-level gesture listeners, as seen by the gate.
pub trait MediaHost {
    fn set_muted(&mut self, muted: bool);
    /// Start playback. Hosts whose playback promise settles later return
    /// `Ok(())` and report a rejection through [`MediaGate::on_playback_rejected`].
    fn play(&mut self) -> Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn listen_for_gesture(&mut self);
    fn stop_listening_for_gesture(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackState {
    Paused,
    Playing,
}

/// Two-state playback gate.
#[derive(Debug, Clone)]
pub struct MediaGate {
    state: PlaybackState,
    awaiting_gesture: bool,
    /// The gesture retry for the current `Playing` stretch has been spent.
    retried: bool,
}

impl Default for MediaGate {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaGate {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Paused,
            awaiting_gesture: false,
            retried: false,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_awaiting_gesture(&self) -> bool {
        self.awaiting_gesture
    }

    /// Re-evaluate against the active chapter. Transitions only; calling with
    /// an unchanged chapter does nothing.
    pub fn sync<H: MediaHost + ?Sized>(&mut self, chapter: Chapter, host: &mut H) {
        let want = if chapter == Chapter::Feel {
            PlaybackState::Playing
        } else {
            PlaybackState::Paused
        };
        if want == self.state {
            return;
        }
        self.state = want;
        log::debug!("media gate -> {want:?}");
        match want {
            PlaybackState::Playing => {
                self.retried = false;
                host.set_muted(true);
                if host.play().is_err() {
                    self.on_playback_rejected(host);
                }
            }
            PlaybackState::Paused => {
                self.disarm(host);
                host.pause();
            }
        }
    }

    /// Autoplay was refused; retry on the next user gesture. Once that retry
    /// has been made, further refusals are ignored until the gate leaves
    /// and re-enters `Playing`.
    pub fn on_playback_rejected<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        if self.state != PlaybackState::Playing || self.awaiting_gesture || self.retried {
            return;
        }
        log::warn!("autoplay rejected; deferring playback to next user gesture");
        self.awaiting_gesture = true;
        host.listen_for_gesture();
    }

    /// A pointer-down or touch-start arrived. Retries playback exactly once.
    pub fn on_user_gesture<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        if !self.awaiting_gesture {
            return;
        }
        self.disarm(host);
        if self.state == PlaybackState::Playing {
            self.retried = true;
            // a second refusal is swallowed: no further retries
            let _ = host.play();
        }
    }

    /// Component teardown: drop listeners and stop playback.
    pub fn teardown<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        self.disarm(host);
        if self.state == PlaybackState::Playing {
            host.pause();
        }
        self.state = PlaybackState::Paused;
    }

    fn disarm<H: MediaHost + ?Sized>(&mut self, host: &mut H) {
        if self.awaiting_gesture {
            self.awaiting_gesture = false;
            host.stop_listening_for_gesture();
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Muted(bool),
        Play,
        Pause,
        Listen,
        StopListening,
    }

    /// Records every host call; refuses the first `reject` play attempts.
    #[derive(Debug, Default)]
    pub struct RecordingHost {
        pub calls: Vec<Call>,
        pub reject: usize,
        pub muted: bool,
        pub listening: bool,
    }

    impl RecordingHost {
        pub fn rejecting(n: usize) -> Self {
            Self { reject: n, ..Self::default() }
        }

        pub fn count(&self, call: &Call) -> usize {
            self.calls.iter().filter(|c| *c == call).count()
        }
    }

    impl MediaHost for RecordingHost {
        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.calls.push(Call::Muted(muted));
        }

        fn play(&mut self) -> Result<(), PlaybackRejected> {
            self.calls.push(Call::Play);
            if self.reject > 0 {
                self.reject -= 1;
                return Err(PlaybackRejected);
            }
            Ok(())
        }

        fn pause(&mut self) {
            self.calls.push(Call::Pause);
        }

        fn listen_for_gesture(&mut self) {
            self.listening = true;
            self.calls.push(Call::Listen);
        }

        fn stop_listening_for_gesture(&mut self) {
            self.listening = false;
            self.calls.push(Call::StopListening);
        }
    }
}
