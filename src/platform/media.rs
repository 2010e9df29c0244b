//! Media source surface the controls read from and write to

use std::sync::Mutex;

/// Notifications emitted by a media source after its state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaEvent {
    Play,
    Pause,
    LoadedMetadata,
    TimeUpdate,
    VolumeChange,
    Progress,
}

/// A playable object owned by the host platform.
///
/// Commands are requests: their effect is observed through the matching
/// `MediaEvent` the platform delivers afterwards.
pub trait MediaSource: Send + Sync {
    /// Whether the platform can play media at all
    fn supports_playback(&self) -> bool {
        true
    }

    fn paused(&self) -> bool;
    fn ended(&self) -> bool;
    /// Total duration in seconds; NaN until metadata has loaded
    fn duration(&self) -> f64;
    fn current_time(&self) -> f64;
    fn volume(&self) -> f64;
    fn muted(&self) -> bool;
    fn playback_rate(&self) -> f64;
    /// Buffered time ranges as `(start, end)` pairs in seconds
    fn buffered(&self) -> Vec<(f64, f64)>;

    fn play(&self);
    fn pause(&self);
    fn set_current_time(&self, seconds: f64);
    fn set_volume(&self, volume: f64);
    fn set_muted(&self, muted: bool);
    fn set_playback_rate(&self, rate: f64);

    /// Whether native platform controls are drawn over the media
    fn set_native_controls(&self, _enabled: bool) {}
}

#[derive(Debug, Clone)]
struct SimulatedState {
    paused: bool,
    ended: bool,
    duration: f64,
    current_time: f64,
    volume: f64,
    muted: bool,
    playback_rate: f64,
    buffered: Vec<(f64, f64)>,
    native_controls: bool,
}

/// In-memory media source that applies commands immediately.
///
/// Used by tests and the CLI. Every command that would make a real platform
/// fire a notification queues the matching `MediaEvent`; drain them with
/// `take_events` and feed them back to the synchronizer.
pub struct SimulatedMedia {
    supported: bool,
    state: Mutex<SimulatedState>,
    events: Mutex<Vec<MediaEvent>>,
}

impl SimulatedMedia {
    pub fn new() -> Self {
        SimulatedMedia {
            supported: true,
            state: Mutex::new(SimulatedState {
                paused: true,
                ended: false,
                duration: f64::NAN,
                current_time: 0.0,
                volume: 1.0,
                muted: false,
                playback_rate: 1.0,
                buffered: Vec::new(),
                native_controls: true,
            }),
            events: Mutex::new(Vec::new()),
        }
    }

    /// A source on a platform without media playback support
    pub fn unsupported() -> Self {
        SimulatedMedia {
            supported: false,
            ..Self::new()
        }
    }

    /// Simulate metadata arriving for a source of the given length
    pub fn load(&self, duration: f64) {
        self.state.lock().unwrap().duration = duration;
        self.push(MediaEvent::LoadedMetadata);
    }

    /// Simulate playback advancing to `seconds`
    pub fn advance_to(&self, seconds: f64) {
        let stopped = {
            let mut s = self.state.lock().unwrap();
            s.current_time = seconds;
            if s.duration.is_finite() && seconds >= s.duration {
                let was_playing = !s.paused;
                s.current_time = s.duration;
                s.ended = true;
                s.paused = true;
                was_playing
            } else {
                false
            }
        };
        self.push(MediaEvent::TimeUpdate);
        if stopped {
            self.push(MediaEvent::Pause);
        }
    }

    /// Simulate the network filling the buffer up to `end` seconds
    pub fn buffer_until(&self, end: f64) {
        self.state.lock().unwrap().buffered = vec![(0.0, end)];
        self.push(MediaEvent::Progress);
    }

    pub fn native_controls(&self) -> bool {
        self.state.lock().unwrap().native_controls
    }

    /// Drain queued notifications in the order they were raised
    pub fn take_events(&self) -> Vec<MediaEvent> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    fn push(&self, ev: MediaEvent) {
        self.events.lock().unwrap().push(ev);
    }
}

impl Default for SimulatedMedia {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaSource for SimulatedMedia {
    fn supports_playback(&self) -> bool {
        self.supported
    }

    fn paused(&self) -> bool {
        self.state.lock().unwrap().paused
    }

    fn ended(&self) -> bool {
        self.state.lock().unwrap().ended
    }

    fn duration(&self) -> f64 {
        self.state.lock().unwrap().duration
    }

    fn current_time(&self) -> f64 {
        self.state.lock().unwrap().current_time
    }

    fn volume(&self) -> f64 {
        self.state.lock().unwrap().volume
    }

    fn muted(&self) -> bool {
        self.state.lock().unwrap().muted
    }

    fn playback_rate(&self) -> f64 {
        self.state.lock().unwrap().playback_rate
    }

    fn buffered(&self) -> Vec<(f64, f64)> {
        self.state.lock().unwrap().buffered.clone()
    }

    fn play(&self) {
        {
            let mut s = self.state.lock().unwrap();
            if !s.paused {
                return;
            }
            if s.ended {
                s.current_time = 0.0;
                s.ended = false;
            }
            s.paused = false;
        }
        self.push(MediaEvent::Play);
    }

    fn pause(&self) {
        {
            let mut s = self.state.lock().unwrap();
            if s.paused {
                return;
            }
            s.paused = true;
        }
        self.push(MediaEvent::Pause);
    }

    fn set_current_time(&self, seconds: f64) {
        {
            let mut s = self.state.lock().unwrap();
            s.current_time = seconds;
            s.ended = s.duration.is_finite() && seconds >= s.duration;
        }
        self.push(MediaEvent::TimeUpdate);
    }

    fn set_volume(&self, volume: f64) {
        self.state.lock().unwrap().volume = volume;
        self.push(MediaEvent::VolumeChange);
    }

    fn set_muted(&self, muted: bool) {
        self.state.lock().unwrap().muted = muted;
        self.push(MediaEvent::VolumeChange);
    }

    fn set_playback_rate(&self, rate: f64) {
        self.state.lock().unwrap().playback_rate = rate;
    }

    fn set_native_controls(&self, enabled: bool) {
        self.state.lock().unwrap().native_controls = enabled;
    }
}
