//! Visual state of the control widgets.
//!
//! `Controls` is built once at initialization and handed to the synchronizer,
//! which is the only writer. Hosts render from it (or from a serialized
//! snapshot of it); nothing here talks to the platform.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde::{Serialize, Serializer};

use crate::format::ClockTime;
use crate::ControlsConfig;

pub const PLAY_TITLE: &str = "Play (K)";
pub const PAUSE_TITLE: &str = "Pause (K)";
pub const MUTE_TITLE: &str = "Mute (m)";
pub const UNMUTE_TITLE: &str = "Unmute (m)";
pub const FULLSCREEN_TITLE: &str = "Full screen (f)";
pub const EXIT_FULLSCREEN_TITLE: &str = "Exit full screen (f)";

/// Which icon of the play/pause pair is visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackIcon {
    Play,
    Pause,
}

impl PlaybackIcon {
    /// The icon offers the action the next click performs
    pub fn for_paused(paused: bool) -> Self {
        if paused {
            PlaybackIcon::Play
        } else {
            PlaybackIcon::Pause
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayButton {
    pub icon: PlaybackIcon,
    pub title: String,
}

impl PlayButton {
    pub fn sync(&mut self, paused: bool) {
        self.icon = PlaybackIcon::for_paused(paused);
        self.title = if paused { PLAY_TITLE } else { PAUSE_TITLE }.to_string();
    }
}

/// A `<time>`-like display: visible text plus a machine-readable attribute
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TimeDisplay {
    pub text: String,
    pub datetime: String,
}

impl TimeDisplay {
    pub fn set(&mut self, t: ClockTime) {
        self.text = t.to_string();
        self.datetime = t.datetime();
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SeekBar {
    pub max: f64,
    pub value: f64,
    /// Target under the pointer, set while hovering
    pub preview: Option<f64>,
    pub tooltip: String,
    /// Tooltip offset from the player's left edge, in pixels
    pub tooltip_left: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgressBar {
    pub max: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumeIcon {
    Muted,
    Low,
    High,
}

impl VolumeIcon {
    /// Muted or silent selects the muted icon; up to half volume is low
    pub fn for_level(muted: bool, volume: f64) -> Self {
        if muted || volume <= 0.0 {
            VolumeIcon::Muted
        } else if volume <= 0.5 {
            VolumeIcon::Low
        } else {
            VolumeIcon::High
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolumeControl {
    /// Slider position; zeroed for display while muted
    pub slider: f64,
    /// Slider position captured when mute was engaged
    pub remembered: Option<f64>,
    pub icon: VolumeIcon,
    pub title: String,
}

impl VolumeControl {
    /// Level-set every field from the source. A muted source keeps any
    /// remembered position and otherwise remembers its own volume.
    pub fn sync(&mut self, muted: bool, volume: f64) {
        if muted {
            self.remembered.get_or_insert(volume);
            self.slider = 0.0;
        } else {
            self.remembered = None;
            self.slider = volume;
        }
        self.icon = VolumeIcon::for_level(muted, volume);
        self.title = if self.icon == VolumeIcon::Muted { UNMUTE_TITLE } else { MUTE_TITLE }.to_string();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FullscreenIcon {
    Enter,
    Exit,
}

/// Size limits applied to the media element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeConstraint {
    Bounded(u32),
    FillViewport,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FullscreenButton {
    pub hidden: bool,
    pub icon: FullscreenIcon,
    pub title: String,
    pub size: SizeConstraint,
}

impl FullscreenButton {
    pub fn sync(&mut self, fullscreen: bool, bounded_px: u32) {
        if fullscreen {
            self.icon = FullscreenIcon::Exit;
            self.title = EXIT_FULLSCREEN_TITLE.to_string();
            self.size = SizeConstraint::FillViewport;
        } else {
            self.icon = FullscreenIcon::Enter;
            self.title = FULLSCREEN_TITLE.to_string();
            self.size = SizeConstraint::Bounded(bounded_px);
        }
    }
}

/// The disabled flag of the picture-in-picture button.
///
/// Shared with the in-flight request so it can be cleared when the request
/// settles, whoever happens to own the synchronizer at that point.
#[derive(Debug, Default)]
pub struct PipGate(Arc<AtomicBool>);

impl PipGate {
    pub fn is_disabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Disable the button, or return `None` if a request is already pending
    pub fn acquire(&self) -> Option<PendingPip> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| PendingPip(self.0.clone()))
    }
}

/// Re-enables the picture-in-picture button when dropped
#[derive(Debug)]
pub struct PendingPip(Arc<AtomicBool>);

impl Drop for PendingPip {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl Serialize for PipGate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.is_disabled())
    }
}

#[derive(Debug, Default, Serialize)]
pub struct PipButton {
    pub hidden: bool,
    #[serde(rename = "disabled")]
    pub gate: PipGate,
}

impl PipButton {
    pub fn is_disabled(&self) -> bool {
        self.gate.is_disabled()
    }
}

impl Clone for PipButton {
    /// The copy records the disabled flag as it is now and is detached from
    /// any pending request.
    fn clone(&self) -> Self {
        PipButton {
            hidden: self.hidden,
            gate: PipGate(Arc::new(AtomicBool::new(self.is_disabled()))),
        }
    }
}

impl PartialEq for PipButton {
    fn eq(&self, other: &Self) -> bool {
        self.hidden == other.hidden && self.is_disabled() == other.is_disabled()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedControl {
    pub value: f64,
    pub label: String,
}

impl SpeedControl {
    pub fn set(&mut self, rate: f64) {
        self.value = rate;
        self.label = format!("Playback speed: {}x", rate);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Shown,
    Hidden,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlBar {
    /// Custom controls replace the native ones only when playback works
    pub revealed: bool,
    pub visibility: Visibility,
    #[serde(skip)]
    pub hide_deadline: Option<Instant>,
}

/// Short play/pause animation over the video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackFlash {
    pub pulses: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct BufferIndicator {
    pub percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SettingsPanel {
    pub open: bool,
}

/// Every widget of the overlay, one field per control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Controls {
    pub play: PlayButton,
    pub elapsed: TimeDisplay,
    pub duration: TimeDisplay,
    pub seek: SeekBar,
    pub progress: ProgressBar,
    pub volume: VolumeControl,
    pub fullscreen: FullscreenButton,
    pub pip: PipButton,
    pub speed: SpeedControl,
    pub settings: SettingsPanel,
    pub bar: ControlBar,
    pub flash: PlaybackFlash,
    pub buffer: BufferIndicator,
}

impl Controls {
    /// Widgets in their pre-metadata state: paused, full volume, windowed
    pub fn new(config: &ControlsConfig) -> Self {
        let mut fullscreen = FullscreenButton {
            hidden: false,
            icon: FullscreenIcon::Enter,
            title: String::new(),
            size: SizeConstraint::Bounded(config.bounded_size_px),
        };
        fullscreen.sync(false, config.bounded_size_px);

        let mut speed = SpeedControl {
            value: 1.0,
            label: String::new(),
        };
        speed.set(1.0);

        let zero = ClockTime { minutes: 0, seconds: 0 };
        let mut elapsed = TimeDisplay::default();
        elapsed.set(zero);
        let mut duration = TimeDisplay::default();
        duration.set(zero);

        Controls {
            play: PlayButton {
                icon: PlaybackIcon::Play,
                title: PLAY_TITLE.to_string(),
            },
            elapsed,
            duration,
            seek: SeekBar::default(),
            progress: ProgressBar::default(),
            volume: VolumeControl {
                slider: 1.0,
                remembered: None,
                icon: VolumeIcon::High,
                title: MUTE_TITLE.to_string(),
            },
            fullscreen,
            pip: PipButton::default(),
            speed,
            settings: SettingsPanel::default(),
            bar: ControlBar {
                revealed: false,
                visibility: Visibility::Shown,
                hide_deadline: None,
            },
            flash: PlaybackFlash {
                pulses: 0,
                duration_ms: config.flash_duration_ms,
            },
            buffer: BufferIndicator::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_icon_thresholds() {
        assert_eq!(VolumeIcon::for_level(true, 0.9), VolumeIcon::Muted);
        assert_eq!(VolumeIcon::for_level(false, 0.0), VolumeIcon::Muted);
        assert_eq!(VolumeIcon::for_level(false, 0.01), VolumeIcon::Low);
        assert_eq!(VolumeIcon::for_level(false, 0.5), VolumeIcon::Low);
        assert_eq!(VolumeIcon::for_level(false, 0.51), VolumeIcon::High);
    }

    #[test]
    fn volume_sync_follows_source_level() {
        let mut c = Controls::new(&ControlsConfig::default()).volume;
        c.sync(false, 0.2);
        assert_eq!(c.slider, 0.2);
        assert_eq!(c.remembered, None);

        c.sync(true, 0.2);
        assert_eq!(c.slider, 0.0);
        assert_eq!(c.remembered, Some(0.2));
        assert_eq!(c.title, UNMUTE_TITLE);

        // an already remembered position survives later notifications
        c.sync(true, 0.6);
        assert_eq!(c.remembered, Some(0.2));
    }

    #[test]
    fn pip_gate_is_released_on_drop() {
        let gate = PipGate::default();
        let pending = gate.acquire().unwrap();
        assert!(gate.is_disabled());
        assert!(gate.acquire().is_none());
        drop(pending);
        assert!(!gate.is_disabled());
    }

    #[test]
    fn cloned_pip_button_is_detached() {
        let button = PipButton::default();
        let pending = button.gate.acquire().unwrap();
        let copy = button.clone();
        drop(pending);
        assert!(!button.is_disabled());
        assert!(copy.is_disabled());
    }

    #[test]
    fn new_controls_start_paused_and_windowed() {
        let c = Controls::new(&ControlsConfig::default());
        assert_eq!(c.play.icon, PlaybackIcon::Play);
        assert_eq!(c.fullscreen.title, FULLSCREEN_TITLE);
        assert_eq!(c.fullscreen.size, SizeConstraint::Bounded(800));
        assert_eq!(c.speed.label, "Playback speed: 1x");
        assert_eq!(c.elapsed.text, "00:00");
        assert!(!c.bar.revealed);
    }

    #[test]
    fn snapshot_serializes_gate_as_flag() {
        let c = Controls::new(&ControlsConfig::default());
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v["pip"]["disabled"], serde_json::Value::Bool(false));
        assert_eq!(v["volume"]["icon"], "high");
        assert!(v["bar"].get("hide_deadline").is_none());
    }
}
