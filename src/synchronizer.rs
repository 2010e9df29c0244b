//! The control synchronizer: user input in, media commands out, and media
//! notifications back into widget state.

use std::sync::Arc;
use std::time::Instant;

use futures::future::BoxFuture;
use log::{debug, error, warn};

use crate::events::{default_bindings, handlers_for, Binding, Event, EventSource, Handler};
use crate::format::{compute_seek_target, format_duration, pointer_ratio, round3};
use crate::keyboard::Shortcut;
use crate::platform::{
    Capabilities, FullscreenStrategy, MediaEvent, MediaSource, PictureInPictureApi, PlatformApi,
};
use crate::widgets::{Controls, PendingPip, Visibility};
use crate::{Capability, ControlsConfig, Error, Result};

/// An in-flight picture-in-picture request.
///
/// The picture-in-picture button stays disabled until the task is run to
/// completion or dropped, whichever comes first.
#[must_use = "a picture-in-picture request does nothing until it is run"]
pub struct PipTask {
    pending: PendingPip,
    request: BoxFuture<'static, Result<()>>,
    entering: bool,
}

impl PipTask {
    /// Whether this task enters (rather than leaves) picture-in-picture
    pub fn entering(&self) -> bool {
        self.entering
    }

    /// Await the platform's answer. Failures are logged and returned; the
    /// button is re-enabled either way.
    pub async fn run(self) -> Result<()> {
        let PipTask {
            pending,
            request,
            entering,
        } = self;
        let res = request.await;
        drop(pending);
        if let Err(ref e) = res {
            let what = if entering { "request" } else { "exit" };
            error!("picture-in-picture {} failed: {}", what, e);
        }
        res
    }
}

impl std::fmt::Debug for PipTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipTask").field("entering", &self.entering).finish()
    }
}

/// Keeps a `Controls` widget set in step with a media source
pub struct Synchronizer {
    config: ControlsConfig,
    media: Arc<dyn MediaSource>,
    fullscreen: Option<FullscreenStrategy>,
    pip: Arc<dyn PictureInPictureApi>,
    controls: Controls,
    bindings: Vec<Binding>,
}

impl Synchronizer {
    /// Inspect the platform, hide controls for missing capabilities and derive
    /// every widget from the current media state.
    ///
    /// The returned synchronizer is detached; call `attach` before
    /// dispatching events.
    pub fn new(platform: &dyn PlatformApi, controls: Controls, config: ControlsConfig) -> Result<Self> {
        config.validate()?;
        let caps = Capabilities::detect(platform, &config.fullscreen_order);
        let media = platform.media_source();

        let mut controls = controls;
        controls.fullscreen.hidden = caps.fullscreen.is_none();
        controls.pip.hidden = !caps.picture_in_picture;
        if caps.playback {
            media.set_native_controls(false);
            controls.bar.revealed = true;
        } else {
            warn!("{}; keeping native controls", Error::Unsupported(Capability::Playback));
        }
        match caps.fullscreen {
            Some(ref fs) => debug!("fullscreen bound to {:?} entry point", fs.variant()),
            None => debug!("{}; hiding button", Error::Unsupported(Capability::Fullscreen)),
        }

        let mut sync = Synchronizer {
            config,
            media,
            fullscreen: caps.fullscreen,
            pip: platform.picture_in_picture(),
            controls,
            bindings: Vec::new(),
        };
        sync.resync();
        Ok(sync)
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn config(&self) -> &ControlsConfig {
        &self.config
    }

    pub fn media(&self) -> &Arc<dyn MediaSource> {
        &self.media
    }

    /// Install the listener table
    pub fn attach(&mut self) {
        self.bindings = default_bindings();
    }

    /// Remove every listener; later events are ignored
    pub fn detach(&mut self) {
        self.bindings.clear();
        self.controls.bar.hide_deadline = None;
    }

    pub fn is_attached(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Run every handler bound to `(source, event)`.
    ///
    /// Returns the picture-in-picture task when one of the handlers started a
    /// request; the caller is responsible for driving it.
    pub fn dispatch(&mut self, source: EventSource, event: &Event) -> Option<PipTask> {
        let mut task = None;
        for handler in handlers_for(&self.bindings, source, event.kind()) {
            if let Some(t) = self.run_handler(handler, event) {
                task = Some(t);
            }
        }
        task
    }

    /// Convenience for platform notifications, which all come from the video
    pub fn handle_media_event(&mut self, ev: MediaEvent) {
        // No media notification is bound to a picture-in-picture toggle
        let _ = self.dispatch(EventSource::Video, &Event::Media(ev));
    }

    fn run_handler(&mut self, handler: Handler, event: &Event) -> Option<PipTask> {
        match (handler, event) {
            (Handler::TogglePlay, _) => self.toggle_play(),
            (Handler::FlashPlayback, _) => self.flash_playback(),
            (Handler::PlayStateChanged, _) => self.on_play_state_changed(),
            (Handler::MetadataLoaded, _) => self.on_metadata_loaded(),
            (Handler::TimeElapsed, _) => self.update_time_elapsed(),
            (Handler::Progress, _) => self.update_progress(),
            (Handler::Buffered, _) => self.on_buffered(),
            (Handler::VolumeChanged, _) => self.on_volume_changed(),
            (Handler::ShowControls, _) => self.show_controls(),
            (Handler::HideControls, _) => self.hide_controls(),
            (
                Handler::SeekPreview,
                Event::PointerMove {
                    offset_x,
                    width,
                    page_x,
                    player_left,
                },
            ) => self.preview_seek(*offset_x, *width, *page_x, *player_left),
            (Handler::ClearSeekPreview, _) => self.clear_seek_preview(),
            (Handler::SeekInput, Event::Input(value)) => self.seek_input(*value),
            (Handler::VolumeInput, Event::Input(value)) => self.set_volume(*value),
            (Handler::ToggleMute, _) => self.toggle_mute(),
            (Handler::ToggleFullscreen, _) => self.toggle_fullscreen(),
            (Handler::FullscreenChanged, Event::FullscreenChange(on)) => self.on_fullscreen_changed(*on),
            (Handler::TogglePictureInPicture, _) => return self.begin_picture_in_picture(),
            (Handler::PlaybackRateInput, Event::Input(value)) => self.set_playback_rate(*value),
            (Handler::ToggleSettings, _) => self.toggle_settings(),
            (Handler::KeyboardShortcut, Event::KeyDown(key)) => return self.handle_keyboard_shortcut(key),
            (h, ev) => warn!("handler {:?} cannot take {:?}", h, ev),
        }
        None
    }

    /// Re-derive every widget from the media source in one step
    pub fn resync(&mut self) {
        self.controls.play.sync(self.media.paused());
        self.on_metadata_loaded();
        self.update_time_elapsed();
        self.update_progress();
        self.on_volume_changed();
        self.controls.speed.set(self.media.playback_rate());
        let fullscreen = self.fullscreen.as_ref().map(|s| s.is_active()).unwrap_or(false);
        self.on_fullscreen_changed(fullscreen);
    }

    // --- playback ---

    /// Play when paused or ended, otherwise pause
    pub fn toggle_play(&mut self) {
        if self.media.paused() || self.media.ended() {
            self.media.play();
        } else {
            self.media.pause();
        }
    }

    /// Sync the play button to the source; pausing also brings the controls
    /// back while playing arms the deferred hide.
    pub fn on_play_state_changed(&mut self) {
        let paused = self.media.paused();
        self.controls.play.sync(paused);
        if paused {
            self.show_controls();
        } else {
            self.schedule_hide(Instant::now());
        }
    }

    pub fn flash_playback(&mut self) {
        self.controls.flash.pulses += 1;
    }

    // --- time ---

    pub fn on_metadata_loaded(&mut self) {
        let duration = self.media.duration();
        match format_duration(duration) {
            Ok(t) => {
                self.controls.seek.max = duration;
                self.controls.progress.max = duration;
                self.controls.duration.set(t);
            }
            Err(e) => debug!("skipping duration display: {}", e),
        }
    }

    /// Update both the elapsed display and the seek position
    pub fn on_time_update(&mut self) {
        self.update_time_elapsed();
        self.update_progress();
    }

    fn update_time_elapsed(&mut self) {
        match format_duration(self.media.current_time()) {
            Ok(t) => self.controls.elapsed.set(t),
            Err(e) => debug!("skipping elapsed display: {}", e),
        }
    }

    fn update_progress(&mut self) {
        let t = self.media.current_time();
        if t.is_finite() {
            self.controls.seek.value = t;
            self.controls.progress.value = t;
        }
    }

    fn on_buffered(&mut self) {
        let duration = self.media.duration();
        let Some(&(_, end)) = self.media.buffered().first() else {
            return;
        };
        if !duration.is_finite() || duration <= 0.0 {
            return;
        }
        let percent = (end / duration * 100.0).clamp(0.0, 100.0);
        debug!("buffered {:.1}%", percent);
        self.controls.buffer.percent = Some(percent);
    }

    // --- seeking ---

    /// Hover preview: remember the target under the pointer and show it in
    /// the tooltip next to the pointer
    pub fn preview_seek(&mut self, offset_x: f64, width: f64, page_x: f64, player_left: f64) {
        let target = compute_seek_target(pointer_ratio(offset_x, width), self.controls.seek.max);
        self.controls.seek.preview = Some(target);
        if let Ok(t) = format_duration(target) {
            self.controls.seek.tooltip = t.to_string();
        }
        self.controls.seek.tooltip_left = page_x - player_left;
    }

    /// Forget the hover target once the pointer leaves the seek bar
    pub fn clear_seek_preview(&mut self) {
        self.controls.seek.preview = None;
    }

    /// Seek bar input: jump to the hovered target, or the slider value when
    /// the pointer is not over the bar
    fn seek_input(&mut self, value: f64) {
        let target = self.controls.seek.preview.unwrap_or(value);
        self.skip_to(target);
    }

    /// Move both the seek slider and the playback position to `target`
    pub fn skip_to(&mut self, target: f64) {
        if !target.is_finite() {
            warn!("ignoring seek to {}", target);
            return;
        }
        self.controls.seek.value = target;
        self.controls.progress.value = target;
        self.media.set_current_time(target);
    }

    fn step_seek(&mut self, forward: bool) {
        let now = self.media.current_time();
        let duration = self.media.duration();
        if !duration.is_finite() {
            return;
        }
        let step = self.config.seek_step_secs;
        let target = if forward {
            if now >= duration {
                return;
            }
            (self.controls.seek.value + step).round().min(duration)
        } else {
            if now <= 0.0 {
                return;
            }
            (self.controls.seek.value - step).round().max(0.0)
        };
        self.skip_to(target);
    }

    // --- volume ---

    /// Slider input: unmute if needed and apply the level
    pub fn set_volume(&mut self, value: f64) {
        if !value.is_finite() {
            warn!("ignoring volume {}", value);
            return;
        }
        let value = value.clamp(0.0, 1.0);
        if self.media.muted() {
            self.media.set_muted(false);
            self.controls.volume.remembered = None;
        }
        self.controls.volume.slider = value;
        self.media.set_volume(value);
    }

    pub fn on_volume_changed(&mut self) {
        self.controls.volume.sync(self.media.muted(), self.media.volume());
    }

    /// Flip the muted flag. The slider shows zero while muted and returns to
    /// its previous position on unmute; the source volume is left alone.
    pub fn toggle_mute(&mut self) {
        let muted = !self.media.muted();
        self.media.set_muted(muted);
        let volume = &mut self.controls.volume;
        if muted {
            volume.remembered = Some(volume.slider);
            volume.slider = 0.0;
        } else {
            volume.slider = volume.remembered.take().unwrap_or_else(|| self.media.volume());
        }
    }

    fn step_volume(&mut self, up: bool) {
        let current = self.media.volume();
        if (up && current >= 1.0) || (!up && current <= 0.0) {
            return;
        }
        let delta = if up { self.config.volume_step } else { -self.config.volume_step };
        let next = round3(current + delta).clamp(0.0, 1.0);
        self.media.set_volume(next);
        if self.media.muted() {
            self.controls.volume.remembered = Some(next);
        } else {
            self.controls.volume.slider = next;
        }
    }

    // --- fullscreen ---

    pub fn toggle_fullscreen(&mut self) {
        let Some(strategy) = self.fullscreen.as_ref() else {
            debug!("{}", Error::Unsupported(Capability::Fullscreen));
            return;
        };
        let active = strategy.is_active();
        let res = if active { strategy.exit() } else { strategy.request() };
        match res {
            Ok(()) => self.on_fullscreen_changed(!active),
            Err(e) => warn!("fullscreen toggle failed: {}", e),
        }
    }

    pub fn on_fullscreen_changed(&mut self, is_fullscreen: bool) {
        self.controls
            .fullscreen
            .sync(is_fullscreen, self.config.bounded_size_px);
    }

    // --- picture-in-picture ---

    /// Start entering or leaving picture-in-picture.
    ///
    /// Returns `None` when the platform has no support or a request is
    /// already pending; otherwise the button is disabled until the returned
    /// task settles.
    pub fn begin_picture_in_picture(&mut self) -> Option<PipTask> {
        if self.controls.pip.hidden {
            debug!("{}", Error::Unsupported(Capability::PictureInPicture));
            return None;
        }
        let Some(pending) = self.controls.pip.gate.acquire() else {
            debug!("picture-in-picture request already pending");
            return None;
        };
        let entering = !self.pip.is_active();
        let request = if entering { self.pip.request() } else { self.pip.exit() };
        Some(PipTask {
            pending,
            request,
            entering,
        })
    }

    /// Toggle picture-in-picture and wait for the platform.
    /// Rejections are logged only.
    pub async fn toggle_picture_in_picture(&mut self) {
        if let Some(task) = self.begin_picture_in_picture() {
            let _ = task.run().await;
        }
    }

    // --- speed & settings ---

    pub fn set_playback_rate(&mut self, value: f64) {
        if !value.is_finite() || value <= 0.0 {
            warn!("ignoring playback rate {}", value);
            return;
        }
        self.media.set_playback_rate(value);
        self.controls.speed.set(value);
    }

    pub fn toggle_settings(&mut self) {
        self.controls.settings.open = !self.controls.settings.open;
    }

    // --- keyboard ---

    /// Dispatch a single key. Unknown keys are ignored.
    pub fn handle_keyboard_shortcut(&mut self, key: &str) -> Option<PipTask> {
        let shortcut = Shortcut::from_key(key)?;
        match shortcut {
            Shortcut::TogglePlay => {
                self.toggle_play();
                self.flash_playback();
                if self.media.paused() {
                    self.show_controls();
                } else {
                    self.schedule_hide(Instant::now());
                }
            }
            Shortcut::ToggleMute => self.toggle_mute(),
            Shortcut::ToggleFullscreen => self.toggle_fullscreen(),
            Shortcut::TogglePictureInPicture => return self.begin_picture_in_picture(),
            Shortcut::SeekForward => self.step_seek(true),
            Shortcut::SeekBackward => self.step_seek(false),
            Shortcut::VolumeUp => self.step_volume(true),
            Shortcut::VolumeDown => self.step_volume(false),
        }
        None
    }

    // --- control bar visibility ---

    /// Show immediately and cancel any deferred hide
    pub fn show_controls(&mut self) {
        self.controls.bar.visibility = Visibility::Shown;
        self.controls.bar.hide_deadline = None;
    }

    /// Hide immediately unless the source is paused
    pub fn hide_controls(&mut self) {
        if self.media.paused() {
            return;
        }
        self.controls.bar.visibility = Visibility::Hidden;
        self.controls.bar.hide_deadline = None;
    }

    /// Arm (or re-arm) the deferred hide relative to `now`
    pub fn schedule_hide(&mut self, now: Instant) {
        self.controls.bar.hide_deadline = Some(now + self.config.hide_delay());
    }

    pub fn hide_deadline(&self) -> Option<Instant> {
        self.controls.bar.hide_deadline
    }

    /// Fire the deferred hide if its deadline has passed
    pub fn fire_due_timers(&mut self, now: Instant) {
        match self.controls.bar.hide_deadline {
            Some(deadline) if deadline <= now => {
                self.controls.bar.hide_deadline = None;
                self.hide_controls();
            }
            _ => {}
        }
    }
}
