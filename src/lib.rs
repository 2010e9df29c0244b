//! vidctl: a headless control synchronizer for media element overlays
//!
//! The crate keeps a custom control bar (play/pause, seek, volume, fullscreen,
//! picture-in-picture, playback speed and keyboard shortcuts) in step with a
//! media source owned by the host platform. Every operation either forwards a
//! user gesture to the platform or reflects a platform notification back into
//! widget state; the host renders whatever `Controls` says.
//!
//! # Features
//!
//! - **Typed platform surface**: `platform::PlatformApi` hands over the media
//!   source, fullscreen backend and picture-in-picture API
//! - **Startup capability resolution**: vendor fullscreen variants are picked
//!   once; missing capabilities hide their control instead of failing later
//! - **Declarative wiring**: one listener table, attached and detached as a unit
//! - **Async facade**: `async_api::ControlsHandle` runs the synchronizer on a
//!   dedicated worker thread
//!
//! # Example
//!
//! ```
//! use vidctl::platform::{MediaSource, SimulatedPlatform};
//! use vidctl::{ControlsConfig, Event, EventSource};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let platform = SimulatedPlatform::new();
//! let mut sync = vidctl::new_synchronizer(&platform, ControlsConfig::default())?;
//!
//! platform.media.load(90.0);
//! for ev in platform.media.take_events() {
//!     sync.handle_media_event(ev);
//! }
//! assert_eq!(sync.controls().duration.text, "01:30");
//!
//! sync.dispatch(EventSource::Document, &Event::KeyDown("m".to_string()));
//! assert!(platform.media.muted());
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use serde::Deserialize;

pub mod error;
pub use error::{Capability, Error, Result};

pub mod events;
pub mod format;
pub mod keyboard;
pub mod widgets;

// Platform API surface (media source, fullscreen, picture-in-picture)
pub mod platform;

pub mod synchronizer;

// Async-friendly handle (worker-thread backed)
pub mod async_api;

pub use async_api::ControlsHandle;
pub use events::{Event, EventSource};
pub use synchronizer::{PipTask, Synchronizer};
pub use widgets::Controls;

use platform::{FullscreenVariant, PlatformApi};

/// Configuration for the control overlay
///
/// The defaults match the stock player: controls hide two seconds after
/// playback starts, arrow keys step by five seconds and 0.05 volume, and the
/// windowed video is bounded to 800 pixels.
///
/// # Examples
///
/// ```
/// let cfg = vidctl::ControlsConfig::default();
/// assert_eq!(cfg.hide_delay_ms, 2000);
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Delay before the control bar hides after playback starts
    pub hide_delay_ms: u64,
    /// Seek distance of the arrow-left/right shortcuts, in seconds
    pub seek_step_secs: f64,
    /// Volume change of the arrow-up/down shortcuts
    pub volume_step: f64,
    /// Maximum width and height of the video outside fullscreen
    pub bounded_size_px: u32,
    /// Length of the play/pause flash animation
    pub flash_duration_ms: u64,
    /// Fullscreen entry points to try, in order
    pub fullscreen_order: Vec<FullscreenVariant>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: 2000,
            seek_step_secs: 5.0,
            volume_step: 0.05,
            bounded_size_px: 800,
            flash_duration_ms: 500,
            fullscreen_order: FullscreenVariant::FALLBACK_ORDER.to_vec(),
        }
    }
}

impl ControlsConfig {
    /// Parse a JSON document; missing fields take their defaults
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: ControlsConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0) {
            return Err(Error::ConfigError(format!(
                "seek_step_secs must be positive, got {}",
                self.seek_step_secs
            )));
        }
        if !(self.volume_step > 0.0 && self.volume_step <= 1.0) {
            return Err(Error::ConfigError(format!(
                "volume_step must be in (0, 1], got {}",
                self.volume_step
            )));
        }
        if self.fullscreen_order.is_empty() {
            return Err(Error::ConfigError("fullscreen_order is empty".to_string()));
        }
        Ok(())
    }

    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }
}

/// Build a synchronizer with fresh widgets and attach its listener table
pub fn new_synchronizer(platform: &dyn PlatformApi, config: ControlsConfig) -> Result<Synchronizer> {
    let controls = Controls::new(&config);
    let mut sync = Synchronizer::new(platform, controls, config)?;
    sync.attach();
    Ok(sync)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ControlsConfig::default();
        assert_eq!(config.hide_delay(), Duration::from_secs(2));
        assert_eq!(config.seek_step_secs, 5.0);
        assert_eq!(config.fullscreen_order[0], FullscreenVariant::Standard);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_config() {
        let config = ControlsConfig::from_json_str(r#"{"hide_delay_ms": 3500, "fullscreen_order": ["webkit"]}"#).unwrap();
        assert_eq!(config.hide_delay_ms, 3500);
        assert_eq!(config.fullscreen_order, vec![FullscreenVariant::Webkit]);
        assert_eq!(config.volume_step, 0.05);
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ControlsConfig::from_json_str(r#"{"volume_step": 0}"#),
            Err(Error::ConfigError(_))
        ));
        assert!(ControlsConfig::from_json_str(r#"{"fullscreen_order": []}"#).is_err());
        assert!(ControlsConfig::from_json_str("not json").is_err());
    }
}
