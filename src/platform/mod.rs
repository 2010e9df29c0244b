//! Platform API surface: media source, fullscreen and picture-in-picture
//!
//! This module contains the public traits the synchronizer drives, plus
//! in-memory implementations used by tests and the CLI.

pub mod fullscreen;
pub mod media;
pub mod pip;

use std::sync::Arc;

pub use fullscreen::{FullscreenBackend, FullscreenStrategy, FullscreenVariant, SimulatedFullscreen};
pub use media::{MediaEvent, MediaSource, SimulatedMedia};
pub use pip::{PictureInPictureApi, SimulatedPictureInPicture};

/// A small composite trait hosts implement to hand their platform
/// primitives to the synchronizer in a typed way.
pub trait PlatformApi: Send + Sync {
    fn media_source(&self) -> Arc<dyn MediaSource>;
    fn fullscreen(&self) -> Arc<dyn FullscreenBackend>;
    fn picture_in_picture(&self) -> Arc<dyn PictureInPictureApi>;
}

/// Result of probing the platform once at initialization
#[derive(Debug, Clone)]
pub struct Capabilities {
    pub playback: bool,
    pub fullscreen: Option<FullscreenStrategy>,
    pub picture_in_picture: bool,
}

impl Capabilities {
    /// Query every capability the controls depend on.
    ///
    /// `fullscreen_order` is the fallback list of entry points; the first one
    /// the platform supports is bound for the lifetime of the controls.
    pub fn detect(platform: &dyn PlatformApi, fullscreen_order: &[FullscreenVariant]) -> Self {
        Capabilities {
            playback: platform.media_source().supports_playback(),
            fullscreen: FullscreenStrategy::resolve(platform.fullscreen(), fullscreen_order),
            picture_in_picture: platform.picture_in_picture().is_supported(),
        }
    }
}

/// In-memory platform built from the simulated surfaces.
///
/// The concrete handles are kept so tests can drive the media source and
/// inspect fullscreen/picture-in-picture state directly.
#[derive(Clone)]
pub struct SimulatedPlatform {
    pub media: Arc<SimulatedMedia>,
    pub fullscreen: Arc<SimulatedFullscreen>,
    pub pip: Arc<SimulatedPictureInPicture>,
}

impl SimulatedPlatform {
    pub fn new() -> Self {
        SimulatedPlatform {
            media: Arc::new(SimulatedMedia::new()),
            fullscreen: Arc::new(SimulatedFullscreen::default()),
            pip: Arc::new(SimulatedPictureInPicture::new()),
        }
    }

    pub fn with_fullscreen(mut self, fullscreen: SimulatedFullscreen) -> Self {
        self.fullscreen = Arc::new(fullscreen);
        self
    }

    pub fn with_pip(mut self, pip: SimulatedPictureInPicture) -> Self {
        self.pip = Arc::new(pip);
        self
    }

    pub fn with_media(mut self, media: SimulatedMedia) -> Self {
        self.media = Arc::new(media);
        self
    }
}

impl Default for SimulatedPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl PlatformApi for SimulatedPlatform {
    fn media_source(&self) -> Arc<dyn MediaSource> {
        self.media.clone()
    }

    fn fullscreen(&self) -> Arc<dyn FullscreenBackend> {
        self.fullscreen.clone()
    }

    fn picture_in_picture(&self) -> Arc<dyn PictureInPictureApi> {
        self.pip.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simulated_platform_reports_full_support() {
        let p = SimulatedPlatform::new();
        let caps = Capabilities::detect(&p, &FullscreenVariant::FALLBACK_ORDER);
        assert!(caps.playback);
        assert!(caps.picture_in_picture);
        assert_eq!(caps.fullscreen.unwrap().variant(), FullscreenVariant::Standard);
    }

    #[test]
    fn missing_surfaces_are_detected() {
        let p = SimulatedPlatform::new()
            .with_media(SimulatedMedia::unsupported())
            .with_fullscreen(SimulatedFullscreen::unsupported())
            .with_pip(SimulatedPictureInPicture::unsupported());
        let caps = Capabilities::detect(&p, &FullscreenVariant::FALLBACK_ORDER);
        assert!(!caps.playback);
        assert!(caps.fullscreen.is_none());
        assert!(!caps.picture_in_picture);
    }
}
