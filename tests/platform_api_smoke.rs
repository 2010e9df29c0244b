use vidctl::platform::{
    FullscreenVariant, MediaSource, SimulatedFullscreen, SimulatedMedia, SimulatedPictureInPicture,
    SimulatedPlatform,
};
use vidctl::{Controls, ControlsConfig, Event, EventSource, Synchronizer};

#[test]
fn platform_without_optional_capabilities_hides_controls() {
    let p = SimulatedPlatform::new()
        .with_fullscreen(SimulatedFullscreen::unsupported())
        .with_pip(SimulatedPictureInPicture::unsupported());
    let mut sync = vidctl::new_synchronizer(&p, ControlsConfig::default()).unwrap();

    let c = sync.controls();
    assert!(c.fullscreen.hidden);
    assert!(c.pip.hidden);
    assert!(c.bar.revealed);

    // Using the hidden controls is harmless
    assert!(sync.dispatch(EventSource::PipButton, &Event::Click).is_none());
    sync.dispatch(EventSource::FullscreenButton, &Event::Click);
    assert_eq!(sync.controls().fullscreen.title, "Full screen (f)");
    assert!(!sync.controls().pip.is_disabled());

    // The other controls keep working
    sync.dispatch(EventSource::PlayButton, &Event::Click);
    assert!(!p.media.paused());
}

#[test]
fn platform_without_playback_keeps_native_controls() {
    let p = SimulatedPlatform::new().with_media(SimulatedMedia::unsupported());
    let sync = vidctl::new_synchronizer(&p, ControlsConfig::default()).unwrap();
    assert!(!sync.controls().bar.revealed);
    assert!(p.media.native_controls());
}

#[test]
fn vendor_fullscreen_entry_point_is_used() {
    let p = SimulatedPlatform::new().with_fullscreen(SimulatedFullscreen::new(vec![FullscreenVariant::Ms]));
    let mut sync = vidctl::new_synchronizer(&p, ControlsConfig::default()).unwrap();
    sync.dispatch(EventSource::Document, &Event::KeyDown("f".into()));
    assert_eq!(p.fullscreen.active_variant(), Some(FullscreenVariant::Ms));
    assert_eq!(sync.controls().fullscreen.title, "Exit full screen (f)");
}

#[test]
fn configured_order_restricts_entry_points() {
    let p = SimulatedPlatform::new().with_fullscreen(SimulatedFullscreen::new(vec![FullscreenVariant::Moz]));
    let cfg = ControlsConfig {
        fullscreen_order: vec![FullscreenVariant::Standard, FullscreenVariant::Webkit],
        ..Default::default()
    };
    let sync = Synchronizer::new(&p, Controls::new(&cfg), cfg).unwrap();
    assert!(sync.controls().fullscreen.hidden);
}
