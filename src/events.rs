//! Declarative event wiring.
//!
//! Every (source, event) pair the overlay reacts to is listed once in
//! `default_bindings`. The synchronizer installs the table on `attach` and
//! drops it on `detach`; nothing else registers handlers.

use crate::platform::MediaEvent;

/// Where an event originates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventSource {
    /// The media element itself (platform notifications and pointer input)
    Video,
    ControlBar,
    PlayButton,
    SeekBar,
    VolumeSlider,
    VolumeButton,
    FullscreenButton,
    PipButton,
    SpeedInput,
    SettingsButton,
    Document,
}

/// An event with its payload
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Media(MediaEvent),
    Click,
    PointerEnter,
    PointerLeave,
    /// Pointer movement: offset inside the target, target width, page x and
    /// the player's left edge in page coordinates
    PointerMove {
        offset_x: f64,
        width: f64,
        page_x: f64,
        player_left: f64,
    },
    /// New value of a range/number input
    Input(f64),
    KeyDown(String),
    /// Platform fullscreen state changed
    FullscreenChange(bool),
}

/// Payload-free discriminant used as the binding key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Media(MediaEvent),
    Click,
    PointerEnter,
    PointerLeave,
    PointerMove,
    Input,
    KeyDown,
    FullscreenChange,
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Media(ev) => EventKind::Media(*ev),
            Event::Click => EventKind::Click,
            Event::PointerEnter => EventKind::PointerEnter,
            Event::PointerLeave => EventKind::PointerLeave,
            Event::PointerMove { .. } => EventKind::PointerMove,
            Event::Input(_) => EventKind::Input,
            Event::KeyDown(_) => EventKind::KeyDown,
            Event::FullscreenChange(_) => EventKind::FullscreenChange,
        }
    }
}

/// Synchronizer operations that can be bound to events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    TogglePlay,
    FlashPlayback,
    PlayStateChanged,
    MetadataLoaded,
    TimeElapsed,
    Progress,
    Buffered,
    VolumeChanged,
    ShowControls,
    HideControls,
    SeekPreview,
    ClearSeekPreview,
    SeekInput,
    VolumeInput,
    ToggleMute,
    ToggleFullscreen,
    FullscreenChanged,
    TogglePictureInPicture,
    PlaybackRateInput,
    ToggleSettings,
    KeyboardShortcut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub source: EventSource,
    pub kind: EventKind,
    pub handler: Handler,
}

const fn bind(source: EventSource, kind: EventKind, handler: Handler) -> Binding {
    Binding { source, kind, handler }
}

/// The complete listener table of the overlay, in dispatch order
pub fn default_bindings() -> Vec<Binding> {
    use EventKind as K;
    use EventSource as S;
    use Handler as H;

    vec![
        bind(S::PlayButton, K::Click, H::TogglePlay),
        bind(S::SettingsButton, K::Click, H::ToggleSettings),
        bind(S::Video, K::Media(MediaEvent::Play), H::PlayStateChanged),
        bind(S::Video, K::Media(MediaEvent::Pause), H::PlayStateChanged),
        bind(S::Video, K::Media(MediaEvent::LoadedMetadata), H::MetadataLoaded),
        bind(S::Video, K::Media(MediaEvent::TimeUpdate), H::TimeElapsed),
        bind(S::Video, K::Media(MediaEvent::TimeUpdate), H::Progress),
        bind(S::Video, K::Media(MediaEvent::VolumeChange), H::VolumeChanged),
        bind(S::Video, K::Media(MediaEvent::Progress), H::Buffered),
        bind(S::Video, K::Click, H::TogglePlay),
        bind(S::Video, K::Click, H::FlashPlayback),
        bind(S::Video, K::PointerEnter, H::ShowControls),
        bind(S::Video, K::PointerLeave, H::HideControls),
        bind(S::ControlBar, K::PointerEnter, H::ShowControls),
        bind(S::ControlBar, K::PointerLeave, H::HideControls),
        bind(S::SeekBar, K::PointerMove, H::SeekPreview),
        bind(S::SeekBar, K::PointerLeave, H::ClearSeekPreview),
        bind(S::SeekBar, K::Input, H::SeekInput),
        bind(S::VolumeSlider, K::Input, H::VolumeInput),
        bind(S::VolumeButton, K::Click, H::ToggleMute),
        bind(S::FullscreenButton, K::Click, H::ToggleFullscreen),
        bind(S::Document, K::FullscreenChange, H::FullscreenChanged),
        bind(S::PipButton, K::Click, H::TogglePictureInPicture),
        bind(S::SpeedInput, K::Input, H::PlaybackRateInput),
        bind(S::Document, K::KeyDown, H::KeyboardShortcut),
    ]
}

/// Handlers bound to a (source, kind) pair, in table order
pub fn handlers_for(bindings: &[Binding], source: EventSource, kind: EventKind) -> Vec<Handler> {
    bindings
        .iter()
        .filter(|b| b.source == source && b.kind == kind)
        .map(|b| b.handler)
        .collect()
}
