//! Document-level keyboard shortcuts

/// Action bound to a single key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    TogglePlay,
    ToggleMute,
    ToggleFullscreen,
    TogglePictureInPicture,
    SeekBackward,
    SeekForward,
    VolumeUp,
    VolumeDown,
}

impl Shortcut {
    /// Look up a key by its DOM `KeyboardEvent.key` name
    pub fn from_key(key: &str) -> Option<Self> {
        let shortcut = match key {
            "k" | " " => Shortcut::TogglePlay,
            "m" => Shortcut::ToggleMute,
            "f" => Shortcut::ToggleFullscreen,
            "p" => Shortcut::TogglePictureInPicture,
            "ArrowLeft" => Shortcut::SeekBackward,
            "ArrowRight" => Shortcut::SeekForward,
            "ArrowUp" => Shortcut::VolumeUp,
            "ArrowDown" => Shortcut::VolumeDown,
            _ => return None,
        };
        Some(shortcut)
    }
}
