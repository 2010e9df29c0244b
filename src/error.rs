//! Error types for the control synchronizer

use thiserror::Error;

/// Result type alias for synchronizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Platform capabilities a control may depend on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Playback,
    Fullscreen,
    PictureInPicture,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::Playback => "playback",
            Capability::Fullscreen => "fullscreen",
            Capability::PictureInPicture => "picture-in-picture",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while synchronizing controls
#[derive(Error, Debug)]
pub enum Error {
    /// A duration was negative, NaN or infinite
    #[error("Invalid duration: {0}")]
    InvalidDuration(f64),

    /// The platform does not provide a capability
    #[error("Unsupported capability: {0}")]
    Unsupported(Capability),

    /// A picture-in-picture request was rejected by the platform
    #[error("Picture-in-picture request failed: {0}")]
    PictureInPicture(String),

    /// A fullscreen request or exit was rejected by the platform
    #[error("Fullscreen request failed: {0}")]
    Fullscreen(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The worker behind an async handle went away
    #[error("Worker channel closed: {0}")]
    Channel(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::ConfigError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_each_capability() {
        assert_eq!(
            Error::Unsupported(Capability::Playback).to_string(),
            "Unsupported capability: playback"
        );
        assert_eq!(
            Error::Unsupported(Capability::Fullscreen).to_string(),
            "Unsupported capability: fullscreen"
        );
        assert_eq!(
            Error::Unsupported(Capability::PictureInPicture).to_string(),
            "Unsupported capability: picture-in-picture"
        );
    }
}
