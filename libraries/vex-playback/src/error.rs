//! Error types for playback session management
//!
//! Transient playback failures (stalls, rejected plays, source errors) are
//! handled inside the session and never show up here.

use thiserror::Error;

/// Caller errors from session operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Track index outside the catalog
    #[error("Index out of bounds: {index} (catalog has {len} tracks)")]
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Catalog length
        len: usize,
    },

    /// Session configuration rejected
    #[error("Invalid session config: {0}")]
    InvalidConfig(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Why the media element refused to start playing
///
/// Reported back to the session through
/// [`PlaybackSession::play_settled`](crate::PlaybackSession::play_settled).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlayError {
    /// Browser autoplay policy blocked playback (no user gesture yet)
    #[error("Playback not allowed without user interaction")]
    NotAllowed,

    /// Play request interrupted by a new load or a pause
    #[error("Play request aborted")]
    Aborted,

    /// Anything else: unsupported source, network error
    #[error("Play failed: {0}")]
    Failed(String),
}

impl PlayError {
    /// Map a DOM exception name from a rejected `play()` promise
    pub fn from_dom_exception(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" => Self::NotAllowed,
            "AbortError" => Self::Aborted,
            _ if message.is_empty() => Self::Failed(name.to_string()),
            _ => Self::Failed(format!("{name}: {message}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dom_exception_mapping() {
        assert_eq!(
            PlayError::from_dom_exception("NotAllowedError", "user gesture required"),
            PlayError::NotAllowed
        );
        assert_eq!(PlayError::from_dom_exception("AbortError", ""), PlayError::Aborted);
        assert_eq!(
            PlayError::from_dom_exception("NotSupportedError", "no source"),
            PlayError::Failed("NotSupportedError: no source".to_string())
        );
    }
}
