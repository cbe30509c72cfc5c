//! Session Events
//!
//! Event-based communication for UI synchronization. The session queues
//! events as it transitions; the UI drains them with
//! [`PlaybackSession::drain_events`](crate::PlaybackSession::drain_events).

use crate::types::{ConnectionStatus, SessionPhase};
use serde::{Deserialize, Serialize};

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Phase or play/loading flags changed
    StateChanged {
        phase: SessionPhase,
        is_playing: bool,
        is_loading: bool,
    },

    /// A different track became current (or the same one was reloaded by an
    /// explicit jump)
    TrackChanged {
        /// Catalog index of the new track
        index: usize,
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track, if a track was loaded before
        previous_track_id: Option<String>,
        /// URL loaded into the element
        source: String,
    },

    /// Connection status changed
    ConnectionChanged {
        status: ConnectionStatus,
    },

    /// Remote source failed; the bundled copy was loaded instead
    FellBackToLocal {
        track_id: String,
        local_path: String,
    },

    /// Current source is being reloaded
    RetryScheduled {
        track_id: String,
        /// 1-based attempt
        attempt: u32,
        max_retries: u32,
    },

    /// Retries exhausted; another track was substituted
    FailedOver {
        from_track_id: String,
        to_track_id: String,
    },

    /// Browser refused unattended playback; waiting for a user gesture
    AutoplayBlocked,

    /// Shuffle-style advance toggled
    AutoplayChanged {
        enabled: bool,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0-100)
        level: u8,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Global player shown or hidden
    VisibilityChanged {
        visible: bool,
    },

    /// Track picker opened or closed
    PickerToggled {
        open: bool,
    },
}
