//! Media element seam
//!
//! The session drives exactly one media element through this trait. In the
//! browser it is an `<audio>` element (see the `wasm` feature); tests and the
//! console simulator provide their own implementations.

use crate::types::{Generation, PlayTicket};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Buffered readiness, as reported by `HTMLMediaElement.readyState`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReadyState {
    HaveNothing,
    HaveMetadata,
    HaveCurrentData,
    HaveFutureData,
    HaveEnoughData,
}

impl ReadyState {
    /// Convert the numeric DOM value; out-of-range values saturate
    pub fn from_dom(value: u16) -> Self {
        match value {
            0 => Self::HaveNothing,
            1 => Self::HaveMetadata,
            2 => Self::HaveCurrentData,
            3 => Self::HaveFutureData,
            _ => Self::HaveEnoughData,
        }
    }

    /// Enough data buffered to keep playing
    pub fn is_sufficient(self) -> bool {
        self >= Self::HaveFutureData
    }
}

/// Element events the session listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaEvent {
    LoadedData,
    CanPlay,
    Playing,
    Pause,
    Ended,
    Error,
    Waiting,
    Stalled,
    Suspend,
}

impl MediaEvent {
    /// DOM event name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoadedData => "loadeddata",
            Self::CanPlay => "canplay",
            Self::Playing => "playing",
            Self::Pause => "pause",
            Self::Ended => "ended",
            Self::Error => "error",
            Self::Waiting => "waiting",
            Self::Stalled => "stalled",
            Self::Suspend => "suspend",
        }
    }

    /// Parse a DOM event name
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "loadeddata" => Some(Self::LoadedData),
            "canplay" => Some(Self::CanPlay),
            "playing" => Some(Self::Playing),
            "pause" => Some(Self::Pause),
            "ended" => Some(Self::Ended),
            "error" => Some(Self::Error),
            "waiting" => Some(Self::Waiting),
            "stalled" => Some(Self::Stalled),
            "suspend" => Some(Self::Suspend),
            _ => None,
        }
    }

    /// Events that signal the element is starving for data
    pub fn is_stall(&self) -> bool {
        matches!(self, Self::Waiting | Self::Stalled | Self::Suspend)
    }
}

/// The single audio element owned by the session
pub trait MediaElement {
    /// Replace the element's source and start loading it
    ///
    /// # Arguments
    /// * `url` - Remote URL or local fallback path
    /// * `generation` - Generation the host must tag this source's events with
    fn load_source(&mut self, url: &str, generation: Generation);

    /// Request playback
    ///
    /// The outcome is reported later through `PlaybackSession::play_settled`
    /// with the same ticket.
    fn play(&mut self, ticket: PlayTicket);

    /// Pause immediately
    fn pause(&mut self);

    /// Current playback position
    fn current_time(&self) -> Duration;

    /// Seek to `position`
    fn set_current_time(&mut self, position: Duration);

    /// Set the element's linear volume (0.0 - 1.0)
    fn set_volume(&mut self, volume: f32);

    /// Current buffered readiness
    fn ready_state(&self) -> ReadyState;

    /// Source currently assigned to the element
    fn current_source(&self) -> Option<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_state_ordering() {
        assert!(!ReadyState::HaveCurrentData.is_sufficient());
        assert!(ReadyState::HaveFutureData.is_sufficient());
        assert_eq!(ReadyState::from_dom(4), ReadyState::HaveEnoughData);
        assert_eq!(ReadyState::from_dom(9), ReadyState::HaveEnoughData);
        assert_eq!(ReadyState::from_dom(0), ReadyState::HaveNothing);
    }

    #[test]
    fn event_names_round_trip() {
        for event in [
            MediaEvent::LoadedData,
            MediaEvent::CanPlay,
            MediaEvent::Playing,
            MediaEvent::Pause,
            MediaEvent::Ended,
            MediaEvent::Error,
            MediaEvent::Waiting,
            MediaEvent::Stalled,
            MediaEvent::Suspend,
        ] {
            assert_eq!(MediaEvent::from_name(event.as_str()), Some(event));
        }
        assert_eq!(MediaEvent::from_name("timeupdate"), None);
    }

    #[test]
    fn stall_events() {
        assert!(MediaEvent::Waiting.is_stall());
        assert!(MediaEvent::Suspend.is_stall());
        assert!(!MediaEvent::Error.is_stall());
    }
}
