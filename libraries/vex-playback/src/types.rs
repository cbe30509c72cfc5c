//! Core types for playback session management

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Connection health as shown by the player's status dot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    #[default]
    Good,
    Poor,
    Failed,
}

impl ConnectionStatus {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Poor => "poor",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session phase, derived from the session flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Not started yet
    Idle,

    /// Track loaded, not playing
    Paused,

    /// Element confirmed playing
    Playing,

    /// Waiting for a load or a play request to complete
    Buffering,

    /// Connection poor, nothing in flight
    Stalled,

    /// Reload or fallback in progress
    Recovering,

    /// Retries exhausted and another track was substituted
    FailedOver,
}

/// Monotonic counter bumped on every source load
///
/// Completions tagged with an older generation are stale and discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// Generation before any source has been loaded
    pub const INITIAL: Generation = Generation(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Identifies one `play()` request
///
/// The media element hands the ticket back when the request settles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayTicket {
    pub generation: Generation,
    pub seq: u64,
}

impl PlayTicket {
    pub fn from_parts(generation: u64, seq: u64) -> Self {
        Self {
            generation: Generation(generation),
            seq,
        }
    }
}

/// Session configuration
///
/// The delays and limits were tuned by hand; none of them is load-bearing for
/// correctness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Reloads attempted before failing over to another track
    pub max_retries: u32,

    /// Delay before resuming after a track switch (ms)
    pub switch_resume_delay_ms: u64,

    /// Delay before resuming after a reload (ms)
    pub retry_resume_delay_ms: u64,

    /// Delay before a failed connection is shown as recovered (ms)
    pub recovered_delay_ms: u64,

    /// Interval of the passive readiness check (ms)
    pub health_check_interval_ms: u64,

    /// Delay of the autoplay attempt after start (ms)
    pub autoplay_delay_ms: u64,

    /// Attempt playback on start without a user gesture
    pub autoplay_on_start: bool,

    /// Shuffle-style advance on next/prev and on track end
    pub autoplay_enabled: bool,

    /// Initial volume (0-100)
    pub volume: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            switch_resume_delay_ms: 100,
            retry_resume_delay_ms: 1000,
            recovered_delay_ms: 2000,
            health_check_interval_ms: 30_000,
            autoplay_delay_ms: 1000,
            autoplay_on_start: true,
            autoplay_enabled: true,
            volume: 80,
        }
    }
}

impl SessionConfig {
    pub fn switch_resume_delay(&self) -> Duration {
        Duration::from_millis(self.switch_resume_delay_ms)
    }

    pub fn retry_resume_delay(&self) -> Duration {
        Duration::from_millis(self.retry_resume_delay_ms)
    }

    pub fn recovered_delay(&self) -> Duration {
        Duration::from_millis(self.recovered_delay_ms)
    }

    pub fn health_check_interval(&self) -> Duration {
        Duration::from_millis(self.health_check_interval_ms)
    }

    pub fn autoplay_delay(&self) -> Duration {
        Duration::from_millis(self.autoplay_delay_ms)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_retries == 0 {
            return Err(PlaybackError::InvalidConfig(
                "max_retries must be at least 1".to_string(),
            ));
        }
        if self.health_check_interval_ms == 0 {
            return Err(PlaybackError::InvalidConfig(
                "health_check_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.volume > 100 {
            return Err(PlaybackError::InvalidConfig(format!(
                "volume must be 0-100, got {}",
                self.volume
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.max_retries, 3);
        assert_eq!(config.health_check_interval(), Duration::from_secs(30));
        assert_eq!(config.switch_resume_delay(), Duration::from_millis(100));
        assert_eq!(config.recovered_delay(), Duration::from_secs(2));
        assert!(config.autoplay_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn invalid_config() {
        let config = SessionConfig {
            max_retries: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(PlaybackError::InvalidConfig(_))
        ));

        let config = SessionConfig {
            volume: 101,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"max_retries": 5}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.retry_resume_delay_ms, 1000);
    }

    #[test]
    fn generation_ordering() {
        let g = Generation::INITIAL;
        assert!(g.next() > g);
        assert_eq!(g.next().value(), 1);
        assert_eq!(PlayTicket::from_parts(4, 2).generation, Generation::new(4));
    }

    #[test]
    fn connection_status_serde() {
        assert_eq!(
            serde_json::to_string(&ConnectionStatus::Poor).unwrap(),
            "\"poor\""
        );
    }
}
