//! Retry and recovery policy
//!
//! A pure transition function over [`Health`]. The session feeds it every
//! playback fault and carries out the returned [`RecoveryAction`]; timers and
//! the media element never appear here.
//!
//! ```text
//! Healthy --fault--> Degraded(1) --fault--> ... Degraded(max-1) --fault--> Failed
//!    ^                    |                                                  |
//!    +----- success ------+------------------ recovered ---------------------+
//! ```

use crate::types::ConnectionStatus;
use serde::{Deserialize, Serialize};

/// Connection health of the current source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Health {
    #[default]
    Healthy,

    /// Faults seen; the count is the number of reloads spent so far
    Degraded(u32),

    /// Retries exhausted, another track was substituted
    Failed,
}

impl Health {
    /// Reloads spent on the current source
    pub fn retry_count(self) -> u32 {
        match self {
            Self::Degraded(n) => n,
            Self::Healthy | Self::Failed => 0,
        }
    }

    pub fn connection_status(self) -> ConnectionStatus {
        match self {
            Self::Healthy => ConnectionStatus::Good,
            Self::Degraded(_) => ConnectionStatus::Poor,
            Self::Failed => ConnectionStatus::Failed,
        }
    }
}

/// What the session should do about a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecoveryAction {
    /// Switch from the remote URL to the bundled copy; not counted as a retry
    FallbackToLocal,

    /// Reload the current source, restoring position
    Reload {
        /// 1-based reload attempt
        attempt: u32,
    },

    /// Give up on this track and substitute a random other one
    FailOver,
}

/// Bounded retry policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveryPolicy {
    max_retries: u32,
}

impl RecoveryPolicy {
    /// Create a policy allowing `max_retries` faults per source (at least 1)
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries: max_retries.max(1),
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Transition on a playback error or stall
    ///
    /// The local fallback, when available, always comes before any retry is
    /// counted. The fault that brings the count to `max_retries` fails over.
    pub fn on_fault(&self, health: Health, fallback_available: bool) -> (Health, RecoveryAction) {
        let spent = health.retry_count();

        if fallback_available {
            return (Health::Degraded(spent), RecoveryAction::FallbackToLocal);
        }

        let attempt = spent + 1;
        if attempt < self.max_retries {
            (Health::Degraded(attempt), RecoveryAction::Reload { attempt })
        } else {
            (Health::Failed, RecoveryAction::FailOver)
        }
    }

    /// Transition on a confirmed successful play
    pub fn on_success(&self, _health: Health) -> Health {
        Health::Healthy
    }

    /// Transition when the recovered-delay after a fail-over elapses
    pub fn on_recovered(&self, health: Health) -> Health {
        match health {
            Health::Failed => Health::Healthy,
            other => other,
        }
    }
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self::new(3)
    }
}
